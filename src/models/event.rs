//! Event model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::errors::EventHubError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i32,
}

impl CreateEventRequest {
    /// Check the request before it reaches the backend
    pub fn validate(&self) -> Result<(), EventHubError> {
        if self.title.trim().is_empty() {
            return Err(EventHubError::InvalidInput("Title is required".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(EventHubError::InvalidInput("Location is required".to_string()));
        }
        if self.end_date <= self.start_date {
            return Err(EventHubError::InvalidInput("End date must be after the start date".to_string()));
        }
        if self.max_participants <= 0 {
            return Err(EventHubError::InvalidInput("Maximum participants must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Sports,
    Hackathon,
    Cultural,
    Workshop,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Sports,
        EventCategory::Hackathon,
        EventCategory::Cultural,
        EventCategory::Workshop,
        EventCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Sports => "sports",
            EventCategory::Hackathon => "hackathon",
            EventCategory::Cultural => "cultural",
            EventCategory::Workshop => "workshop",
            EventCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Sports => "Sports",
            EventCategory::Hackathon => "Hackathon",
            EventCategory::Cultural => "Cultural",
            EventCategory::Workshop => "Workshop",
            EventCategory::Other => "Other",
        }
    }

    /// Badge shown next to the category on event cards
    pub fn badge(&self) -> &'static str {
        match self {
            EventCategory::Sports => "🔵",
            EventCategory::Hackathon => "🟢",
            EventCategory::Cultural => "🟣",
            EventCategory::Workshop => "🟠",
            EventCategory::Other => "⚪",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = EventHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sports" => Ok(EventCategory::Sports),
            "hackathon" => Ok(EventCategory::Hackathon),
            "cultural" => Ok(EventCategory::Cultural),
            "workshop" => Ok(EventCategory::Workshop),
            "other" => Ok(EventCategory::Other),
            other => Err(EventHubError::SchemaMismatch(format!("unknown event category '{}'", other))),
        }
    }
}
