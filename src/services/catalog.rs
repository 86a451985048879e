//! Event catalog
//!
//! Loads the whole event list, earliest first, and narrows it in memory by a
//! free-text query and a category. Filtering is a linear scan over the loaded
//! list; there is no server-side search or paging.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::Backend;
use crate::models::{CreateEventRequest, Event, EventCategory};
use crate::services::notification::Notification;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::logging::log_backend_error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EventCategory),
}

impl CategoryFilter {
    /// Parse the value of a category selector: `all` or a category name
    pub fn parse(value: &str) -> Result<Self> {
        if value == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(value.parse()?))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

/// Search text plus category selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let query = self.query.to_lowercase();
        let matches_search = event.title.to_lowercase().contains(&query)
            || event.description.to_lowercase().contains(&query);
        let matches_category = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => event.category == category,
        };
        matches_search && matches_category
    }

    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|e| self.matches(e)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.category != CategoryFilter::All
    }
}

/// What the events screen shows
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    pub events: Vec<Event>,
    pub total: usize,
    pub notification: Option<Notification>,
}

#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn Backend>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Fetch every event, earliest start first
    pub async fn load(&self) -> Result<Vec<Event>> {
        self.backend.list_events().await
    }

    /// Load and filter; a failed load becomes an empty list with a notification
    pub async fn browse(&self, filter: &EventFilter) -> CatalogView {
        match self.load().await {
            Ok(events) => {
                let total = events.len();
                let events: Vec<Event> = filter.apply(&events).into_iter().cloned().collect();
                debug!(total = total, shown = events.len(), query = %filter.query, category = filter.category.as_str(), "Catalog filtered");
                CatalogView {
                    events,
                    total,
                    notification: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to load events");
                log_backend_error("list_events", &e.to_string(), None);
                CatalogView {
                    notification: Some(Notification::failure("Failed to load events", "")),
                    ..CatalogView::default()
                }
            }
        }
    }

    pub async fn get(&self, event_id: Uuid) -> Result<Event> {
        self.backend
            .find_event(event_id)
            .await?
            .ok_or(EventHubError::EventNotFound { event_id })
    }

    /// Validate and insert a new event, then reload the catalog
    pub async fn create(&self, request: CreateEventRequest, filter: &EventFilter) -> (Notification, Option<CatalogView>) {
        if let Err(e) = request.validate() {
            return (Notification::from_error("Invalid event", &e), None);
        }

        let title = request.title.clone();
        match self.backend.create_event(request).await {
            Ok(()) => {
                let view = self.browse(filter).await;
                (Notification::success("Event created", format!("\"{}\" is now listed", title)), Some(view))
            }
            Err(e) => (Notification::from_error("Event creation failed", &e), None),
        }
    }
}
