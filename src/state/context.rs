//! Conversation context management
//!
//! This module holds the application-wide context handed to every handler,
//! and the per-user conversation context: which dialog the user is in and the
//! screen selections that survive between messages.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::database::Backend;
use crate::services::catalog::EventFilter;
use crate::services::feedback::FeedbackForm;
use crate::services::ServiceFactory;
use crate::state::storage::StateStorage;

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub backend: Arc<dyn Backend>,
    pub storage: Arc<StateStorage>,
    pub services: Arc<ServiceFactory>,
}

impl AppContext {
    pub fn new(settings: Arc<Settings>, backend: Arc<dyn Backend>, storage: Arc<StateStorage>, services: ServiceFactory) -> Self {
        Self {
            settings,
            backend,
            storage,
            services: Arc::new(services),
        }
    }
}

/// A multi-message dialog the user is part way through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    /// Waiting for the name, then the college
    SignIn { name: Option<String> },
    /// Rating selected with buttons; text messages become the comment
    Feedback {
        event_id: Uuid,
        event_title: String,
        form: FeedbackForm,
    },
    /// Next text message is the catalog search query
    Search,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::SignIn { .. } => "sign_in",
            Scenario::Feedback { .. } => "feedback",
            Scenario::Search => "search",
        }
    }
}

/// User conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Telegram user this context belongs to
    pub user_id: i64,
    pub scenario: Option<Scenario>,
    /// When the current scenario is abandoned
    pub scenario_expires_at: Option<DateTime<Utc>>,
    /// Catalog search text and category, kept while browsing
    #[serde(default)]
    pub catalog_filter: EventFilter,
    /// Catalog page, reset whenever the filter changes
    #[serde(default)]
    pub catalog_page: usize,
    /// Event selected in the admin registrations view
    #[serde(default)]
    pub admin_event_filter: Option<Uuid>,
    #[serde(default)]
    pub admin_page: usize,
    #[serde(default)]
    pub admin_events_page: usize,
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            scenario: None,
            scenario_expires_at: None,
            catalog_filter: EventFilter::default(),
            catalog_page: 0,
            admin_event_filter: None,
            admin_page: 0,
            admin_events_page: 0,
            updated_at: Utc::now(),
        }
    }

    /// Start a scenario, replacing any current one
    pub fn start_scenario(&mut self, scenario: Scenario, ttl: Duration) {
        self.scenario = Some(scenario);
        self.scenario_expires_at = Some(Utc::now() + ttl);
        self.updated_at = Utc::now();
    }

    pub fn complete_scenario(&mut self) {
        self.scenario = None;
        self.scenario_expires_at = None;
        self.updated_at = Utc::now();
    }

    pub fn is_scenario_expired(&self) -> bool {
        self.scenario_expires_at.map_or(false, |at| Utc::now() > at)
    }

    /// Drop an abandoned scenario, keeping the screen selections
    pub fn clear_if_expired(&mut self) -> bool {
        if self.scenario.is_some() && self.is_scenario_expired() {
            self.complete_scenario();
            true
        } else {
            false
        }
    }

    pub fn is_in(&self, name: &str) -> bool {
        self.scenario.as_ref().map_or(false, |s| s.name() == name)
    }

    /// Replace the catalog filter, going back to the first page
    pub fn set_catalog_filter(&mut self, filter: EventFilter) {
        self.catalog_filter = filter;
        self.catalog_page = 0;
        self.touch();
    }

    /// Select an event in the registrations view, going back to the first page
    pub fn set_admin_event_filter(&mut self, filter: Option<Uuid>) {
        self.admin_event_filter = filter;
        self.admin_page = 0;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_idle() {
        let context = ConversationContext::new(123);
        assert_eq!(context.user_id, 123);
        assert!(context.scenario.is_none());
        assert_eq!(context.catalog_filter, EventFilter::default());
    }

    #[test]
    fn scenario_lifecycle() {
        let mut context = ConversationContext::new(1);
        context.start_scenario(Scenario::SignIn { name: None }, Duration::minutes(10));
        assert!(context.is_in("sign_in"));
        assert!(!context.clear_if_expired());

        context.complete_scenario();
        assert!(context.scenario.is_none());
    }

    #[test]
    fn expired_scenario_is_cleared_but_filters_survive() {
        let mut context = ConversationContext::new(1);
        context.catalog_filter.query = "hack".to_string();
        context.start_scenario(Scenario::Search, Duration::minutes(-1));

        assert!(context.clear_if_expired());
        assert!(context.scenario.is_none());
        assert_eq!(context.catalog_filter.query, "hack");
    }

    #[test]
    fn changing_filters_returns_to_first_page() {
        let mut context = ConversationContext::new(1);
        context.catalog_page = 4;
        context.admin_page = 2;
        context.admin_events_page = 1;

        context.set_catalog_filter(EventFilter { query: "rust".to_string(), ..Default::default() });
        context.set_admin_event_filter(Some(Uuid::new_v4()));

        assert_eq!(context.catalog_page, 0);
        assert_eq!(context.admin_page, 0);
        assert_eq!(context.admin_events_page, 1);
    }

    #[test]
    fn contexts_saved_before_paging_still_load() {
        let json = r#"{"user_id":5,"scenario":null,"scenario_expires_at":null,"updated_at":"2024-01-01T00:00:00Z"}"#;
        let context: ConversationContext = serde_json::from_str(json).unwrap();
        assert_eq!(context.catalog_page, 0);
        assert_eq!(context.admin_page, 0);
    }

    #[test]
    fn context_serializes_with_tagged_scenario() {
        let mut context = ConversationContext::new(7);
        context.start_scenario(
            Scenario::Feedback {
                event_id: Uuid::new_v4(),
                event_title: "Hackathon".to_string(),
                form: FeedbackForm::opened(),
            },
            Duration::minutes(5),
        );

        let json = serde_json::to_string(&context).unwrap();
        assert!(json.contains("\"kind\":\"feedback\""));
        let restored: ConversationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.scenario, context.scenario);
    }
}
