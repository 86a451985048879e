//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod catalog;
pub mod feedback;
pub mod management;
pub mod notification;
pub mod registration;
pub mod session;

// Re-export commonly used services
pub use auth::AuthService;
pub use catalog::{CatalogService, CatalogView, CategoryFilter, EventFilter};
pub use feedback::{FeedbackForm, FeedbackService};
pub use management::{DecisionOutcome, ManagementService, ManagementView, RegistrationRow};
pub use notification::{Notification, NotificationService, NotificationVariant};
pub use registration::{Affordance, RegistrationService, RegistrationView, RequestOutcome};
pub use session::SessionService;

use std::sync::Arc;

use teloxide::Bot;

use crate::config::Settings;
use crate::database::Backend;
use crate::state::StateStorage;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub feedback_service: FeedbackService,
    pub management_service: ManagementService,
    pub notification_service: NotificationService,
    pub registration_service: RegistrationService,
    pub session_service: SessionService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, settings: Arc<Settings>, backend: Arc<dyn Backend>, storage: Arc<StateStorage>) -> Self {
        Self {
            auth_service: AuthService::new(settings.clone()),
            catalog_service: CatalogService::new(backend.clone()),
            feedback_service: FeedbackService::new(backend.clone()),
            management_service: ManagementService::new(backend.clone()),
            notification_service: NotificationService::new(bot),
            registration_service: RegistrationService::new(backend.clone()),
            session_service: SessionService::new(backend, storage, settings),
        }
    }

    /// Health check for backing services
    pub async fn health_check(backend: &dyn Backend, storage: &StateStorage) -> ServiceHealthStatus {
        ServiceHealthStatus {
            backend_healthy: backend.health_check().await.is_ok(),
            storage_healthy: storage.health_check().await.is_ok(),
        }
    }
}

/// Service health status
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub backend_healthy: bool,
    pub storage_healthy: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.backend_healthy && self.storage_healthy
    }
}
