//! Database module
//!
//! This module holds the data-access boundary and its implementations

pub mod backend;
pub mod connection;
pub mod memory;
pub mod repositories;
pub mod rest;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::{BackendKind, Settings};
use crate::utils::errors::{EventHubError, Result};

// Re-export commonly used database components
pub use backend::Backend;
pub use connection::{DatabasePool, DatabaseConfig, create_pool, health_check};
pub use memory::MemoryBackend;
pub use repositories::{EventRepository, RegistrationRepository, FeedbackRepository, ProfileRepository};
pub use rest::RestBackend;
pub use service::DatabaseService;

/// Build the backend selected in the settings
pub async fn connect_backend(settings: &Settings) -> Result<Arc<dyn Backend>> {
    match settings.backend.kind {
        BackendKind::Postgres => {
            let database = settings.backend.database.as_ref().ok_or_else(|| {
                EventHubError::Config("backend.database is not configured".to_string())
            })?;
            info!("Connecting to Postgres...");
            let pool = create_pool(&DatabaseConfig::from(database)).await?;
            Ok(Arc::new(DatabaseService::new(pool)))
        }
        BackendKind::Rest => {
            let rest = settings.backend.rest.as_ref().ok_or_else(|| {
                EventHubError::Config("backend.rest is not configured".to_string())
            })?;
            info!(url = %rest.url, "Using hosted REST backend");
            let backend = RestBackend::new(rest)?;
            backend.health_check().await?;
            Ok(Arc::new(backend))
        }
        BackendKind::Memory => {
            info!("Using in-memory backend; data is lost on restart");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}
