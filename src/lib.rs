//! Campus Event Hub Telegram Bot
//!
//! Inter-college event discovery over Telegram: students browse and filter
//! events, request registration and leave feedback; organizers review and
//! decide registrations. Data lives behind a pluggable backend (Postgres, a
//! hosted PostgREST interface, or memory) and dialog state in Redis.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventHubError, Result};

// Re-export main components for easy access
pub use database::{Backend, DatabaseService, MemoryBackend, RestBackend};
pub use services::ServiceFactory;
pub use state::{AppContext, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
