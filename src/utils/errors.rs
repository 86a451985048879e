//! Error handling for CampusEventHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for CampusEventHub application
#[derive(Error, Debug)]
pub enum EventHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: Uuid },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for CampusEventHub operations
pub type Result<T> = std::result::Result<T, EventHubError>;

impl EventHubError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventHubError::Database(_) => false,
            EventHubError::Telegram(_) => true,
            EventHubError::Backend { status, .. } => *status >= 500,
            EventHubError::SchemaMismatch(_) => false,
            EventHubError::Config(_) => false,
            EventHubError::PermissionDenied(_) => false,
            EventHubError::NotSignedIn => false,
            EventHubError::EventNotFound { .. } => false,
            EventHubError::RegistrationNotFound { .. } => false,
            EventHubError::InvalidStateTransition { .. } => false,
            EventHubError::Redis(_) => true,
            EventHubError::Http(_) => true,
            EventHubError::Serialization(_) => false,
            EventHubError::Io(_) => true,
            EventHubError::UrlParse(_) => false,
            EventHubError::RateLimitExceeded => true,
            EventHubError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventHubError::Database(_) => ErrorSeverity::Critical,
            EventHubError::SchemaMismatch(_) => ErrorSeverity::Critical,
            EventHubError::Config(_) => ErrorSeverity::Critical,
            EventHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventHubError::NotSignedIn => ErrorSeverity::Info,
            EventHubError::RateLimitExceeded => ErrorSeverity::Warning,
            EventHubError::InvalidInput(_) => ErrorSeverity::Info,
            EventHubError::InvalidStateTransition { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Text shown to the user in a failure notification.
    ///
    /// Backend errors pass through verbatim; everything else uses its display form.
    pub fn user_message(&self) -> String {
        match self {
            EventHubError::Backend { message, .. } => message.clone(),
            EventHubError::Database(sqlx::Error::Database(db)) => db.message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_passes_through_verbatim() {
        let err = EventHubError::Backend {
            status: 409,
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert_eq!(err.user_message(), "duplicate key value violates unique constraint");
        assert_eq!(err.to_string(), "duplicate key value violates unique constraint");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn severity_levels() {
        assert_eq!(EventHubError::Config("x".into()).severity(), ErrorSeverity::Critical);
        assert_eq!(EventHubError::NotSignedIn.severity(), ErrorSeverity::Info);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
