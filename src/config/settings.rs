//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub backend: BackendConfig,
    pub redis: RedisConfig,
    pub state: StateConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitSettings,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Telegram ids of the organizers allowed to manage registrations
    pub admin_ids: Vec<i64>,
}

/// Which data backend serves the event tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    Rest,
    Memory,
}

/// Data backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub database: Option<DatabaseConfig>,
    pub rest: Option<RestConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Hosted REST interface configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Where conversation state and sessions live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Redis,
    Memory,
}

/// Conversation state and session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StateConfig {
    pub storage: StorageKind,
    pub session_ttl_hours: u64,
    pub dialog_ttl_minutes: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when absent
    pub file_path: Option<String>,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_minute: u32,
    pub burst: u32,
    pub admin_exempt: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("EVENTHUB")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventHubError> {
        super::validation::validate_settings(self)
    }

    /// Check whether a Telegram user is a configured organizer
    pub fn is_admin(&self, telegram_id: i64) -> bool {
        self.bot.admin_ids.contains(&telegram_id)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_ids: vec![],
            },
            backend: BackendConfig {
                kind: BackendKind::Postgres,
                database: Some(DatabaseConfig {
                    url: "postgresql://localhost/campus_events".to_string(),
                    max_connections: 10,
                    min_connections: 1,
                }),
                rest: None,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "eventhub:".to_string(),
                ttl_seconds: 3600,
            },
            state: StateConfig {
                storage: StorageKind::Redis,
                session_ttl_hours: 24 * 7,
                dialog_ttl_minutes: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
            rate_limit: RateLimitSettings {
                enabled: true,
                requests_per_minute: 30,
                burst: 10,
                admin_exempt: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_services() {
        let settings = Settings::default();
        assert_eq!(settings.backend.kind, BackendKind::Postgres);
        assert!(settings.backend.database.is_some());
        assert_eq!(settings.state.storage, StorageKind::Redis);
        assert!(settings.redis.url.starts_with("redis://"));
    }

    #[test]
    fn admin_lookup_uses_configured_ids() {
        let mut settings = Settings::default();
        settings.bot.admin_ids = vec![42];
        assert!(settings.is_admin(42));
        assert!(!settings.is_admin(7));
    }

    #[test]
    fn backend_kind_parses_lowercase() {
        let kind: BackendKind = serde_json::from_str("\"rest\"").unwrap();
        assert_eq!(kind, BackendKind::Rest);
    }
}
