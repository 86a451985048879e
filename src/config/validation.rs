//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EventHubError, Result};
use super::{BackendKind, Settings, StorageKind};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_backend_config(&settings.backend)?;
    if settings.state.storage == StorageKind::Redis {
        validate_redis_config(&settings.redis)?;
    }
    validate_state_config(&settings.state)?;
    validate_logging_config(&settings.logging)?;
    validate_rate_limit_config(&settings.rate_limit)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(EventHubError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_ids.is_empty() {
        return Err(EventHubError::Config(
            "At least one admin ID must be configured".to_string()
        ));
    }

    Ok(())
}

/// Validate the backend section for the selected kind
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    match config.kind {
        BackendKind::Postgres => {
            let database = config.database.as_ref().ok_or_else(|| {
                EventHubError::Config("backend.database is required for the postgres backend".to_string())
            })?;
            validate_database_config(database)
        }
        BackendKind::Rest => {
            let rest = config.rest.as_ref().ok_or_else(|| {
                EventHubError::Config("backend.rest is required for the rest backend".to_string())
            })?;
            validate_rest_config(rest)
        }
        BackendKind::Memory => Ok(()),
    }
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHubError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(EventHubError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventHubError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate REST configuration
fn validate_rest_config(config: &super::RestConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHubError::Config(
            "REST URL is required".to_string()
        ));
    }

    url::Url::parse(&config.url)?;

    if config.api_key.is_empty() {
        return Err(EventHubError::Config(
            "REST API key is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(EventHubError::Config(
            "REST timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHubError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

fn validate_state_config(config: &super::StateConfig) -> Result<()> {
    if config.session_ttl_hours == 0 || config.dialog_ttl_minutes == 0 {
        return Err(EventHubError::Config(
            "Session and dialog TTLs must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitSettings) -> Result<()> {
    if config.enabled && config.requests_per_minute == 0 {
        return Err(EventHubError::Config(
            "Rate limit must allow at least one request per minute".to_string()
        ));
    }

    Ok(())
}
