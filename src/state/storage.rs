//! State storage implementation
//!
//! This module handles persistence of conversation contexts and sessions,
//! including serialization, deserialization and expiration.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{Settings, StorageKind};
use crate::utils::errors::Result;
use super::context::ConversationContext;
use super::session::Session;
use super::store::{MemoryStore, RedisStore, StateStore};

/// Keyed JSON storage for per-user state
#[derive(Clone)]
pub struct StateStorage {
    store: Arc<dyn StateStore>,
    prefix: String,
    context_ttl: Duration,
    session_ttl: Duration,
    dialog_ttl: chrono::Duration,
}

impl StateStorage {
    pub fn new(store: Arc<dyn StateStore>, settings: &Settings) -> Self {
        let dialog_minutes = i64::try_from(settings.state.dialog_ttl_minutes).unwrap_or(i64::MAX / 60_000);
        Self {
            store,
            prefix: settings.redis.prefix.clone(),
            context_ttl: Duration::from_secs(settings.redis.ttl_seconds),
            session_ttl: Duration::from_secs(settings.state.session_ttl_hours * 3600),
            dialog_ttl: chrono::Duration::minutes(dialog_minutes),
        }
    }

    /// Connect the store chosen in the settings
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn StateStore> = match settings.state.storage {
            StorageKind::Redis => {
                info!(url = %settings.redis.url, "Connecting state storage to Redis");
                let store = RedisStore::connect(&settings.redis.url).await?;
                store.ping().await?;
                Arc::new(store)
            }
            StorageKind::Memory => {
                warn!("Using in-memory state storage; sessions are lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, settings))
    }

    /// How long a dialog may sit idle before it is abandoned
    pub fn dialog_ttl(&self) -> chrono::Duration {
        self.dialog_ttl
    }

    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let key = self.context_key(context.user_id);
        debug!(user_id = context.user_id, key = %key, scenario = ?context.scenario.as_ref().map(|s| s.name()), "Saving context");
        self.put(&key, context, self.context_ttl).await
    }

    /// Load a context, dropping a scenario that has expired
    pub async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let key = self.context_key(user_id);
        let Some(mut context) = self.fetch::<ConversationContext>(&key).await? else {
            debug!(user_id = user_id, "No context found");
            return Ok(None);
        };

        if context.clear_if_expired() {
            warn!(user_id = user_id, "Scenario expired, clearing");
            self.save_context(&context).await?;
        }
        Ok(Some(context))
    }

    /// Load a context or start a fresh one
    pub async fn context_for(&self, user_id: i64) -> Result<ConversationContext> {
        Ok(self
            .load_context(user_id)
            .await?
            .unwrap_or_else(|| ConversationContext::new(user_id)))
    }

    pub async fn delete_context(&self, user_id: i64) -> Result<()> {
        let deleted = self.store.delete(&self.context_key(user_id)).await?;
        debug!(user_id = user_id, deleted = deleted, "Deleted context");
        Ok(())
    }

    pub async fn save_session(&self, session: &Session) -> Result<()> {
        let key = self.session_key(session.telegram_id);
        debug!(user_id = session.telegram_id, key = %key, "Saving session");
        self.put(&key, session, self.session_ttl).await
    }

    pub async fn load_session(&self, telegram_id: i64) -> Result<Option<Session>> {
        self.fetch(&self.session_key(telegram_id)).await
    }

    /// Remove a session, reporting whether one existed
    pub async fn delete_session(&self, telegram_id: i64) -> Result<bool> {
        self.store.delete(&self.session_key(telegram_id)).await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.ping().await
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            error!(key = %key, error = %e, "Failed to serialize state");
            e
        })?;
        self.store.set_ex(key, serialized, ttl).await.map_err(|e| {
            error!(key = %key, error = %e, "Failed to write state");
            e
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(data) => {
                let value = serde_json::from_str::<T>(&data).map_err(|e| {
                    error!(key = %key, error = %e, "Failed to deserialize state");
                    e
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn context_key(&self, user_id: i64) -> String {
        format!("{}context:{}", self.prefix, user_id)
    }

    fn session_key(&self, telegram_id: i64) -> String {
        format!("{}session:{}", self.prefix, telegram_id)
    }
}
