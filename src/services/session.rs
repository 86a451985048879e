//! Sign-in and session lookup
//!
//! Signing in stores the user's profile and a session keyed by their
//! Telegram id. Commands that need an identity resolve it through
//! [`SessionService::require`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Settings;
use crate::database::Backend;
use crate::models::Profile;
use crate::state::{Session, SessionContext, StateStorage};
use crate::utils::errors::{EventHubError, Result};
use crate::utils::helpers::normalize_whitespace;
use crate::utils::logging::log_user_action;

const MAX_FIELD_CHARS: usize = 100;

#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn Backend>,
    storage: Arc<StateStorage>,
    settings: Arc<Settings>,
}

impl SessionService {
    pub fn new(backend: Arc<dyn Backend>, storage: Arc<StateStorage>, settings: Arc<Settings>) -> Self {
        Self { backend, storage, settings }
    }

    /// Clean up a name or college typed by the user
    pub fn validate_field(label: &str, raw: &str) -> Result<String> {
        let value = normalize_whitespace(raw);
        if value.is_empty() {
            return Err(EventHubError::InvalidInput(format!("{} cannot be empty", label)));
        }
        if value.chars().count() > MAX_FIELD_CHARS {
            return Err(EventHubError::InvalidInput(format!("{} is too long (max {} characters)", label, MAX_FIELD_CHARS)));
        }
        Ok(value)
    }

    /// Save the profile, then the session
    pub async fn sign_in(&self, telegram_id: i64, name: &str, college: &str) -> Result<Session> {
        let name = Self::validate_field("Name", name)?;
        let college = Self::validate_field("College", college)?;
        let session = Session::new(telegram_id, name, college);

        self.backend
            .upsert_profile(Profile {
                id: session.profile_id,
                name: session.name.clone(),
                college: session.college.clone(),
            })
            .await?;
        self.storage.save_session(&session).await?;

        info!(telegram_id = telegram_id, profile_id = %session.profile_id, "User signed in");
        log_user_action(telegram_id, "sign_in", Some(&session.college));
        Ok(session)
    }

    pub async fn current(&self, telegram_id: i64) -> Result<Option<SessionContext>> {
        let session = self.storage.load_session(telegram_id).await?;
        debug!(telegram_id = telegram_id, signed_in = session.is_some(), "Session lookup");
        Ok(session.map(|session| SessionContext {
            is_admin: self.settings.is_admin(telegram_id),
            session,
        }))
    }

    /// Session for a protected command, or `NotSignedIn`
    pub async fn require(&self, telegram_id: i64) -> Result<SessionContext> {
        self.current(telegram_id).await?.ok_or(EventHubError::NotSignedIn)
    }

    pub async fn sign_out(&self, telegram_id: i64) -> Result<bool> {
        let existed = self.storage.delete_session(telegram_id).await?;
        self.storage.delete_context(telegram_id).await?;
        if existed {
            log_user_action(telegram_id, "sign_out", None);
        }
        Ok(existed)
    }
}
