//! Authorization for organizer commands
//!
//! Organizers are the Telegram ids listed in `bot.admin_ids`. Everyone else
//! is an attendee.

use std::sync::Arc;

use tracing::warn;

use crate::config::Settings;
use crate::state::SessionContext;
use crate::utils::errors::{EventHubError, Result};

#[derive(Clone)]
pub struct AuthService {
    settings: Arc<Settings>,
}

impl AuthService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn is_admin(&self, telegram_id: i64) -> bool {
        self.settings.is_admin(telegram_id)
    }

    /// Fail with `PermissionDenied` unless the session belongs to an organizer
    pub fn require_admin(&self, context: &SessionContext) -> Result<()> {
        if context.is_admin {
            Ok(())
        } else {
            warn!(telegram_id = context.session.telegram_id, "Non-admin attempted an organizer action");
            Err(EventHubError::PermissionDenied("Only organizers can manage registrations".to_string()))
        }
    }
}
