//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for dialog text input
//!
//! Screens are rendered by [`views`] and button payloads encoded by [`actions`].

pub mod actions;
pub mod callbacks;
pub mod commands;
pub mod messages;
pub mod views;

use teloxide::{prelude::*, types::ChatId, Bot};
use tracing::{error, warn};

use crate::services::Notification;
use crate::state::{AppContext, SessionContext};
use crate::utils::errors::{ErrorSeverity, EventHubError, Result};

pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::handle_message;
pub use views::Screen;

/// Send a screen as a new message
pub async fn send_screen(bot: &Bot, chat_id: ChatId, screen: Screen) -> Result<()> {
    let request = bot.send_message(chat_id, screen.text);
    match screen.keyboard {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

pub async fn notify(app: &AppContext, chat_id: ChatId, notification: &Notification) -> Result<()> {
    app.services.notification_service.send(chat_id, notification).await
}

/// Resolve the caller's session, sending the sign-in prompt when there is none
pub async fn require_session(bot: &Bot, chat_id: ChatId, app: &AppContext, telegram_id: i64) -> Result<Option<SessionContext>> {
    match app.services.session_service.current(telegram_id).await? {
        Some(session) => Ok(Some(session)),
        None => {
            send_screen(bot, chat_id, views::sign_in_required()).await?;
            Ok(None)
        }
    }
}

/// Tell the user a handler failed, in terms they can act on
pub async fn report_error(bot: &Bot, chat_id: ChatId, err: &EventHubError) {
    match err.severity() {
        ErrorSeverity::Critical | ErrorSeverity::Error => {
            error!(chat_id = ?chat_id, error = %err, recoverable = err.is_recoverable(), "Handler failed")
        }
        _ => warn!(chat_id = ?chat_id, error = %err, "Handler rejected input"),
    }

    let result = match err {
        EventHubError::NotSignedIn => send_screen(bot, chat_id, views::sign_in_required()).await,
        other => {
            let text = match other {
                EventHubError::RateLimitExceeded => {
                    "⏳ Too many requests. Please slow down and try again in a minute.".to_string()
                }
                EventHubError::PermissionDenied(message) => Notification::failure("Not allowed", message.clone()).to_string(),
                _ => Notification::from_error("Something went wrong", other).to_string(),
            };
            bot.send_message(chat_id, text).await.map(|_| ()).map_err(EventHubError::from)
        }
    };

    if let Err(e) = result {
        error!(chat_id = ?chat_id, error = %e, "Failed to report error to user");
    }
}

/// Telegram user ids fit in 52 bits; the API types them as u64
pub fn telegram_id(user: &teloxide::types::User) -> Result<i64> {
    i64::try_from(user.id.0)
        .map_err(|_| EventHubError::InvalidInput(format!("Telegram user id {} is out of range", user.id.0)))
}
