//! User-facing notifications
//!
//! Every outcome the user should hear about (success, validation failure,
//! backend failure) is a [`Notification`] with a title and a description.
//! The [`NotificationService`] delivers them as chat messages.

use std::fmt;

use teloxide::{Bot, prelude::*, types::ChatId};
use tracing::debug;

use crate::utils::errors::{EventHubError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }

    /// Failure whose description is the error's message, unchanged
    pub fn from_error(title: impl Into<String>, error: &EventHubError) -> Self {
        Self::failure(title, error.user_message())
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.variant {
            NotificationVariant::Default => "✅",
            NotificationVariant::Destructive => "⚠️",
        };
        if self.description.is_empty() {
            write!(f, "{} {}", icon, self.title)
        } else {
            write!(f, "{} {}\n{}", icon, self.title, self.description)
        }
    }
}

/// Sends notifications to chats
#[derive(Clone)]
pub struct NotificationService {
    bot: Bot,
}

impl NotificationService {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub async fn send(&self, chat_id: ChatId, notification: &Notification) -> Result<()> {
        debug!(chat_id = ?chat_id, title = %notification.title, destructive = notification.is_destructive(), "Sending notification");
        self.bot.send_message(chat_id, notification.to_string()).await?;
        Ok(())
    }

    /// Send an optional notification, doing nothing for `None`
    pub async fn send_opt(&self, chat_id: ChatId, notification: Option<&Notification>) -> Result<()> {
        match notification {
            Some(n) => self.send(chat_id, n).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_title_and_description() {
        let n = Notification::success("Registration submitted", "Your registration is pending approval");
        assert_eq!(n.to_string(), "✅ Registration submitted\nYour registration is pending approval");
        assert!(!n.is_destructive());
    }

    #[test]
    fn error_message_is_passed_through() {
        let err = EventHubError::Backend { status: 400, message: "new row violates row-level security policy".into() };
        let n = Notification::from_error("Registration failed", &err);
        assert!(n.is_destructive());
        assert_eq!(n.description, "new row violates row-level security policy");
    }
}
