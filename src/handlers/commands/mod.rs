//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod admin;
pub mod events;
pub mod help;
pub mod start;

use std::sync::Arc;

use teloxide::{prelude::*, types::Message, utils::command::BotCommands, Bot};
use tracing::debug;

use crate::state::AppContext;
use crate::utils::errors::{EventHubError, Result};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Campus Event Hub commands:")]
pub enum Command {
    #[command(description = "Open the landing page or your events")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Browse events")]
    Events,
    #[command(description = "Search events by title or description")]
    Search(String),
    #[command(description = "Review registrations (organizers only)")]
    Admin,
    #[command(description = "Create an event (organizers only)")]
    NewEvent(String),
    #[command(description = "Leave the current dialog")]
    Cancel,
    #[command(description = "Sign out")]
    SignOut,
}

/// Main command dispatcher
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, app: Arc<AppContext>) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| EventHubError::InvalidInput("No user in message".to_string()))?;
    let telegram_id = crate::handlers::telegram_id(user)?;
    let chat_id = msg.chat.id;

    debug!(user_id = telegram_id, chat_id = ?chat_id, command = ?cmd, "Processing command");

    if !chat_id.is_user() {
        bot.send_message(chat_id, "Please message me directly to use Campus Event Hub.").await?;
        return Ok(());
    }

    match cmd {
        Command::Start => start::handle_start(&bot, chat_id, telegram_id, &app).await,
        Command::Help => help::handle_help(&bot, chat_id, telegram_id, &app).await,
        Command::Events => events::handle_events(&bot, chat_id, telegram_id, &app).await,
        Command::Search(query) => events::handle_search(&bot, chat_id, telegram_id, &query, &app).await,
        Command::Admin => admin::handle_admin(&bot, chat_id, telegram_id, &app).await,
        Command::NewEvent(args) => admin::handle_new_event(&bot, chat_id, telegram_id, &args, &app).await,
        Command::Cancel => start::handle_cancel(&bot, chat_id, telegram_id, &app).await,
        Command::SignOut => start::handle_sign_out(&bot, chat_id, telegram_id, &app).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("/search hack", "bot").unwrap(), Command::Search("hack".to_string()));
        assert_eq!(Command::parse("/signout", "bot").unwrap(), Command::SignOut);
        assert_eq!(
            Command::parse("/newevent A | sports | Field | 2030-01-01 10:00 | 2030-01-01 12:00 | 10 | Fun", "bot").unwrap(),
            Command::NewEvent("A | sports | Field | 2030-01-01 10:00 | 2030-01-01 12:00 | 10 | Fun".to_string())
        );
    }
}
