//! Message handlers module
//!
//! Plain text is only meaningful inside a dialog: the sign-in answers, a
//! search query or feedback comments. Anything else gets a pointer to /help.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message, Bot};
use tracing::debug;

use crate::handlers::callbacks::feedback;
use crate::handlers::commands::{events, start};
use crate::handlers::telegram_id;
use crate::state::{AppContext, Scenario};
use crate::utils::errors::{EventHubError, Result};

/// Handle incoming text messages
pub async fn handle_message(bot: Bot, msg: Message, app: Arc<AppContext>) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| EventHubError::InvalidInput("No user in message".to_string()))?;
    let user_id = telegram_id(user)?;
    let chat_id = msg.chat.id;

    if !chat_id.is_user() {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        bot.send_message(chat_id, "I can only read text messages. Try /help.").await?;
        return Ok(());
    };

    let context = app.storage.context_for(user_id).await?;
    debug!(user_id = user_id, scenario = ?context.scenario.as_ref().map(|s| s.name()), "Processing message");

    match context.scenario.clone() {
        Some(Scenario::SignIn { name }) => start::handle_sign_in_input(&bot, chat_id, context, name, text, &app).await,
        Some(Scenario::Search) => events::apply_search(&bot, chat_id, context, text, &app).await,
        Some(Scenario::Feedback { .. }) => feedback::set_comments(&bot, chat_id, context, text, &app).await,
        None => {
            bot.send_message(chat_id, "Use /events to browse events or /help to see what I can do.").await?;
            Ok(())
        }
    }
}
