//! Help command handler

use teloxide::{prelude::*, types::ChatId, Bot};

use crate::handlers::views;
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let text = views::help(app.services.auth_service.is_admin(telegram_id));
    bot.send_message(chat_id, text).await?;
    Ok(())
}
