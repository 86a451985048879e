//! Start command handler
//!
//! Handles the landing page, the sign-in dialog and signing out

use teloxide::{prelude::*, types::ChatId, Bot};
use tracing::{debug, info};

use crate::handlers::{commands::events, send_screen, views};
use crate::services::SessionService;
use crate::state::{AppContext, ConversationContext, Scenario};
use crate::utils::errors::{EventHubError, Result};

/// Handle /start: signed-in users go straight to the events list
pub async fn handle_start(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    if app.services.session_service.current(telegram_id).await?.is_some() {
        debug!(user_id = telegram_id, "Signed-in user opened landing page, redirecting");
        return events::show_catalog(bot, chat_id, telegram_id, app).await;
    }
    send_screen(bot, chat_id, views::landing()).await
}

/// "Get Started" button: begin the sign-in dialog
pub async fn handle_get_started(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    if app.services.session_service.current(telegram_id).await?.is_some() {
        return events::show_catalog(bot, chat_id, telegram_id, app).await;
    }

    let mut context = app.storage.context_for(telegram_id).await?;
    context.start_scenario(Scenario::SignIn { name: None }, app.storage.dialog_ttl());
    app.storage.save_context(&context).await?;

    info!(user_id = telegram_id, "Sign-in started");
    bot.send_message(chat_id, "👋 Welcome! What's your name?").await?;
    Ok(())
}

/// Text typed during the sign-in dialog
pub async fn handle_sign_in_input(
    bot: &Bot,
    chat_id: ChatId,
    mut context: ConversationContext,
    name: Option<String>,
    text: &str,
    app: &AppContext,
) -> Result<()> {
    let telegram_id = context.user_id;

    let Some(name) = name else {
        match SessionService::validate_field("Name", text) {
            Ok(name) => {
                context.start_scenario(Scenario::SignIn { name: Some(name) }, app.storage.dialog_ttl());
                app.storage.save_context(&context).await?;
                bot.send_message(chat_id, "🏫 Which college are you from?").await?;
            }
            Err(e) => {
                bot.send_message(chat_id, format!("{}\nWhat's your name?", e.user_message())).await?;
            }
        }
        return Ok(());
    };

    match app.services.session_service.sign_in(telegram_id, &name, text).await {
        Ok(session) => {
            context.complete_scenario();
            app.storage.save_context(&context).await?;
            bot.send_message(chat_id, format!("🎉 You're signed in, {} from {}!", session.name, session.college))
                .await?;
            events::show_catalog(bot, chat_id, telegram_id, app).await
        }
        Err(e @ EventHubError::InvalidInput(_)) => {
            bot.send_message(chat_id, format!("{}\nWhich college are you from?", e.user_message())).await?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn handle_cancel(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let mut context = app.storage.context_for(telegram_id).await?;
    let text = match &context.scenario {
        Some(scenario) => {
            debug!(user_id = telegram_id, scenario = scenario.name(), "Dialog cancelled");
            context.complete_scenario();
            app.storage.save_context(&context).await?;
            "Cancelled."
        }
        None => "Nothing to cancel.",
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

pub async fn handle_sign_out(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let text = if app.services.session_service.sign_out(telegram_id).await? {
        "👋 You have been signed out."
    } else {
        "You are not signed in."
    };
    bot.send_message(chat_id, text).await?;
    send_screen(bot, chat_id, views::landing()).await
}
