//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

pub mod feedback;

use std::sync::Arc;

use teloxide::{prelude::*, types::{CallbackQuery, ChatId}, Bot};
use tracing::{debug, warn};

use crate::handlers::actions::CallbackAction;
use crate::handlers::commands::{admin, events, start};
use crate::handlers::{require_session, telegram_id};
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, app: Arc<AppContext>) -> Result<()> {
    let user_id = telegram_id(&query.from)?;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    // Answer first so the button stops spinning
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        debug!(user_id = user_id, "Callback without data");
        return Ok(());
    };

    let action = match CallbackAction::parse(data) {
        Ok(action) => action,
        Err(e) => {
            warn!(user_id = user_id, data = %data, error = %e, "Unrecognized callback data");
            return Ok(());
        }
    };
    debug!(user_id = user_id, action = ?action, "Routing callback");

    match action {
        CallbackAction::Noop => return Ok(()),
        CallbackAction::GetStarted => return start::handle_get_started(&bot, chat_id, user_id, &app).await,
        _ => {}
    }

    let Some(session) = require_session(&bot, chat_id, &app, user_id).await? else {
        return Ok(());
    };

    match action {
        CallbackAction::ListEvents => events::show_catalog(&bot, chat_id, user_id, &app).await,
        CallbackAction::ShowEvent(event_id) => events::show_event(&bot, chat_id, &session, event_id, &app).await,
        CallbackAction::Register(event_id) => events::handle_register(&bot, chat_id, &session, event_id, &app).await,
        CallbackAction::Category(category) => events::set_category(&bot, chat_id, user_id, category, &app).await,
        CallbackAction::StartSearch => events::start_search(&bot, chat_id, user_id, &app).await,
        CallbackAction::ClearFilters => events::clear_filters(&bot, chat_id, user_id, &app).await,
        CallbackAction::CatalogPage(page) => events::set_page(&bot, chat_id, user_id, page, &app).await,
        CallbackAction::OpenFeedback(event_id) => feedback::open(&bot, chat_id, &session, event_id, &app).await,
        CallbackAction::Rate(stars) => feedback::rate(&bot, chat_id, user_id, stars, &app).await,
        CallbackAction::SubmitFeedback => feedback::submit(&bot, chat_id, &session, &app).await,
        CallbackAction::CancelFeedback => feedback::cancel(&bot, chat_id, user_id, &app).await,
        CallbackAction::AdminFilter(filter) => admin::set_event_filter(&bot, chat_id, user_id, filter, &app).await,
        CallbackAction::AdminPage(_) | CallbackAction::AdminEventsPage(_) => {
            admin::set_page(&bot, chat_id, user_id, action, &app).await
        }
        CallbackAction::Decide(registration_id, decision) => {
            admin::handle_decision(&bot, chat_id, user_id, registration_id, decision, &app).await
        }
        CallbackAction::Noop | CallbackAction::GetStarted => Ok(()),
    }
}
