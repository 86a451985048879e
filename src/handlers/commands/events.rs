//! Event command handlers
//!
//! The catalog screen, search, category selection, the event screen and
//! the register action.

use teloxide::{prelude::*, types::ChatId, Bot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::handlers::{notify, require_session, send_screen, views};
use crate::services::{CategoryFilter, EventFilter, Notification, RequestOutcome};
use crate::state::{AppContext, ConversationContext, Scenario, SessionContext};
use crate::utils::errors::{EventHubError, Result};
use crate::utils::helpers::normalize_whitespace;
use crate::utils::logging::log_event_action;

/// Render the catalog with the user's saved filter
pub async fn show_catalog(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let context = app.storage.context_for(telegram_id).await?;
    let view = app.services.catalog_service.browse(&context.catalog_filter).await;
    app.services
        .notification_service
        .send_opt(chat_id, view.notification.as_ref())
        .await?;
    send_screen(bot, chat_id, views::catalog(&view, &context.catalog_filter, context.catalog_page)).await
}

/// Handle /events command
pub async fn handle_events(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    if require_session(bot, chat_id, app, telegram_id).await?.is_none() {
        return Ok(());
    }
    show_catalog(bot, chat_id, telegram_id, app).await
}

/// Handle /search; without text, ask for it
pub async fn handle_search(bot: &Bot, chat_id: ChatId, telegram_id: i64, query: &str, app: &AppContext) -> Result<()> {
    if require_session(bot, chat_id, app, telegram_id).await?.is_none() {
        return Ok(());
    }
    if query.trim().is_empty() {
        return start_search(bot, chat_id, telegram_id, app).await;
    }
    let context = app.storage.context_for(telegram_id).await?;
    apply_search(bot, chat_id, context, query, app).await
}

pub async fn start_search(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let mut context = app.storage.context_for(telegram_id).await?;
    context.start_scenario(Scenario::Search, app.storage.dialog_ttl());
    app.storage.save_context(&context).await?;
    bot.send_message(chat_id, "🔍 Send the text to search for in event titles and descriptions.").await?;
    Ok(())
}

/// Store the query and show the narrowed catalog
pub async fn apply_search(bot: &Bot, chat_id: ChatId, mut context: ConversationContext, query: &str, app: &AppContext) -> Result<()> {
    let telegram_id = context.user_id;
    let filter = EventFilter { query: normalize_whitespace(query), ..context.catalog_filter.clone() };
    context.set_catalog_filter(filter);
    context.complete_scenario();
    app.storage.save_context(&context).await?;
    debug!(user_id = telegram_id, query = %context.catalog_filter.query, "Search applied");
    show_catalog(bot, chat_id, telegram_id, app).await
}

pub async fn set_category(bot: &Bot, chat_id: ChatId, telegram_id: i64, category: CategoryFilter, app: &AppContext) -> Result<()> {
    let mut context = app.storage.context_for(telegram_id).await?;
    let filter = EventFilter { category, ..context.catalog_filter.clone() };
    context.set_catalog_filter(filter);
    app.storage.save_context(&context).await?;
    show_catalog(bot, chat_id, telegram_id, app).await
}

pub async fn clear_filters(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let mut context = app.storage.context_for(telegram_id).await?;
    context.set_catalog_filter(EventFilter::default());
    app.storage.save_context(&context).await?;
    show_catalog(bot, chat_id, telegram_id, app).await
}

/// Prev/Next on the catalog
pub async fn set_page(bot: &Bot, chat_id: ChatId, telegram_id: i64, page: usize, app: &AppContext) -> Result<()> {
    let mut context = app.storage.context_for(telegram_id).await?;
    context.catalog_page = page;
    context.touch();
    app.storage.save_context(&context).await?;
    show_catalog(bot, chat_id, telegram_id, app).await
}

/// Render the event screen with the caller's registration state
pub async fn show_event(bot: &Bot, chat_id: ChatId, session: &SessionContext, event_id: Uuid, app: &AppContext) -> Result<()> {
    let event = match app.services.catalog_service.get(event_id).await {
        Ok(event) => event,
        Err(EventHubError::EventNotFound { .. }) => {
            return notify(app, chat_id, &Notification::failure("Event not found", "It may have been removed.")).await;
        }
        Err(e) => return Err(e),
    };

    let user_id = session.user_id();
    let registration = app.services.registration_service.view(event_id, user_id).await?;
    let busy = app.services.registration_service.is_busy(event_id, user_id);
    log_event_action(event_id, "viewed", session.session.telegram_id);
    send_screen(bot, chat_id, views::event_detail(&event, &registration, busy)).await
}

/// Register button
pub async fn handle_register(bot: &Bot, chat_id: ChatId, session: &SessionContext, event_id: Uuid, app: &AppContext) -> Result<()> {
    let user_id = session.user_id();
    match app.services.registration_service.request(event_id, user_id).await? {
        RequestOutcome::Submitted { notification, view } => {
            info!(user_id = session.session.telegram_id, event_id = %event_id, "Registration requested");
            notify(app, chat_id, &notification).await?;
            let Some(view) = view else {
                return Ok(());
            };
            let event = app.services.catalog_service.get(event_id).await?;
            send_screen(bot, chat_id, views::event_detail(&event, &view, false)).await
        }
        RequestOutcome::Failed { notification } => notify(app, chat_id, &notification).await,
        RequestOutcome::InFlight => Ok(()),
    }
}
