//! Organizer command handlers
//!
//! The registrations review screen, approve/reject actions and event creation.

use teloxide::{types::ChatId, Bot};
use tracing::{info, warn};
use uuid::Uuid;

use crate::handlers::actions::CallbackAction;
use crate::handlers::views::RegistrationPages;
use crate::handlers::{notify, require_session, send_screen, views};
use crate::models::{CreateEventRequest, Decision, Event, EventCategory};
use crate::services::Notification;
use crate::state::{AppContext, ConversationContext, SessionContext};
use crate::utils::errors::{EventHubError, Result};
use crate::utils::helpers::parse_datetime;
use crate::utils::logging::log_admin_action;

/// Resolve the session and check the organizer role
async fn require_admin(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<Option<SessionContext>> {
    let Some(session) = require_session(bot, chat_id, app, telegram_id).await? else {
        return Ok(None);
    };
    app.services.auth_service.require_admin(&session)?;
    Ok(Some(session))
}

/// Handle /admin command
pub async fn handle_admin(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    if require_admin(bot, chat_id, telegram_id, app).await?.is_none() {
        return Ok(());
    }
    log_admin_action(telegram_id, "open_registrations", None, None);
    show_registrations(bot, chat_id, telegram_id, app).await
}

/// Load and render the registrations table under the saved event filter
pub async fn show_registrations(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let context = app.storage.context_for(telegram_id).await?;
    let filter = context.admin_event_filter;
    let view = app.services.management_service.list(filter).await;
    app.services
        .notification_service
        .send_opt(chat_id, view.notification.as_ref())
        .await?;
    let events = filter_options(app).await;
    send_screen(bot, chat_id, views::registrations(&view.rows, &events, filter, pages(&context))).await
}

fn pages(context: &ConversationContext) -> RegistrationPages {
    RegistrationPages {
        rows: context.admin_page,
        events: context.admin_events_page,
    }
}

/// Events offered as filter buttons; a failed load only hides the buttons
async fn filter_options(app: &AppContext) -> Vec<Event> {
    match app.services.catalog_service.load().await {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "Could not load events for the registrations filter");
            Vec::new()
        }
    }
}

pub async fn set_event_filter(bot: &Bot, chat_id: ChatId, telegram_id: i64, filter: Option<Uuid>, app: &AppContext) -> Result<()> {
    if require_admin(bot, chat_id, telegram_id, app).await?.is_none() {
        return Ok(());
    }
    let mut context = app.storage.context_for(telegram_id).await?;
    context.set_admin_event_filter(filter);
    app.storage.save_context(&context).await?;
    show_registrations(bot, chat_id, telegram_id, app).await
}

/// Prev/Next on the registrations table or on its event filter buttons
pub async fn set_page(bot: &Bot, chat_id: ChatId, telegram_id: i64, action: CallbackAction, app: &AppContext) -> Result<()> {
    if require_admin(bot, chat_id, telegram_id, app).await?.is_none() {
        return Ok(());
    }
    let mut context = app.storage.context_for(telegram_id).await?;
    match action {
        CallbackAction::AdminPage(page) => context.admin_page = page,
        CallbackAction::AdminEventsPage(page) => context.admin_events_page = page,
        _ => return Ok(()),
    }
    context.touch();
    app.storage.save_context(&context).await?;
    show_registrations(bot, chat_id, telegram_id, app).await
}

/// Approve or reject button
pub async fn handle_decision(
    bot: &Bot,
    chat_id: ChatId,
    telegram_id: i64,
    registration_id: Uuid,
    decision: Decision,
    app: &AppContext,
) -> Result<()> {
    if require_admin(bot, chat_id, telegram_id, app).await?.is_none() {
        return Ok(());
    }
    let context = app.storage.context_for(telegram_id).await?;
    let filter = context.admin_event_filter;
    let outcome = app
        .services
        .management_service
        .decide(telegram_id, registration_id, decision, filter)
        .await;
    notify(app, chat_id, &outcome.notification).await?;

    if let Some(rows) = outcome.rows {
        let events = filter_options(app).await;
        send_screen(bot, chat_id, views::registrations(&rows, &events, filter, pages(&context))).await?;
    }
    Ok(())
}

/// Handle /newevent title | category | location | start | end | max | description
pub async fn handle_new_event(bot: &Bot, chat_id: ChatId, telegram_id: i64, args: &str, app: &AppContext) -> Result<()> {
    if require_admin(bot, chat_id, telegram_id, app).await?.is_none() {
        return Ok(());
    }

    let request = match parse_new_event(args) {
        Ok(request) => request,
        Err(e) => {
            let usage = format!(
                "{}\n\nUsage: /newevent title | category | location | start | end | max participants | description\nDates: YYYY-MM-DD HH:MM (UTC)",
                e.user_message()
            );
            return notify(app, chat_id, &Notification::failure("Invalid event", usage)).await;
        }
    };

    let title = request.title.clone();
    let context = app.storage.context_for(telegram_id).await?;
    let (notification, view) = app.services.catalog_service.create(request, &context.catalog_filter).await;
    notify(app, chat_id, &notification).await?;

    if let Some(view) = view {
        info!(admin_id = telegram_id, title = %title, "Event created");
        log_admin_action(telegram_id, "create_event", Some(&title), None);
        app.services
            .notification_service
            .send_opt(chat_id, view.notification.as_ref())
            .await?;
        send_screen(bot, chat_id, views::catalog(&view, &context.catalog_filter, context.catalog_page)).await?;
    }
    Ok(())
}

/// Parse the pipe-separated /newevent arguments. The description is last
/// and may itself contain `|`.
pub fn parse_new_event(args: &str) -> Result<CreateEventRequest> {
    let parts: Vec<&str> = args.splitn(7, '|').map(str::trim).collect();
    if parts.len() < 6 {
        return Err(EventHubError::InvalidInput("Expected at least six fields separated by |".to_string()));
    }

    let category: EventCategory = parts[1].to_lowercase().parse().map_err(|_| {
        EventHubError::InvalidInput(format!(
            "Unknown category '{}'. Use one of: {}",
            parts[1],
            EventCategory::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
        ))
    })?;
    let start_date = parse_datetime(parts[3])
        .ok_or_else(|| EventHubError::InvalidInput(format!("Invalid start time '{}'", parts[3])))?;
    let end_date = parse_datetime(parts[4])
        .ok_or_else(|| EventHubError::InvalidInput(format!("Invalid end time '{}'", parts[4])))?;
    let max_participants: i32 = parts[5]
        .parse()
        .map_err(|_| EventHubError::InvalidInput(format!("Invalid participant limit '{}'", parts[5])))?;

    Ok(CreateEventRequest {
        title: parts[0].to_string(),
        category,
        location: parts[2].to_string(),
        start_date,
        end_date,
        max_participants,
        description: parts.get(6).map(|d| d.to_string()).unwrap_or_default(),
    })
}
