//! Feedback dialog callbacks
//!
//! Opening the dialog, choosing stars, submitting and cancelling. Comment
//! text arrives as a plain message and is handled in the message handler.

use teloxide::{prelude::*, types::ChatId, Bot};
use tracing::debug;
use uuid::Uuid;

use crate::handlers::{notify, send_screen, views};
use crate::services::{FeedbackForm, FeedbackService, Notification};
use crate::state::{AppContext, ConversationContext, Scenario, SessionContext};
use crate::utils::errors::Result;

/// Open the dialog for an event. Only offered to users holding a registration.
pub async fn open(bot: &Bot, chat_id: ChatId, session: &SessionContext, event_id: Uuid, app: &AppContext) -> Result<()> {
    let registration = app.services.registration_service.view(event_id, session.user_id()).await?;
    if !FeedbackService::is_available(registration.is_registered()) {
        return notify(app, chat_id, &Notification::failure("Feedback unavailable", "Register for this event to leave feedback")).await;
    }

    let event = app.services.catalog_service.get(event_id).await?;
    let form = FeedbackForm::opened();
    let screen = views::feedback_form(&event.title, &form);

    let mut context = app.storage.context_for(session.session.telegram_id).await?;
    context.start_scenario(
        Scenario::Feedback { event_id, event_title: event.title, form },
        app.storage.dialog_ttl(),
    );
    app.storage.save_context(&context).await?;
    send_screen(bot, chat_id, screen).await
}

/// Current feedback dialog, if the user is in one
async fn current(app: &AppContext, telegram_id: i64) -> Result<Option<(ConversationContext, Uuid, String, FeedbackForm)>> {
    let context = app.storage.context_for(telegram_id).await?;
    match context.scenario.clone() {
        Some(Scenario::Feedback { event_id, event_title, form }) => Ok(Some((context, event_id, event_title, form))),
        _ => Ok(None),
    }
}

async fn dialog_closed(bot: &Bot, chat_id: ChatId) -> Result<()> {
    bot.send_message(chat_id, "This feedback form is no longer open.").await?;
    Ok(())
}

fn store(context: &mut ConversationContext, event_id: Uuid, event_title: String, form: FeedbackForm, app: &AppContext) {
    context.start_scenario(Scenario::Feedback { event_id, event_title, form }, app.storage.dialog_ttl());
}

pub async fn rate(bot: &Bot, chat_id: ChatId, telegram_id: i64, stars: u8, app: &AppContext) -> Result<()> {
    let Some((mut context, event_id, event_title, mut form)) = current(app, telegram_id).await? else {
        return dialog_closed(bot, chat_id).await;
    };
    form.set_rating(stars)?;
    debug!(user_id = telegram_id, event_id = %event_id, stars = stars, "Rating selected");

    let screen = views::feedback_form(&event_title, &form);
    store(&mut context, event_id, event_title, form, app);
    app.storage.save_context(&context).await?;
    send_screen(bot, chat_id, screen).await
}

/// Comment text typed while the dialog is open
pub async fn set_comments(bot: &Bot, chat_id: ChatId, mut context: ConversationContext, text: &str, app: &AppContext) -> Result<()> {
    let Some(Scenario::Feedback { event_id, event_title, mut form }) = context.scenario.clone() else {
        return dialog_closed(bot, chat_id).await;
    };
    form.set_comments(text);
    let screen = views::feedback_form(&event_title, &form);
    store(&mut context, event_id, event_title, form, app);
    app.storage.save_context(&context).await?;
    send_screen(bot, chat_id, screen).await
}

pub async fn submit(bot: &Bot, chat_id: ChatId, session: &SessionContext, app: &AppContext) -> Result<()> {
    let telegram_id = session.session.telegram_id;
    let Some((mut context, event_id, event_title, mut form)) = current(app, telegram_id).await? else {
        return dialog_closed(bot, chat_id).await;
    };

    let notification = app
        .services
        .feedback_service
        .submit(&mut form, event_id, session.user_id())
        .await;
    notify(app, chat_id, &notification).await?;

    if form.open {
        store(&mut context, event_id, event_title, form, app);
    } else {
        context.complete_scenario();
    }
    app.storage.save_context(&context).await
}

pub async fn cancel(bot: &Bot, chat_id: ChatId, telegram_id: i64, app: &AppContext) -> Result<()> {
    let Some((mut context, ..)) = current(app, telegram_id).await? else {
        return dialog_closed(bot, chat_id).await;
    };
    context.complete_scenario();
    app.storage.save_context(&context).await?;
    bot.send_message(chat_id, "Feedback cancelled.").await?;
    Ok(())
}
