//! Handler tests against a mock Telegram API

mod helpers;

use assert_matches::assert_matches;
use uuid::Uuid;

use campus_event_hub::handlers::{handle_callback_query, handle_command, handle_message, report_error, Command};
use campus_event_hub::models::{EventCategory, RegistrationStatus};
use campus_event_hub::EventHubError;
use teloxide::types::{CallbackQuery, ChatId};

use helpers::*;

#[tokio::test]
async fn protected_callback_asks_for_sign_in() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());

    handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, "events"), ctx.app.clone())
        .await
        .unwrap();

    assert_eq!(telegram.sent_texts().await, ["🔒 Please sign in first."]);
    assert_eq!(telegram.last_keyboard().await, ["start"]);
}

#[tokio::test]
async fn sign_in_dialog_ends_on_the_catalog() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    ctx.backend
        .seed_event(event("Hackathon 2024", "Build anything", EventCategory::Hackathon, 1))
        .await;

    handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, "start"), ctx.app.clone())
        .await
        .unwrap();
    handle_message(telegram.bot(), text_message(STUDENT_ID, "Asha Rao"), ctx.app.clone())
        .await
        .unwrap();
    handle_message(telegram.bot(), text_message(STUDENT_ID, "City College"), ctx.app.clone())
        .await
        .unwrap();

    let texts = telegram.sent_texts().await;
    assert_eq!(texts[0], "👋 Welcome! What's your name?");
    assert_eq!(texts[1], "🏫 Which college are you from?");
    assert_eq!(texts[2], "🎉 You're signed in, Asha Rao from City College!");
    assert!(texts[3].contains("Hackathon 2024"));

    let session = ctx.app.services.session_service.require(STUDENT_ID).await.unwrap();
    assert_eq!(session.session.college, "City College");
    assert!(ctx.storage.context_for(STUDENT_ID).await.unwrap().scenario.is_none());
}

#[tokio::test]
async fn register_button_submits_pending_request() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let hackathon = event("Hackathon 2024", "Build anything", EventCategory::Hackathon, 1);
    ctx.backend.seed_event(hackathon.clone()).await;
    ctx.sign_in(STUDENT_ID, "Asha Rao", "City College").await;

    handle_callback_query(
        telegram.bot(),
        callback_query(STUDENT_ID, &format!("reg:{}", hackathon.id)),
        ctx.app.clone(),
    )
    .await
    .unwrap();

    let texts = telegram.sent_texts().await;
    assert!(texts[0].contains("Registration submitted"));
    assert!(texts[0].contains("Your registration is pending approval"));
    assert!(texts[1].contains("Hackathon 2024"));
    assert!(!telegram.last_keyboard().await.contains(&format!("reg:{}", hackathon.id)));

    let stored = ctx.backend.registrations().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, RegistrationStatus::Pending);
}

#[tokio::test]
async fn students_cannot_decide_registrations() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let pending = registration(Uuid::new_v4(), Uuid::new_v4(), RegistrationStatus::Pending, 1);
    ctx.backend.seed_registration(pending.clone()).await;
    ctx.sign_in(STUDENT_ID, "Asha Rao", "City College").await;

    let result = handle_callback_query(
        telegram.bot(),
        callback_query(STUDENT_ID, &format!("approve:{}", pending.id)),
        ctx.app.clone(),
    )
    .await;

    assert_matches!(result, Err(EventHubError::PermissionDenied(_)));
    assert_eq!(ctx.backend.registrations().await[0].status, RegistrationStatus::Pending);
}

#[tokio::test]
async fn organizer_approval_updates_the_table() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let hackathon = event("Hackathon 2024", "", EventCategory::Hackathon, 1);
    let student = Uuid::new_v4();
    let pending = registration(hackathon.id, student, RegistrationStatus::Pending, 1);
    ctx.backend.seed_event(hackathon).await;
    ctx.backend.seed_profile(random_profile(student)).await;
    ctx.backend.seed_registration(pending.clone()).await;
    ctx.sign_in(ADMIN_ID, "Dev Mehta", "Tech Institute").await;

    handle_callback_query(
        telegram.bot(),
        callback_query(ADMIN_ID, &format!("approve:{}", pending.id)),
        ctx.app.clone(),
    )
    .await
    .unwrap();

    let texts = telegram.sent_texts().await;
    assert!(texts[0].contains("Registration approved successfully"));
    assert!(texts[1].contains("Hackathon 2024"));
    assert!(!telegram.last_keyboard().await.contains(&format!("approve:{}", pending.id)));
    assert_eq!(ctx.backend.registrations().await[0].status, RegistrationStatus::Approved);
}

#[tokio::test]
async fn unknown_callback_data_is_ignored() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());

    handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, "lang:en"), ctx.app.clone())
        .await
        .unwrap();

    assert!(telegram.sent_texts().await.is_empty());
}

#[tokio::test]
async fn throttled_users_are_told_to_slow_down() {
    let telegram = TelegramMockServer::start().await;

    report_error(&telegram.bot(), ChatId(STUDENT_ID), &EventHubError::RateLimitExceeded).await;
    report_error(&telegram.bot(), ChatId(STUDENT_ID), &EventHubError::NotSignedIn).await;

    let texts = telegram.sent_texts().await;
    assert!(texts[0].starts_with("⏳ Too many requests"));
    assert_eq!(texts[1], "🔒 Please sign in first.");
}

#[tokio::test]
async fn feedback_is_only_offered_to_registered_users() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let night = event("Cultural Night", "", EventCategory::Cultural, -1);
    ctx.backend.seed_event(night.clone()).await;
    ctx.sign_in(STUDENT_ID, "Asha Rao", "City College").await;

    handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, &format!("fb:{}", night.id)), ctx.app.clone())
        .await
        .unwrap();

    let texts = telegram.sent_texts().await;
    assert!(texts[0].contains("Feedback unavailable"));
    assert!(ctx.storage.context_for(STUDENT_ID).await.unwrap().scenario.is_none());
}

#[tokio::test]
async fn feedback_dialog_rates_comments_and_submits() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let night = event("Cultural Night", "", EventCategory::Cultural, -1);
    let session = ctx.sign_in(STUDENT_ID, "Asha Rao", "City College").await;
    ctx.backend.seed_event(night.clone()).await;
    ctx.backend
        .seed_registration(registration(night.id, session.profile_id, RegistrationStatus::Approved, 60))
        .await;

    for data in [format!("fb:{}", night.id), "fb_submit".to_string(), "rate:4".to_string()] {
        handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, &data), ctx.app.clone())
            .await
            .unwrap();
    }
    handle_message(telegram.bot(), text_message(STUDENT_ID, " Loved it "), ctx.app.clone())
        .await
        .unwrap();
    handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, "fb_submit"), ctx.app.clone())
        .await
        .unwrap();

    let texts = telegram.sent_texts().await;
    assert!(texts[0].starts_with("⭐ Feedback for Cultural Night"));
    assert!(texts[1].contains("Rating required"));
    assert!(texts.last().unwrap().contains("Thank you for your feedback!"));

    let stored = ctx.backend.feedback().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].rating.value(), 4);
    assert_eq!(stored[0].comments.as_deref(), Some("Loved it"));
    assert!(ctx.storage.context_for(STUDENT_ID).await.unwrap().scenario.is_none());
}

#[tokio::test]
async fn stored_registration_is_confirmed_even_if_reread_fails() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let hackathon = event("Hackathon 2024", "Build anything", EventCategory::Hackathon, 1);
    ctx.backend.seed_event(hackathon.clone()).await;
    ctx.sign_in(STUDENT_ID, "Asha Rao", "City College").await;
    ctx.backend.set_read_failure(Some("connection reset")).await;

    handle_callback_query(
        telegram.bot(),
        callback_query(STUDENT_ID, &format!("reg:{}", hackathon.id)),
        ctx.app.clone(),
    )
    .await
    .unwrap();

    let texts = telegram.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Registration submitted"));
    assert_eq!(ctx.backend.registrations().await.len(), 1);
}

#[tokio::test]
async fn out_of_range_user_id_is_invalid_input() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let query: CallbackQuery = serde_json::from_value(serde_json::json!({
        "id": "cbq-2",
        "from": { "id": u64::MAX, "is_bot": false, "first_name": "Test" },
        "chat_instance": "instance-1",
        "data": "events"
    }))
    .unwrap();

    let result = handle_callback_query(telegram.bot(), query, ctx.app.clone()).await;

    assert_matches!(result, Err(EventHubError::InvalidInput(_)));
    assert!(telegram.sent_texts().await.is_empty());
}

#[tokio::test]
async fn organizer_pages_through_a_long_registration_table() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    let hackathon = event("Hackathon 2024", "", EventCategory::Hackathon, 1);
    ctx.backend.seed_event(hackathon.clone()).await;
    for minutes_ago in 0..120 {
        let student = Uuid::new_v4();
        ctx.backend.seed_profile(random_profile(student)).await;
        ctx.backend
            .seed_registration(registration(hackathon.id, student, RegistrationStatus::Pending, minutes_ago))
            .await;
    }
    ctx.sign_in(ADMIN_ID, "Dev Mehta", "Tech Institute").await;

    handle_command(telegram.bot(), text_message(ADMIN_ID, "/admin"), Command::Admin, ctx.app.clone())
        .await
        .unwrap();
    assert!(telegram.last_keyboard().await.contains(&"admpage:1".to_string()));

    handle_callback_query(telegram.bot(), callback_query(ADMIN_ID, "admpage:7"), ctx.app.clone())
        .await
        .unwrap();

    let texts = telegram.sent_texts().await;
    assert!(texts.iter().all(|t| t.encode_utf16().count() <= 4096));
    assert!(texts.last().unwrap().contains("Page 8 of 8"));
    assert_eq!(ctx.storage.context_for(ADMIN_ID).await.unwrap().admin_page, 7);

    let keyboard = telegram.last_keyboard().await;
    let pending = keyboard.iter().filter(|data| data.starts_with("approve:")).count();
    assert_eq!(pending, 120 - 7 * 15);

    // Picking an event starts again from the first page
    handle_callback_query(telegram.bot(), callback_query(ADMIN_ID, &format!("adm:{}", hackathon.id)), ctx.app.clone())
        .await
        .unwrap();
    assert_eq!(ctx.storage.context_for(ADMIN_ID).await.unwrap().admin_page, 0);
}

#[tokio::test]
async fn catalog_next_page_shows_later_events() {
    let telegram = TelegramMockServer::start().await;
    let ctx = TestContext::new(telegram.bot());
    for day in 1..=40 {
        ctx.backend
            .seed_event(event(&format!("Workshop Day {}", day), "", EventCategory::Workshop, day))
            .await;
    }
    ctx.sign_in(STUDENT_ID, "Asha Rao", "City College").await;

    handle_callback_query(telegram.bot(), callback_query(STUDENT_ID, "page:1"), ctx.app.clone())
        .await
        .unwrap();

    let texts = telegram.sent_texts().await;
    let screen = texts.last().unwrap();
    assert!(screen.encode_utf16().count() <= 4096);
    assert!(screen.contains("Workshop Day 16 ·"));
    assert!(screen.contains("Workshop Day 30 ·"));
    assert!(!screen.contains("Workshop Day 1 ·"));
    assert!(!screen.contains("Workshop Day 31 ·"));
    assert!(screen.contains("Page 2 of 3"));
    assert!(telegram.last_keyboard().await.contains(&"page:2".to_string()));
}
