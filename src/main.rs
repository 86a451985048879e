//! Campus Event Hub Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateHandler;
use teloxide::{prelude::*, types::Update, utils::command::BotCommands};
use tracing::{error, info, warn};

use campus_event_hub::{
    config::Settings,
    database::connect_backend,
    handlers::{self, handle_callback_query, handle_command, handle_message, Command},
    middleware::RateLimitMiddleware,
    services::ServiceFactory,
    state::{AppContext, StateStorage},
    utils::{errors::EventHubError, logging},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", campus_event_hub::info());

    let backend = connect_backend(&settings).await?;
    let storage = StateStorage::from_settings(&settings).await?;

    let bot = Bot::new(&settings.bot.token);
    let settings = Arc::new(settings);
    let storage = Arc::new(storage);

    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), settings.clone(), backend.clone(), storage.clone());
    let health = ServiceFactory::health_check(backend.as_ref(), &storage).await;
    if !health.is_healthy() {
        warn!(?health, "Some backing services are unhealthy");
    }

    let app = Arc::new(AppContext::new(settings.clone(), backend, storage, services));
    let limiter = Arc::new(RateLimitMiddleware::new(&settings.rate_limit, settings.bot.admin_ids.clone()));

    let cleanup_limiter = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup();
        }
    });

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![app, limiter])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Campus Event Hub bot is ready, polling for updates");
    dispatcher.dispatch().await;
    info!("Campus Event Hub bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
                .branch(dptree::endpoint(on_message)),
        )
        .branch(Update::filter_callback_query().endpoint(on_callback))
}

/// Apply the per-user limit, telling the user when they are throttled
async fn admit(bot: &Bot, chat_id: ChatId, user_id: i64, limiter: &RateLimitMiddleware) -> bool {
    match limiter.check_rate_limit(user_id) {
        Ok(()) => true,
        Err(e) => {
            handlers::report_error(bot, chat_id, &e).await;
            false
        }
    }
}

async fn finish(bot: &Bot, chat_id: ChatId, result: Result<(), EventHubError>) -> HandlerResult {
    if let Err(e) = result {
        handlers::report_error(bot, chat_id, &e).await;
    }
    Ok(())
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    app: Arc<AppContext>,
    limiter: Arc<RateLimitMiddleware>,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = match handlers::telegram_id(user) {
        Ok(id) => id,
        Err(e) => return finish(&bot, chat_id, Err(e)).await,
    };
    if !admit(&bot, chat_id, user_id, &limiter).await {
        return Ok(());
    }
    let result = handle_command(bot.clone(), msg, cmd, app).await;
    finish(&bot, chat_id, result).await
}

async fn on_message(bot: Bot, msg: Message, app: Arc<AppContext>, limiter: Arc<RateLimitMiddleware>) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = match handlers::telegram_id(user) {
        Ok(id) => id,
        Err(e) => return finish(&bot, chat_id, Err(e)).await,
    };
    if !admit(&bot, chat_id, user_id, &limiter).await {
        return Ok(());
    }
    let result = handle_message(bot.clone(), msg, app).await;
    finish(&bot, chat_id, result).await
}

async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    app: Arc<AppContext>,
    limiter: Arc<RateLimitMiddleware>,
) -> HandlerResult {
    let user_id = match handlers::telegram_id(&query.from) {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Callback from an unusable user id");
            return Ok(());
        }
    };
    let chat_id = query.message.as_ref().map(|m| m.chat().id).unwrap_or(ChatId(user_id));
    if !admit(&bot, chat_id, user_id, &limiter).await {
        if let Err(e) = bot.answer_callback_query(query.id).await {
            error!(error = %e, "Failed to answer throttled callback");
        }
        return Ok(());
    }
    let result = handle_callback_query(bot.clone(), query, app).await;
    finish(&bot, chat_id, result).await
}
