//! Application context for tests
//!
//! Everything runs in process: the memory backend, the memory state store
//! and a bot that is either pointed at a mock server or never called.

use std::sync::Arc;

use teloxide::Bot;

use campus_event_hub::config::{BackendKind, Settings, StorageKind};
use campus_event_hub::database::{Backend, MemoryBackend};
use campus_event_hub::services::ServiceFactory;
use campus_event_hub::state::{AppContext, MemoryStore, Session, StateStorage};

use super::telegram_mock::TEST_TOKEN;

pub const ADMIN_ID: i64 = 1000;
pub const STUDENT_ID: i64 = 42;

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = TEST_TOKEN.to_string();
    settings.bot.admin_ids = vec![ADMIN_ID];
    settings.backend.kind = BackendKind::Memory;
    settings.backend.database = None;
    settings.state.storage = StorageKind::Memory;
    settings
}

pub struct TestContext {
    pub backend: Arc<MemoryBackend>,
    pub storage: Arc<StateStorage>,
    pub settings: Arc<Settings>,
    pub app: Arc<AppContext>,
}

impl TestContext {
    pub fn new(bot: Bot) -> Self {
        let settings = Arc::new(test_settings());
        let backend = Arc::new(MemoryBackend::new());
        let shared: Arc<dyn Backend> = backend.clone();
        let storage = Arc::new(StateStorage::new(Arc::new(MemoryStore::new()), &settings));
        let services = ServiceFactory::new(bot, settings.clone(), shared.clone(), storage.clone());
        let app = Arc::new(AppContext::new(settings.clone(), shared, storage.clone(), services));

        Self {
            backend,
            storage,
            settings,
            app,
        }
    }

    /// Context whose bot is never called
    pub fn offline() -> Self {
        Self::new(Bot::new(TEST_TOKEN))
    }

    pub async fn sign_in(&self, telegram_id: i64, name: &str, college: &str) -> Session {
        self.app
            .services
            .session_service
            .sign_in(telegram_id, name, college)
            .await
            .expect("sign in succeeds")
    }
}
