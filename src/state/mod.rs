//! State management module
//!
//! This module handles conversation state, sessions and their storage

pub mod context;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used state components
pub use context::{AppContext, ConversationContext, Scenario};
pub use session::{Session, SessionContext};
pub use storage::StateStorage;
pub use store::{MemoryStore, RedisStore, StateStore};
