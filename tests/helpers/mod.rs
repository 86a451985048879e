//! Test helpers module
//!
//! Fixtures, an application context wired over the in-memory backend and
//! state store, and a mock Telegram API server.

#![allow(dead_code)]

pub mod telegram_mock;
pub mod test_context;
pub mod test_data;

pub use telegram_mock::*;
pub use test_context::*;
pub use test_data::*;
