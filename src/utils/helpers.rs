//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// Namespace for profile ids derived from Telegram user ids
const PROFILE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b7e_9d4a_4e31_8c55_0a7b_3d2e_91f4);

/// Input format accepted for event start and end times
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Stable profile id for a Telegram user
pub fn profile_id_for(telegram_id: i64) -> Uuid {
    Uuid::new_v5(&PROFILE_NAMESPACE, &telegram_id.to_be_bytes())
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Format only the calendar date
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD HH:MM` UTC timestamp
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input.trim(), DATETIME_INPUT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Cut text to at most `max_chars` characters, the way a length-limited input field does
pub fn cap_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
