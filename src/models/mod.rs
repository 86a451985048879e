//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod registration;
pub mod feedback;
pub mod profile;

// Re-export commonly used models
pub use event::{Event, EventCategory, CreateEventRequest};
pub use registration::{Registration, RegistrationStatus, CreateRegistrationRequest, Decision};
pub use feedback::{Feedback, Rating, CreateFeedbackRequest, MAX_COMMENT_CHARS};
pub use profile::Profile;
