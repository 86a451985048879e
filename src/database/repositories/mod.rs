//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod registration;
pub mod feedback;
pub mod profile;

// Re-export repositories
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use feedback::FeedbackRepository;
pub use profile::ProfileRepository;
