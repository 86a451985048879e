//! Post-event feedback
//!
//! A registered attendee rates an event from one to five stars and may add a
//! short comment. The form state lives in the conversation context between
//! messages; submission is a single insert.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Backend;
use crate::models::{CreateFeedbackRequest, Rating, MAX_COMMENT_CHARS};
use crate::services::notification::Notification;
use crate::utils::errors::Result;
use crate::utils::helpers::cap_chars;
use crate::utils::logging::log_registration_action;

/// In-progress feedback form. A rating of 0 means no star selected yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackForm {
    pub rating: u8,
    pub comments: String,
    pub open: bool,
}

impl FeedbackForm {
    pub fn opened() -> Self {
        Self { open: true, ..Self::default() }
    }

    pub fn set_rating(&mut self, stars: u8) -> Result<()> {
        self.rating = Rating::new(stars)?.value();
        Ok(())
    }

    /// Store the comment text, cut to the length limit
    pub fn set_comments(&mut self, text: &str) {
        self.comments = cap_chars(text, MAX_COMMENT_CHARS);
    }

    pub fn remaining_chars(&self) -> usize {
        MAX_COMMENT_CHARS.saturating_sub(self.comments.chars().count())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone)]
pub struct FeedbackService {
    backend: Arc<dyn Backend>,
}

impl FeedbackService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Feedback is offered to anyone holding a registration for the event
    pub fn is_available(is_registered: bool) -> bool {
        is_registered
    }

    /// Submit the form. Without a rating nothing is written. On success the
    /// form is reset and closed; on failure it is left as it was.
    pub async fn submit(&self, form: &mut FeedbackForm, event_id: Uuid, user_id: Uuid) -> Notification {
        let rating = match Rating::new(form.rating) {
            Ok(rating) => rating,
            Err(_) => return Notification::failure("Rating required", "Please select a rating"),
        };

        let comments = form.comments.trim();
        let request = CreateFeedbackRequest {
            event_id,
            user_id,
            rating,
            comments: (!comments.is_empty()).then(|| comments.to_string()),
        };

        match self.backend.create_feedback(request).await {
            Ok(()) => {
                info!(event_id = %event_id, user_id = %user_id, rating = rating.value(), "Feedback submitted");
                log_registration_action(event_id, user_id, "feedback_submitted", Some(&rating.stars()));
                form.reset();
                Notification::success("Feedback submitted", "Thank you for your feedback!")
            }
            Err(e) => {
                warn!(event_id = %event_id, user_id = %user_id, error = %e, "Feedback insert failed");
                Notification::from_error("Feedback failed", &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryBackend;

    #[test]
    fn rating_outside_range_is_rejected() {
        let mut form = FeedbackForm::opened();
        assert!(form.set_rating(0).is_err());
        assert!(form.set_rating(6).is_err());
        form.set_rating(4).unwrap();
        assert_eq!(form.rating, 4);
    }

    #[test]
    fn comments_are_capped() {
        let mut form = FeedbackForm::opened();
        form.set_comments(&"x".repeat(MAX_COMMENT_CHARS + 20));
        assert_eq!(form.comments.chars().count(), MAX_COMMENT_CHARS);
        assert_eq!(form.remaining_chars(), 0);
    }

    #[tokio::test]
    async fn missing_rating_writes_nothing() {
        let backend = MemoryBackend::new();
        let service = FeedbackService::new(Arc::new(backend.clone()));
        let mut form = FeedbackForm::opened();
        form.set_comments("great");

        let notification = service.submit(&mut form, Uuid::new_v4(), Uuid::new_v4()).await;
        assert_eq!(notification.title, "Rating required");
        assert_eq!(notification.description, "Please select a rating");
        assert_eq!(backend.write_count().await, 0);
        assert!(form.open);
    }

    #[tokio::test]
    async fn submission_inserts_once_and_resets() {
        let backend = MemoryBackend::new();
        let service = FeedbackService::new(Arc::new(backend.clone()));
        let mut form = FeedbackForm::opened();
        form.set_rating(4).unwrap();
        form.set_comments("  Loved the talks  ");

        let notification = service.submit(&mut form, Uuid::new_v4(), Uuid::new_v4()).await;
        assert_eq!(notification.title, "Feedback submitted");
        assert_eq!(notification.description, "Thank you for your feedback!");

        let stored = backend.feedback().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].rating.value(), 4);
        assert_eq!(stored[0].comments.as_deref(), Some("Loved the talks"));
        assert_eq!(form, FeedbackForm::default());
    }

    #[tokio::test]
    async fn blank_comment_is_stored_as_none() {
        let backend = MemoryBackend::new();
        let service = FeedbackService::new(Arc::new(backend.clone()));
        let mut form = FeedbackForm::opened();
        form.set_rating(5).unwrap();
        form.set_comments("   ");

        service.submit(&mut form, Uuid::new_v4(), Uuid::new_v4()).await;
        assert_eq!(backend.feedback().await[0].comments, None);
    }

    #[tokio::test]
    async fn failed_insert_keeps_form() {
        let backend = MemoryBackend::new();
        backend.set_write_failure(Some("permission denied for table feedback")).await;
        let service = FeedbackService::new(Arc::new(backend.clone()));
        let mut form = FeedbackForm::opened();
        form.set_rating(3).unwrap();
        form.set_comments("ok");
        let before = form.clone();

        let notification = service.submit(&mut form, Uuid::new_v4(), Uuid::new_v4()).await;
        assert_eq!(notification.title, "Feedback failed");
        assert_eq!(notification.description, "permission denied for table feedback");
        assert_eq!(form, before);
    }
}
