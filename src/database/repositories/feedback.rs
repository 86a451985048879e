//! Feedback repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::feedback::CreateFeedbackRequest;
use crate::utils::errors::EventHubError;

#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one feedback submission
    pub async fn create(&self, request: CreateFeedbackRequest) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            INSERT INTO feedback (event_id, user_id, rating, comments, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#
        )
        .bind(request.event_id)
        .bind(request.user_id)
        .bind(i32::from(request.rating))
        .bind(request.comments)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
