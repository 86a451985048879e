//! Registration repository implementation

use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::registration::{Registration, RegistrationStatus, CreateRegistrationRequest};
use crate::utils::errors::EventHubError;

#[derive(Debug, FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = EventHubError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(Registration {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration request
    pub async fn create(&self, request: CreateRegistrationRequest) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            INSERT INTO registrations (event_id, user_id, status, created_at)
            VALUES ($1, $2, $3, $4)
            "#
        )
        .bind(request.event_id)
        .bind(request.user_id)
        .bind(request.status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find the registration of a user for an event
    pub async fn find_for_user(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>, EventHubError> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, user_id, status, created_at
            FROM registrations
            WHERE event_id = $1 AND user_id = $2
            ORDER BY created_at ASC
            LIMIT 1
            "#
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Registration::try_from).transpose()
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, EventHubError> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            "SELECT id, event_id, user_id, status, created_at FROM registrations WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Registration::try_from).transpose()
    }

    /// List every registration, newest first
    pub async fn list(&self) -> Result<Vec<Registration>, EventHubError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            "SELECT id, event_id, user_id, status, created_at FROM registrations ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Registration::try_from).collect()
    }

    /// Update the status field of a registration
    pub async fn update_status(&self, id: Uuid, status: RegistrationStatus) -> Result<(), EventHubError> {
        let result = sqlx::query("UPDATE registrations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EventHubError::RegistrationNotFound { registration_id: id });
        }

        Ok(())
    }
}
