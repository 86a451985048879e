//! Event repository implementation

use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::event::{Event, CreateEventRequest};
use crate::utils::errors::EventHubError;

const EVENT_COLUMNS: &str =
    "id, title, description, category, location, start_date, end_date, max_participants, created_at";

/// Raw `events` row before category validation
#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    location: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    max_participants: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = EventHubError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category.parse()?,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            max_participants: row.max_participants,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            INSERT INTO events (title, description, category, location, start_date, end_date, max_participants, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.category.as_str())
        .bind(request.location)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.max_participants)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, EventHubError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    /// List every event, earliest start first
    pub async fn list(&self) -> Result<Vec<Event>, EventHubError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events ORDER BY start_date ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    /// Fetch the events whose id is in `ids`
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Event>, EventHubError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = ANY($1)",
            EVENT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;
    use assert_matches::assert_matches;

    fn row(category: &str) -> EventRow {
        EventRow {
            id: Uuid::new_v4(),
            title: "Sports Meet".to_string(),
            description: "Annual athletics".to_string(),
            category: category.to_string(),
            location: "Stadium".to_string(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            max_participants: 200,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_with_known_category_converts() {
        let event = Event::try_from(row("sports")).unwrap();
        assert_eq!(event.category, EventCategory::Sports);
    }

    #[test]
    fn row_with_unknown_category_fails_fast() {
        assert_matches!(Event::try_from(row("gala")), Err(EventHubError::SchemaMismatch(_)));
    }
}
