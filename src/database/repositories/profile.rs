//! Profile repository implementation

use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use crate::models::profile::Profile;
use crate::utils::errors::EventHubError;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    college: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            name: row.name,
            college: row.college,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the profiles whose id is in `ids`
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>, EventHubError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, college FROM profiles WHERE id = ANY($1)"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    /// Create or refresh the profile written at sign-in
    pub async fn upsert(&self, profile: Profile) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, name, college)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, college = EXCLUDED.college
            "#
        )
        .bind(profile.id)
        .bind(profile.name)
        .bind(profile.college)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
