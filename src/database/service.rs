//! Database service layer
//!
//! Direct Postgres implementation of [`Backend`], composed from the repositories.

use std::time::Instant;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::{Backend, DatabasePool, EventRepository, FeedbackRepository, ProfileRepository, RegistrationRepository};
use crate::models::*;
use crate::utils::errors::Result;
use crate::utils::logging::log_backend_call;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub feedback: FeedbackRepository,
    pub profiles: ProfileRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            feedback: FeedbackRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Run a repository call and record how long it took
async fn timed<T, F>(operation: &str, table: &str, call: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let started = Instant::now();
    let result = call.await;
    log_backend_call(operation, table, started.elapsed().as_millis() as u64, result.is_ok());
    result
}

#[async_trait]
impl Backend for DatabaseService {
    async fn list_events(&self) -> Result<Vec<Event>> {
        timed("select", "events", self.events.list()).await
    }

    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        timed("select", "events", self.events.find_by_id(event_id)).await
    }

    async fn events_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Event>> {
        timed("select_in", "events", self.events.find_by_ids(ids)).await
    }

    async fn create_event(&self, request: CreateEventRequest) -> Result<()> {
        timed("insert", "events", self.events.create(request)).await
    }

    async fn find_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>> {
        timed("select", "registrations", self.registrations.find_for_user(event_id, user_id)).await
    }

    async fn find_registration_by_id(&self, registration_id: Uuid) -> Result<Option<Registration>> {
        timed("select", "registrations", self.registrations.find_by_id(registration_id)).await
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        timed("select", "registrations", self.registrations.list()).await
    }

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<()> {
        timed("insert", "registrations", self.registrations.create(request)).await
    }

    async fn update_registration_status(&self, registration_id: Uuid, status: RegistrationStatus) -> Result<()> {
        timed("update", "registrations", self.registrations.update_status(registration_id, status)).await
    }

    async fn create_feedback(&self, request: CreateFeedbackRequest) -> Result<()> {
        timed("insert", "feedback", self.feedback.create(request)).await
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        timed("select_in", "profiles", self.profiles.find_by_ids(ids)).await
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        timed("upsert", "profiles", self.profiles.upsert(profile)).await
    }

    async fn health_check(&self) -> Result<()> {
        crate::database::connection::health_check(&self.pool).await
    }
}
