//! In-process backend
//!
//! Keeps the four tables in memory. Used for local runs without a hosted
//! project and as the test double for the services. A write failure can be
//! armed to exercise the error paths.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::Backend;
use crate::models::*;
use crate::utils::errors::{EventHubError, Result};

#[derive(Debug, Default)]
struct Tables {
    events: Vec<Event>,
    registrations: Vec<Registration>,
    feedback: Vec<Feedback>,
    profiles: Vec<Profile>,
    write_failure: Option<String>,
    read_failure: Option<String>,
    writes: usize,
}

impl Tables {
    fn check_write(&mut self) -> Result<()> {
        if let Some(message) = self.write_failure.clone() {
            return Err(EventHubError::Backend { status: 400, message });
        }
        self.writes += 1;
        Ok(())
    }

    fn check_read(&self) -> Result<()> {
        match &self.read_failure {
            Some(message) => Err(EventHubError::Backend { status: 503, message: message.clone() }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail with `message` until cleared with `None`
    pub async fn set_write_failure(&self, message: Option<&str>) {
        self.tables.write().await.write_failure = message.map(str::to_string);
    }

    /// Make every following read fail with `message` until cleared with `None`
    pub async fn set_read_failure(&self, message: Option<&str>) {
        self.tables.write().await.read_failure = message.map(str::to_string);
    }

    /// Number of successful writes so far
    pub async fn write_count(&self) -> usize {
        self.tables.read().await.writes
    }

    /// Seed an event row directly, bypassing the write counter
    pub async fn seed_event(&self, event: Event) {
        self.tables.write().await.events.push(event);
    }

    pub async fn seed_registration(&self, registration: Registration) {
        self.tables.write().await.registrations.push(registration);
    }

    pub async fn seed_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.push(profile);
    }

    pub async fn feedback(&self) -> Vec<Feedback> {
        self.tables.read().await.feedback.clone()
    }

    pub async fn registrations(&self) -> Vec<Registration> {
        self.tables.read().await.registrations.clone()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        let mut events = tables.events.clone();
        events.sort_by_key(|e| e.start_date);
        Ok(events)
    }

    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        Ok(tables.events.iter().find(|e| e.id == event_id).cloned())
    }

    async fn events_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        Ok(tables.events.iter().filter(|e| ids.contains(&e.id)).cloned().collect())
    }

    async fn create_event(&self, request: CreateEventRequest) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_write()?;
        tables.events.push(Event {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            category: request.category,
            location: request.location,
            start_date: request.start_date,
            end_date: request.end_date,
            max_participants: request.max_participants,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        Ok(tables
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id && r.user_id == user_id)
            .min_by_key(|r| r.created_at)
            .cloned())
    }

    async fn find_registration_by_id(&self, registration_id: Uuid) -> Result<Option<Registration>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        Ok(tables.registrations.iter().find(|r| r.id == registration_id).cloned())
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        let mut registrations = tables.registrations.clone();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_write()?;
        tables.registrations.push(Registration {
            id: Uuid::new_v4(),
            event_id: request.event_id,
            user_id: request.user_id,
            status: request.status,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_registration_status(&self, registration_id: Uuid, status: RegistrationStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_write()?;
        let registration = tables
            .registrations
            .iter_mut()
            .find(|r| r.id == registration_id)
            .ok_or(EventHubError::RegistrationNotFound { registration_id })?;
        registration.status = status;
        Ok(())
    }

    async fn create_feedback(&self, request: CreateFeedbackRequest) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_write()?;
        tables.feedback.push(Feedback {
            id: Uuid::new_v4(),
            event_id: request.event_id,
            user_id: request.user_id,
            rating: request.rating,
            comments: request.comments,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        let tables = self.tables.read().await;
        tables.check_read()?;
        Ok(tables.profiles.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_write()?;
        match tables.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => tables.profiles.push(profile),
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.tables.read().await.check_read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn registration_round_trip() {
        let backend = MemoryBackend::new();
        let (event_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(backend.find_registration(event_id, user_id).await.unwrap().is_none());
        backend
            .create_registration(CreateRegistrationRequest::new(event_id, user_id))
            .await
            .unwrap();

        let found = backend.find_registration(event_id, user_id).await.unwrap().unwrap();
        assert_eq!(found.status, RegistrationStatus::Pending);
        assert_eq!(backend.write_count().await, 1);
    }

    #[tokio::test]
    async fn armed_write_failure_blocks_writes() {
        let backend = MemoryBackend::new();
        backend.set_write_failure(Some("permission denied for table feedback")).await;

        let result = backend
            .create_registration(CreateRegistrationRequest::new(Uuid::new_v4(), Uuid::new_v4()))
            .await;
        assert_matches!(result, Err(EventHubError::Backend { ref message, .. }) if message == "permission denied for table feedback");
        assert_eq!(backend.write_count().await, 0);
    }

    #[tokio::test]
    async fn updating_missing_registration_reports_not_found() {
        let backend = MemoryBackend::new();
        let result = backend
            .update_registration_status(Uuid::new_v4(), RegistrationStatus::Approved)
            .await;
        assert_matches!(result, Err(EventHubError::RegistrationNotFound { .. }));
    }
}
