//! Data-access boundary
//!
//! Every read and write the bot performs goes through [`Backend`]. The hosted
//! service owns consistency and durability; implementations only translate
//! calls into its query language and validate the row shapes that come back.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    CreateEventRequest, CreateFeedbackRequest, CreateRegistrationRequest, Event, Profile,
    Registration, RegistrationStatus,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait Backend: Send + Sync {
    /// All events, earliest start first
    async fn list_events(&self) -> Result<Vec<Event>>;

    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>>;

    /// Batched lookup; ids without a row are simply missing from the result
    async fn events_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Event>>;

    async fn create_event(&self, request: CreateEventRequest) -> Result<()>;

    /// The registration for an (event, user) pair, the earliest one if duplicates exist
    async fn find_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>>;

    async fn find_registration_by_id(&self, registration_id: Uuid) -> Result<Option<Registration>>;

    /// All registrations, newest first
    async fn list_registrations(&self) -> Result<Vec<Registration>>;

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<()>;

    /// Overwrite the status field of one registration
    async fn update_registration_status(&self, registration_id: Uuid, status: RegistrationStatus) -> Result<()>;

    async fn create_feedback(&self, request: CreateFeedbackRequest) -> Result<()>;

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>>;

    async fn upsert_profile(&self, profile: Profile) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}
