//! Organizer view over all registrations
//!
//! Registrations are listed newest first and joined in memory with the
//! profiles and events they reference. Profiles and events are fetched in
//! two batched lookups by id set, run concurrently.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::database::Backend;
use crate::models::{Decision, Event, Profile, Registration, RegistrationStatus};
use crate::services::notification::Notification;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::logging::log_admin_action;

/// Title shown for a registration whose event no longer resolves
pub const UNKNOWN_EVENT_TITLE: &str = "Unknown Event";

/// One line of the organizer table
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRow {
    pub registration: Registration,
    pub profile: Profile,
    pub event_title: String,
}

impl RegistrationRow {
    /// Approve and reject are offered only while pending
    pub fn is_actionable(&self) -> bool {
        !self.registration.status.is_terminal()
    }
}

/// Left-join registrations with profiles and events, then keep those
/// matching the event filter. Input order is preserved.
pub fn join_rows(
    registrations: Vec<Registration>,
    profiles: Vec<Profile>,
    events: Vec<Event>,
    event_filter: Option<Uuid>,
) -> Vec<RegistrationRow> {
    let profiles: HashMap<Uuid, Profile> = profiles.into_iter().map(|p| (p.id, p)).collect();
    let titles: HashMap<Uuid, String> = events.into_iter().map(|e| (e.id, e.title)).collect();

    registrations
        .into_iter()
        .filter(|r| event_filter.map_or(true, |id| r.event_id == id))
        .map(|registration| RegistrationRow {
            profile: profiles
                .get(&registration.user_id)
                .cloned()
                .unwrap_or_else(|| Profile::unknown(registration.user_id)),
            event_title: titles
                .get(&registration.event_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_EVENT_TITLE.to_string()),
            registration,
        })
        .collect()
}

/// What the organizer screen shows
#[derive(Debug, Clone, Default)]
pub struct ManagementView {
    pub rows: Vec<RegistrationRow>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub notification: Notification,
    /// Re-read table after a successful update
    pub rows: Option<Vec<RegistrationRow>>,
}

#[derive(Clone)]
pub struct ManagementService {
    backend: Arc<dyn Backend>,
}

impl ManagementService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn load(&self, event_filter: Option<Uuid>) -> Result<Vec<RegistrationRow>> {
        let registrations = self.backend.list_registrations().await?;
        if registrations.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = registrations.iter().map(|r| r.user_id).collect::<BTreeSet<_>>().into_iter().collect();
        let event_ids: Vec<Uuid> = registrations.iter().map(|r| r.event_id).collect::<BTreeSet<_>>().into_iter().collect();

        let (profiles, events) = futures::try_join!(
            self.backend.profiles_by_ids(&user_ids),
            self.backend.events_by_ids(&event_ids),
        )?;

        Ok(join_rows(registrations, profiles, events, event_filter))
    }

    /// Load the table; a failure becomes an empty table with a notification
    pub async fn list(&self, event_filter: Option<Uuid>) -> ManagementView {
        match self.load(event_filter).await {
            Ok(rows) => ManagementView { rows, notification: None },
            Err(e) => {
                error!(error = %e, "Error fetching registrations");
                ManagementView {
                    rows: Vec::new(),
                    notification: Some(Notification::from_error("Error fetching registrations", &e)),
                }
            }
        }
    }

    /// Apply an organizer decision, then re-read the table.
    ///
    /// The stored status is read first so a button left over from an older
    /// screen cannot move a registration out of a final state.
    pub async fn decide(
        &self,
        admin_id: i64,
        registration_id: Uuid,
        decision: Decision,
        event_filter: Option<Uuid>,
    ) -> DecisionOutcome {
        let status = decision.target_status();
        if let Err(e) = self.apply(registration_id, status).await {
            warn!(registration_id = %registration_id, error = %e, "Registration update failed");
            return DecisionOutcome {
                notification: Notification::from_error("Update failed", &e),
                rows: None,
            };
        }

        info!(registration_id = %registration_id, status = %status, "Registration updated");
        log_admin_action(admin_id, "registration_decision", Some(&registration_id.to_string()), Some(status.as_str()));

        let rows = match self.load(event_filter).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                error!(error = %e, "Error fetching registrations after update");
                None
            }
        };

        DecisionOutcome {
            notification: Notification::success("Registration updated", format!("Registration {} successfully", status)),
            rows,
        }
    }

    async fn apply(&self, registration_id: Uuid, status: RegistrationStatus) -> Result<()> {
        let current = self
            .backend
            .find_registration_by_id(registration_id)
            .await?
            .ok_or(EventHubError::RegistrationNotFound { registration_id })?;
        RegistrationStatus::check_transition(Some(current.status), status)?;
        self.backend.update_registration_status(registration_id, status).await
    }
}
