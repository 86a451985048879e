//! Registration lifecycle for an attendee
//!
//! An attendee asks to join an event, which creates a `pending` registration.
//! The event screen then reflects whatever status the stored row has. Every
//! write is followed by a re-read so the screen shows stored truth rather
//! than an optimistic guess.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::Backend;
use crate::models::{CreateRegistrationRequest, Registration, RegistrationStatus};
use crate::services::notification::Notification;
use crate::utils::errors::Result;
use crate::utils::logging::log_registration_action;

/// What the event screen offers the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// No registration yet; the register button is active
    Register,
    Pending,
    Registered,
    Rejected,
}

impl Affordance {
    pub fn for_registration(registration: Option<&Registration>) -> Self {
        match registration.map(|r| r.status) {
            None => Affordance::Register,
            Some(RegistrationStatus::Pending) => Affordance::Pending,
            Some(RegistrationStatus::Approved) => Affordance::Registered,
            Some(RegistrationStatus::Rejected) => Affordance::Rejected,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Affordance::Register => "Register",
            Affordance::Pending => "Pending",
            Affordance::Registered => "Registered",
            Affordance::Rejected => "Rejected",
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self, Affordance::Register)
    }
}

/// The user's registration for one event, as last read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationView {
    pub registration: Option<Registration>,
}

impl RegistrationView {
    pub fn affordance(&self) -> Affordance {
        Affordance::for_registration(self.registration.as_ref())
    }

    /// A row exists, whatever its status
    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// `view` is `None` when the row was stored but could not be re-read
    Submitted { notification: Notification, view: Option<RegistrationView> },
    Failed { notification: Notification },
    /// A request for the same user and event is already running
    InFlight,
}

/// Marks a (event, user) pair busy until dropped
struct InFlightGuard {
    key: (Uuid, Uuid),
    in_flight: Arc<Mutex<HashSet<(Uuid, Uuid)>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.key);
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    backend: Arc<dyn Backend>,
    in_flight: Arc<Mutex<HashSet<(Uuid, Uuid)>>>,
}

impl RegistrationService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Read the user's registration for an event
    pub async fn view(&self, event_id: Uuid, user_id: Uuid) -> Result<RegistrationView> {
        let registration = self.backend.find_registration(event_id, user_id).await?;
        debug!(event_id = %event_id, user_id = %user_id, status = ?registration.as_ref().map(|r| r.status), "Registration read");
        Ok(RegistrationView { registration })
    }

    pub fn is_busy(&self, event_id: Uuid, user_id: Uuid) -> bool {
        let set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.contains(&(event_id, user_id))
    }

    /// Insert a pending registration, then re-read it.
    ///
    /// The screen only offers this when no registration was found, so no
    /// existence check is made here. A failed insert leaves the view as it
    /// was and reports the backend's message.
    pub async fn request(&self, event_id: Uuid, user_id: Uuid) -> Result<RequestOutcome> {
        let Some(_guard) = self.acquire(event_id, user_id) else {
            debug!(event_id = %event_id, user_id = %user_id, "Registration already in flight");
            return Ok(RequestOutcome::InFlight);
        };

        let request = CreateRegistrationRequest::new(event_id, user_id);
        if let Err(e) = self.backend.create_registration(request).await {
            warn!(event_id = %event_id, user_id = %user_id, error = %e, "Registration insert failed");
            return Ok(RequestOutcome::Failed {
                notification: Notification::from_error("Registration failed", &e),
            });
        }

        info!(event_id = %event_id, user_id = %user_id, "Registration submitted");
        log_registration_action(event_id, user_id, "registration_requested", None);

        let view = match self.view(event_id, user_id).await {
            Ok(view) => Some(view),
            Err(e) => {
                warn!(event_id = %event_id, user_id = %user_id, error = %e, "Error fetching registration after insert");
                None
            }
        };
        Ok(RequestOutcome::Submitted {
            notification: Notification::success("Registration submitted", "Your registration is pending approval"),
            view,
        })
    }

    fn acquire(&self, event_id: Uuid, user_id: Uuid) -> Option<InFlightGuard> {
        let key = (event_id, user_id);
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(key) {
            return None;
        }
        Some(InFlightGuard {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}
