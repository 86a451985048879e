//! Registration model and its status lifecycle
//!
//! A registration starts `pending` and an organizer moves it once to either
//! `approved` or `rejected`. Both decisions are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::errors::EventHubError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the status is always `pending`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
}

impl CreateRegistrationRequest {
    pub fn new(event_id: Uuid, user_id: Uuid) -> Self {
        Self {
            event_id,
            user_id,
            status: RegistrationStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RegistrationStatus::Pending)
    }

    /// Guard over the four lifecycle states, with `None` standing for "no registration yet".
    pub fn check_transition(current: Option<RegistrationStatus>, next: RegistrationStatus) -> Result<(), EventHubError> {
        let allowed = matches!(
            (current, next),
            (None, RegistrationStatus::Pending)
                | (Some(RegistrationStatus::Pending), RegistrationStatus::Approved)
                | (Some(RegistrationStatus::Pending), RegistrationStatus::Rejected)
        );

        if allowed {
            Ok(())
        } else {
            Err(EventHubError::InvalidStateTransition {
                from: current.map(|s| s.as_str()).unwrap_or("absent").to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = EventHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(EventHubError::SchemaMismatch(format!("unknown registration status '{}'", other))),
        }
    }
}

/// An organizer's decision on a pending registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(&self) -> RegistrationStatus {
        match self {
            Decision::Approve => RegistrationStatus::Approved,
            Decision::Reject => RegistrationStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use RegistrationStatus::*;

    #[test]
    fn creation_always_starts_pending() {
        let request = CreateRegistrationRequest::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(request.status, Pending);
    }

    #[test]
    fn allowed_transitions() {
        assert!(RegistrationStatus::check_transition(None, Pending).is_ok());
        assert!(RegistrationStatus::check_transition(Some(Pending), Approved).is_ok());
        assert!(RegistrationStatus::check_transition(Some(Pending), Rejected).is_ok());
    }

    #[test]
    fn terminal_states_are_absorbing() {
        for terminal in [Approved, Rejected] {
            assert!(terminal.is_terminal());
            for next in [Pending, Approved, Rejected] {
                assert_matches!(
                    RegistrationStatus::check_transition(Some(terminal), next),
                    Err(EventHubError::InvalidStateTransition { .. })
                );
            }
        }
    }

    #[test]
    fn absent_registration_can_only_become_pending() {
        assert!(RegistrationStatus::check_transition(None, Approved).is_err());
        assert!(RegistrationStatus::check_transition(None, Rejected).is_err());
        assert!(RegistrationStatus::check_transition(Some(Pending), Pending).is_err());
    }

    #[test]
    fn status_parsing_fails_fast_on_unknown_values() {
        assert_eq!("approved".parse::<RegistrationStatus>().unwrap(), Approved);
        assert_matches!("cancelled".parse::<RegistrationStatus>(), Err(EventHubError::SchemaMismatch(_)));
    }

    #[test]
    fn decisions_map_to_terminal_states() {
        assert_eq!(Decision::Approve.target_status(), Approved);
        assert_eq!(Decision::Reject.target_status(), Rejected);
    }
}
