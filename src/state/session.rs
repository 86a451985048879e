//! Signed-in session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::helpers::profile_id_for;

/// The identity a user established through the sign-in dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub telegram_id: i64,
    pub profile_id: Uuid,
    pub name: String,
    pub college: String,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(telegram_id: i64, name: String, college: String) -> Self {
        Self {
            telegram_id,
            profile_id: profile_id_for(telegram_id),
            name,
            college,
            established_at: Utc::now(),
        }
    }
}

/// Session plus the role resolved for this request
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: Session,
    pub is_admin: bool,
}

impl SessionContext {
    pub fn user_id(&self) -> Uuid {
        self.session.profile_id
    }
}
