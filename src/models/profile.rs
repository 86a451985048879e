//! Profile model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub college: String,
}

impl Profile {
    /// Placeholder used when a registration points at a profile that no longer resolves
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            college: "Unknown".to_string(),
        }
    }
}
