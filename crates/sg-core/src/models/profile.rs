//! Profile - public-facing data attached 1:1 to an Identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Created atomically with its Identity; there is never an Identity without
/// a Profile. Defaults to the ACTIVE status record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub status_id: Uuid,
    /// Reference to an avatar asset; resolution is a media-service concern
    pub avatar: Option<String>,
}

impl Profile {
    pub fn new(user_id: Uuid, status_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            full_name: None,
            bio: None,
            status_id,
            avatar: None,
        }
    }
}
