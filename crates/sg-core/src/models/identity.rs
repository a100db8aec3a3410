//! Identity - the authenticable account record.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that can log in. Usernames and emails are stored case-folded;
/// the credential is an argon2 PHC hash, never the raw password.
/// Identities are deactivated, never hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// PHC-format password hash (opaque to everything but the verifier)
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new active identity. Expects already-normalized
    /// username/email and an already-hashed credential.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            active: true,
            // Whole seconds: the store persists integer timestamps
            created_at: Utc::now().trunc_subsecs(0),
        }
    }
}
