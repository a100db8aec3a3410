//! Status - a small closed vocabulary shared across profiles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label of the default status every new profile starts with.
pub const ACTIVE_STATUS_LABEL: &str = "ACTIVE";

/// Account standing, looked-up-or-created by label to avoid duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: Uuid,
    pub label: String,
    pub description: String,
    /// Whether accounts in this standing may authenticate
    pub can_login: bool,
}

impl Status {
    pub fn new(label: &str, description: &str, can_login: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            description: description.to_string(),
            can_login,
        }
    }

    /// The well-known default standing for new accounts
    pub fn active() -> Self {
        Self::new(ACTIVE_STATUS_LABEL, "Account in good standing", true)
    }
}
