//! Public projection of an account, as returned by user queries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    /// Only present when the caller is the account owner
    pub email: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub is_self: bool,
}
