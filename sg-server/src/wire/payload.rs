//! Typed payloads for every RPC method and its responses.

use crate::wire::envelope::ErrorBody;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One variant per RPC method. The `method` tag doubles as the name the
/// auth gate checks against its anonymous allow-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum RequestPayload {
    Signup(SignupRequest),
    Login(LoginRequest),
    Logout,
    IsLoggedIn,
    IsUsernameAvailable(UsernameProbe),
    IsEmailAvailable(EmailProbe),
    ChangeUsername(ChangeUsernameRequest),
    GetUser(GetUserRequest),
    InitProfile(ProfileUpdateRequest),
    ChangeProfile(ProfileUpdateRequest),
    Follow(EdgeRequest),
    Unfollow(EdgeRequest),
    Block(EdgeRequest),
    Unblock(EdgeRequest),
    GetFollowers(PageRequest),
    GetFollowing(PageRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameProbe {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailProbe {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeUsernameRequest {
    pub username: String,
}

/// Omitting `username` targets the caller's own account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUserRequest {
    #[serde(default)]
    pub username: Option<String>,
}

/// A `None` field leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRequest {
    /// The account on the far side of the edge
    pub username: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRequest {
    /// Omitted = the caller's own listing
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Session(SessionBody),
    Ack(AckBody),
    User(UserBody),
    Connections(ConnectionsBody),
    Error(ErrorBody),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBody {
    pub session_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckBody {
    pub success: bool,
}

/// Public account view. `email` is present only when the caller asks
/// about their own account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    pub user_id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub is_self: bool,
}

impl From<sg_core::UserSummary> for UserBody {
    fn from(summary: sg_core::UserSummary) -> Self {
        Self {
            user_id: summary.user_id,
            username: summary.username,
            full_name: summary.full_name,
            bio: summary.bio,
            email: summary.email,
            followers: summary.followers,
            following: summary.following,
            is_self: summary.is_self,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub user_id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionsBody {
    pub entries: Vec<ConnectionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
