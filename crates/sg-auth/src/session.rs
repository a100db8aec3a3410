//! Session record - the server-held binding between a token and a subject.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Owned exclusively by the SessionStore; the gate only reads and touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    /// None for anonymous sessions
    pub subject: Option<Uuid>,
    pub logged_in: bool,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SessionRecord {
    /// A logged-in session bound to an account
    pub fn for_subject(token: String, subject: Uuid) -> Self {
        let now = Utc::now();
        Self {
            token,
            subject: Some(subject),
            logged_in: true,
            created_at: now,
            last_seen: now,
        }
    }

    /// A session with no authenticated subject
    pub fn anonymous(token: String) -> Self {
        let now = Utc::now();
        Self {
            token,
            subject: None,
            logged_in: false,
            created_at: now,
            last_seen: now,
        }
    }

    /// A session untouched for longer than the idle timeout is dead
    pub fn is_expired(&self, idle_timeout: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_seen > idle_timeout
    }
}
