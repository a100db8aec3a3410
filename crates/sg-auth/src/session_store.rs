//! The access contract every session backend must honor.

use crate::{Result as AuthErrorResult, SessionRecord};

use async_trait::async_trait;
use uuid::Uuid;

/// Per-token operations must be linearizable: a single token observes
/// create -> get -> delete ordering. `begin_for_subject` is the one
/// cross-token primitive and must be atomic (see SingleSessionPolicy).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a session and return its token.
    async fn create(&self, subject: Option<Uuid>, logged_in: bool) -> AuthErrorResult<String>;

    /// Conditionally mint a logged-in session for a subject.
    ///
    /// Fails with `SessionConflict` when a live session already exists for
    /// the subject; a stale or expired one is deleted and replaced in the
    /// same critical section.
    async fn begin_for_subject(&self, subject: Uuid) -> AuthErrorResult<String>;

    /// Look up a record; expired records are a miss.
    async fn get(&self, token: &str) -> AuthErrorResult<Option<SessionRecord>>;

    /// Refresh last_seen. Returns false for a missing or expired token.
    async fn touch(&self, token: &str) -> AuthErrorResult<bool>;

    /// Delete a record. Returns false if it was not present.
    async fn delete(&self, token: &str) -> AuthErrorResult<bool>;
}
