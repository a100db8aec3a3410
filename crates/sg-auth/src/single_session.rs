//! One concurrently active session per account - a product decision,
//! enforced where it can be atomic: at the store boundary.

use crate::{Result as AuthErrorResult, SessionStore};

use std::sync::Arc;

use uuid::Uuid;

/// Wraps the store's conditional create. A live session for the subject
/// rejects the new login; a stale or expired one is displaced.
pub struct SingleSessionPolicy {
    store: Arc<dyn SessionStore>,
}

impl SingleSessionPolicy {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Mint a session for the subject, or fail with `SessionConflict`.
    pub async fn begin(&self, subject: Uuid) -> AuthErrorResult<String> {
        self.store.begin_for_subject(subject).await
    }
}
