//! The gate every inbound call passes through before its handler runs.

use crate::{AuthError, Result as AuthErrorResult, SessionStore};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, warn};
use uuid::Uuid;

/// The resolved identity a call runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// An allow-listed method running without a session
    Anonymous,
    /// A valid logged-in session
    Session { user_id: Uuid, token: String },
}

impl Caller {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Session { user_id, .. } => Some(*user_id),
            Self::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Session { token, .. } => Some(token),
            Self::Anonymous => None,
        }
    }
}

/// Per-deployment gate policy, converted from configuration at startup.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    /// The single well-known metadata key carrying the session token
    pub token_metadata_key: String,
    /// Methods permitted to run anonymously
    pub allow_list: Vec<String>,
}

impl GatePolicy {
    pub fn is_allow_listed(&self, method: &str) -> bool {
        self.allow_list.iter().any(|m| m == method)
    }
}

pub struct AuthGate {
    store: Arc<dyn SessionStore>,
    policy: GatePolicy,
}

impl AuthGate {
    pub fn new(store: Arc<dyn SessionStore>, policy: GatePolicy) -> Self {
        Self { store, policy }
    }

    /// Resolve the caller for a method from its call metadata.
    ///
    /// A stale record (logged-in flag down) is deleted on sight. Every
    /// successful pass refreshes the record's last_seen timestamp.
    pub async fn authenticate(
        &self,
        method: &str,
        metadata: &HashMap<String, String>,
    ) -> AuthErrorResult<Caller> {
        let allow_listed = self.policy.is_allow_listed(method);

        let Some(token) = metadata.get(&self.policy.token_metadata_key) else {
            if allow_listed {
                return Ok(Caller::Anonymous);
            }
            warn!("Call to {method} without a session token");
            return Err(AuthError::MissingToken {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let Some(record) = self.store.get(token).await? else {
            if allow_listed {
                return Ok(Caller::Anonymous);
            }
            warn!("Call to {method} with an unknown or expired session token");
            return Err(AuthError::Unauthenticated {
                message: "unknown or expired session".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if !record.logged_in {
            // Stale session: remove it so it cannot be replayed
            self.store.delete(token).await?;
            if allow_listed {
                return Ok(Caller::Anonymous);
            }
            warn!("Call to {method} with a stale session, deleted");
            return Err(AuthError::Unauthenticated {
                message: "session is no longer logged in".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let Some(subject) = record.subject else {
            if allow_listed {
                return Ok(Caller::Anonymous);
            }
            return Err(AuthError::Unauthenticated {
                message: "session has no authenticated subject".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.store.touch(token).await?;
        debug!("Authenticated {method} for subject {subject}");

        Ok(Caller::Session {
            user_id: subject,
            token: token.clone(),
        })
    }
}
