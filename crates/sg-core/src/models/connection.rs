//! Connection - a directed, typed edge between two profiles.

use crate::{CoreError, Result};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    Follow,
    Block,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "FOLLOW",
            Self::Block => "BLOCK",
        }
    }
}

impl FromStr for ConnectionKind {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FOLLOW" => Ok(Self::Follow),
            "BLOCK" => Ok(Self::Block),
            other => Err(CoreError::InvalidConnectionKind {
                value: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// At most one connection may exist per (creator, target, kind) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub creator_profile: Uuid,
    pub target_profile: Uuid,
    pub kind: ConnectionKind,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(creator_profile: Uuid, target_profile: Uuid, kind: ConnectionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            creator_profile,
            target_profile,
            kind,
            // Whole seconds: the store persists integer timestamps
            created_at: Utc::now().trunc_subsecs(0),
        }
    }
}
