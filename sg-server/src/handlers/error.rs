//! Handler-level errors and their wire status codes.

use crate::wire::ErrorBody;

use std::panic::Location;

use error_location::ErrorLocation;
use log::error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Invalid message: {message} {location}")]
    InvalidMessage {
        message: String,
        location: ErrorLocation,
    },

    #[error("{message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("{message} {location}")]
    Unauthenticated {
        message: String,
        location: ErrorLocation,
    },

    #[error("{message} {location}")]
    AlreadyExists {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("{message} {location}")]
    Blocked {
        message: String,
        location: ErrorLocation,
    },

    #[error("{message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl RpcError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMessage { .. } => "INVALID_ARGUMENT",
            Self::Validation { .. } => "FAILED_PRECONDITION",
            Self::Unauthenticated { .. } => "UNAUTHENTICATED",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Blocked { .. } => "PERMISSION_DENIED",
            Self::NotFound { .. } => "UNAVAILABLE",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// Wire representation. Internal errors get a generic message so no
    /// file paths or SQL fragments leak to clients.
    pub fn to_wire_error(&self) -> ErrorBody {
        let message = match self {
            Self::Internal { .. } => "An unexpected error occurred. Please try again.".to_string(),
            Self::InvalidMessage { message, .. }
            | Self::Validation { message, .. }
            | Self::Unauthenticated { message, .. }
            | Self::AlreadyExists { message, .. }
            | Self::Blocked { message, .. }
            | Self::NotFound { message, .. } => message.clone(),
        };

        ErrorBody {
            code: self.error_code().to_string(),
            message,
            field: match self {
                Self::Validation { field, .. } | Self::AlreadyExists { field, .. } => field.clone(),
                _ => None,
            },
        }
    }
}

impl From<sg_auth::AuthError> for RpcError {
    #[track_caller]
    fn from(source: sg_auth::AuthError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            sg_auth::AuthError::MissingToken { .. } => Self::Unauthenticated {
                message: "A session token is required".to_string(),
                location,
            },
            sg_auth::AuthError::Unauthenticated { message, .. } => {
                Self::Unauthenticated { message, location }
            }
            sg_auth::AuthError::SessionConflict { .. } => Self::AlreadyExists {
                message: "An active session already exists for this account".to_string(),
                field: None,
                location,
            },
            sg_auth::AuthError::Hash { message, .. } => {
                error!("Password hashing failed: {message}");
                Self::Internal { message, location }
            }
        }
    }
}

impl From<sg_core::CoreError> for RpcError {
    #[track_caller]
    fn from(source: sg_core::CoreError) -> Self {
        Self::Validation {
            field: source.field().map(str::to_string),
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sg_db::DbError> for RpcError {
    #[track_caller]
    fn from(source: sg_db::DbError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            sg_db::DbError::UniqueViolation { message, .. } => Self::AlreadyExists {
                message: "The value is already taken".to_string(),
                field: unique_violation_field(&message),
                location,
            },
            other => {
                error!("Database failure: {other}");
                Self::Internal {
                    message: other.to_string(),
                    location,
                }
            }
        }
    }
}

impl From<sg_graph::GraphError> for RpcError {
    #[track_caller]
    fn from(source: sg_graph::GraphError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            sg_graph::GraphError::SelfReference { .. } => Self::Validation {
                message: "Cannot create a connection to your own account".to_string(),
                field: None,
                location,
            },
            sg_graph::GraphError::Blocked { .. } => Self::Blocked {
                message: "A block exists between these accounts".to_string(),
                location,
            },
            sg_graph::GraphError::ProfileNotFound { .. } => Self::NotFound {
                message: "User not found".to_string(),
                location,
            },
            sg_graph::GraphError::Db { source, .. } => {
                error!("Database failure: {source}");
                Self::Internal {
                    message: source.to_string(),
                    location,
                }
            }
        }
    }
}

/// SQLite unique violation messages name the column as table.column.
fn unique_violation_field(message: &str) -> Option<String> {
    ["username", "email"]
        .into_iter()
        .find(|column| message.contains(&format!("sg_users.{column}")))
        .map(str::to_string)
}

pub type Result<T> = std::result::Result<T, RpcError>;
