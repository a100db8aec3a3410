use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid username: {message} {location}")]
    InvalidUsername {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid email: {message} {location}")]
    InvalidEmail {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid password: {message} {location}")]
    InvalidPassword {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid connection kind: {value} {location}")]
    InvalidConnectionKind {
        value: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Field name for client-side error highlighting
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUsername { .. } => Some("username"),
            Self::InvalidEmail { .. } => Some("email"),
            Self::InvalidPassword { .. } => Some("password"),
            Self::InvalidConnectionKind { .. } => None,
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
