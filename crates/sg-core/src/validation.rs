//! Input validation for account fields.
//!
//! Usernames and emails are case-folded once, at entry; everything below
//! this layer assumes normalized values.

use crate::{CoreError, Result};

use std::panic::Location;
use std::sync::OnceLock;

use error_location::ErrorLocation;
use regex::Regex;

/// English letter first, then letters/digits/dots, 3-30 chars total.
const USERNAME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9.]{2,29}$";

/// Pragmatic RFC shape: one '@', no whitespace, dotted domain.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

const MAX_EMAIL_LENGTH: usize = 254;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(USERNAME_PATTERN).expect("username pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Case-fold a username for storage and comparison.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Case-fold an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[track_caller]
pub fn validate_username(username: &str) -> Result<()> {
    if username_regex().is_match(username) {
        Ok(())
    } else {
        Err(CoreError::InvalidUsername {
            message: "must be 3-30 characters, start with a letter, and contain \
                      only English letters, numbers, and '.'"
                .to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[track_caller]
pub fn validate_email(email: &str) -> Result<()> {
    if email.len() <= MAX_EMAIL_LENGTH && email_regex().is_match(email) {
        Ok(())
    } else {
        Err(CoreError::InvalidEmail {
            message: "enter a valid email address".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Passwords are opaque to the service; only emptiness is rejected here.
/// Strength policy belongs to the client per product decision.
#[track_caller]
pub fn validate_password(raw_password: &str) -> Result<()> {
    if raw_password.is_empty() {
        Err(CoreError::InvalidPassword {
            message: "password must not be empty".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    } else {
        Ok(())
    }
}
