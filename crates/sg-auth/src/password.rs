//! Argon2 password hashing. Raw passwords exist only on the stack here.

use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use error_location::ErrorLocation;
use password_hash::{PasswordHash, SaltString};

#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordVault;

impl PasswordVault {
    /// Hash a raw password into a PHC string.
    #[track_caller]
    pub fn hash(&self, raw_password: &str) -> AuthErrorResult<String> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::Hash {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let phc = Argon2::default()
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?
            .to_string();

        Ok(phc)
    }

    /// Verify a raw password against a PHC string.
    /// A malformed hash verifies as false, never as an error.
    pub fn verify(&self, hash: &str, raw_password: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(raw_password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
