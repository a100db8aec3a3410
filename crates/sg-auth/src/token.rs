use rand::{Rng, distr::Alphanumeric};

pub const TOKEN_LENGTH: usize = 32;

/// Opaque, unguessable session token source.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}
