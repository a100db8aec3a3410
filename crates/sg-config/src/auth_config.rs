use crate::{ConfigError, ConfigErrorResult, DEFAULT_ALLOW_LIST, DEFAULT_TOKEN_METADATA_KEY};

use serde::Deserialize;

/// Gate configuration. Which methods are public varies by deployment, so the
/// allow-list is data, not a compiled constant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// The single well-known metadata key carrying the session token
    pub token_metadata_key: String,
    /// Methods permitted to run without a valid session
    pub allow_list: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_metadata_key: DEFAULT_TOKEN_METADATA_KEY.to_string(),
            allow_list: DEFAULT_ALLOW_LIST.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.token_metadata_key.is_empty() {
            return Err(ConfigError::auth("auth.token_metadata_key must not be empty"));
        }

        if self.allow_list.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::auth("auth.allow_list entries must not be empty"));
        }

        Ok(())
    }
}
