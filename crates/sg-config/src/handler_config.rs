use crate::{ConfigError, ConfigErrorResult, DEFAULT_HANDLER_TIMEOUT_SECS};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Per-call handler timeout
    pub timeout_secs: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HANDLER_TIMEOUT_SECS,
        }
    }
}

impl HandlerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::config("handler.timeout_secs must be at least 1"));
        }

        Ok(())
    }
}
