use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_SESSION_CLEANUP_INTERVAL_SECS,
    DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// A session untouched for this long counts as expired
    pub idle_timeout_secs: u64,
    /// How often the background sweep reclaims expired sessions
    pub cleanup_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
            cleanup_interval_secs: DEFAULT_SESSION_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.idle_timeout_secs == 0 {
            return Err(ConfigError::session(
                "session.idle_timeout_secs must be at least 1",
            ));
        }

        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::session(
                "session.cleanup_interval_secs must be at least 1",
            ));
        }

        Ok(())
    }
}
