use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOST, DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bound on concurrently executing RPC calls (the worker pool size)
    pub max_concurrent_calls: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.is_empty() {
            return Err(ConfigError::server("server.host must not be empty"));
        }

        if self.max_concurrent_calls == 0 {
            return Err(ConfigError::server(
                "server.max_concurrent_calls must be at least 1",
            ));
        }

        Ok(())
    }
}
