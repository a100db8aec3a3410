use crate::{ConfigError, ConfigErrorResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Follower/following entries returned per fetch
    pub page_size: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::graph(format!(
                "graph.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(())
    }
}
