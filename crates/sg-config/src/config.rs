use crate::{
    AuthConfig, ConfigError, ConfigErrorResult, DatabaseConfig, GraphConfig, HandlerConfig,
    LoggingConfig, ServerConfig, SessionConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub graph: GraphConfig,
    pub handler: HandlerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// Loading order:
    /// 1. Check for SG_CONFIG_DIR env var, else use ./.sg/
    /// 2. Auto-create the config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply SG_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SG_CONFIG_DIR env var > ./.sg/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("SG_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".sg"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.session.validate()?;
        self.graph.validate()?;
        self.handler.validate()?;

        // Validate database path doesn't escape config dir
        let db_path = std::path::Path::new(&self.database.path);
        if db_path.is_absolute() || self.database.path.contains("..") {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} concurrent calls)",
            self.server.host, self.server.port, self.server.max_concurrent_calls
        );
        info!("  database: {}", self.database.path);
        info!(
            "  auth: metadata key '{}', {} allow-listed methods",
            self.auth.token_metadata_key,
            self.auth.allow_list.len()
        );
        info!(
            "  session: idle_timeout={}s, cleanup={}s",
            self.session.idle_timeout_secs, self.session.cleanup_interval_secs
        );
        info!("  graph: page_size={}", self.graph.page_size);
        info!("  handler: timeout={}s", self.handler.timeout_secs);
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("SG_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("SG_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "SG_SERVER_MAX_CONCURRENT_CALLS",
            &mut self.server.max_concurrent_calls,
        );

        // Database
        Self::apply_env_string("SG_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_string(
            "SG_AUTH_TOKEN_METADATA_KEY",
            &mut self.auth.token_metadata_key,
        );
        if let Ok(val) = std::env::var("SG_AUTH_ALLOW_LIST") {
            self.auth.allow_list = val
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }

        // Session
        Self::apply_env_parse(
            "SG_SESSION_IDLE_TIMEOUT_SECS",
            &mut self.session.idle_timeout_secs,
        );
        Self::apply_env_parse(
            "SG_SESSION_CLEANUP_INTERVAL_SECS",
            &mut self.session.cleanup_interval_secs,
        );

        // Graph
        Self::apply_env_parse("SG_GRAPH_PAGE_SIZE", &mut self.graph.page_size);

        // Handler
        Self::apply_env_parse("SG_HANDLER_TIMEOUT_SECS", &mut self.handler.timeout_secs);

        // Logging
        Self::apply_env_parse("SG_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SG_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SG_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
