mod auth_config;
mod config;
mod database_config;
mod error;
mod graph_config;
mod handler_config;
mod log_level;
mod logging_config;
mod server_config;
mod session_config;

#[cfg(test)]
mod tests;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use graph_config::GraphConfig;
pub use handler_config::HandlerConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use session_config::SessionConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONCURRENT_CALLS: usize = 64;
const DEFAULT_DATABASE_FILENAME: &str = "accounts.db";
const DEFAULT_TOKEN_METADATA_KEY: &str = "session-token";
const DEFAULT_ALLOW_LIST: [&str; 4] = [
    "signup",
    "login",
    "is_username_available",
    "is_email_available",
];
const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 600;
const DEFAULT_SESSION_CLEANUP_INTERVAL_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 50;
/// Hard ceiling on a client-requested page size.
pub const MAX_PAGE_SIZE: u32 = 500;
const DEFAULT_HANDLER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_DIRECTORY: &str = "log";
