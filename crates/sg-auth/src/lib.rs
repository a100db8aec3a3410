pub mod auth_gate;
pub mod error;
pub mod memory_session_store;
pub mod password;
pub mod session;
pub mod session_store;
pub mod single_session;
pub mod token;

#[cfg(test)]
mod tests;

pub use auth_gate::{AuthGate, Caller, GatePolicy};
pub use error::{AuthError, Result};
pub use memory_session_store::MemorySessionStore;
pub use password::PasswordVault;
pub use session::SessionRecord;
pub use session_store::SessionStore;
pub use single_session::SingleSessionPolicy;
pub use token::{TOKEN_LENGTH, TokenGenerator};
