pub mod connection;
pub mod error;
pub mod repositories;

#[cfg(test)]
mod tests;

pub use connection::{connect, memory_pool};
pub use error::{DbError, Result};
pub use repositories::account_repository::AccountRepository;
pub use repositories::connection_repository::{ConnectionPageRow, ConnectionRepository};
