pub mod connection_graph;
pub mod error;
pub mod pair_locks;

#[cfg(test)]
mod tests;

pub use connection_graph::{ConnectionGraph, ConnectionPage, PageCursor};
pub use error::{GraphError, Result};
pub use pair_locks::{PairKey, PairLocks};
