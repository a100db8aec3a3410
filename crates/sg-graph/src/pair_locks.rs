//! Per-pair critical sections for graph mutations.
//!
//! Every mutation of the edges between two profiles runs under the lock
//! for that unordered pair, so a block and a follow racing on the same
//! pair serialize while unrelated pairs proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Unordered pair of profile ids. `new(a, b)` and `new(b, a)` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    lo: Uuid,
    hi: Uuid,
}

impl PairKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
}

#[derive(Default)]
pub struct PairLocks {
    registry: StdMutex<HashMap<PairKey, Arc<TokioMutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the critical section for the pair. The registry entry is
    /// dropped again once the last guard for the pair releases.
    pub async fn acquire(&self, a: Uuid, b: Uuid) -> PairGuard<'_> {
        let key = PairKey::new(a, b);

        let lock = {
            let mut registry = self.registry.lock().expect("pair lock registry poisoned");
            Arc::clone(registry.entry(key).or_default())
        };

        let guard = Arc::clone(&lock).lock_owned().await;

        PairGuard {
            locks: self,
            key,
            lock,
            guard: Some(guard),
        }
    }

    /// Number of pairs currently holding a registry entry.
    pub fn active_pairs(&self) -> usize {
        self.registry
            .lock()
            .expect("pair lock registry poisoned")
            .len()
    }
}

pub struct PairGuard<'a> {
    locks: &'a PairLocks,
    key: PairKey,
    lock: Arc<TokioMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PairGuard<'_> {
    fn drop(&mut self) {
        // Release before inspecting the count, so the guard's own Arc is gone
        self.guard.take();

        let mut registry = self
            .locks
            .registry
            .lock()
            .expect("pair lock registry poisoned");

        // Two owners left means registry entry plus this guard: no waiters
        if Arc::strong_count(&self.lock) <= 2 {
            registry.remove(&self.key);
        }
    }
}
