//! In-memory session store: the single authoritative store assumed by the
//! deployment model.

use crate::{AuthError, Result as AuthErrorResult, SessionRecord, SessionStore, TokenGenerator};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use error_location::ErrorLocation;
use log::{debug, info};
use tokio::sync::RwLock;
use tokio::time;
use uuid::Uuid;

/// Both indexes live behind one lock so they can never diverge; the
/// subject index is what makes `begin_for_subject` a true conditional
/// create instead of a get-then-create race.
struct StoreInner {
    tokens: HashMap<String, SessionRecord>,
    by_subject: HashMap<Uuid, String>,
}

pub struct MemorySessionStore {
    inner: Arc<RwLock<StoreInner>>,
    generator: TokenGenerator,
    idle_timeout: Duration,
    cleanup_interval: StdDuration,
    cleanup_running: Arc<AtomicBool>,
}

impl MemorySessionStore {
    /// Create a store. Does not start the background sweep;
    /// call `start_cleanup_task()` explicitly.
    pub fn new(idle_timeout: StdDuration, cleanup_interval: StdDuration) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(RwLock::new(StoreInner {
                tokens: HashMap::new(),
                by_subject: HashMap::new(),
            })),
            generator: TokenGenerator,
            idle_timeout: Duration::from_std(idle_timeout).unwrap_or(Duration::MAX),
            cleanup_interval,
            cleanup_running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start the background sweep that reclaims expired sessions.
    /// A no-op if the task is already running.
    pub fn start_cleanup_task(self: &Arc<Self>) {
        if self.cleanup_running.swap(true, Ordering::SeqCst) {
            info!("Session cleanup task is already running");
            return;
        }

        info!(
            "Starting session cleanup task (interval: {:?})",
            self.cleanup_interval
        );
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = time::interval(store.cleanup_interval);

            loop {
                interval.tick().await;

                if !store.cleanup_running.load(Ordering::SeqCst) {
                    info!("Session cleanup task is stopping");
                    break;
                }

                store.reclaim_expired().await;
            }
        });
    }

    /// Signal the background sweep to stop at its next tick.
    pub fn stop_cleanup_task(&self) {
        self.cleanup_running.store(false, Ordering::SeqCst);
    }

    /// Number of live (unexpired) sessions.
    pub async fn live_count(&self) -> usize {
        let now = Utc::now();
        let inner = self.inner.read().await;
        inner
            .tokens
            .values()
            .filter(|r| !r.is_expired(self.idle_timeout, now))
            .count()
    }

    async fn reclaim_expired(&self) {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        let expired: Vec<String> = inner
            .tokens
            .values()
            .filter(|r| r.is_expired(self.idle_timeout, now))
            .map(|r| r.token.clone())
            .collect();

        if !expired.is_empty() {
            info!("Reclaiming {} expired sessions", expired.len());
        }

        for token in expired {
            Self::remove_locked(&mut inner, &token);
        }
    }

    /// Remove a token and its subject index entry. Caller holds the write lock.
    fn remove_locked(inner: &mut StoreInner, token: &str) -> bool {
        match inner.tokens.remove(token) {
            Some(record) => {
                if let Some(subject) = record.subject
                    && inner.by_subject.get(&subject).is_some_and(|t| t == token)
                {
                    inner.by_subject.remove(&subject);
                }
                true
            }
            None => false,
        }
    }

    /// Generate a token unused in this store. Caller holds the write lock.
    fn fresh_token_locked(&self, inner: &StoreInner) -> String {
        loop {
            let token = self.generator.generate();
            if !inner.tokens.contains_key(&token) {
                return token;
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, subject: Option<Uuid>, logged_in: bool) -> AuthErrorResult<String> {
        let mut inner = self.inner.write().await;
        let token = self.fresh_token_locked(&inner);

        let mut record = match subject {
            Some(subject) => SessionRecord::for_subject(token.clone(), subject),
            None => SessionRecord::anonymous(token.clone()),
        };
        record.logged_in = logged_in;

        if let Some(subject) = subject {
            // One session per subject: displace whatever was there
            if let Some(old) = inner.by_subject.insert(subject, token.clone()) {
                inner.tokens.remove(&old);
            }
        }
        inner.tokens.insert(token.clone(), record);

        debug!("Created session (subject: {:?})", subject);
        Ok(token)
    }

    async fn begin_for_subject(&self, subject: Uuid) -> AuthErrorResult<String> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        // Check-then-act stays inside this write lock: two concurrent
        // logins for one subject serialize here, and the loser sees the
        // winner's live session.
        if let Some(existing) = inner.by_subject.get(&subject).cloned() {
            let live = inner
                .tokens
                .get(&existing)
                .is_some_and(|r| r.logged_in && !r.is_expired(self.idle_timeout, now));

            if live {
                debug!("Refusing second session for subject {subject}");
                return Err(AuthError::SessionConflict {
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            Self::remove_locked(&mut inner, &existing);
        }

        let token = self.fresh_token_locked(&inner);
        inner
            .tokens
            .insert(token.clone(), SessionRecord::for_subject(token.clone(), subject));
        inner.by_subject.insert(subject, token.clone());

        debug!("Began session for subject {subject}");
        Ok(token)
    }

    async fn get(&self, token: &str) -> AuthErrorResult<Option<SessionRecord>> {
        let now = Utc::now();
        let inner = self.inner.read().await;

        Ok(inner
            .tokens
            .get(token)
            .filter(|r| !r.is_expired(self.idle_timeout, now))
            .cloned())
    }

    async fn touch(&self, token: &str) -> AuthErrorResult<bool> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        match inner.tokens.get_mut(token) {
            Some(record) if !record.is_expired(self.idle_timeout, now) => {
                record.last_seen = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, token: &str) -> AuthErrorResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(Self::remove_locked(&mut inner, token))
    }
}
