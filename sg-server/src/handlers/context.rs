use sg_auth::{Caller, PasswordVault, SessionStore, SingleSessionPolicy};
use sg_db::AccountRepository;
use sg_graph::ConnectionGraph;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Per-request tracing data.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id echoed through logs; the client's message id when given
    pub correlation_id: String,
    /// Sequence number within this server instance
    pub request_seq: u64,
    /// Start time for latency tracking
    pub started_at: std::time::Instant,
}

impl RequestContext {
    pub fn new(message_id: &str) -> Self {
        let request_seq = REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst);

        let correlation_id = if message_id.is_empty() {
            format!("req-{}-{}", request_seq, Uuid::new_v4().as_simple())
        } else {
            message_id.to_string()
        };

        Self {
            correlation_id,
            request_seq,
            started_at: std::time::Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// The long-lived services handlers run against.
pub struct Services {
    pub sessions: Arc<dyn SessionStore>,
    pub policy: SingleSessionPolicy,
    pub vault: PasswordVault,
    pub accounts: AccountRepository,
    pub graph: ConnectionGraph,
}

/// Context passed to every handler: the resolved caller plus shared services.
#[derive(Clone)]
pub struct HandlerContext {
    pub caller: Caller,
    pub services: Arc<Services>,
    pub request_ctx: RequestContext,
}

impl HandlerContext {
    pub fn new(caller: Caller, services: Arc<Services>, message_id: &str) -> Self {
        Self {
            caller,
            services,
            request_ctx: RequestContext::new(message_id),
        }
    }

    /// Get log prefix for structured logging
    pub fn log_prefix(&self) -> String {
        let who = match self.caller.user_id() {
            Some(user_id) => user_id.to_string()[..8].to_string(),
            None => "anon".to_string(),
        };

        format!(
            "[req={} user={}]",
            &self.request_ctx.correlation_id[..8.min(self.request_ctx.correlation_id.len())],
            who
        )
    }
}

impl std::fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("caller", &self.caller.user_id())
            .field("correlation_id", &self.request_ctx.correlation_id)
            .finish()
    }
}
