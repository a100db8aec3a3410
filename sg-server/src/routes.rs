use crate::app_state::AppState;
use crate::health;
use crate::wire::{RpcRequest, RpcResponse};

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState, max_concurrent_calls: usize) -> Router {
    Router::new()
        // RPC endpoint
        .route("/rpc", post(rpc))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        // Add shared state
        .with_state(state)
        // Bound in-flight handler work; excess calls queue on the semaphore
        .layer(ConcurrencyLimitLayer::new(max_concurrent_calls))
        // CORS middleware (allow all origins)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn rpc(State(state): State<AppState>, Json(request): Json<RpcRequest>) -> Json<RpcResponse> {
    Json(state.dispatcher.dispatch(request).await)
}
