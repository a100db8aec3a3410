pub mod app_state;
pub mod error;
pub mod handlers;
pub mod health;
pub mod logger;
pub mod routes;
pub mod wire;

#[cfg(test)]
mod tests;

pub use app_state::AppState;
pub use error::{Result, ServerError};
pub use handlers::{HandlerContext, RequestContext, RpcDispatcher, RpcError, Services};
pub use routes::build_router;
