pub mod account;
pub mod connection;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod profile;
pub mod response_builder;

pub use context::{HandlerContext, RequestContext, Services};
pub use dispatcher::RpcDispatcher;
pub use error::{Result as RpcResult, RpcError};
pub use response_builder::{build_error_response, build_response};

use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

/// The caller's user id; anonymous callers are rejected.
#[track_caller]
pub(crate) fn require_user(ctx: &HandlerContext) -> RpcResult<Uuid> {
    ctx.caller.user_id().ok_or_else(|| RpcError::Unauthenticated {
        message: "This method requires a logged-in session".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
