use crate::handlers::RpcDispatcher;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<RpcDispatcher>,
}
