use crate::wire::{ErrorBody, ResponsePayload, RpcResponse};

pub fn build_response(message_id: &str, payload: ResponsePayload) -> RpcResponse {
    RpcResponse {
        message_id: message_id.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        payload,
    }
}

pub fn build_error_response(message_id: &str, error: ErrorBody) -> RpcResponse {
    build_response(message_id, ResponsePayload::Error(error))
}
