//! The request/response envelope carried over the RPC endpoint.
//!
//! Session tokens never appear in the payload itself; they travel in the
//! metadata map under the single configured key.

use crate::wire::payload::{RequestPayload, ResponsePayload};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Client-chosen correlation id, echoed back verbatim
    #[serde(default)]
    pub message_id: String,
    /// Transport metadata (session token, client hints)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub payload: Option<RequestPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub message_id: String,
    pub timestamp: i64,
    pub payload: ResponsePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
