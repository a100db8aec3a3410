
use crate::handlers::{RpcDispatcher, Services};
use crate::wire::{
    AckBody, ConnectionsBody, ErrorBody, RequestPayload, ResponsePayload, RpcRequest, RpcResponse,
    SessionBody, UserBody,
};

use sg_auth::{AuthGate, GatePolicy, MemorySessionStore, PasswordVault, SessionStore,
    SingleSessionPolicy};
use sg_db::{AccountRepository, ConnectionRepository, memory_pool};
use sg_graph::ConnectionGraph;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const TOKEN_KEY: &str = "session-token";

pub(crate) async fn test_dispatcher() -> RpcDispatcher {
    let pool = memory_pool().await.unwrap();

    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(60));

    let gate = AuthGate::new(
        Arc::clone(&store) as Arc<dyn SessionStore>,
        GatePolicy {
            token_metadata_key: TOKEN_KEY.to_string(),
            allow_list: vec![
                "signup".to_string(),
                "login".to_string(),
                "is_username_available".to_string(),
                "is_email_available".to_string(),
            ],
        },
    );

    let services = Arc::new(Services {
        sessions: Arc::clone(&store) as Arc<dyn SessionStore>,
        policy: SingleSessionPolicy::new(store as Arc<dyn SessionStore>),
        vault: PasswordVault,
        accounts: AccountRepository::new(pool.clone()),
        graph: ConnectionGraph::new(
            AccountRepository::new(pool.clone()),
            ConnectionRepository::new(pool),
            50,
            500,
        ),
    });

    RpcDispatcher::new(gate, services, Duration::from_secs(5))
}

pub(crate) fn request(payload: RequestPayload, token: Option<&str>) -> RpcRequest {
    let mut metadata = HashMap::new();
    if let Some(token) = token {
        metadata.insert(TOKEN_KEY.to_string(), token.to_string());
    }

    RpcRequest {
        message_id: "msg-1".to_string(),
        metadata,
        payload: Some(payload),
    }
}

pub(crate) fn expect_session(response: RpcResponse) -> SessionBody {
    match response.payload {
        ResponsePayload::Session(body) => body,
        other => panic!("expected session payload, got {other:?}"),
    }
}

pub(crate) fn expect_ack(response: RpcResponse) -> AckBody {
    match response.payload {
        ResponsePayload::Ack(body) => body,
        other => panic!("expected ack payload, got {other:?}"),
    }
}

pub(crate) fn expect_user(response: RpcResponse) -> UserBody {
    match response.payload {
        ResponsePayload::User(body) => body,
        other => panic!("expected user payload, got {other:?}"),
    }
}

pub(crate) fn expect_connections(response: RpcResponse) -> ConnectionsBody {
    match response.payload {
        ResponsePayload::Connections(body) => body,
        other => panic!("expected connections payload, got {other:?}"),
    }
}

pub(crate) fn expect_error(response: RpcResponse) -> ErrorBody {
    match response.payload {
        ResponsePayload::Error(body) => body,
        other => panic!("expected error payload, got {other:?}"),
    }
}

/// Sign up a user and return their session token.
pub(crate) async fn signup(dispatcher: &RpcDispatcher, username: &str) -> String {
    let response = dispatcher
        .dispatch(request(
            RequestPayload::Signup(crate::wire::SignupRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hunter2!".to_string(),
            }),
            None,
        ))
        .await;

    expect_session(response).session_token
}
