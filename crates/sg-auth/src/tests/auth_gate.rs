use crate::{AuthError, AuthGate, Caller, GatePolicy, MemorySessionStore, SessionStore};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

const TOKEN_KEY: &str = "session-token";

fn gate(store: Arc<MemorySessionStore>) -> AuthGate {
    AuthGate::new(
        store,
        GatePolicy {
            token_metadata_key: TOKEN_KEY.to_string(),
            allow_list: vec!["signup".to_string(), "login".to_string()],
        },
    )
}

fn metadata_with(token: &str) -> HashMap<String, String> {
    HashMap::from([(TOKEN_KEY.to_string(), token.to_string())])
}

#[tokio::test]
async fn given_no_token_when_the_method_is_allow_listed_then_the_caller_is_anonymous() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let gate = gate(store);

    let caller = gate.authenticate("signup", &HashMap::new()).await.unwrap();
    assert_eq!(caller, Caller::Anonymous);
}

#[tokio::test]
async fn given_no_token_when_the_method_is_protected_then_the_gate_rejects() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let gate = gate(store);

    let result = gate.authenticate("follow", &HashMap::new()).await;
    assert!(matches!(result, Err(AuthError::MissingToken { .. })));
}

#[tokio::test]
async fn given_an_unknown_token_when_the_method_is_protected_then_the_gate_rejects() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let gate = gate(store);

    let result = gate.authenticate("follow", &metadata_with("bogus")).await;
    assert!(matches!(result, Err(AuthError::Unauthenticated { .. })));
}

#[tokio::test]
async fn given_an_unknown_token_when_the_method_is_allow_listed_then_the_caller_is_anonymous() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let gate = gate(store);

    let caller = gate
        .authenticate("login", &metadata_with("bogus"))
        .await
        .unwrap();
    assert_eq!(caller, Caller::Anonymous);
}

#[tokio::test]
async fn given_a_valid_session_when_authenticated_then_the_caller_carries_the_subject() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let subject = Uuid::new_v4();
    let token = store.begin_for_subject(subject).await.unwrap();
    let gate = gate(store);

    let caller = gate
        .authenticate("follow", &metadata_with(&token))
        .await
        .unwrap();
    assert_eq!(caller.user_id(), Some(subject));
    assert_eq!(caller.token(), Some(token.as_str()));
}

#[tokio::test]
async fn given_a_stale_session_when_authenticated_then_it_is_deleted_and_rejected() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let token = store.create(Some(Uuid::new_v4()), false).await.unwrap();
    let gate = gate(Arc::clone(&store));

    let result = gate.authenticate("follow", &metadata_with(&token)).await;
    assert!(matches!(result, Err(AuthError::Unauthenticated { .. })));

    // The stale record is gone, not just rejected
    assert!(store.get(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn given_a_valid_session_when_authenticated_then_last_seen_is_refreshed() {
    let store = MemorySessionStore::new(Duration::from_secs(600), Duration::from_secs(30));
    let subject = Uuid::new_v4();
    let token = store.begin_for_subject(subject).await.unwrap();

    let before = store.get(&token).await.unwrap().unwrap().last_seen;
    tokio::time::sleep(Duration::from_millis(30)).await;

    let gate = gate(Arc::clone(&store));
    gate.authenticate("follow", &metadata_with(&token))
        .await
        .unwrap();

    let after = store.get(&token).await.unwrap().unwrap().last_seen;
    assert!(after > before);
}
