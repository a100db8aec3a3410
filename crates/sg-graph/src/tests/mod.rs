mod connection_graph;

use crate::ConnectionGraph;

use sg_core::Identity;
use sg_db::{AccountRepository, ConnectionRepository, memory_pool};

use std::sync::Arc;

use uuid::Uuid;

const NAMES: [&str; 4] = ["alice", "bob", "carol", "dave"];

pub(crate) async fn graph_with_profiles(count: usize) -> (Arc<ConnectionGraph>, Vec<Uuid>) {
    let pool = memory_pool().await.unwrap();
    let accounts = AccountRepository::new(pool.clone());

    let mut profiles = Vec::new();
    for name in NAMES.iter().take(count) {
        let identity = Identity::new(
            (*name).to_string(),
            format!("{name}@example.com"),
            "$argon2id$fake-hash".to_string(),
        );
        let profile = accounts.create_account(&identity).await.unwrap();
        profiles.push(profile.id);
    }

    let graph = ConnectionGraph::new(
        AccountRepository::new(pool.clone()),
        ConnectionRepository::new(pool),
        50,
        500,
    );

    (Arc::new(graph), profiles)
}
