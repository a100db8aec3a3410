mod account_repository_tests;
mod connection_repository_tests;

use crate::AccountRepository;

use sg_core::{Identity, Profile};

use sqlx::SqlitePool;

pub(crate) async fn seed_account(pool: &SqlitePool, username: &str) -> (Identity, Profile) {
    let identity = Identity::new(
        username.to_string(),
        format!("{username}@example.com"),
        "$argon2id$fake-hash".to_string(),
    );

    let profile = AccountRepository::new(pool.clone())
        .create_account(&identity)
        .await
        .unwrap();

    (identity, profile)
}
