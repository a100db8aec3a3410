use crate::tests::repositories::seed_account;
use crate::{AccountRepository, DbError, memory_pool};

use sg_core::Identity;

use uuid::Uuid;

#[tokio::test]
async fn given_a_new_account_when_created_then_identity_and_profile_are_readable() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    let (identity, profile) = seed_account(&pool, "alice").await;

    let found = repository
        .find_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, identity);

    let stored = repository.profile_of(identity.id).await.unwrap().unwrap();
    assert_eq!(stored, profile);

    let status = repository
        .status_of(profile.status_id)
        .await
        .unwrap()
        .unwrap();
    assert!(status.can_login);
}

#[tokio::test]
async fn given_two_accounts_when_created_then_they_share_the_active_status() {
    let pool = memory_pool().await.unwrap();

    let (_, first) = seed_account(&pool, "alice").await;
    let (_, second) = seed_account(&pool, "bob").await;

    assert_eq!(first.status_id, second.status_id);
}

#[tokio::test]
async fn given_a_taken_username_when_an_account_is_created_then_it_violates_uniqueness() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    seed_account(&pool, "alice").await;

    let duplicate = Identity::new(
        "alice".to_string(),
        "other@example.com".to_string(),
        "$argon2id$fake-hash".to_string(),
    );
    let result = repository.create_account(&duplicate).await;

    assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
}

#[tokio::test]
async fn given_a_taken_email_when_an_account_is_created_then_it_violates_uniqueness() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    seed_account(&pool, "alice").await;

    let duplicate = Identity::new(
        "alice2".to_string(),
        "alice@example.com".to_string(),
        "$argon2id$fake-hash".to_string(),
    );
    let result = repository.create_account(&duplicate).await;

    assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
}

#[tokio::test]
async fn given_existing_accounts_when_availability_is_probed_then_it_reflects_the_table() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    seed_account(&pool, "alice").await;

    assert!(repository.username_exists("alice").await.unwrap());
    assert!(!repository.username_exists("bob").await.unwrap());
    assert!(repository.email_exists("alice@example.com").await.unwrap());
    assert!(!repository.email_exists("bob@example.com").await.unwrap());
}

#[tokio::test]
async fn given_an_account_when_renamed_then_the_new_username_resolves() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    let (identity, _) = seed_account(&pool, "alice").await;

    assert!(repository.rename(identity.id, "alicia").await.unwrap());
    assert!(repository.find_by_username("alice").await.unwrap().is_none());
    assert!(
        repository
            .find_by_username("alicia")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn given_a_taken_username_when_renaming_then_it_violates_uniqueness() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    let (alice, _) = seed_account(&pool, "alice").await;
    seed_account(&pool, "bob").await;

    let result = repository.rename(alice.id, "bob").await;
    assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
}

#[tokio::test]
async fn given_a_profile_update_when_a_field_is_none_then_the_stored_value_survives() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    let (_, profile) = seed_account(&pool, "alice").await;

    repository
        .update_profile(profile.id, Some("Alice Liddell"), Some("Curiouser"), None)
        .await
        .unwrap();
    repository
        .update_profile(profile.id, None, None, Some("avatar-7"))
        .await
        .unwrap();

    let stored = repository.find_profile(profile.id).await.unwrap().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("Alice Liddell"));
    assert_eq!(stored.bio.as_deref(), Some("Curiouser"));
    assert_eq!(stored.avatar.as_deref(), Some("avatar-7"));
}

#[tokio::test]
async fn given_an_unknown_profile_when_updated_then_no_row_is_touched() {
    let pool = memory_pool().await.unwrap();
    let repository = AccountRepository::new(pool.clone());

    let touched = repository
        .update_profile(Uuid::new_v4(), Some("Nobody"), None, None)
        .await
        .unwrap();
    assert!(!touched);
}
