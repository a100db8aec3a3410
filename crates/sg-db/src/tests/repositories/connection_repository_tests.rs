use crate::tests::repositories::seed_account;
use crate::{ConnectionRepository, memory_pool};

use sg_core::{Connection, ConnectionKind};

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn three_profiles(pool: &SqlitePool) -> (Uuid, Uuid, Uuid) {
    let (_, a) = seed_account(pool, "alice").await;
    let (_, b) = seed_account(pool, "bob").await;
    let (_, c) = seed_account(pool, "carol").await;
    (a.id, b.id, c.id)
}

fn follow_at(creator: Uuid, target: Uuid, at: i64) -> Connection {
    let mut connection = Connection::new(creator, target, ConnectionKind::Follow);
    connection.created_at = Utc.timestamp_opt(at, 0).unwrap();
    connection
}

#[tokio::test]
async fn given_an_edge_when_inserted_twice_then_the_second_insert_is_a_noop() {
    let pool = memory_pool().await.unwrap();
    let (a, b, _) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    let follow = Connection::new(a, b, ConnectionKind::Follow);
    assert!(repository.insert_if_absent(&follow).await.unwrap());

    let again = Connection::new(a, b, ConnectionKind::Follow);
    assert!(!repository.insert_if_absent(&again).await.unwrap());
}

#[tokio::test]
async fn given_an_edge_when_removed_then_a_second_removal_finds_nothing() {
    let pool = memory_pool().await.unwrap();
    let (a, b, _) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    let follow = Connection::new(a, b, ConnectionKind::Follow);
    repository.insert_if_absent(&follow).await.unwrap();

    assert!(repository.remove(a, b, ConnectionKind::Follow).await.unwrap());
    assert!(!repository.remove(a, b, ConnectionKind::Follow).await.unwrap());
    assert!(!repository.exists(a, b, ConnectionKind::Follow).await.unwrap());
}

#[tokio::test]
async fn given_mutual_follows_when_one_side_blocks_then_both_follows_are_severed() {
    let pool = memory_pool().await.unwrap();
    let (a, b, _) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    repository
        .insert_if_absent(&Connection::new(a, b, ConnectionKind::Follow))
        .await
        .unwrap();
    repository
        .insert_if_absent(&Connection::new(b, a, ConnectionKind::Follow))
        .await
        .unwrap();

    let block = Connection::new(a, b, ConnectionKind::Block);
    assert!(repository.block_pair(&block).await.unwrap());

    assert!(!repository.exists(a, b, ConnectionKind::Follow).await.unwrap());
    assert!(!repository.exists(b, a, ConnectionKind::Follow).await.unwrap());
    assert!(repository.block_between(a, b).await.unwrap());
    assert!(repository.block_between(b, a).await.unwrap());
}

#[tokio::test]
async fn given_an_existing_block_when_blocking_again_then_no_new_row_lands() {
    let pool = memory_pool().await.unwrap();
    let (a, b, _) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    assert!(
        repository
            .block_pair(&Connection::new(a, b, ConnectionKind::Block))
            .await
            .unwrap()
    );
    assert!(
        !repository
            .block_pair(&Connection::new(a, b, ConnectionKind::Block))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn given_a_block_when_removed_then_no_follow_reappears() {
    let pool = memory_pool().await.unwrap();
    let (a, b, _) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    repository
        .insert_if_absent(&Connection::new(a, b, ConnectionKind::Follow))
        .await
        .unwrap();
    repository
        .block_pair(&Connection::new(a, b, ConnectionKind::Block))
        .await
        .unwrap();

    assert!(repository.remove(a, b, ConnectionKind::Block).await.unwrap());
    assert!(!repository.block_between(a, b).await.unwrap());
    assert!(!repository.exists(a, b, ConnectionKind::Follow).await.unwrap());
}

#[tokio::test]
async fn given_follow_edges_when_counted_then_both_directions_tally() {
    let pool = memory_pool().await.unwrap();
    let (a, b, c) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    repository
        .insert_if_absent(&Connection::new(b, a, ConnectionKind::Follow))
        .await
        .unwrap();
    repository
        .insert_if_absent(&Connection::new(c, a, ConnectionKind::Follow))
        .await
        .unwrap();
    repository
        .insert_if_absent(&Connection::new(a, b, ConnectionKind::Follow))
        .await
        .unwrap();

    assert_eq!(repository.count_followers(a).await.unwrap(), 2);
    assert_eq!(repository.count_following(a).await.unwrap(), 1);
    assert_eq!(repository.count_followers(b).await.unwrap(), 1);
    assert_eq!(repository.count_following(c).await.unwrap(), 1);
}

#[tokio::test]
async fn given_followers_when_paged_then_rows_arrive_in_cursor_order() {
    let pool = memory_pool().await.unwrap();
    let (a, b, c) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    repository
        .insert_if_absent(&follow_at(c, a, 2_000))
        .await
        .unwrap();
    repository
        .insert_if_absent(&follow_at(b, a, 1_000))
        .await
        .unwrap();

    let page = repository.followers_page(a, None, 10).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].username, "bob");
    assert_eq!(page[1].username, "carol");
    assert!(page[0].created_at < page[1].created_at);
}

#[tokio::test]
async fn given_a_cursor_when_paging_then_only_later_rows_arrive() {
    let pool = memory_pool().await.unwrap();
    let (a, b, c) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    repository
        .insert_if_absent(&follow_at(b, a, 1_000))
        .await
        .unwrap();
    repository
        .insert_if_absent(&follow_at(c, a, 2_000))
        .await
        .unwrap();

    let first = repository.followers_page(a, None, 1).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].username, "bob");

    let cursor = (first[0].created_at, first[0].connection_id);
    let second = repository.followers_page(a, Some(cursor), 10).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].username, "carol");

    let cursor = (second[0].created_at, second[0].connection_id);
    let tail = repository.followers_page(a, Some(cursor), 10).await.unwrap();
    assert!(tail.is_empty());
}

#[tokio::test]
async fn given_following_edges_when_paged_then_the_far_side_user_is_joined() {
    let pool = memory_pool().await.unwrap();
    let (a, b, c) = three_profiles(&pool).await;
    let repository = ConnectionRepository::new(pool.clone());

    repository
        .insert_if_absent(&follow_at(a, b, 1_000))
        .await
        .unwrap();
    repository
        .insert_if_absent(&follow_at(a, c, 2_000))
        .await
        .unwrap();

    let page = repository.following_page(a, None, 10).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].username, "bob");
    assert_eq!(page[1].username, "carol");
}
