use crate::tests::graph_with_profiles;
use crate::{GraphError, PageCursor};

use std::sync::Arc;

use uuid::Uuid;

#[tokio::test]
async fn given_two_profiles_when_one_follows_then_repeating_is_a_noop() {
    let (graph, p) = graph_with_profiles(2).await;

    assert!(graph.follow(p[0], p[1]).await.unwrap());
    assert!(!graph.follow(p[0], p[1]).await.unwrap());
    assert_eq!(graph.count_followers(p[1]).await.unwrap(), 1);

    assert!(graph.is_following(p[0], p[1]).await.unwrap());
    assert!(!graph.is_following(p[1], p[0]).await.unwrap());
}

#[tokio::test]
async fn given_a_profile_when_it_follows_itself_then_the_edge_is_rejected() {
    let (graph, p) = graph_with_profiles(1).await;

    let result = graph.follow(p[0], p[0]).await;
    assert!(matches!(result, Err(GraphError::SelfReference { .. })));

    let result = graph.block(p[0], p[0]).await;
    assert!(matches!(result, Err(GraphError::SelfReference { .. })));
}

#[tokio::test]
async fn given_an_unknown_target_when_followed_then_the_profile_is_not_found() {
    let (graph, p) = graph_with_profiles(1).await;

    let result = graph.follow(p[0], Uuid::new_v4()).await;
    assert!(matches!(result, Err(GraphError::ProfileNotFound { .. })));
}

#[tokio::test]
async fn given_no_follow_when_unfollowed_then_the_call_succeeds_without_removal() {
    let (graph, p) = graph_with_profiles(2).await;

    assert!(!graph.unfollow(p[0], p[1]).await.unwrap());
}

#[tokio::test]
async fn given_mutual_follows_when_one_side_blocks_then_both_follows_vanish() {
    let (graph, p) = graph_with_profiles(2).await;

    graph.follow(p[0], p[1]).await.unwrap();
    graph.follow(p[1], p[0]).await.unwrap();

    assert!(graph.block(p[0], p[1]).await.unwrap());

    assert!(!graph.is_following(p[0], p[1]).await.unwrap());
    assert!(!graph.is_following(p[1], p[0]).await.unwrap());
    assert_eq!(graph.count_followers(p[0]).await.unwrap(), 0);
    assert_eq!(graph.count_followers(p[1]).await.unwrap(), 0);
    assert_eq!(graph.count_following(p[0]).await.unwrap(), 0);
    assert_eq!(graph.count_following(p[1]).await.unwrap(), 0);
}

#[tokio::test]
async fn given_a_one_sided_block_when_inspected_then_only_the_creator_is_blocking() {
    let (graph, p) = graph_with_profiles(2).await;

    graph.block(p[0], p[1]).await.unwrap();

    assert!(graph.is_blocking(p[0], p[1]).await.unwrap());
    assert!(!graph.is_blocking(p[1], p[0]).await.unwrap());
}

#[tokio::test]
async fn given_a_block_when_either_side_follows_then_the_follow_is_rejected() {
    let (graph, p) = graph_with_profiles(2).await;

    graph.block(p[0], p[1]).await.unwrap();

    let blocked_side = graph.follow(p[0], p[1]).await;
    assert!(matches!(blocked_side, Err(GraphError::Blocked { .. })));

    let blocked_target = graph.follow(p[1], p[0]).await;
    assert!(matches!(blocked_target, Err(GraphError::Blocked { .. })));
}

#[tokio::test]
async fn given_a_lifted_block_when_inspected_then_severed_follows_stay_gone() {
    let (graph, p) = graph_with_profiles(2).await;

    graph.follow(p[0], p[1]).await.unwrap();
    graph.block(p[1], p[0]).await.unwrap();
    assert!(graph.unblock(p[1], p[0]).await.unwrap());

    assert_eq!(graph.count_following(p[0]).await.unwrap(), 0);

    // The pair can follow again now
    assert!(graph.follow(p[0], p[1]).await.unwrap());
}

#[tokio::test]
async fn given_no_block_when_unblocked_then_the_call_succeeds_without_removal() {
    let (graph, p) = graph_with_profiles(2).await;

    assert!(!graph.unblock(p[0], p[1]).await.unwrap());
}

#[tokio::test]
async fn given_blocks_from_both_sides_when_one_is_lifted_then_the_other_still_guards() {
    let (graph, p) = graph_with_profiles(2).await;

    graph.block(p[0], p[1]).await.unwrap();
    graph.block(p[1], p[0]).await.unwrap();
    graph.unblock(p[0], p[1]).await.unwrap();

    let result = graph.follow(p[0], p[1]).await;
    assert!(matches!(result, Err(GraphError::Blocked { .. })));
}

#[tokio::test]
async fn given_racing_follow_and_block_when_settled_then_no_follow_survives_the_block() {
    let (graph, p) = graph_with_profiles(2).await;
    let (a, b) = (p[0], p[1]);

    let follower = {
        let graph = Arc::clone(&graph);
        tokio::spawn(async move { graph.follow(b, a).await })
    };
    let blocker = {
        let graph = Arc::clone(&graph);
        tokio::spawn(async move { graph.block(a, b).await })
    };

    // The follow either lands before the block severs it, or is rejected
    let follow_result = follower.await.unwrap();
    assert!(matches!(
        follow_result,
        Ok(true) | Err(GraphError::Blocked { .. })
    ));
    assert!(blocker.await.unwrap().unwrap());

    assert_eq!(graph.count_followers(a).await.unwrap(), 0);
    assert_eq!(graph.count_following(b).await.unwrap(), 0);
}

#[tokio::test]
async fn given_many_followers_when_paged_then_cursors_walk_the_full_list_once() {
    let (graph, p) = graph_with_profiles(4).await;

    for follower in &p[1..] {
        graph.follow(*follower, p[0]).await.unwrap();
    }

    let first = graph.followers(p[0], None, Some(2)).await.unwrap();
    assert_eq!(first.entries.len(), 2);
    let cursor = first.next_cursor.expect("more pages expected");

    let second = graph.followers(p[0], Some(cursor), Some(2)).await.unwrap();
    assert_eq!(second.entries.len(), 1);
    assert!(second.next_cursor.is_none());

    let mut seen: Vec<Uuid> = first
        .entries
        .iter()
        .chain(second.entries.iter())
        .map(|row| row.user_id)
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn given_an_exact_page_when_listed_then_no_next_cursor_is_offered() {
    let (graph, p) = graph_with_profiles(3).await;

    graph.follow(p[1], p[0]).await.unwrap();
    graph.follow(p[2], p[0]).await.unwrap();

    let page = graph.followers(p[0], None, Some(2)).await.unwrap();
    assert_eq!(page.entries.len(), 2);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn given_a_following_list_when_paged_then_targets_are_reported() {
    let (graph, p) = graph_with_profiles(3).await;

    graph.follow(p[0], p[1]).await.unwrap();
    graph.follow(p[0], p[2]).await.unwrap();

    let page = graph.following(p[0], None, None).await.unwrap();
    assert_eq!(page.entries.len(), 2);
    assert!(page.entries.iter().all(|row| row.user_id != Uuid::nil()));
}

#[tokio::test]
async fn given_an_unknown_profile_when_listing_followers_then_it_is_not_found() {
    let (graph, _) = graph_with_profiles(1).await;

    let result = graph.followers(Uuid::new_v4(), None, None).await;
    assert!(matches!(result, Err(GraphError::ProfileNotFound { .. })));
}

#[tokio::test]
async fn given_a_cursor_when_reused_then_rows_before_it_never_reappear() {
    let (graph, p) = graph_with_profiles(4).await;

    for follower in &p[1..] {
        graph.follow(*follower, p[0]).await.unwrap();
    }

    let first = graph.followers(p[0], None, Some(1)).await.unwrap();
    let cursor: PageCursor = first.next_cursor.unwrap();

    let rest = graph.followers(p[0], Some(cursor), Some(10)).await.unwrap();
    let first_user = first.entries[0].user_id;
    assert!(rest.entries.iter().all(|row| row.user_id != first_user));
}
