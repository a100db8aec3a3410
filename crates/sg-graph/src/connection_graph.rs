//! The social graph service: follow/block semantics over the edge table.
//!
//! Mutations hold the pair lock for the two profiles involved, so the
//! blocked-pair check and the write it guards cannot interleave with a
//! concurrent block on the same pair.

use crate::pair_locks::PairLocks;
use crate::{GraphError, Result as GraphErrorResult};

use sg_core::{Connection, ConnectionKind};
use sg_db::{AccountRepository, ConnectionPageRow, ConnectionRepository};

use std::panic::Location;

use error_location::ErrorLocation;
use log::{debug, info};
use uuid::Uuid;

/// Resumption point in a follower/following listing. Encodes the sort key
/// of the last row the caller has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub created_at: i64,
    pub connection_id: Uuid,
}

#[derive(Debug)]
pub struct ConnectionPage {
    pub entries: Vec<ConnectionPageRow>,
    pub next_cursor: Option<PageCursor>,
}

pub struct ConnectionGraph {
    accounts: AccountRepository,
    connections: ConnectionRepository,
    locks: PairLocks,
    default_page_size: u32,
    max_page_size: u32,
}

impl ConnectionGraph {
    pub fn new(
        accounts: AccountRepository,
        connections: ConnectionRepository,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Self {
        Self {
            accounts,
            connections,
            locks: PairLocks::new(),
            default_page_size,
            max_page_size,
        }
    }

    /// Create a follow edge. Idempotent: returns false when the edge
    /// already existed. Rejected while a block exists between the pair,
    /// whichever side created it.
    pub async fn follow(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<bool> {
        self.reject_self_reference(creator, target)?;
        self.require_profile(target).await?;

        let _guard = self.locks.acquire(creator, target).await;

        if self.connections.block_between(creator, target).await? {
            debug!("Refusing follow {creator} -> {target}: pair is blocked");
            return Err(GraphError::Blocked {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let inserted = self
            .connections
            .insert_if_absent(&Connection::new(creator, target, ConnectionKind::Follow))
            .await?;

        if inserted {
            info!("Follow created: {creator} -> {target}");
        }
        Ok(inserted)
    }

    /// Remove a follow edge. Idempotent: returns false when there was
    /// nothing to remove.
    pub async fn unfollow(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<bool> {
        self.reject_self_reference(creator, target)?;

        let _guard = self.locks.acquire(creator, target).await;

        let removed = self
            .connections
            .remove(creator, target, ConnectionKind::Follow)
            .await?;
        Ok(removed)
    }

    /// Install a block and sever follows between the pair in both
    /// directions, atomically. Idempotent: returns false when this
    /// directed block already existed.
    pub async fn block(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<bool> {
        self.reject_self_reference(creator, target)?;
        self.require_profile(target).await?;

        let _guard = self.locks.acquire(creator, target).await;

        let installed = self
            .connections
            .block_pair(&Connection::new(creator, target, ConnectionKind::Block))
            .await?;

        if installed {
            info!("Block installed: {creator} -> {target}");
        }
        Ok(installed)
    }

    /// Remove the caller's directed block. Follows severed by the block
    /// are not restored. Idempotent.
    pub async fn unblock(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<bool> {
        self.reject_self_reference(creator, target)?;

        let _guard = self.locks.acquire(creator, target).await;

        let removed = self
            .connections
            .remove(creator, target, ConnectionKind::Block)
            .await?;
        Ok(removed)
    }

    /// Lock-free read against the latest committed state.
    pub async fn is_following(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<bool> {
        Ok(self
            .connections
            .exists(creator, target, ConnectionKind::Follow)
            .await?)
    }

    /// Lock-free read against the latest committed state.
    pub async fn is_blocking(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<bool> {
        Ok(self
            .connections
            .exists(creator, target, ConnectionKind::Block)
            .await?)
    }

    pub async fn count_followers(&self, profile: Uuid) -> GraphErrorResult<u64> {
        Ok(self.connections.count_followers(profile).await?)
    }

    pub async fn count_following(&self, profile: Uuid) -> GraphErrorResult<u64> {
        Ok(self.connections.count_following(profile).await?)
    }

    /// List followers of `profile`, oldest edge first.
    pub async fn followers(
        &self,
        profile: Uuid,
        after: Option<PageCursor>,
        page_size: Option<u32>,
    ) -> GraphErrorResult<ConnectionPage> {
        self.require_profile(profile).await?;
        let limit = self.effective_page_size(page_size);

        let rows = self
            .connections
            .followers_page(profile, after.map(|c| (c.created_at, c.connection_id)), limit + 1)
            .await?;

        Ok(Self::to_page(rows, limit))
    }

    /// List profiles `profile` follows, oldest edge first.
    pub async fn following(
        &self,
        profile: Uuid,
        after: Option<PageCursor>,
        page_size: Option<u32>,
    ) -> GraphErrorResult<ConnectionPage> {
        self.require_profile(profile).await?;
        let limit = self.effective_page_size(page_size);

        let rows = self
            .connections
            .following_page(profile, after.map(|c| (c.created_at, c.connection_id)), limit + 1)
            .await?;

        Ok(Self::to_page(rows, limit))
    }

    fn effective_page_size(&self, requested: Option<u32>) -> u32 {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(n) => n.min(self.max_page_size),
        }
    }

    /// Fetched one row past the limit; its presence means there is more.
    fn to_page(mut rows: Vec<ConnectionPageRow>, limit: u32) -> ConnectionPage {
        let next_cursor = if rows.len() > limit as usize {
            rows.truncate(limit as usize);
            rows.last().map(|row| PageCursor {
                created_at: row.created_at,
                connection_id: row.connection_id,
            })
        } else {
            None
        };

        ConnectionPage {
            entries: rows,
            next_cursor,
        }
    }

    #[track_caller]
    fn reject_self_reference(&self, creator: Uuid, target: Uuid) -> GraphErrorResult<()> {
        if creator == target {
            return Err(GraphError::SelfReference {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    async fn require_profile(&self, profile: Uuid) -> GraphErrorResult<()> {
        if self.accounts.find_profile(profile).await?.is_none() {
            return Err(GraphError::ProfileNotFound {
                profile_id: profile,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
