//! Connection repository: the follow/block edge table.
//!
//! The UNIQUE (creator, target, kind) index is the source of truth for
//! edge uniqueness; idempotent writes go through INSERT OR IGNORE and
//! report whether a row actually landed.

use crate::Result as DbErrorResult;
use crate::repositories::parse_uuid;

use sg_core::{Connection, ConnectionKind};

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

/// One page row: the edge's cursor fields plus the user on its far side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPageRow {
    pub connection_id: Uuid,
    pub created_at: i64,
    pub user_id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
}

pub struct ConnectionRepository {
    pool: SqlitePool,
}

impl ConnectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the edge unless an equal (creator, target, kind) edge exists.
    /// Returns whether a row was inserted.
    pub async fn insert_if_absent(&self, connection: &Connection) -> DbErrorResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO sg_connections \
                (id, creator_profile, target_profile, kind, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(connection.id.to_string())
        .bind(connection.creator_profile.to_string())
        .bind(connection.target_profile.to_string())
        .bind(connection.kind.as_str())
        .bind(connection.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns whether an edge was removed.
    pub async fn remove(
        &self,
        creator: Uuid,
        target: Uuid,
        kind: ConnectionKind,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query(
            "DELETE FROM sg_connections \
             WHERE creator_profile = ? AND target_profile = ? AND kind = ?",
        )
        .bind(creator.to_string())
        .bind(target.to_string())
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(
        &self,
        creator: Uuid,
        target: Uuid,
        kind: ConnectionKind,
    ) -> DbErrorResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM sg_connections \
             WHERE creator_profile = ? AND target_profile = ? AND kind = ?",
        )
        .bind(creator.to_string())
        .bind(target.to_string())
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Whether a block exists between the pair, in either direction.
    pub async fn block_between(&self, a: Uuid, b: Uuid) -> DbErrorResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM sg_connections \
             WHERE kind = ?1 \
               AND ((creator_profile = ?2 AND target_profile = ?3) \
                 OR (creator_profile = ?3 AND target_profile = ?2))",
        )
        .bind(ConnectionKind::Block.as_str())
        .bind(a.to_string())
        .bind(b.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Install a block and sever any follows between the pair, both
    /// directions, in one transaction. Returns whether the block row was
    /// inserted (false when the same directed block already existed; the
    /// follow cleanup still runs).
    pub async fn block_pair(&self, block: &Connection) -> DbErrorResult<bool> {
        let creator = block.creator_profile.to_string();
        let target = block.target_profile.to_string();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM sg_connections \
             WHERE kind = ?1 \
               AND ((creator_profile = ?2 AND target_profile = ?3) \
                 OR (creator_profile = ?3 AND target_profile = ?2))",
        )
        .bind(ConnectionKind::Follow.as_str())
        .bind(&creator)
        .bind(&target)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO sg_connections \
                (id, creator_profile, target_profile, kind, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(block.id.to_string())
        .bind(&creator)
        .bind(&target)
        .bind(ConnectionKind::Block.as_str())
        .bind(block.created_at.timestamp())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_followers(&self, profile: Uuid) -> DbErrorResult<u64> {
        self.count_edges("target_profile", profile).await
    }

    pub async fn count_following(&self, profile: Uuid) -> DbErrorResult<u64> {
        self.count_edges("creator_profile", profile).await
    }

    async fn count_edges(&self, side: &str, profile: Uuid) -> DbErrorResult<u64> {
        let sql =
            format!("SELECT COUNT(*) AS n FROM sg_connections WHERE kind = ? AND {side} = ?");

        let row = sqlx::query(&sql)
            .bind(ConnectionKind::Follow.as_str())
            .bind(profile.to_string())
            .fetch_one(&self.pool)
            .await?;

        let n: i64 = row.try_get("n")?;
        Ok(n as u64)
    }

    /// Followers of `profile`: follow edges pointing at it, joined to the
    /// follower's user record, in (created_at, id) ascending order.
    pub async fn followers_page(
        &self,
        profile: Uuid,
        after: Option<(i64, Uuid)>,
        limit: u32,
    ) -> DbErrorResult<Vec<ConnectionPageRow>> {
        self.page(profile, after, limit, "target_profile", "creator_profile")
            .await
    }

    /// Accounts `profile` follows, same ordering contract as `followers_page`.
    pub async fn following_page(
        &self,
        profile: Uuid,
        after: Option<(i64, Uuid)>,
        limit: u32,
    ) -> DbErrorResult<Vec<ConnectionPageRow>> {
        self.page(profile, after, limit, "creator_profile", "target_profile")
            .await
    }

    async fn page(
        &self,
        profile: Uuid,
        after: Option<(i64, Uuid)>,
        limit: u32,
        anchor_side: &str,
        joined_side: &str,
    ) -> DbErrorResult<Vec<ConnectionPageRow>> {
        let cursor_predicate = if after.is_some() {
            "AND (c.created_at > ?3 OR (c.created_at = ?3 AND c.id > ?4))"
        } else {
            ""
        };

        let sql = format!(
            "SELECT c.id AS connection_id, c.created_at, \
                    u.id AS user_id, u.username, p.full_name \
             FROM sg_connections c \
             JOIN sg_profiles p ON p.id = c.{joined_side} \
             JOIN sg_users u ON u.id = p.user_id \
             WHERE c.kind = ?1 AND c.{anchor_side} = ?2 {cursor_predicate} \
             ORDER BY c.created_at ASC, c.id ASC \
             LIMIT {limit}"
        );

        let mut query = sqlx::query(&sql)
            .bind(ConnectionKind::Follow.as_str())
            .bind(profile.to_string());

        if let Some((created_at, connection_id)) = after {
            query = query.bind(created_at).bind(connection_id.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter().map(decode_page_row).collect()
    }
}

fn decode_page_row(row: SqliteRow) -> DbErrorResult<ConnectionPageRow> {
    Ok(ConnectionPageRow {
        connection_id: parse_uuid(
            row.try_get::<String, _>("connection_id")?.as_str(),
            "connection.id",
        )?,
        created_at: row.try_get("created_at")?,
        user_id: parse_uuid(row.try_get::<String, _>("user_id")?.as_str(), "user.id")?,
        username: row.try_get("username")?,
        full_name: row.try_get("full_name")?,
    })
}
