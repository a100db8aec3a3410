//! Pool construction and schema migration.

use crate::{DbError, Result as DbErrorResult};

use std::panic::Location;
use std::path::Path;
use std::str::FromStr;

use error_location::ErrorLocation;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

const MAX_CONNECTIONS: u32 = 5;

/// Open (creating if missing) the SQLite database at `path` and run
/// pending migrations.
pub async fn connect(path: &Path) -> DbErrorResult<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    Ok(pool)
}

/// A fresh in-memory database with the full schema. Test support.
pub async fn memory_pool() -> DbErrorResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(DbError::from)?
        .foreign_keys(true);

    // One connection: each new in-memory connection is a blank database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> DbErrorResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::Migration {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
