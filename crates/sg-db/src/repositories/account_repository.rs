//! Account repository: identities, their 1:1 profiles, and status records.

use crate::Result as DbErrorResult;
use crate::repositories::{parse_timestamp, parse_uuid};

use sg_core::{ACTIVE_STATUS_LABEL, Identity, Profile, Status};

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the identity and its profile in one transaction. The ACTIVE
    /// status record is looked-up-or-created inside the same transaction.
    ///
    /// A lost race on username/email surfaces as `DbError::UniqueViolation`.
    pub async fn create_account(&self, identity: &Identity) -> DbErrorResult<Profile> {
        let mut tx = self.pool.begin().await?;

        let status_id = match sqlx::query("SELECT id FROM sg_statuses WHERE label = ?")
            .bind(ACTIVE_STATUS_LABEL)
            .fetch_optional(&mut *tx)
            .await?
        {
            Some(row) => parse_uuid(row.try_get::<String, _>("id")?.as_str(), "status.id")?,
            None => {
                let status = Status::active();
                sqlx::query(
                    "INSERT INTO sg_statuses (id, label, description, can_login) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(status.id.to_string())
                .bind(&status.label)
                .bind(&status.description)
                .bind(status.can_login)
                .execute(&mut *tx)
                .await?;
                status.id
            }
        };

        sqlx::query(
            "INSERT INTO sg_users (id, username, email, password_hash, active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(identity.id.to_string())
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(identity.active)
        .bind(identity.created_at.timestamp())
        .execute(&mut *tx)
        .await?;

        let profile = Profile::new(identity.id, status_id);
        sqlx::query(
            "INSERT INTO sg_profiles (id, user_id, full_name, bio, status_id, avatar) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(profile.id.to_string())
        .bind(profile.user_id.to_string())
        .bind(&profile.full_name)
        .bind(&profile.bio)
        .bind(profile.status_id.to_string())
        .bind(&profile.avatar)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(profile)
    }

    pub async fn find_by_username(&self, username: &str) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, active, created_at \
             FROM sg_users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_identity).transpose()
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, active, created_at \
             FROM sg_users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_identity).transpose()
    }

    pub async fn username_exists(&self, username: &str) -> DbErrorResult<bool> {
        let row = sqlx::query("SELECT 1 FROM sg_users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    pub async fn email_exists(&self, email: &str) -> DbErrorResult<bool> {
        let row = sqlx::query("SELECT 1 FROM sg_users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Rename an account. A taken username surfaces as `UniqueViolation`.
    pub async fn rename(&self, id: Uuid, username: &str) -> DbErrorResult<bool> {
        let result = sqlx::query("UPDATE sg_users SET username = ? WHERE id = ?")
            .bind(username)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn profile_of(&self, user_id: Uuid) -> DbErrorResult<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, user_id, full_name, bio, status_id, avatar \
             FROM sg_profiles WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_profile).transpose()
    }

    pub async fn find_profile(&self, id: Uuid) -> DbErrorResult<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, user_id, full_name, bio, status_id, avatar \
             FROM sg_profiles WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_profile).transpose()
    }

    /// Overwrite profile fields; a `None` leaves the stored value untouched.
    pub async fn update_profile(
        &self,
        profile_id: Uuid,
        full_name: Option<&str>,
        bio: Option<&str>,
        avatar: Option<&str>,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query(
            "UPDATE sg_profiles SET \
                full_name = COALESCE(?, full_name), \
                bio = COALESCE(?, bio), \
                avatar = COALESCE(?, avatar) \
             WHERE id = ?",
        )
        .bind(full_name)
        .bind(bio)
        .bind(avatar)
        .bind(profile_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn status_of(&self, status_id: Uuid) -> DbErrorResult<Option<Status>> {
        let row = sqlx::query(
            "SELECT id, label, description, can_login FROM sg_statuses WHERE id = ?",
        )
        .bind(status_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> DbErrorResult<Status> {
            Ok(Status {
                id: parse_uuid(r.try_get::<String, _>("id")?.as_str(), "status.id")?,
                label: r.try_get("label")?,
                description: r.try_get("description")?,
                can_login: r.try_get("can_login")?,
            })
        })
        .transpose()
    }
}

fn decode_identity(row: SqliteRow) -> DbErrorResult<Identity> {
    Ok(Identity {
        id: parse_uuid(row.try_get::<String, _>("id")?.as_str(), "user.id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        active: row.try_get("active")?,
        created_at: parse_timestamp(row.try_get("created_at")?, "user.created_at")?,
    })
}

fn decode_profile(row: SqliteRow) -> DbErrorResult<Profile> {
    Ok(Profile {
        id: parse_uuid(row.try_get::<String, _>("id")?.as_str(), "profile.id")?,
        user_id: parse_uuid(row.try_get::<String, _>("user_id")?.as_str(), "profile.user_id")?,
        full_name: row.try_get("full_name")?,
        bio: row.try_get("bio")?,
        status_id: parse_uuid(
            row.try_get::<String, _>("status_id")?.as_str(),
            "profile.status_id",
        )?,
        avatar: row.try_get("avatar")?,
    })
}
