//! SQLite profile store implementation.
//!
//! Implements `ProfileStore` from `persona-core` using sqlx with split
//! read/write pools. The `profiles` table holds at most one row; its
//! `singleton` column is UNIQUE, so a second insert fails with a conflict.
//!
//! Every successful write re-publishes the stored row on the store's
//! `ProfileFeed`. Writes made by other processes are not observed.

use chrono::{DateTime, Utc};
use persona_core::feed::ProfileFeed;
use persona_core::repository::profile::ProfileStore;
use persona_types::error::RepositoryError;
use persona_types::profile::{Profile, ProfileId};
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tokio::sync::watch;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileStore`.
pub struct SqliteProfileStore {
    pool: DatabasePool,
    feed: ProfileFeed,
}

impl SqliteProfileStore {
    /// Open the store, loading the current row so subscribers see it first.
    pub async fn open(pool: DatabasePool) -> Result<Self, RepositoryError> {
        let current = fetch_singleton(&pool.writer).await?;
        Ok(Self {
            pool,
            feed: ProfileFeed::new(current),
        })
    }

    /// Close the database. Later reads and writes fail with a query error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn insert(&self, profile: &Profile, now: &str) -> Result<Profile, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO profiles (first_name, last_name, address, phone_number, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.address)
        .bind(&profile.phone_number)
        .bind(now)
        .bind(now)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) => Ok(profile.clone().with_id(ProfileId(done.last_insert_rowid()))),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict("a profile already exists".to_string()),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn update(
        &self,
        id: ProfileId,
        profile: &Profile,
        now: &str,
    ) -> Result<Profile, RepositoryError> {
        let result = sqlx::query(
            "UPDATE profiles SET first_name = ?, last_name = ?, address = ?, phone_number = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.address)
        .bind(&profile.phone_number)
        .bind(now)
        .bind(id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(profile.clone())
    }
}

/// Internal row type for mapping SQLite rows to domain Profile.
struct ProfileRow {
    id: i64,
    first_name: String,
    last_name: String,
    address: String,
    phone_number: String,
}

impl ProfileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            address: row.try_get("address")?,
            phone_number: row.try_get("phone_number")?,
        })
    }

    fn into_profile(self) -> Profile {
        Profile {
            id: Some(ProfileId(self.id)),
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            phone_number: self.phone_number,
        }
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

async fn fetch_singleton(pool: &SqlitePool) -> Result<Option<Profile>, RepositoryError> {
    let row = sqlx::query(
        "SELECT id, first_name, last_name, address, phone_number FROM profiles ORDER BY id LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .map_err(|e| RepositoryError::Query(e.to_string()))?;

    match row {
        Some(row) => {
            let profile_row =
                ProfileRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok(Some(profile_row.into_profile()))
        }
        None => Ok(None),
    }
}

impl ProfileStore for SqliteProfileStore {
    fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.feed.subscribe()
    }

    async fn get_singleton(&self) -> Result<Option<Profile>, RepositoryError> {
        fetch_singleton(&self.pool.reader).await
    }

    async fn upsert_singleton(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let saved = match profile.id {
            None => self.insert(profile, &now).await?,
            Some(id) => self.update(id, profile, &now).await?,
        };

        tracing::debug!(id = ?saved.id, "profile row written");
        self.feed.publish(Some(saved.clone()));
        Ok(saved)
    }
}
