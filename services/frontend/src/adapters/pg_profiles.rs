//! services/frontend/src/adapters/pg_profiles.rs
//!
//! This module contains the PostgreSQL profile store, a concrete implementation
//! of the `ProfileStore` port from the core crate. It handles all interactions
//! with the `profiles` table using `sqlx`.

use async_trait::async_trait;
use booking_auth_core::domain::{Profile, ProfileUpdate};
use booking_auth_core::ports::{PortError, PortResult, ProfileStore, StoreError, StoreErrorKind};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProfileStore` port.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Creates a new `PgProfileStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileRecord {
    uid: String,
    email: String,
    name: String,
    photo_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}
impl ProfileRecord {
    fn to_domain(self) -> Profile {
        Profile {
            uid: self.uid,
            email: self.email,
            name: self.name,
            photo_url: self.photo_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn store_error(e: sqlx::Error) -> PortError {
    let kind = match &e {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreErrorKind::Unavailable
        }
        // insufficient_privilege
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42501") => {
            StoreErrorKind::PermissionDenied
        }
        _ => StoreErrorKind::Unknown,
    };
    StoreError::new(kind, e.to_string()).into()
}

//=========================================================================================
// `ProfileStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn create_profile(&self, uid: &str, email: &str, name: &str) -> PortResult<()> {
        // A create is a full write: an existing document is replaced, photo included.
        sqlx::query(
            "INSERT INTO profiles (uid, email, name, photo_url, created_at, updated_at) \
             VALUES ($1, $2, $3, NULL, NOW(), NOW()) \
             ON CONFLICT (uid) DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name, \
             photo_url = NULL, created_at = EXCLUDED.created_at, updated_at = EXCLUDED.updated_at",
        )
        .bind(uid)
        .bind(email)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn get_profile(&self, uid: &str) -> PortResult<Option<Profile>> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "SELECT uid, email, name, photo_url, created_at, updated_at FROM profiles WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(record.map(ProfileRecord::to_domain))
    }

    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE profiles SET name = COALESCE($2, name), photo_url = COALESCE($3, photo_url), \
             updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond') \
             WHERE uid = $1",
        )
        .bind(uid)
        .bind(update.name.as_deref())
        .bind(update.photo_url.as_deref())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Profile {} not found", uid)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures_are_unavailable() {
        match store_error(sqlx::Error::PoolTimedOut) {
            PortError::Store(err) => assert_eq!(err.kind, StoreErrorKind::Unavailable),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn other_failures_are_unknown() {
        match store_error(sqlx::Error::RowNotFound) {
            PortError::Store(err) => assert_eq!(err.kind, StoreErrorKind::Unknown),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
