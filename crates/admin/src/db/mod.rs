//! `PostgreSQL` persistence for the admin service.
//!
//! Everything lives in the `admin` schema: `metafield_groups` holds the
//! groups and `session` backs tower-sessions. The migrations under
//! `crates/admin/migrations/` are applied by `mg-cli migrate`, never at
//! startup.

pub mod metafield_groups;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use metafield_groups::MetafieldGroupRepository;

const MAX_CONNECTIONS: u32 = 10;
const MIN_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a repository call.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Open the connection pool used by the web service and the CLI.
///
/// # Errors
///
/// Returns `sqlx::Error` if no connection can be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await
}
