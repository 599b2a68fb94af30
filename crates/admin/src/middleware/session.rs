//! Server-side sessions.
//!
//! Sessions carry the free gift panel draft, the picker page and flash
//! notices between requests. They do not authenticate anyone.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

pub const SESSION_COOKIE_NAME: &str = "mg_admin_session";

/// A draft survives a day without activity.
const IDLE_LIFETIME: Duration = Duration::hours(24);

/// Store over the `admin.session` table created by the migrations.
///
/// # Panics
///
/// Never in practice: both identifiers are fixed and valid.
fn session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
        .with_schema_name("admin")
        .and_then(|store| store.with_table_name("session"))
        .expect("session schema and table names are valid identifiers")
}

/// Cookie-keyed session layer; the cookie is `Secure` when the public URL is
/// https.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(session_store(pool))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_LIFETIME))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
