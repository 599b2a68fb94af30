//! Integration tests for Metafield Groups.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process router and gift panel tests
//! cargo test -p metafield-groups-integration-tests
//!
//! # Database-backed tests (needs DATABASE_URL pointing at PostgreSQL)
//! cargo test -p metafield-groups-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `admin_router` - HTTP surface driven in-process, no database round trips
//! - `admin_gift_panel` - Free gift panel flow against a recording writer
//! - `admin_groups_db` - Group storage and the JSON API against `PostgreSQL`

use axum::Router;
use metafield_groups_admin::config::{AdminConfig, GiftMetafieldConfig, ShopifyAdminConfig};
use metafield_groups_admin::routes;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Configuration pointing at nothing real.
#[must_use]
pub fn test_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/metafield_groups_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        shopify: ShopifyAdminConfig {
            store: "test-store.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_integration_test_token"),
            gift_metafield: GiftMetafieldConfig::default(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
        tls: None,
    }
}

/// The full application over `pool`.
#[must_use]
pub fn app(pool: PgPool) -> Router {
    routes::app_with_pool(test_config(), pool)
}

/// The full application over a pool that never connects.
///
/// Only usable for requests that are answered before touching the database.
///
/// # Panics
///
/// Panics if the placeholder database URL does not parse.
#[must_use]
#[allow(clippy::expect_used)]
pub fn app_without_database() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/metafield_groups_unused")
        .expect("lazy pool");
    app(pool)
}
