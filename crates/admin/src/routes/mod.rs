//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                  - Liveness
//! GET  /health/ready                            - Database readiness
//!
//! # Metafield groups
//! GET  /                                        - Redirect to /groups
//! GET  /groups?group=<id>                       - Group tabs
//! POST /groups                                  - Create group
//! POST /groups/{id}/delete                      - Delete group
//! GET  /groups/{id}/metafields                  - Assignment dialog
//! POST /groups/{id}/metafields                  - Confirm selection
//!
//! # Free gifts
//! GET  /groups/{id}/gifts?q=<term>              - Reset and load panel
//! GET  /groups/{id}/gifts/panel                 - Current panel
//! POST /groups/{id}/gifts/more                  - Load next page
//! POST /groups/{id}/gifts/remove                - Remove one selected item
//! POST /groups/{id}/gifts/save                  - Write changed products
//! GET  /groups/{id}/gifts/picker?product_id=..  - Resource picker
//! POST /groups/{id}/gifts/picker                - Add picked items
//!
//! # JSON API
//! GET    /api/groups                            - List groups
//! POST   /api/groups                            - Combined create/delete/update
//! DELETE /api/groups/{id}                       - Delete group
//! PUT    /api/groups/{id}/metafields            - Overwrite selection
//! ```

pub mod api;
pub mod forms;
pub mod free_gifts;
pub mod groups;
pub mod health;
pub mod metafields;
pub mod picker;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::Span;

use crate::error::AppError;
use crate::models::session::{Notice, keys};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = "crates/admin/static";

/// Build the page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/groups") }))
        .route("/groups", get(groups::index).post(groups::create))
        .route("/groups/{id}/delete", post(groups::delete))
        .route(
            "/groups/{id}/metafields",
            get(metafields::dialog).post(metafields::confirm),
        )
        .route("/groups/{id}/gifts", get(free_gifts::reset))
        .route("/groups/{id}/gifts/panel", get(free_gifts::panel))
        .route("/groups/{id}/gifts/more", post(free_gifts::load_more))
        .route("/groups/{id}/gifts/remove", post(free_gifts::remove))
        .route("/groups/{id}/gifts/save", post(free_gifts::save))
        .route(
            "/groups/{id}/gifts/picker",
            get(picker::show).post(picker::submit),
        )
        .merge(api::router())
}

/// Build the complete application: routes, health checks, static files and
/// the middleware stack.
pub fn app(state: AppState, session_layer: SessionManagerLayer<PostgresStore>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Build the application from a pool, with the session layer it needs.
pub fn app_with_pool(config: crate::config::AdminConfig, pool: PgPool) -> Router {
    let session_layer = crate::middleware::create_session_layer(&pool, &config);
    app(AppState::new(config, pool), session_layer)
}

/// Queue a notice for the next rendered page.
pub(crate) async fn flash(session: &Session, notice: Notice) -> Result<(), AppError> {
    session.insert(keys::NOTICE, notice).await?;
    Ok(())
}

/// Take the pending notice, if any.
pub(crate) async fn take_flash(session: &Session) -> Result<Option<Notice>, AppError> {
    Ok(session.remove::<Notice>(keys::NOTICE).await?)
}
