//! API route handlers for admin.
//!
//! JSON API endpoints for metafield groups.

pub mod groups;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::state::AppState;

/// Error response for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    /// A 400 response with `msg`.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: StatusCode::NOT_FOUND,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(groups::router())
}
