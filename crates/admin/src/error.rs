//! Error type returned by the HTML handlers.
//!
//! JSON endpoints use `routes::api::ApiError` instead, so their bodies keep
//! the `{"error": ...}` shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::shopify::AdminShopifyError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// The session store could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Shopify(AdminShopifyError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the merchant. Store and upstream details stay in the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Shopify(AdminShopifyError::RateLimited(seconds)) => {
                format!("Shopify is busy, try again in {seconds} seconds")
            }
            Self::Shopify(_) => "External service error".to_string(),
            Self::Database(_) | Self::Session(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Admin request failed");
        } else {
            tracing::debug!(error = %self, "Admin request rejected");
        }
        (status, self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("group".to_string()), StatusCode::NOT_FOUND),
            (AppError::Database(RepositoryError::NotFound), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
            (
                AppError::Shopify(AdminShopifyError::RateLimited(1)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Shopify(AdminShopifyError::no_data("products")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Database(RepositoryError::DataCorruption("x".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_client_errors_keep_their_text() {
        let err = AppError::BadRequest("product_id is required".to_string());
        assert_eq!(err.public_message(), "Bad request: product_id is required");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad json".to_string()));
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Shopify(AdminShopifyError::Unauthorized("token".to_string()));
        assert_eq!(err.public_message(), "External service error");

        let err = AppError::Shopify(AdminShopifyError::RateLimited(4));
        assert_eq!(err.public_message(), "Shopify is busy, try again in 4 seconds");
    }
}
