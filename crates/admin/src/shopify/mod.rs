//! Shopify Admin API client.
//!
//! # Architecture
//!
//! - GraphQL documents live in `admin::queries` next to the serde types of
//!   their responses; request bodies use `graphql_client::QueryBody`
//! - Direct API calls to Shopify (no local product sync)
//! - Rate limiting (HTTP 429 or a `THROTTLED` error) is surfaced as
//!   `AdminShopifyError::RateLimited`, not retried
//!
//! # Example
//!
//! ```rust,ignore
//! use metafield_groups_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! // Product-owner metafield definitions for the assignment dialog
//! let definitions = client.get_product_metafield_definitions().await?;
//!
//! // First page of the free gift panel
//! let page = client.search_gift_products(Some("shirt"), None).await?;
//!
//! // Overwrite one product's gift variants
//! client
//!     .set_gift_variants("gid://shopify/Product/1", &["gid://shopify/ProductVariant/2".into()])
//!     .await?;
//! ```

mod admin;
pub mod types;

pub use admin::{AdminClient, gift_search_query};
pub use types::*;

use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Top-level `errors` of a GraphQL response.
    #[error("GraphQL errors: {}", join_messages(.0))]
    GraphQL(Vec<GraphQLError>),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response had neither `data` nor `errors` for this operation.
    #[error("No data in response: {0}")]
    NoData(String),

    /// Seconds to wait, from `Retry-After` or the query cost budget.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Mutation `userErrors`, joined into one message.
    #[error("User error: {0}")]
    UserError(String),
}

impl AdminShopifyError {
    pub(crate) fn no_data(operation: &str) -> Self {
        Self::NoData(operation.to_string())
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQLErrorExtensions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLErrorExtensions {
    /// Shopify error code such as `THROTTLED` or `ACCESS_DENIED`.
    pub code: Option<String>,
}

impl GraphQLError {
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_are_joined() {
        let errors: Vec<GraphQLError> = serde_json::from_str(
            r#"[
                {"message": "Field 'metafield' doesn't exist", "locations": [{"line": 3, "column": 5}]},
                {"message": "Invalid ID", "extensions": {"code": "BAD_REQUEST"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(errors[0].code(), None);
        assert_eq!(errors[1].code(), Some("BAD_REQUEST"));
        assert_eq!(
            AdminShopifyError::GraphQL(errors).to_string(),
            "GraphQL errors: Field 'metafield' doesn't exist; Invalid ID"
        );
    }

    #[test]
    fn test_no_data_names_operation() {
        assert_eq!(
            AdminShopifyError::no_data("metafieldsSet").to_string(),
            "No data in response: metafieldsSet"
        );
    }

    #[test]
    fn test_rate_limited_display() {
        assert_eq!(
            AdminShopifyError::RateLimited(2).to_string(),
            "Rate limited, retry after 2 seconds"
        );
    }
}
