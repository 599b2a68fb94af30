//! Shopify Admin API GraphQL client.
//!
//! Authenticates with the store's Admin API access token. Operations are
//! split by concern into `metafields` and `products`; the documents and
//! response shapes live in `queries`.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::QueryBody;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::{GiftMetafieldConfig, ShopifyAdminConfig};

use super::{AdminShopifyError, GraphQLError};

mod conversions;
mod metafields;
mod products;
pub mod queries;

pub use products::gift_search_query;

/// Request timeout for Admin API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Seconds to wait when Shopify does not say.
const DEFAULT_RETRY_AFTER: u64 = 2;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share one HTTP connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    gift_metafield: GiftMetafieldConfig,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Build a client for the configured store. The HTTP client is shared
    /// by every clone.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: format!(
                    "https://{}/admin/api/{}/graphql.json",
                    config.store, config.api_version
                ),
                access_token: config.access_token.clone(),
                gift_metafield: config.gift_metafield.clone(),
            }),
        }
    }

    /// Namespace and key of the product gift metafield.
    #[must_use]
    pub fn gift_metafield(&self) -> &GiftMetafieldConfig {
        &self.inner.gift_metafield
    }

    /// POST one operation to the Admin API and decode its `data`.
    async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, AdminShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let seconds = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .map_or(DEFAULT_RETRY_AFTER, retry_seconds);
                Err(AdminShopifyError::RateLimited(seconds))
            }
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => Err(
                AdminShopifyError::Unauthorized(format!(
                    "{operation_name} rejected the access token ({})",
                    response.status()
                )),
            ),
            _ => {
                let bytes = response.error_for_status()?.bytes().await?;
                decode_response(&bytes, operation_name)
            }
        }
    }
}

/// Whole seconds, rounded up; Shopify sends fractional values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn retry_seconds(raw: f64) -> u64 {
    raw.max(0.0).ceil() as u64
}

/// Decode a GraphQL body. Top-level `errors` win over partial `data`, and a
/// `THROTTLED` code becomes [`AdminShopifyError::RateLimited`].
fn decode_response<T: DeserializeOwned>(
    body: &[u8],
    operation_name: &str,
) -> Result<T, AdminShopifyError> {
    let response: GraphQLResponse<T> = serde_json::from_slice(body)?;

    if response.errors.iter().any(|e| e.code() == Some("THROTTLED")) {
        return Err(AdminShopifyError::RateLimited(DEFAULT_RETRY_AFTER));
    }
    if !response.errors.is_empty() {
        return Err(AdminShopifyError::GraphQL(response.errors));
    }

    response
        .data
        .ok_or_else(|| AdminShopifyError::no_data(operation_name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Shop {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct ShopData {
        shop: Shop,
    }

    fn test_config() -> ShopifyAdminConfig {
        ShopifyAdminConfig {
            store: "example.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_test_token"),
            gift_metafield: GiftMetafieldConfig::default(),
        }
    }

    #[test]
    fn test_client_can_live_in_app_state() {
        fn assert_shareable<T: Clone + Send + Sync + 'static>() {}
        assert_shareable::<AdminClient>();
    }

    #[test]
    fn test_endpoint_uses_store_and_version() {
        let client = AdminClient::new(&test_config());
        assert_eq!(
            client.inner.endpoint,
            "https://example.myshopify.com/admin/api/2026-01/graphql.json"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = AdminClient::new(&test_config());
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("shpat_test_token"));
    }

    #[test]
    fn test_decode_data() {
        let data: ShopData =
            decode_response(br#"{"data":{"shop":{"name":"Demo"}}}"#, "Shop").unwrap();
        assert_eq!(data.shop.name, "Demo");
    }

    #[test]
    fn test_decode_errors_win_over_data() {
        let body = br#"{
            "data": {"shop": {"name": "Demo"}},
            "errors": [{"message": "Access denied for metafieldDefinitions field."}]
        }"#;
        match decode_response::<ShopData>(body, "Shop").unwrap_err() {
            AdminShopifyError::GraphQL(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].message.starts_with("Access denied"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_throttled_is_rate_limited() {
        let body = br#"{"errors": [{"message": "Throttled", "extensions": {"code": "THROTTLED"}}]}"#;
        let err = decode_response::<ShopData>(body, "Shop").unwrap_err();
        assert!(matches!(err, AdminShopifyError::RateLimited(DEFAULT_RETRY_AFTER)));
    }

    #[test]
    fn test_decode_without_data() {
        let err = decode_response::<ShopData>(br#"{"data":null}"#, "Shop").unwrap_err();
        assert!(matches!(err, AdminShopifyError::NoData(ref op) if op == "Shop"));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_response::<ShopData>(b"<html>", "Shop").unwrap_err();
        assert!(matches!(err, AdminShopifyError::Parse(_)));
    }

    #[test]
    fn test_retry_seconds_rounds_up() {
        assert_eq!(retry_seconds(1.2), 2);
        assert_eq!(retry_seconds(3.0), 3);
        assert_eq!(retry_seconds(-1.0), 0);
    }
}
