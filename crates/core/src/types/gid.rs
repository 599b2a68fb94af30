//! Shopify global IDs (`gid://shopify/<Resource>/<id>`).

use thiserror::Error;

const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a Shopify global ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GidError {
    #[error("missing gid://shopify/ prefix: {0}")]
    MissingPrefix(String),
    #[error("malformed global id: {0}")]
    Malformed(String),
}

/// Resource types this application references by global ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShopifyResource {
    Product,
    ProductVariant,
    MetafieldDefinition,
    Metafield,
    Other(String),
}

impl ShopifyResource {
    fn from_segment(segment: &str) -> Self {
        match segment {
            "Product" => Self::Product,
            "ProductVariant" => Self::ProductVariant,
            "MetafieldDefinition" => Self::MetafieldDefinition,
            "Metafield" => Self::Metafield,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A parsed Shopify global ID.
///
/// Query strings (`?foo=bar`) that Shopify occasionally appends are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShopifyGid {
    resource: ShopifyResource,
    id: String,
}

impl ShopifyGid {
    /// Parse a `gid://shopify/...` string.
    ///
    /// # Errors
    ///
    /// Returns `GidError` if the prefix is missing or the resource/id
    /// segments are empty.
    pub fn parse(value: &str) -> Result<Self, GidError> {
        let rest = value
            .trim()
            .strip_prefix(GID_PREFIX)
            .ok_or_else(|| GidError::MissingPrefix(value.to_string()))?;
        let rest = rest.split('?').next().unwrap_or_default();

        let (resource, id) = rest
            .split_once('/')
            .ok_or_else(|| GidError::Malformed(value.to_string()))?;
        if resource.is_empty() || id.is_empty() || id.contains('/') {
            return Err(GidError::Malformed(value.to_string()));
        }

        Ok(Self {
            resource: ShopifyResource::from_segment(resource),
            id: id.to_string(),
        })
    }

    /// The trailing ID segment (usually numeric).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn is_variant(&self) -> bool {
        self.resource == ShopifyResource::ProductVariant
    }
}
