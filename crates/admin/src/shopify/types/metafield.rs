//! Metafield definition types.

use serde::{Deserialize, Serialize};

/// Owner types for which this application reads metafield definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetafieldOwnerType {
    Product,
}

impl MetafieldOwnerType {
    /// GraphQL enum literal.
    #[must_use]
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::Product => "PRODUCT",
        }
    }
}

/// A metafield definition (schema entry) read from Shopify.
///
/// Never persisted locally; fetched each time the assignment dialog opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldDefinition {
    /// Definition GID (`gid://shopify/MetafieldDefinition/...`).
    pub id: String,
    /// Human readable name.
    pub name: String,
    pub namespace: String,
    pub key: String,
    /// Type name, e.g. `list.variant_reference`.
    pub type_name: String,
    /// Underlying value type, e.g. `LIST` or `STRING`.
    pub value_type: String,
}

impl MetafieldDefinition {
    /// `namespace.key`, the way merchants refer to a metafield.
    #[must_use]
    pub fn qualified_key(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_type_literal() {
        assert_eq!(MetafieldOwnerType::Product.as_graphql(), "PRODUCT");
    }

    #[test]
    fn test_qualified_key() {
        let definition = MetafieldDefinition {
            id: "gid://shopify/MetafieldDefinition/1".to_string(),
            name: "Gift variants".to_string(),
            namespace: "custom".to_string(),
            key: "giftvariants".to_string(),
            type_name: "list.variant_reference".to_string(),
            value_type: "LIST".to_string(),
        };
        assert_eq!(definition.qualified_key(), "custom.giftvariants");
    }
}
