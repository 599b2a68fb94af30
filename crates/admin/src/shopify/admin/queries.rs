//! GraphQL documents for the Shopify Admin API.
//!
//! Each operation gets a module shaped like `graphql_client` output: the
//! document (`QUERY`), its `OPERATION_NAME`, serializable `Variables` and the
//! deserializable `ResponseData` tree. Only the fields this service reads are
//! modelled; unknown fields are ignored by serde.

use serde::Deserialize;

// =============================================================================
// Shared response fragments
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantConnection {
    pub edges: Vec<VariantEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantEdge {
    pub node: VariantNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Metafield definitions
// =============================================================================

pub mod metafield_definitions {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "MetafieldDefinitions";

    pub const QUERY: &str = r"
        query MetafieldDefinitions($first: Int!, $ownerType: MetafieldOwnerType!) {
            metafieldDefinitions(first: $first, ownerType: $ownerType) {
                edges {
                    node {
                        id
                        name
                        namespace
                        key
                        type {
                            name
                            valueType
                        }
                    }
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub owner_type: &'static str,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafield_definitions: DefinitionConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DefinitionConnection {
        pub edges: Vec<DefinitionEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DefinitionEdge {
        pub node: DefinitionNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DefinitionNode {
        pub id: String,
        pub name: String,
        pub namespace: String,
        pub key: String,
        #[serde(rename = "type")]
        pub type_: DefinitionType,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DefinitionType {
        pub name: String,
        pub value_type: String,
    }
}

// =============================================================================
// Gift panel product search
// =============================================================================

pub mod gift_products {
    use serde::{Deserialize, Serialize};

    use super::PageInfo;

    pub const OPERATION_NAME: &str = "GiftProducts";

    pub const QUERY: &str = r"
        query GiftProducts(
            $first: Int!
            $query: String
            $after: String
            $namespace: String!
            $key: String!
        ) {
            products(first: $first, query: $query, after: $after) {
                edges {
                    cursor
                    node {
                        id
                        title
                        giftVariants: metafield(namespace: $namespace, key: $key) {
                            id
                            value
                        }
                    }
                }
                pageInfo {
                    hasNextPage
                    endCursor
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub query: String,
        pub after: Option<String>,
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductConnection {
        pub edges: Vec<ProductEdge>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductEdge {
        pub cursor: String,
        pub node: ProductNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub gift_variants: Option<GiftMetafield>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GiftMetafield {
        pub id: String,
        pub value: String,
    }
}

// =============================================================================
// Resource picker product search
// =============================================================================

pub mod picker_products {
    use serde::{Deserialize, Serialize};

    use super::{Image, PageInfo, VariantConnection};

    pub const OPERATION_NAME: &str = "PickerProducts";

    pub const QUERY: &str = r"
        query PickerProducts($first: Int!, $query: String, $after: String, $variantCount: Int!) {
            products(first: $first, query: $query, after: $after) {
                edges {
                    cursor
                    node {
                        id
                        title
                        featuredMedia {
                            preview {
                                image {
                                    url
                                }
                            }
                        }
                        variants(first: $variantCount) {
                            edges {
                                node {
                                    id
                                    title
                                    image {
                                        url
                                    }
                                }
                            }
                        }
                    }
                }
                pageInfo {
                    hasNextPage
                    endCursor
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub query: String,
        pub after: Option<String>,
        pub variant_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductConnection {
        pub edges: Vec<ProductEdge>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductEdge {
        pub cursor: String,
        pub node: ProductNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub featured_media: Option<FeaturedMedia>,
        pub variants: VariantConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct FeaturedMedia {
        #[serde(default)]
        pub preview: Option<MediaPreview>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MediaPreview {
        #[serde(default)]
        pub image: Option<Image>,
    }
}

// =============================================================================
// Gift metafield mutations
// =============================================================================

pub mod metafields_set {
    use serde::{Deserialize, Serialize};

    use super::UserError;

    pub const OPERATION_NAME: &str = "MetafieldsSet";

    pub const QUERY: &str = r"
        mutation MetafieldsSet($metafields: [MetafieldsSetInput!]!) {
            metafieldsSet(metafields: $metafields) {
                metafields {
                    id
                    namespace
                    key
                    value
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldsSetInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldsSetInput {
        pub owner_id: String,
        pub namespace: String,
        pub key: String,
        pub value: String,
        #[serde(rename = "type")]
        pub type_: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_set: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub metafields: Option<Vec<SetMetafield>>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SetMetafield {
        pub id: String,
        pub namespace: String,
        pub key: String,
        pub value: String,
    }
}

pub mod metafields_delete {
    use serde::{Deserialize, Serialize};

    use super::UserError;

    pub const OPERATION_NAME: &str = "MetafieldsDelete";

    pub const QUERY: &str = r"
        mutation MetafieldsDelete($metafields: [MetafieldIdentifierInput!]!) {
            metafieldsDelete(metafields: $metafields) {
                deletedMetafields {
                    ownerId
                    namespace
                    key
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldIdentifierInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldIdentifierInput {
        pub owner_id: String,
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_delete: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub deleted_metafields: Option<Vec<Option<DeletedMetafield>>>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeletedMetafield {
        pub owner_id: String,
        pub namespace: String,
        pub key: String,
    }
}

/// Join mutation `userErrors` into one message (`field.path: message; ...`).
pub fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            if field.is_empty() {
                e.message.clone()
            } else {
                format!("{field}: {}", e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_response_parses() {
        let json = r#"{
            "metafieldDefinitions": {
                "edges": [{
                    "node": {
                        "id": "gid://shopify/MetafieldDefinition/10",
                        "name": "Gift variants",
                        "namespace": "custom",
                        "key": "giftvariants",
                        "type": { "name": "list.variant_reference", "valueType": "LIST" }
                    }
                }]
            }
        }"#;
        let data: metafield_definitions::ResponseData = serde_json::from_str(json).unwrap();
        let node = &data.metafield_definitions.edges.first().unwrap().node;
        assert_eq!(node.key, "giftvariants");
        assert_eq!(node.type_.value_type, "LIST");
    }

    #[test]
    fn test_metafields_set_input_serializes_type_field() {
        let vars = metafields_set::Variables {
            metafields: vec![metafields_set::MetafieldsSetInput {
                owner_id: "gid://shopify/Product/1".to_string(),
                namespace: "custom".to_string(),
                key: "giftvariants".to_string(),
                value: "[]".to_string(),
                type_: "list.variant_reference".to_string(),
            }],
        };
        let json = serde_json::to_value(&vars).unwrap();
        let input = &json["metafields"][0];
        assert_eq!(input["ownerId"], "gid://shopify/Product/1");
        assert_eq!(input["type"], "list.variant_reference");
    }

    #[test]
    fn test_format_user_errors() {
        let errors = vec![
            UserError {
                field: Some(vec!["metafields".to_string(), "0".to_string(), "value".to_string()]),
                message: "is invalid".to_string(),
            },
            UserError {
                field: None,
                message: "Owner not found".to_string(),
            },
        ];
        assert_eq!(
            format_user_errors(&errors),
            "metafields.0.value: is invalid; Owner not found"
        );
    }
}
