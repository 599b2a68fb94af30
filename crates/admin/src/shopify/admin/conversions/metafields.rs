//! Metafield conversion functions.

use crate::shopify::types::MetafieldDefinition;

use super::super::queries::metafield_definitions;

pub fn convert_metafield_definitions(
    data: metafield_definitions::ResponseData,
) -> Vec<MetafieldDefinition> {
    data.metafield_definitions
        .edges
        .into_iter()
        .map(|edge| {
            let node = edge.node;
            MetafieldDefinition {
                id: node.id,
                name: node.name,
                namespace: node.namespace,
                key: node.key,
                type_name: node.type_.name,
                value_type: node.type_.value_type,
            }
        })
        .collect()
}

/// Parse a `list.variant_reference` metafield value (a JSON array of GIDs).
///
/// # Errors
///
/// Returns `serde_json::Error` if the value is not a JSON array of strings.
pub fn parse_variant_reference_list(value: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(value)
}

/// Serialize variant GIDs as a `list.variant_reference` metafield value.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn serialize_variant_reference_list(ids: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(ids)
}
