//! Product type conversion functions.

use crate::shopify::types::{
    GiftProduct, GiftProductConnection, PickerProduct, PickerProductConnection, VariantSummary,
};

use super::super::queries::{VariantConnection, gift_products, picker_products};
use super::{convert_page_info, parse_variant_reference_list};

fn convert_variants(variants: VariantConnection) -> Vec<VariantSummary> {
    variants
        .edges
        .into_iter()
        .map(|edge| VariantSummary {
            id: edge.node.id,
            title: edge.node.title,
            image_url: edge.node.image.map(|image| image.url),
        })
        .collect()
}

// =============================================================================
// GiftProducts conversions
// =============================================================================

/// Convert a gift panel page.
///
/// A gift metafield whose value cannot be parsed yields an empty baseline;
/// the product is still listed so the merchant can overwrite the bad value.
pub fn convert_gift_product_connection(
    connection: gift_products::ProductConnection,
) -> GiftProductConnection {
    let last_cursor = connection.edges.last().map(|edge| edge.cursor.clone());
    let page_info = convert_page_info(&connection.page_info, last_cursor.as_deref());

    let products = connection
        .edges
        .into_iter()
        .map(|edge| {
            let product = edge.node;
            let gift_variant_ids = product
                .gift_variants
                .map(|metafield| {
                    parse_variant_reference_list(&metafield.value).unwrap_or_else(|e| {
                        tracing::warn!(
                            product_id = %product.id,
                            metafield_id = %metafield.id,
                            error = %e,
                            "Ignoring unparseable gift metafield value"
                        );
                        Vec::new()
                    })
                })
                .unwrap_or_default();

            GiftProduct {
                id: product.id,
                title: product.title,
                gift_variant_ids,
            }
        })
        .collect();

    GiftProductConnection {
        products,
        page_info,
    }
}

// =============================================================================
// PickerProducts conversions
// =============================================================================

pub fn convert_picker_product_connection(
    connection: picker_products::ProductConnection,
) -> PickerProductConnection {
    let last_cursor = connection.edges.last().map(|edge| edge.cursor.clone());
    let page_info = convert_page_info(&connection.page_info, last_cursor.as_deref());

    let products = connection
        .edges
        .into_iter()
        .map(|edge| {
            let product = edge.node;
            PickerProduct {
                id: product.id,
                title: product.title,
                image_url: product
                    .featured_media
                    .and_then(|m| m.preview)
                    .and_then(|p| p.image)
                    .map(|i| i.url),
                variants: convert_variants(product.variants),
            }
        })
        .collect();

    PickerProductConnection {
        products,
        page_info,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GIFT_PAGE: &str = r#"{
        "products": {
            "edges": [
                {
                    "cursor": "c1",
                    "node": {
                        "id": "gid://shopify/Product/1",
                        "title": "Tea Set",
                        "giftVariants": { "id": "gid://shopify/Metafield/7", "value": "[\"gid://shopify/ProductVariant/11\"]" }
                    }
                },
                {
                    "cursor": "c2",
                    "node": {
                        "id": "gid://shopify/Product/2",
                        "title": "Mug",
                        "giftVariants": null
                    }
                },
                {
                    "cursor": "c3",
                    "node": {
                        "id": "gid://shopify/Product/3",
                        "title": "Broken",
                        "giftVariants": { "id": "gid://shopify/Metafield/8", "value": "oops" }
                    }
                }
            ],
            "pageInfo": { "hasNextPage": true, "endCursor": "c3" }
        }
    }"#;

    #[test]
    fn test_convert_gift_page() {
        let data: gift_products::ResponseData = serde_json::from_str(GIFT_PAGE).unwrap();
        let page = convert_gift_product_connection(data.products);

        assert_eq!(page.products.len(), 3);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("c3"));

        let tea = &page.products[0];
        assert_eq!(tea.title, "Tea Set");
        assert_eq!(tea.gift_variant_ids, vec!["gid://shopify/ProductVariant/11"]);

        // No gift metafield yet
        assert!(page.products[1].gift_variant_ids.is_empty());

        // Unparseable metafield values become an empty baseline
        assert!(page.products[2].gift_variant_ids.is_empty());
    }

    #[test]
    fn test_convert_picker_page() {
        let data: picker_products::ResponseData = serde_json::from_str(
            r#"{
                "products": {
                    "edges": [{
                        "cursor": "p1",
                        "node": {
                            "id": "gid://shopify/Product/5",
                            "title": "Sticker",
                            "featuredMedia": { "preview": { "image": { "url": "https://cdn.example/s.png" } } },
                            "variants": { "edges": [] }
                        }
                    }],
                    "pageInfo": { "hasNextPage": false, "endCursor": "p1" }
                }
            }"#,
        )
        .unwrap();

        let page = convert_picker_product_connection(data.products);
        assert_eq!(page.products.len(), 1);
        assert_eq!(
            page.products[0].image_url.as_deref(),
            Some("https://cdn.example/s.png")
        );
        assert!(page.products[0].variants.is_empty());
        assert!(!page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor, None);
    }
}
