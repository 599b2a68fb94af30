//! Type conversions from GraphQL response types to domain types.
//!
//! These functions convert the raw `queries` response trees into our clean
//! domain types.

mod metafields;
mod products;

pub use metafields::{
    convert_metafield_definitions, parse_variant_reference_list, serialize_variant_reference_list,
};
pub use products::{convert_gift_product_connection, convert_picker_product_connection};

use crate::shopify::types::PageInfo;

use super::queries;

/// Convert a page's info, using the last edge's cursor as the continuation
/// cursor and dropping it when there is no next page.
pub fn convert_page_info(page_info: &queries::PageInfo, last_cursor: Option<&str>) -> PageInfo {
    let end_cursor = page_info
        .has_next_page
        .then(|| {
            last_cursor
                .map(str::to_string)
                .or_else(|| page_info.end_cursor.clone())
        })
        .flatten();

    PageInfo {
        has_next_page: page_info.has_next_page,
        end_cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_uses_last_edge_cursor() {
        let raw = queries::PageInfo {
            has_next_page: true,
            end_cursor: Some("server-end".to_string()),
        };
        let info = convert_page_info(&raw, Some("edge-5"));
        assert!(info.has_next_page);
        assert_eq!(info.end_cursor.as_deref(), Some("edge-5"));
    }

    #[test]
    fn test_page_info_falls_back_to_end_cursor() {
        let raw = queries::PageInfo {
            has_next_page: true,
            end_cursor: Some("server-end".to_string()),
        };
        let info = convert_page_info(&raw, None);
        assert_eq!(info.end_cursor.as_deref(), Some("server-end"));
    }

    #[test]
    fn test_page_info_without_next_page_has_no_cursor() {
        let raw = queries::PageInfo {
            has_next_page: false,
            end_cursor: Some("server-end".to_string()),
        };
        let info = convert_page_info(&raw, Some("edge-2"));
        assert!(!info.has_next_page);
        assert_eq!(info.end_cursor, None);
    }
}
