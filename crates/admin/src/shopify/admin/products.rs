//! Product searches for the free gift panel and the resource picker.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{convert_gift_product_connection, convert_picker_product_connection},
    queries::{gift_products, picker_products},
};
use crate::config::GiftMetafieldConfig;
use crate::shopify::types::{GiftProductConnection, PickerProductConnection};

/// Products per gift panel page.
pub const GIFT_PAGE_SIZE: i64 = 5;

/// Products per resource picker page.
pub const PICKER_PAGE_SIZE: i64 = 10;

/// Variants fetched per picker product.
const VARIANTS_PER_PRODUCT: i64 = 5;

/// Build the product search query for an optional title filter.
///
/// `Some("shirt")` becomes `title:*shirt*`; no term (or a blank one) yields an
/// empty query, which lists all products.
#[must_use]
pub fn gift_search_query(term: Option<&str>) -> String {
    match term.map(str::trim) {
        Some(term) if !term.is_empty() => format!("title:*{term}*"),
        _ => String::new(),
    }
}

/// Variables of one gift panel page: five products, the title filter, and
/// the gift metafield to read.
pub(super) fn gift_products_variables(
    term: Option<&str>,
    after: Option<String>,
    metafield: &GiftMetafieldConfig,
) -> gift_products::Variables {
    gift_products::Variables {
        first: GIFT_PAGE_SIZE,
        query: gift_search_query(term),
        after,
        namespace: metafield.namespace.clone(),
        key: metafield.key.clone(),
    }
}

pub(super) fn picker_products_variables(
    term: Option<&str>,
    after: Option<String>,
) -> picker_products::Variables {
    picker_products::Variables {
        first: PICKER_PAGE_SIZE,
        query: gift_search_query(term),
        after,
        variant_count: VARIANTS_PER_PRODUCT,
    }
}

impl AdminClient {
    /// Get one page of products with their current gift variants.
    ///
    /// # Arguments
    ///
    /// * `term` - Optional title filter
    /// * `after` - Cursor of the last product already shown
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn search_gift_products(
        &self,
        term: Option<&str>,
        after: Option<String>,
    ) -> Result<GiftProductConnection, AdminShopifyError> {
        let variables = gift_products_variables(term, after, self.gift_metafield());

        let response: gift_products::ResponseData = self
            .execute(gift_products::OPERATION_NAME, gift_products::QUERY, variables)
            .await?;

        Ok(convert_gift_product_connection(response.products))
    }

    /// Get one page of products for the resource picker.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn search_picker_products(
        &self,
        term: Option<&str>,
        after: Option<String>,
    ) -> Result<PickerProductConnection, AdminShopifyError> {
        let variables = picker_products_variables(term, after);

        let response: picker_products::ResponseData = self
            .execute(
                picker_products::OPERATION_NAME,
                picker_products::QUERY,
                variables,
            )
            .await?;

        Ok(convert_picker_product_connection(response.products))
    }
}
