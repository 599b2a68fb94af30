//! Metafield definition reads and gift metafield writes.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{convert_metafield_definitions, serialize_variant_reference_list},
    queries::{self, format_user_errors, metafield_definitions, metafields_delete, metafields_set},
};
use crate::shopify::types::{MetafieldDefinition, MetafieldOwnerType};

/// Maximum number of definitions listed in the assignment dialog.
const DEFINITIONS_PAGE_SIZE: i64 = 100;

/// Metafield type of the gift selection.
pub const GIFT_METAFIELD_TYPE: &str = "list.variant_reference";

/// Variables of the definitions query: the first 100 product-owned ones.
pub(super) fn definitions_variables() -> metafield_definitions::Variables {
    metafield_definitions::Variables {
        first: DEFINITIONS_PAGE_SIZE,
        owner_type: MetafieldOwnerType::Product.as_graphql(),
    }
}

impl AdminClient {
    /// Get the metafield definitions owned by products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_product_metafield_definitions(
        &self,
    ) -> Result<Vec<MetafieldDefinition>, AdminShopifyError> {
        let variables = definitions_variables();

        let response: metafield_definitions::ResponseData = self
            .execute(
                metafield_definitions::OPERATION_NAME,
                metafield_definitions::QUERY,
                variables,
            )
            .await?;

        Ok(convert_metafield_definitions(response))
    }

    /// Overwrite a product's free gift variants.
    ///
    /// An empty selection removes the metafield from the product.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Shopify product GID
    /// * `variant_ids` - Selected variant (or product) GIDs, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user errors.
    #[instrument(skip(self, variant_ids), fields(product_id = %product_id, count = variant_ids.len()))]
    pub async fn set_gift_variants(
        &self,
        product_id: &str,
        variant_ids: &[String],
    ) -> Result<(), AdminShopifyError> {
        if variant_ids.is_empty() {
            return self.delete_gift_variants(product_id).await;
        }

        let metafield = self.gift_metafield();
        let variables = metafields_set::Variables {
            metafields: vec![metafields_set::MetafieldsSetInput {
                owner_id: product_id.to_string(),
                namespace: metafield.namespace.clone(),
                key: metafield.key.clone(),
                value: serialize_variant_reference_list(variant_ids)?,
                type_: GIFT_METAFIELD_TYPE.to_string(),
            }],
        };

        let response: metafields_set::ResponseData = self
            .execute(
                metafields_set::OPERATION_NAME,
                metafields_set::QUERY,
                variables,
            )
            .await?;

        let payload = response
            .metafields_set
            .ok_or_else(|| AdminShopifyError::no_data("metafieldsSet"))?;
        check_user_errors(&payload.user_errors)
    }

    async fn delete_gift_variants(&self, product_id: &str) -> Result<(), AdminShopifyError> {
        let metafield = self.gift_metafield();
        let variables = metafields_delete::Variables {
            metafields: vec![metafields_delete::MetafieldIdentifierInput {
                owner_id: product_id.to_string(),
                namespace: metafield.namespace.clone(),
                key: metafield.key.clone(),
            }],
        };

        let response: metafields_delete::ResponseData = self
            .execute(
                metafields_delete::OPERATION_NAME,
                metafields_delete::QUERY,
                variables,
            )
            .await?;

        let payload = response
            .metafields_delete
            .ok_or_else(|| AdminShopifyError::no_data("metafieldsDelete"))?;
        check_user_errors(&payload.user_errors)
    }
}

fn check_user_errors(errors: &[queries::UserError]) -> Result<(), AdminShopifyError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdminShopifyError::UserError(format_user_errors(errors)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_variables() {
        assert_eq!(
            serde_json::to_value(definitions_variables()).unwrap(),
            serde_json::json!({ "first": 100, "ownerType": "PRODUCT" })
        );
    }

    #[test]
    fn test_check_user_errors() {
        assert!(check_user_errors(&[]).is_ok());

        let err = check_user_errors(&[queries::UserError {
            field: Some(vec!["metafields".to_string(), "0".to_string()]),
            message: "Owner does not exist".to_string(),
        }])
        .unwrap_err();
        assert_eq!(err.to_string(), "User error: metafields.0: Owner does not exist");
    }
}
