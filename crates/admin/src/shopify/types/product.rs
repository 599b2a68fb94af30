//! Product domain types for the free gift panel and resource picker.

use serde::{Deserialize, Serialize};

use super::common::PageInfo;

/// A product variant as offered by the resource picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummary {
    /// Variant GID.
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Variant image URL, if any.
    pub image_url: Option<String>,
}

/// A product row of the free gift panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftProduct {
    /// Product GID.
    pub id: String,
    pub title: String,
    /// IDs stored in the product's gift metafield when it was fetched.
    pub gift_variant_ids: Vec<String>,
}

/// A page of gift panel products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftProductConnection {
    pub products: Vec<GiftProduct>,
    pub page_info: PageInfo,
}

/// A product offered by the resource picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerProduct {
    /// Product GID.
    pub id: String,
    pub title: String,
    /// Featured image URL, if any.
    pub image_url: Option<String>,
    pub variants: Vec<VariantSummary>,
}

/// A page of resource picker products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerProductConnection {
    pub products: Vec<PickerProduct>,
    pub page_info: PageInfo,
}
