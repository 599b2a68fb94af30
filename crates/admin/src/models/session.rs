//! Session-stored state: the resource picker page and flash notices.

use serde::{Deserialize, Serialize};

use metafield_groups_core::MetafieldGroupId;

use crate::shopify::types::PickerProduct;

/// The resource picker page last shown, kept so a submission can resolve
/// the checked ids to products and variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerPage {
    pub group_id: MetafieldGroupId,
    /// Panel row the picked items are added to.
    pub product_id: String,
    pub products: Vec<PickerProduct>,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the free gift panel draft.
    pub const GIFT_PANEL: &str = "gift_panel";

    /// Key for the resource picker page.
    pub const PICKER_PAGE: &str = "gift_picker_page";

    /// Key for the pending [`super::Notice`].
    pub const NOTICE: &str = "notice";
}
