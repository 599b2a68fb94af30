//! Common domain types shared across Shopify Admin API.

use serde::{Deserialize, Serialize};

/// Forward pagination information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Cursor to continue after this page.
    ///
    /// Only set when `has_next_page` is true.
    pub end_cursor: Option<String>,
}
