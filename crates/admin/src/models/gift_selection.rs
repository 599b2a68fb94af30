//! Free gift panel state.
//!
//! A [`GiftPanelDraft`] holds every product row the merchant has loaded, the
//! gift items currently selected for each row and the ids that were stored on
//! the product when it was fetched (the baseline). It lives in the session
//! for as long as the panel is open.

use serde::{Deserialize, Serialize};

use metafield_groups_core::{MetafieldGroupId, ShopifyGid};

use crate::shopify::types::{GiftProduct, GiftProductConnection, PickerProduct, VariantSummary};

/// Title shown for gift items known only by id.
pub const STORED_ITEM_TITLE: &str = "Gift variant";

/// What a selected gift item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftItemKind {
    Variant,
    Product,
}

/// One selected free gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftItem {
    /// Variant or product GID; the value written to the metafield.
    pub id: String,
    pub title: String,
    /// Title of the product a variant belongs to.
    pub product_title: Option<String>,
    pub image_url: Option<String>,
    pub kind: GiftItemKind,
}

impl GiftItem {
    /// An item read back from a product's gift metafield.
    #[must_use]
    pub fn stored(id: &str, product_title: &str) -> Self {
        let kind = match ShopifyGid::parse(id) {
            Ok(gid) if !gid.is_variant() => GiftItemKind::Product,
            _ => GiftItemKind::Variant,
        };
        Self {
            id: id.to_string(),
            title: STORED_ITEM_TITLE.to_string(),
            product_title: Some(product_title.to_string()),
            image_url: None,
            kind,
        }
    }

    /// A variant picked in the resource picker.
    #[must_use]
    pub fn variant(variant: &VariantSummary, product_title: &str) -> Self {
        Self {
            id: variant.id.clone(),
            title: variant.title.clone(),
            product_title: Some(product_title.to_string()),
            image_url: variant.image_url.clone(),
            kind: GiftItemKind::Variant,
        }
    }

    /// A product without variants picked in the resource picker.
    #[must_use]
    pub fn product(product: &PickerProduct) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            product_title: None,
            image_url: product.image_url.clone(),
            kind: GiftItemKind::Product,
        }
    }

    /// Label shown next to the thumbnail.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.kind, &self.product_title) {
            (GiftItemKind::Variant, Some(product)) => format!("{product} - {}", self.title),
            _ => self.title.clone(),
        }
    }
}

/// Turn the boxes checked in the resource picker into gift items.
///
/// A checked product contributes all of its variants, or itself when it has
/// none. A checked variant of an unchecked product contributes just that
/// variant. Items come out in page order.
#[must_use]
pub fn picked_items(
    products: &[PickerProduct],
    checked_products: &[String],
    checked_variants: &[String],
) -> Vec<GiftItem> {
    let mut items = Vec::new();
    for product in products {
        if checked_products.contains(&product.id) {
            if product.variants.is_empty() {
                items.push(GiftItem::product(product));
            } else {
                items.extend(
                    product
                        .variants
                        .iter()
                        .map(|v| GiftItem::variant(v, &product.title)),
                );
            }
            continue;
        }
        items.extend(
            product
                .variants
                .iter()
                .filter(|v| checked_variants.contains(&v.id))
                .map(|v| GiftItem::variant(v, &product.title)),
        );
    }
    items
}

/// Merge `incoming` into `existing`, keyed by id.
///
/// A repeated id replaces the earlier item's details in place.
fn merge_unique(existing: &mut Vec<GiftItem>, incoming: Vec<GiftItem>) {
    for item in incoming {
        if let Some(slot) = existing.iter_mut().find(|e| e.id == item.id) {
            *slot = item;
        } else {
            existing.push(item);
        }
    }
}

/// One product of the gift panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRow {
    pub product: GiftProduct,
    /// Ids stored on the product when it was fetched or last saved.
    pub baseline: Vec<String>,
    pub selection: Vec<GiftItem>,
}

impl GiftRow {
    fn from_product(product: GiftProduct) -> Self {
        let selection = product
            .gift_variant_ids
            .iter()
            .map(|id| GiftItem::stored(id, &product.title))
            .collect();
        Self {
            baseline: product.gift_variant_ids.clone(),
            selection,
            product,
        }
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.iter().map(|item| item.id.clone()).collect()
    }

    /// Whether the selection differs from the baseline (order matters).
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.selection.len() != self.baseline.len()
            || self
                .selection
                .iter()
                .zip(&self.baseline)
                .any(|(item, id)| &item.id != id)
    }
}

/// A metafield write needed to persist one changed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGiftUpdate {
    pub product_id: String,
    pub variant_ids: Vec<String>,
}

/// Session-held state of the free gift panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftPanelDraft {
    /// Group whose screen the panel was opened from.
    pub group_id: MetafieldGroupId,
    /// Current title filter.
    pub term: Option<String>,
    pub rows: Vec<GiftRow>,
    /// Cursor of the last loaded product, present only while more pages exist.
    pub next_cursor: Option<String>,
    pub has_changes: bool,
}

impl GiftPanelDraft {
    /// Start a panel from its first page.
    #[must_use]
    pub fn new(group_id: MetafieldGroupId, term: Option<String>, page: GiftProductConnection) -> Self {
        let mut draft = Self {
            group_id,
            term: term.filter(|t| !t.trim().is_empty()),
            rows: Vec::new(),
            next_cursor: None,
            has_changes: false,
        };
        draft.append(page);
        draft
    }

    /// Add the rows of a further page.
    ///
    /// Products already on the panel keep their row untouched.
    pub fn append(&mut self, page: GiftProductConnection) {
        self.next_cursor = page.page_info.end_cursor.filter(|_| page.page_info.has_next_page);
        for product in page.products {
            if self.row(&product.id).is_none() {
                self.rows.push(GiftRow::from_product(product));
            }
        }
    }

    /// Whether "load more" should be offered.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }

    #[must_use]
    pub fn row(&self, product_id: &str) -> Option<&GiftRow> {
        self.rows.iter().find(|row| row.product.id == product_id)
    }

    fn row_mut(&mut self, product_id: &str) -> Option<&mut GiftRow> {
        self.rows.iter_mut().find(|row| row.product.id == product_id)
    }

    /// Add picked items to a product's selection.
    ///
    /// Returns `false` if the product is not on the panel. An empty pick
    /// changes nothing.
    pub fn merge_picked(&mut self, product_id: &str, items: Vec<GiftItem>) -> bool {
        let Some(row) = self.row_mut(product_id) else {
            return false;
        };
        if items.is_empty() {
            return true;
        }
        merge_unique(&mut row.selection, items);
        self.has_changes = true;
        true
    }

    /// Drop one item from a product's selection.
    ///
    /// Returns `false` if the product is not on the panel. Removing an item
    /// that is not selected leaves the change flag alone.
    pub fn remove(&mut self, product_id: &str, item_id: &str) -> bool {
        let Some(row) = self.row_mut(product_id) else {
            return false;
        };
        let before = row.selection.len();
        row.selection.retain(|item| item.id != item_id);
        if row.selection.len() != before {
            self.has_changes = true;
        }
        true
    }

    /// Writes needed for every row whose selection differs from its baseline.
    #[must_use]
    pub fn changed_rows(&self) -> Vec<PendingGiftUpdate> {
        self.rows
            .iter()
            .filter(|row| row.is_changed())
            .map(|row| PendingGiftUpdate {
                product_id: row.product.id.clone(),
                variant_ids: row.selected_ids(),
            })
            .collect()
    }

    /// Record a successful write: the written ids become the baseline.
    pub fn mark_saved(&mut self, product_id: &str, variant_ids: &[String]) {
        if let Some(row) = self.row_mut(product_id) {
            row.baseline = variant_ids.to_vec();
            row.product.gift_variant_ids = variant_ids.to_vec();
        }
    }
}
