//! Free gift panel flow: load, pick, remove, save.
//!
//! Runs the panel draft and the submission service against a writer that
//! records calls instead of talking to Shopify.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use metafield_groups_admin::models::gift_selection::picked_items;
use metafield_groups_admin::models::{GiftItem, GiftPanelDraft};
use metafield_groups_admin::services::free_gifts::{GiftVariantWriter, submit_changes};
use metafield_groups_admin::shopify::AdminShopifyError;
use metafield_groups_admin::shopify::types::{
    GiftProduct, GiftProductConnection, PageInfo, PickerProduct, VariantSummary,
};
use metafield_groups_core::MetafieldGroupId;

#[derive(Default)]
struct RecordingWriter {
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingWriter {
    fn take(&self) -> Vec<(String, Vec<String>)> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

impl GiftVariantWriter for RecordingWriter {
    async fn set_gift_variants(
        &self,
        product_id: &str,
        variant_ids: &[String],
    ) -> Result<(), AdminShopifyError> {
        self.calls
            .lock()
            .unwrap()
            .push((product_id.to_string(), variant_ids.to_vec()));
        Ok(())
    }
}

fn gift_product(n: u32, gifts: &[&str]) -> GiftProduct {
    GiftProduct {
        id: format!("gid://shopify/Product/{n}"),
        title: format!("Product {n}"),
        gift_variant_ids: gifts.iter().map(ToString::to_string).collect(),
    }
}

fn page(products: Vec<GiftProduct>, has_next_page: bool) -> GiftProductConnection {
    let end_cursor = products.last().map(|p| format!("cursor-{}", p.id));
    GiftProductConnection {
        products,
        page_info: PageInfo {
            has_next_page,
            end_cursor,
        },
    }
}

fn picker_products() -> Vec<PickerProduct> {
    vec![PickerProduct {
        id: "gid://shopify/Product/90".to_string(),
        title: "Tote Bag".to_string(),
        image_url: None,
        variants: vec![
            VariantSummary {
                id: "gid://shopify/ProductVariant/901".to_string(),
                title: "Red".to_string(),
                image_url: None,
            },
            VariantSummary {
                id: "gid://shopify/ProductVariant/902".to_string(),
                title: "Blue".to_string(),
                image_url: None,
            },
        ],
    }]
}

#[tokio::test]
async fn test_unchanged_panel_saves_nothing() {
    let writer = RecordingWriter::default();
    let mut draft = GiftPanelDraft::new(
        MetafieldGroupId::generate(),
        None,
        page(
            vec![
                gift_product(1, &["gid://shopify/ProductVariant/11"]),
                gift_product(2, &[]),
            ],
            false,
        ),
    );

    let report = submit_changes(&writer, &mut draft).await;

    assert!(writer.take().is_empty());
    assert_eq!(report.notice(), "No changes to save");
}

#[tokio::test]
async fn test_pick_one_variant_then_save_twice() {
    let writer = RecordingWriter::default();
    let mut draft = GiftPanelDraft::new(
        MetafieldGroupId::generate(),
        Some("shirt".to_string()),
        page(vec![gift_product(1, &[]), gift_product(2, &[])], true),
    );
    assert!(draft.has_next_page());

    let items = picked_items(
        &picker_products(),
        &[],
        &["gid://shopify/ProductVariant/902".to_string()],
    );
    assert_eq!(items.len(), 1);
    assert!(draft.merge_picked("gid://shopify/Product/2", items));
    assert!(draft.has_changes);

    let report = submit_changes(&writer, &mut draft).await;
    assert_eq!(
        writer.take(),
        vec![(
            "gid://shopify/Product/2".to_string(),
            vec!["gid://shopify/ProductVariant/902".to_string()]
        )]
    );
    assert_eq!(report.notice(), "Updated free gifts for 1 product(s)");
    assert!(!draft.has_changes);

    // The written selection is the new baseline
    submit_changes(&writer, &mut draft).await;
    assert!(writer.take().is_empty());
}

#[tokio::test]
async fn test_removing_last_gift_writes_empty_list() {
    let writer = RecordingWriter::default();
    let mut draft = GiftPanelDraft::new(
        MetafieldGroupId::generate(),
        None,
        page(vec![gift_product(1, &["gid://shopify/ProductVariant/11"])], false),
    );

    assert!(draft.remove("gid://shopify/Product/1", "gid://shopify/ProductVariant/11"));
    submit_changes(&writer, &mut draft).await;

    assert_eq!(
        writer.take(),
        vec![("gid://shopify/Product/1".to_string(), Vec::new())]
    );
}

#[tokio::test]
async fn test_load_more_keeps_edits_and_whole_product_pick() {
    let writer = RecordingWriter::default();
    let mut draft = GiftPanelDraft::new(
        MetafieldGroupId::generate(),
        None,
        page(vec![gift_product(1, &[])], true),
    );

    let items = picked_items(&picker_products(), &["gid://shopify/Product/90".to_string()], &[]);
    draft.merge_picked("gid://shopify/Product/1", items);

    // Second page repeats product 1; its edited row must survive
    draft.append(page(vec![gift_product(1, &[]), gift_product(3, &[])], false));
    assert_eq!(draft.rows.len(), 2);
    assert!(!draft.has_next_page());

    let row = draft.row("gid://shopify/Product/1").unwrap();
    let labels: Vec<String> = row.selection.iter().map(GiftItem::label).collect();
    assert_eq!(labels, vec!["Tote Bag - Red", "Tote Bag - Blue"]);

    submit_changes(&writer, &mut draft).await;
    let calls = writer.take();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.len(), 2);
}
