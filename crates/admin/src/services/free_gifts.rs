//! Free gift reconciliation.
//!
//! Writes the gift selection of every changed panel row to Shopify, one
//! product at a time. A failed write is logged and counted; it does not stop
//! the remaining products.

use std::future::Future;

use tracing::{error, info, instrument};

use crate::models::gift_selection::GiftPanelDraft;
use crate::shopify::{AdminClient, AdminShopifyError};

/// Writes a product's gift selection.
pub trait GiftVariantWriter {
    /// Overwrite the gift variants stored on `product_id`.
    fn set_gift_variants(
        &self,
        product_id: &str,
        variant_ids: &[String],
    ) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;
}

impl GiftVariantWriter for AdminClient {
    async fn set_gift_variants(
        &self,
        product_id: &str,
        variant_ids: &[String],
    ) -> Result<(), AdminShopifyError> {
        Self::set_gift_variants(self, product_id, variant_ids).await
    }
}

/// Outcome of one submission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    /// Products whose metafield was written.
    pub updated: Vec<String>,
    /// Products whose write failed, with the error message.
    pub failed: Vec<(String, String)>,
    /// Rows left alone because nothing changed.
    pub unchanged: usize,
}

impl SubmissionReport {
    /// Notice shown after saving.
    #[must_use]
    pub fn notice(&self) -> String {
        match (self.updated.len(), self.failed.len()) {
            (0, 0) => "No changes to save".to_string(),
            (updated, 0) => format!("Updated free gifts for {updated} product(s)"),
            (updated, failed) => {
                format!("Updated free gifts for {updated} product(s); {failed} update(s) failed")
            }
        }
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Write every changed row of `draft` and clear its "has changes" flag.
///
/// Rows written successfully take their new selection as baseline, so
/// submitting again without edits issues no calls.
#[instrument(skip_all, fields(group_id = %draft.group_id, rows = draft.rows.len()))]
pub async fn submit_changes<W: GiftVariantWriter>(
    writer: &W,
    draft: &mut GiftPanelDraft,
) -> SubmissionReport {
    let pending = draft.changed_rows();
    let mut report = SubmissionReport {
        unchanged: draft.rows.len() - pending.len(),
        ..SubmissionReport::default()
    };

    for update in pending {
        match writer
            .set_gift_variants(&update.product_id, &update.variant_ids)
            .await
        {
            Ok(()) => {
                info!(
                    product_id = %update.product_id,
                    count = update.variant_ids.len(),
                    "Free gifts updated"
                );
                draft.mark_saved(&update.product_id, &update.variant_ids);
                report.updated.push(update.product_id);
            }
            Err(e) => {
                error!(
                    product_id = %update.product_id,
                    error = %e,
                    "Failed to update free gifts"
                );
                report.failed.push((update.product_id, e.to_string()));
            }
        }
    }

    draft.has_changes = false;
    report
}
