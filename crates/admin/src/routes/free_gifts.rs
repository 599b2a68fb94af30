//! Free gift panel route handlers.
//!
//! The panel follows post/redirect/get: every POST updates the
//! [`GiftPanelDraft`] held in the session and redirects back to the panel
//! page, which renders whatever the draft holds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use metafield_groups_core::MetafieldGroupId;

use super::{flash, forms, take_flash};
use crate::db::MetafieldGroupRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::session::keys;
use crate::models::{GiftItem, GiftItemKind, GiftPanelDraft, GiftRow, MetafieldGroup, Notice};
use crate::services::free_gifts::submit_changes;
use crate::shopify::types::GiftProductConnection;
use crate::state::AppState;

/// Query parameters of the reset handler.
#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    /// Title filter.
    pub q: Option<String>,
}

/// A selected gift as shown on the panel.
#[derive(Debug, Clone)]
pub struct GiftItemView {
    pub id: String,
    pub label: String,
    pub image_url: Option<String>,
    pub is_product: bool,
}

impl From<&GiftItem> for GiftItemView {
    fn from(item: &GiftItem) -> Self {
        Self {
            id: item.id.clone(),
            label: item.label(),
            image_url: item.image_url.clone(),
            is_product: item.kind == GiftItemKind::Product,
        }
    }
}

/// One product row of the panel.
#[derive(Debug, Clone)]
pub struct GiftRowView {
    pub product_id: String,
    pub title: String,
    pub items: Vec<GiftItemView>,
    pub changed: bool,
}

impl From<&GiftRow> for GiftRowView {
    fn from(row: &GiftRow) -> Self {
        Self {
            product_id: row.product.id.clone(),
            title: row.product.title.clone(),
            items: row.selection.iter().map(GiftItemView::from).collect(),
            changed: row.is_changed(),
        }
    }
}

/// Free gift panel template.
#[derive(Template, WebTemplate)]
#[template(path = "gifts/panel.html")]
pub struct GiftPanelTemplate {
    pub group_id: String,
    pub group_name: String,
    pub term: String,
    pub rows: Vec<GiftRowView>,
    pub has_next_page: bool,
    pub has_changes: bool,
    pub notice: Option<Notice>,
}

impl GiftPanelTemplate {
    fn new(group: &MetafieldGroup, draft: &GiftPanelDraft, notice: Option<Notice>) -> Self {
        Self {
            group_id: group.id.to_string(),
            group_name: group.name.clone(),
            term: draft.term.clone().unwrap_or_default(),
            rows: draft.rows.iter().map(GiftRowView::from).collect(),
            has_next_page: draft.has_next_page(),
            has_changes: draft.has_changes,
            notice,
        }
    }
}

fn panel_url(id: MetafieldGroupId) -> String {
    format!("/groups/{id}/gifts/panel")
}

fn reset_url(id: MetafieldGroupId) -> String {
    format!("/groups/{id}/gifts")
}

/// The session draft, if it belongs to `group_id`.
pub(super) async fn load_draft(
    session: &Session,
    group_id: MetafieldGroupId,
) -> Result<Option<GiftPanelDraft>, AppError> {
    let draft = session.get::<GiftPanelDraft>(keys::GIFT_PANEL).await?;
    Ok(draft.filter(|d| d.group_id == group_id))
}

pub(super) async fn store_draft(session: &Session, draft: &GiftPanelDraft) -> Result<(), AppError> {
    session.insert(keys::GIFT_PANEL, draft).await?;
    Ok(())
}

/// Open the panel from scratch: drop any draft and load the first page.
#[instrument(skip(state, session))]
pub async fn reset(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
    Query(query): Query<PanelQuery>,
) -> Result<Redirect, AppError> {
    MetafieldGroupRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {id}")))?;

    let term = query.q.filter(|t| !t.trim().is_empty());
    let page = match state.shopify().search_gift_products(term.as_deref(), None).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(group_id = %id, error = %e, "Failed to load gift products");
            flash(&session, Notice::error("Could not load products from Shopify")).await?;
            GiftProductConnection::default()
        }
    };

    let draft = GiftPanelDraft::new(id, term, page);
    tracing::debug!(group_id = %id, rows = draft.rows.len(), "Free gift panel loaded");
    store_draft(&session, &draft).await?;

    Ok(Redirect::to(&panel_url(id)))
}

/// Render the panel.
#[instrument(skip(state, session))]
pub async fn panel(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
) -> Result<Response, AppError> {
    let group = MetafieldGroupRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {id}")))?;

    let Some(draft) = load_draft(&session, id).await? else {
        return Ok(Redirect::to(&reset_url(id)).into_response());
    };

    let notice = take_flash(&session).await?;
    Ok(GiftPanelTemplate::new(&group, &draft, notice).into_response())
}

/// Append the next page of products.
#[instrument(skip(state, session))]
pub async fn load_more(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
) -> Result<Redirect, AppError> {
    let Some(mut draft) = load_draft(&session, id).await? else {
        return Ok(Redirect::to(&reset_url(id)));
    };

    let Some(cursor) = draft.next_cursor.clone() else {
        return Ok(Redirect::to(&panel_url(id)));
    };

    match state
        .shopify()
        .search_gift_products(draft.term.as_deref(), Some(cursor))
        .await
    {
        Ok(page) => {
            draft.append(page);
            store_draft(&session, &draft).await?;
        }
        Err(e) => {
            tracing::error!(group_id = %id, error = %e, "Failed to load more gift products");
            flash(&session, Notice::error("Could not load more products")).await?;
        }
    }

    Ok(Redirect::to(&panel_url(id)))
}

/// Remove one item from a product's selection.
#[instrument(skip(session, body))]
pub async fn remove(
    session: Session,
    Path(id): Path<MetafieldGroupId>,
    body: Bytes,
) -> Result<Redirect, AppError> {
    let Some(mut draft) = load_draft(&session, id).await? else {
        return Ok(Redirect::to(&reset_url(id)));
    };

    let (Some(product_id), Some(item_id)) =
        (forms::value(&body, "product_id"), forms::value(&body, "item_id"))
    else {
        return Err(AppError::BadRequest("product_id and item_id are required".to_string()));
    };

    if draft.remove(&product_id, &item_id) {
        store_draft(&session, &draft).await?;
    } else {
        flash(&session, Notice::error("Product is no longer on the panel")).await?;
    }

    Ok(Redirect::to(&panel_url(id)))
}

/// Write every changed product to Shopify.
#[instrument(skip(state, session))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
) -> Result<Redirect, AppError> {
    let Some(mut draft) = load_draft(&session, id).await? else {
        return Ok(Redirect::to(&reset_url(id)));
    };

    let report = submit_changes(state.shopify(), &mut draft).await;
    store_draft(&session, &draft).await?;

    let notice = if report.has_failures() {
        Notice::error(report.notice())
    } else {
        Notice::success(report.notice())
    };
    flash(&session, notice).await?;

    Ok(Redirect::to(&panel_url(id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::shopify::types::{GiftProduct, PageInfo, VariantSummary};

    fn group() -> MetafieldGroup {
        MetafieldGroup {
            id: MetafieldGroupId::generate(),
            name: "Apparel".to_string(),
            metafields: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn draft(group_id: MetafieldGroupId, has_next_page: bool) -> GiftPanelDraft {
        GiftPanelDraft::new(
            group_id,
            Some("shirt".to_string()),
            GiftProductConnection {
                products: vec![GiftProduct {
                    id: "gid://shopify/Product/1".to_string(),
                    title: "Linen Shirt".to_string(),
                    gift_variant_ids: vec!["gid://shopify/ProductVariant/11".to_string()],
                }],
                page_info: PageInfo {
                    has_next_page,
                    end_cursor: Some("c1".to_string()),
                },
            },
        )
    }

    #[test]
    fn test_panel_renders_rows_and_load_more() {
        let group = group();
        let template = GiftPanelTemplate::new(&group, &draft(group.id, true), None);
        let html = template.render().unwrap();

        assert!(html.contains("Linen Shirt"));
        assert!(html.contains("Linen Shirt - Gift variant"));
        assert!(html.contains(r#"value="shirt""#));
        assert!(html.contains(&format!("/groups/{}/gifts/more", group.id)));
        assert!(!html.contains("Save changes"));
    }

    #[test]
    fn test_panel_shows_save_bar_only_with_changes() {
        let group = group();
        let mut draft = draft(group.id, false);
        draft.merge_picked(
            "gid://shopify/Product/1",
            vec![GiftItem::variant(
                &VariantSummary {
                    id: "gid://shopify/ProductVariant/12".to_string(),
                    title: "Blue".to_string(),
                    image_url: Some("https://cdn.example.com/blue.png".to_string()),
                },
                "Tote Bag",
            )],
        );

        let html = GiftPanelTemplate::new(&group, &draft, None).render().unwrap();

        assert!(html.contains("Save changes"));
        assert!(html.contains("Tote Bag - Blue"));
        assert!(html.contains("https://cdn.example.com/blue.png"));
        assert!(!html.contains("/gifts/more"));
    }

    #[test]
    fn test_empty_panel() {
        let group = group();
        let draft = GiftPanelDraft::new(group.id, None, GiftProductConnection::default());
        let html = GiftPanelTemplate::new(&group, &draft, Some(Notice::error("Could not load products from Shopify")))
            .render()
            .unwrap();
        assert!(html.contains("No products found"));
        assert!(html.contains("Could not load products from Shopify"));
    }
}
