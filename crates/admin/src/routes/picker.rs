//! Resource picker route handlers.
//!
//! The picker lists products with their variants as checkboxes. The page it
//! showed is kept in the session so the submission can be resolved back to
//! titles and images without another API call.

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

use super::free_gifts::{load_draft, store_draft};
use super::{flash, forms};
use crate::error::AppError;
use crate::filters;
use crate::models::gift_selection::picked_items;
use crate::models::session::keys;
use crate::models::{GiftRow, Notice, PickerPage};
use crate::shopify::types::{PickerProduct, PickerProductConnection};
use crate::state::AppState;

/// Query parameters of the picker page.
#[derive(Debug, Deserialize)]
pub struct PickerQuery {
    /// Panel row the picked items go to.
    pub product_id: String,
    pub q: Option<String>,
    pub after: Option<String>,
}

/// A variant checkbox.
#[derive(Debug, Clone)]
pub struct PickerVariantView {
    pub id: String,
    pub title: String,
    pub checked: bool,
}

/// A product checkbox with its variants.
#[derive(Debug, Clone)]
pub struct PickerProductView {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub checked: bool,
    pub variants: Vec<PickerVariantView>,
}

impl PickerProductView {
    fn new(product: &PickerProduct, row: &GiftRow) -> Self {
        let selected = |id: &str| row.selection.iter().any(|item| item.id == id);
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            checked: selected(&product.id),
            variants: product
                .variants
                .iter()
                .map(|v| PickerVariantView {
                    id: v.id.clone(),
                    title: v.title.clone(),
                    checked: selected(&v.id),
                })
                .collect(),
        }
    }
}

/// Resource picker template.
#[derive(Template, WebTemplate)]
#[template(path = "gifts/picker.html")]
pub struct PickerTemplate {
    pub group_id: String,
    /// Row the items are picked for.
    pub product_id: String,
    pub product_title: String,
    pub term: String,
    pub products: Vec<PickerProductView>,
    /// Cursor for the "next page" link.
    pub next_after: Option<String>,
    pub notice: Option<Notice>,
}

impl PickerTemplate {
    fn new(
        group_id: MetafieldGroupId,
        row: &GiftRow,
        term: Option<&str>,
        page: &PickerProductConnection,
        notice: Option<Notice>,
    ) -> Self {
        Self {
            group_id: group_id.to_string(),
            product_id: row.product.id.clone(),
            product_title: row.product.title.clone(),
            term: term.unwrap_or_default().to_string(),
            products: page
                .products
                .iter()
                .map(|p| PickerProductView::new(p, row))
                .collect(),
            next_after: page
                .page_info
                .end_cursor
                .clone()
                .filter(|_| page.page_info.has_next_page),
            notice,
        }
    }
}

/// Show the picker for one panel row.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
    Query(query): Query<PickerQuery>,
) -> Result<Response, AppError> {
    let Some(draft) = load_draft(&session, id).await? else {
        return Ok(Redirect::to(&format!("/groups/{id}/gifts")).into_response());
    };
    let Some(row) = draft.row(&query.product_id) else {
        flash(&session, Notice::error("Product is no longer on the panel")).await?;
        return Ok(Redirect::to(&format!("/groups/{id}/gifts/panel")).into_response());
    };

    let term = query.q.as_deref().filter(|t| !t.trim().is_empty());
    let (page, notice) = match state
        .shopify()
        .search_picker_products(term, query.after.clone())
        .await
    {
        Ok(page) => (page, None),
        Err(e) => {
            tracing::error!(group_id = %id, error = %e, "Failed to load picker products");
            (
                PickerProductConnection::default(),
                Some(Notice::error("Could not load products from Shopify")),
            )
        }
    };

    session
        .insert(
            keys::PICKER_PAGE,
            PickerPage {
                group_id: id,
                product_id: row.product.id.clone(),
                products: page.products.clone(),
            },
        )
        .await?;

    Ok(PickerTemplate::new(id, row, term, &page, notice).into_response())
}

/// Add the checked products and variants to the row's selection.
#[instrument(skip(session, body))]
pub async fn submit(
    session: Session,
    Path(id): Path<MetafieldGroupId>,
    body: Bytes,
) -> Result<Redirect, AppError> {
    let panel = format!("/groups/{id}/gifts/panel");

    let Some(mut draft) = load_draft(&session, id).await? else {
        return Ok(Redirect::to(&format!("/groups/{id}/gifts")));
    };

    let page = session
        .remove::<PickerPage>(keys::PICKER_PAGE)
        .await?
        .filter(|page| page.group_id == id);
    let product_id = forms::value(&body, "product_id").unwrap_or_default();

    let Some(page) = page.filter(|page| page.product_id == product_id) else {
        flash(&session, Notice::error("The picker expired, please select again")).await?;
        return Ok(Redirect::to(&panel));
    };

    let items = picked_items(
        &page.products,
        &forms::values(&body, "product_ids"),
        &forms::values(&body, "variant_ids"),
    );
    let picked = items.len();

    if draft.merge_picked(&product_id, items) {
        tracing::debug!(group_id = %id, product_id = %product_id, picked, "Gift items picked");
        store_draft(&session, &draft).await?;
    } else {
        flash(&session, Notice::error("Product is no longer on the panel")).await?;
    }

    Ok(Redirect::to(&panel))
}
