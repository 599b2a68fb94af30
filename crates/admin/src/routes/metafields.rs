//! Metafield assignment dialog handlers.
//!
//! The dialog's temporary selection is the checkbox state of its form;
//! nothing is stored until the merchant confirms.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use metafield_groups_core::MetafieldGroupId;

use super::{flash, forms};
use crate::db::{MetafieldGroupRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::models::{MetafieldGroup, MetafieldSelection, Notice};
use crate::shopify::types::MetafieldDefinition;
use crate::state::AppState;

/// Form field carrying the checked definition ids.
pub const METAFIELD_IDS_FIELD: &str = "metafield_ids";

/// A checkbox of the dialog.
#[derive(Debug, Clone)]
pub struct DefinitionOption {
    pub id: String,
    pub name: String,
    pub qualified_key: String,
    pub type_name: String,
    pub checked: bool,
}

/// Assignment dialog template.
#[derive(Template, WebTemplate)]
#[template(path = "groups/metafields.html")]
pub struct MetafieldDialogTemplate {
    pub group_id: String,
    pub group_name: String,
    pub options: Vec<DefinitionOption>,
    /// Selected ids with no matching definition; resubmitted as-is.
    pub retained: Vec<String>,
    pub notice: Option<Notice>,
}

impl MetafieldDialogTemplate {
    fn new(group: &MetafieldGroup, definitions: &[MetafieldDefinition], notice: Option<Notice>) -> Self {
        let selection = MetafieldSelection::from_ids(&group.metafields);

        let options = definitions
            .iter()
            .map(|d| DefinitionOption {
                id: d.id.clone(),
                name: d.name.clone(),
                qualified_key: d.qualified_key(),
                type_name: d.type_name.clone(),
                checked: selection.contains(&d.id),
            })
            .collect();

        let retained = selection
            .as_slice()
            .iter()
            .filter(|id| !definitions.iter().any(|d| &&d.id == id))
            .cloned()
            .collect();

        Self {
            group_id: group.id.to_string(),
            group_name: group.name.clone(),
            options,
            retained,
            notice,
        }
    }
}

async fn load_group(state: &AppState, id: MetafieldGroupId) -> Result<MetafieldGroup, AppError> {
    MetafieldGroupRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {id}")))
}

/// Open the assignment dialog.
#[instrument(skip(state))]
pub async fn dialog(
    State(state): State<AppState>,
    Path(id): Path<MetafieldGroupId>,
) -> Result<MetafieldDialogTemplate, AppError> {
    let group = load_group(&state, id).await?;

    let (definitions, notice) = match state.shopify().get_product_metafield_definitions().await {
        Ok(definitions) => (definitions, None),
        Err(e) => {
            tracing::error!(group_id = %id, error = %e, "Failed to fetch metafield definitions");
            (
                Vec::new(),
                Some(Notice::error("Could not load metafield definitions from Shopify")),
            )
        }
    };

    Ok(MetafieldDialogTemplate::new(&group, &definitions, notice))
}

/// Confirm the dialog: overwrite the group's selection.
#[instrument(skip(state, session, body))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
    body: Bytes,
) -> Result<Redirect, AppError> {
    let selection = MetafieldSelection::from_ids(forms::values(&body, METAFIELD_IDS_FIELD));

    match MetafieldGroupRepository::new(state.pool())
        .update_metafields(id, &selection)
        .await
    {
        Ok(group) => {
            tracing::info!(
                group_id = %group.id,
                count = group.metafields.len(),
                "Metafield group selection updated"
            );
            flash(
                &session,
                Notice::success(format!("Saved {} metafield(s)", group.metafields.len())),
            )
            .await?;
        }
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!("group {id}")));
        }
        Err(e) => {
            tracing::error!(group_id = %id, error = %e, "Failed to update metafield group");
            flash(&session, Notice::error("Failed to save metafields")).await?;
        }
    }

    Ok(Redirect::to(&format!("/groups?group={id}")))
}
