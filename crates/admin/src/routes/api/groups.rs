//! Metafield group JSON API.
//!
//! `POST /api/groups` is the combined action: it accepts either a JSON body or
//! a URL-encoded form with `name`, `deleteId`, or `groupId` + `metafields`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use metafield_groups_core::MetafieldGroupId;

use super::ApiError;
use crate::db::MetafieldGroupRepository;
use crate::models::{MetafieldGroup, MetafieldSelection};
use crate::routes::forms;
use crate::services::groups::{
    GroupAction, GroupActionError, GroupActionInput, GroupOutcome, MetafieldsField,
};
use crate::state::AppState;

/// Build the group API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/groups", get(list).post(action))
        .route("/api/groups/{id}", delete(remove))
        .route("/api/groups/{id}/metafields", put(update_metafields))
}

/// Response to a delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted_id: MetafieldGroupId,
}

/// Response to a metafield update.
#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub success: bool,
}

/// Body of `PUT /api/groups/{id}/metafields`.
#[derive(Debug, Deserialize)]
pub struct UpdateMetafieldsRequest {
    pub metafields: Vec<String>,
}

fn action_error(err: &GroupActionError) -> ApiError {
    match err {
        GroupActionError::Repository(e) => {
            tracing::error!(error = %e, "Group action failed");
            ApiError::new("Failed to update groups")
        }
        other => ApiError::new(other.to_string()),
    }
}

/// Media types are case-insensitive; parameters such as `charset` are ignored.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

fn json_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::new(format!("Invalid JSON body: {e}")))
}

/// Read the combined action's fields from a JSON or form body.
fn parse_input(headers: &HeaderMap, body: &[u8]) -> Result<GroupActionInput, ApiError> {
    if is_json(headers) {
        return json_body(body);
    }

    Ok(GroupActionInput {
        name: forms::value(body, "name"),
        delete_id: forms::value(body, "deleteId"),
        group_id: forms::value(body, "groupId"),
        metafields: forms::value(body, "metafields").map(MetafieldsField::Text),
    })
}

/// List all groups in creation order.
///
/// GET /api/groups
///
/// # Errors
///
/// Returns `ApiError` if the store cannot be read.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<MetafieldGroup>>, ApiError> {
    MetafieldGroupRepository::new(state.pool())
        .list()
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list metafield groups");
            ApiError::new("Failed to load groups")
        })
}

/// Run a parsed action and shape its response.
async fn run(pool: &PgPool, input: GroupActionInput) -> Result<Response, ApiError> {
    let action = GroupAction::parse(input).map_err(|e| action_error(&e))?;
    let outcome = action.apply(pool).await.map_err(|e| action_error(&e))?;

    Ok(match outcome {
        GroupOutcome::Created(group) => Json(group).into_response(),
        GroupOutcome::Deleted(id) => Json(DeletedResponse {
            success: true,
            deleted_id: id,
        })
        .into_response(),
        GroupOutcome::Updated(_) => Json(UpdatedResponse { success: true }).into_response(),
    })
}

/// Combined create/delete/update action.
///
/// POST /api/groups
///
/// # Errors
///
/// Returns `ApiError` (400) if no action applies or the action fails.
pub async fn action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let input = parse_input(&headers, &body)?;
    run(state.pool(), input).await
}

/// Delete one group.
///
/// DELETE /api/groups/{id}
///
/// # Errors
///
/// Returns `ApiError` (404) if the group does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<MetafieldGroupId>,
) -> Result<Json<DeletedResponse>, ApiError> {
    match GroupAction::Delete(id).apply(state.pool()).await {
        Ok(GroupOutcome::Deleted(deleted_id)) => Ok(Json(DeletedResponse {
            success: true,
            deleted_id,
        })),
        Ok(_) => Err(ApiError::new("Unexpected outcome")),
        Err(GroupActionError::NotFound) => Err(ApiError::not_found("Group not found")),
        Err(e) => Err(action_error(&e)),
    }
}

/// Overwrite a group's metafield selection.
///
/// PUT /api/groups/{id}/metafields
///
/// # Errors
///
/// Returns `ApiError` (400) for a malformed body, or (404) if the group does
/// not exist.
pub async fn update_metafields(
    State(state): State<AppState>,
    Path(id): Path<MetafieldGroupId>,
    body: Bytes,
) -> Result<Json<MetafieldGroup>, ApiError> {
    let request: UpdateMetafieldsRequest = json_body(&body)?;
    let action = GroupAction::UpdateMetafields {
        id,
        selection: MetafieldSelection::from_ids(request.metafields),
    };
    match action.apply(state.pool()).await {
        Ok(GroupOutcome::Updated(group)) => Ok(Json(group)),
        Ok(_) => Err(ApiError::new("Unexpected outcome")),
        Err(GroupActionError::NotFound) => Err(ApiError::not_found("Group not found")),
        Err(e) => Err(action_error(&e)),
    }
}
