//! Metafield group management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use metafield_groups_core::MetafieldGroupId;

use super::{flash, take_flash};
use crate::db::{MetafieldGroupRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::models::{GroupName, MetafieldGroup, Notice};
use crate::state::AppState;

/// Query parameters of the group page.
#[derive(Debug, Deserialize)]
pub struct GroupsQuery {
    /// Selected tab.
    pub group: Option<String>,
}

/// Form input for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupInput {
    #[serde(default)]
    pub name: String,
}

/// One tab of the group page.
#[derive(Debug, Clone)]
pub struct GroupTab {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// The selected group.
#[derive(Debug, Clone)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub metafields: Vec<String>,
}

impl From<&MetafieldGroup> for GroupView {
    fn from(group: &MetafieldGroup) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name.clone(),
            metafields: group.metafields.clone(),
        }
    }
}

/// Group page template.
#[derive(Template, WebTemplate)]
#[template(path = "groups/index.html")]
pub struct GroupsIndexTemplate {
    pub tabs: Vec<GroupTab>,
    pub active: Option<GroupView>,
    pub notice: Option<Notice>,
}

/// Pick the tab to show: the requested group if it exists, else the first.
fn active_group<'a>(
    groups: &'a [MetafieldGroup],
    requested: Option<&str>,
) -> Option<&'a MetafieldGroup> {
    let requested = requested.and_then(|raw| raw.parse::<MetafieldGroupId>().ok());
    requested
        .and_then(|id| groups.iter().find(|g| g.id == id))
        .or_else(|| groups.first())
}

/// Group page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<GroupsQuery>,
) -> Result<GroupsIndexTemplate, AppError> {
    let groups = MetafieldGroupRepository::new(state.pool()).list().await?;
    let active = active_group(&groups, query.group.as_deref());
    let active_id = active.map(|g| g.id);

    let tabs = groups
        .iter()
        .map(|group| GroupTab {
            id: group.id.to_string(),
            name: group.name.clone(),
            active: Some(group.id) == active_id,
        })
        .collect();

    Ok(GroupsIndexTemplate {
        tabs,
        active: active.map(GroupView::from),
        notice: take_flash(&session).await?,
    })
}

/// Create group handler.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CreateGroupInput>,
) -> Result<Redirect, AppError> {
    let Ok(name) = GroupName::parse(&input.name) else {
        flash(&session, Notice::error("Name is required")).await?;
        return Ok(Redirect::to("/groups"));
    };

    match MetafieldGroupRepository::new(state.pool()).create(&name).await {
        Ok(group) => {
            tracing::info!(group_id = %group.id, name = %group.name, "Metafield group created");
            flash(&session, Notice::success(format!("Created group \"{}\"", group.name))).await?;
            Ok(Redirect::to(&format!("/groups?group={}", group.id)))
        }
        Err(e) => {
            tracing::error!(name = %name.as_str(), error = %e, "Failed to create metafield group");
            flash(&session, Notice::error("Failed to create group")).await?;
            Ok(Redirect::to("/groups"))
        }
    }
}

/// Delete group handler.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MetafieldGroupId>,
) -> Result<Redirect, AppError> {
    match MetafieldGroupRepository::new(state.pool()).delete(id).await {
        Ok(deleted) => {
            tracing::info!(group_id = %deleted, "Metafield group deleted");
            flash(&session, Notice::success("Group deleted")).await?;
        }
        Err(RepositoryError::NotFound) => {
            flash(&session, Notice::error("Group not found")).await?;
        }
        Err(e) => {
            tracing::error!(group_id = %id, error = %e, "Failed to delete metafield group");
            flash(&session, Notice::error("Failed to delete group")).await?;
        }
    }
    Ok(Redirect::to("/groups"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn group(name: &str) -> MetafieldGroup {
        MetafieldGroup {
            id: MetafieldGroupId::generate(),
            name: name.to_string(),
            metafields: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_group_defaults_to_first() {
        let groups = vec![group("A"), group("B")];
        assert_eq!(active_group(&groups, None).unwrap().name, "A");
        assert_eq!(active_group(&groups, Some("garbage")).unwrap().name, "A");
        assert!(active_group(&[], None).is_none());
    }

    #[test]
    fn test_active_group_by_id() {
        let groups = vec![group("A"), group("B")];
        let id = groups[1].id.to_string();
        assert_eq!(active_group(&groups, Some(&id)).unwrap().name, "B");
    }

    #[test]
    fn test_template_renders_tabs_and_notice() {
        let groups = vec![group("Apparel"), group("Food")];
        let template = GroupsIndexTemplate {
            tabs: groups
                .iter()
                .enumerate()
                .map(|(i, g)| GroupTab {
                    id: g.id.to_string(),
                    name: g.name.clone(),
                    active: i == 0,
                })
                .collect(),
            active: Some(GroupView::from(&groups[0])),
            notice: Some(Notice::success("Group deleted")),
        };
        let html = template.render().unwrap();
        assert!(html.contains("Apparel"));
        assert!(html.contains("Food"));
        assert!(html.contains("Group deleted"));
        assert!(html.contains(&format!("/groups/{}/metafields", groups[0].id)));
    }

    #[test]
    fn test_template_renders_empty_state() {
        let template = GroupsIndexTemplate {
            tabs: vec![],
            active: None,
            notice: None,
        };
        let html = template.render().unwrap();
        assert!(html.contains("No groups yet"));
    }
}
