//! Combined group action.
//!
//! One endpoint accepts `deleteId`, `name`, or `groupId` + `metafields` and
//! dispatches on the first one present, in that order.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument};

use metafield_groups_core::MetafieldGroupId;

use crate::db::{MetafieldGroupRepository, RepositoryError};
use crate::models::metafield_group::{GroupName, MetafieldGroup, MetafieldSelection};

/// Message returned when no recognised field is present.
pub const MISSING_FIELDS_MESSAGE: &str = "Name, deleteId or groupId is required";

/// Selected metafields as submitted: JSON text from a form, a list from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MetafieldsField {
    List(Vec<String>),
    Text(String),
}

impl MetafieldsField {
    fn into_selection(self) -> Result<MetafieldSelection, GroupActionError> {
        let ids = match self {
            Self::List(ids) => ids,
            Self::Text(text) => serde_json::from_str::<Vec<String>>(&text)
                .map_err(|e| GroupActionError::InvalidMetafields(e.to_string()))?,
        };
        Ok(MetafieldSelection::from_ids(ids))
    }
}

/// Raw fields of the combined action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupActionInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub delete_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub metafields: Option<MetafieldsField>,
}

/// Errors from parsing or applying a group action.
#[derive(Debug, Error)]
pub enum GroupActionError {
    #[error("Name, deleteId or groupId is required")]
    MissingFields,

    #[error("Invalid group id: {0}")]
    InvalidId(String),

    #[error("Invalid metafields: {0}")]
    InvalidMetafields(String),

    #[error("Group not found")]
    NotFound,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for GroupActionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// A validated group action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAction {
    Delete(MetafieldGroupId),
    Create(GroupName),
    UpdateMetafields {
        id: MetafieldGroupId,
        selection: MetafieldSelection,
    },
}

/// What an applied action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    Deleted(MetafieldGroupId),
    Created(MetafieldGroup),
    Updated(MetafieldGroup),
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_id(raw: &str) -> Result<MetafieldGroupId, GroupActionError> {
    raw.parse()
        .map_err(|_| GroupActionError::InvalidId(raw.to_string()))
}

impl GroupAction {
    /// Pick the action from the submitted fields.
    ///
    /// # Errors
    ///
    /// Returns `GroupActionError::MissingFields` if no action applies, or an
    /// invalid-input error if the chosen action's fields do not parse.
    pub fn parse(input: GroupActionInput) -> Result<Self, GroupActionError> {
        if let Some(id) = present(input.delete_id.as_ref()) {
            return Ok(Self::Delete(parse_id(id)?));
        }

        if let Some(name) = present(input.name.as_ref()) {
            return GroupName::parse(name)
                .map(Self::Create)
                .map_err(|_| GroupActionError::MissingFields);
        }

        if let (Some(id), Some(metafields)) = (present(input.group_id.as_ref()), input.metafields)
        {
            return Ok(Self::UpdateMetafields {
                id: parse_id(id)?,
                selection: metafields.into_selection()?,
            });
        }

        Err(GroupActionError::MissingFields)
    }

    /// Apply the action to the store.
    ///
    /// # Errors
    ///
    /// Returns `GroupActionError::NotFound` if the group does not exist, or
    /// `GroupActionError::Repository` if the store fails.
    #[instrument(skip(pool))]
    pub async fn apply(self, pool: &PgPool) -> Result<GroupOutcome, GroupActionError> {
        let repo = MetafieldGroupRepository::new(pool);
        match self {
            Self::Delete(id) => {
                let deleted = repo.delete(id).await?;
                info!(group_id = %deleted, "Metafield group deleted");
                Ok(GroupOutcome::Deleted(deleted))
            }
            Self::Create(name) => {
                let group = repo.create(&name).await?;
                info!(group_id = %group.id, name = %group.name, "Metafield group created");
                Ok(GroupOutcome::Created(group))
            }
            Self::UpdateMetafields { id, selection } => {
                let group = repo.update_metafields(id, &selection).await?;
                info!(
                    group_id = %group.id,
                    count = group.metafields.len(),
                    "Metafield group selection updated"
                );
                Ok(GroupOutcome::Updated(group))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ID: &str = "7f1d3f2e-6c55-4c47-9b37-3d1d1b7a8f10";

    fn input() -> GroupActionInput {
        GroupActionInput::default()
    }

    #[test]
    fn test_delete_wins_over_name() {
        let action = GroupAction::parse(GroupActionInput {
            delete_id: Some(ID.to_string()),
            name: Some("Apparel".to_string()),
            ..input()
        })
        .unwrap();
        assert_eq!(action, GroupAction::Delete(ID.parse().unwrap()));
    }

    #[test]
    fn test_name_creates() {
        let action = GroupAction::parse(GroupActionInput {
            name: Some(" Apparel ".to_string()),
            ..input()
        })
        .unwrap();
        assert_eq!(action, GroupAction::Create(GroupName::parse("Apparel").unwrap()));
    }

    #[test]
    fn test_update_from_form_text() {
        let action = GroupAction::parse(GroupActionInput {
            group_id: Some(ID.to_string()),
            metafields: Some(MetafieldsField::Text(r#"["a","b","a"]"#.to_string())),
            ..input()
        })
        .unwrap();
        assert_eq!(
            action,
            GroupAction::UpdateMetafields {
                id: ID.parse().unwrap(),
                selection: MetafieldSelection::from_ids(["a", "b"]),
            }
        );
    }

    #[test]
    fn test_update_from_json_body() {
        let body: GroupActionInput = serde_json::from_str(&format!(
            r#"{{"groupId":"{ID}","metafields":["gid://shopify/MetafieldDefinition/1"]}}"#
        ))
        .unwrap();
        let action = GroupAction::parse(body).unwrap();
        assert!(matches!(action, GroupAction::UpdateMetafields { selection, .. } if selection.as_slice().len() == 1));
    }

    #[test]
    fn test_missing_fields() {
        let err = GroupAction::parse(input()).unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);

        // groupId alone is not enough, and blank values count as absent
        let err = GroupAction::parse(GroupActionInput {
            group_id: Some(ID.to_string()),
            name: Some("   ".to_string()),
            delete_id: Some(String::new()),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, GroupActionError::MissingFields));
    }

    #[test]
    fn test_invalid_inputs() {
        let err = GroupAction::parse(GroupActionInput {
            delete_id: Some("42".to_string()),
            ..input()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid group id: 42");

        let err = GroupAction::parse(GroupActionInput {
            group_id: Some(ID.to_string()),
            metafields: Some(MetafieldsField::Text("nope".to_string())),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, GroupActionError::InvalidMetafields(_)));
    }

    #[test]
    fn test_repository_not_found_maps() {
        let err: GroupActionError = RepositoryError::NotFound.into();
        assert!(matches!(err, GroupActionError::NotFound));
    }
}
