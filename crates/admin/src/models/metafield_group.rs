//! Metafield group domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use metafield_groups_core::MetafieldGroupId;

/// A named set of product metafield definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetafieldGroup {
    /// Unique group ID (generated on insert).
    pub id: MetafieldGroupId,
    /// Display name, never blank.
    pub name: String,
    /// Selected metafield definition GIDs, in selection order.
    pub metafields: Vec<String>,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Error for an unusable group name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupNameError {
    #[error("Name is required")]
    Empty,
}

/// A validated group name: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupName(String);

impl GroupName {
    /// Validate a submitted name.
    ///
    /// # Errors
    ///
    /// Returns `GroupNameError::Empty` if the name is blank after trimming.
    pub fn parse(raw: &str) -> Result<Self, GroupNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GroupNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Metafield selection submitted by the assignment dialog's checkboxes.
///
/// Keeps insertion order and never holds the same definition twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetafieldSelection {
    ids: Vec<String>,
}

impl MetafieldSelection {
    /// Build a selection, dropping blanks and repeated ids (first one wins).
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for id in ids {
            let id = id.as_ref().trim();
            if !id.is_empty() && !selection.contains(id) {
                selection.ids.push(id.to_string());
            }
        }
        selection
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}
