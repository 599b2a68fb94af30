//! Identifier of a metafield group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary key of a metafield group, a random UUID assigned on creation.
///
/// Serializes as the bare UUID string, which is also the form used in URLs
/// (`/groups/{id}`) and in the combined action's `deleteId`/`groupId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct MetafieldGroupId(Uuid);

impl MetafieldGroupId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh v4 id for a group about to be inserted.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MetafieldGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Surrounding whitespace is ignored, since ids often arrive from form fields.
impl FromStr for MetafieldGroupId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for MetafieldGroupId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<MetafieldGroupId> for Uuid {
    fn from(id: MetafieldGroupId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const RAW: &str = "7d0f4c1e-9a55-4f4e-8a3b-1b2c3d4e5f60";

    #[test]
    fn test_parse_and_display_round_trip() {
        let id: MetafieldGroupId = RAW.parse().unwrap();
        assert_eq!(id.to_string(), RAW);
        assert_eq!(Uuid::from(id), Uuid::parse_str(RAW).unwrap());
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        let id: MetafieldGroupId = format!(" {RAW}\n").parse().unwrap();
        assert_eq!(id.to_string(), RAW);
    }

    #[test]
    fn test_parse_rejects_non_uuid() {
        assert!("not-a-uuid".parse::<MetafieldGroupId>().is_err());
        assert!("".parse::<MetafieldGroupId>().is_err());
        assert!("42".parse::<MetafieldGroupId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id: MetafieldGroupId = RAW.parse().unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(RAW));
        let back: MetafieldGroupId = serde_json::from_value(serde_json::json!(RAW)).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(MetafieldGroupId::generate(), MetafieldGroupId::generate());
    }
}
