//! Metafield group repository.
//!
//! The selected definitions are stored as JSON text (`["gid://...", ...]`);
//! they are only ever written from a serialized `Vec<String>`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use metafield_groups_core::MetafieldGroupId;

use super::RepositoryError;
use crate::models::metafield_group::{GroupName, MetafieldGroup, MetafieldSelection};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MetafieldGroupRow {
    id: Uuid,
    name: String,
    metafields: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MetafieldGroupRow> for MetafieldGroup {
    type Error = RepositoryError;

    fn try_from(row: MetafieldGroupRow) -> Result<Self, Self::Error> {
        let metafields = decode_metafields(&row.metafields).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid metafields for group {}: {e}",
                row.id
            ))
        })?;

        Ok(Self {
            id: MetafieldGroupId::new(row.id),
            name: row.name,
            metafields,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Decode the stored metafields column.
///
/// # Errors
///
/// Returns `serde_json::Error` if the text is not a JSON list of strings.
pub fn decode_metafields(text: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Encode a selection for the metafields column.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if serialization fails.
pub fn encode_metafields(selection: &MetafieldSelection) -> Result<String, RepositoryError> {
    serde_json::to_string(selection.as_slice())
        .map_err(|e| RepositoryError::DataCorruption(format!("cannot encode metafields: {e}")))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for metafield group database operations.
pub struct MetafieldGroupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MetafieldGroupRepository<'a> {
    /// Create a new metafield group repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all groups, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored selection is invalid.
    pub async fn list(&self) -> Result<Vec<MetafieldGroup>, RepositoryError> {
        let rows = sqlx::query_as::<_, MetafieldGroupRow>(
            r"
            SELECT id, name, metafields, created_at, updated_at
            FROM admin.metafield_groups
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a group by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored selection is invalid.
    pub async fn get(&self, id: MetafieldGroupId) -> Result<Option<MetafieldGroup>, RepositoryError> {
        let row = sqlx::query_as::<_, MetafieldGroupRow>(
            r"
            SELECT id, name, metafields, created_at, updated_at
            FROM admin.metafield_groups
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a group with an empty selection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the generated ID already exists.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &GroupName) -> Result<MetafieldGroup, RepositoryError> {
        let empty = encode_metafields(&MetafieldSelection::default())?;

        let row = sqlx::query_as::<_, MetafieldGroupRow>(
            r"
            INSERT INTO admin.metafield_groups (id, name, metafields)
            VALUES ($1, $2, $3)
            RETURNING id, name, metafields, created_at, updated_at
            ",
        )
        .bind(MetafieldGroupId::generate().as_uuid())
        .bind(name.as_str())
        .bind(empty)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("group id already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Delete a group, returning the deleted ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no group has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: MetafieldGroupId) -> Result<MetafieldGroupId, RepositoryError> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM admin.metafield_groups WHERE id = $1 RETURNING id")
                .bind(id.as_uuid())
                .fetch_optional(self.pool)
                .await?;

        deleted
            .map(MetafieldGroupId::new)
            .ok_or(RepositoryError::NotFound)
    }

    /// Overwrite the selected metafield definitions of a group.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no group has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_metafields(
        &self,
        id: MetafieldGroupId,
        selection: &MetafieldSelection,
    ) -> Result<MetafieldGroup, RepositoryError> {
        let metafields = encode_metafields(selection)?;

        let row = sqlx::query_as::<_, MetafieldGroupRow>(
            r"
            UPDATE admin.metafield_groups
            SET metafields = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, metafields, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(metafields)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(metafields: &str) -> MetafieldGroupRow {
        MetafieldGroupRow {
            id: Uuid::nil(),
            name: "Apparel".to_string(),
            metafields: metafields.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let group: MetafieldGroup =
            row(r#"["gid://shopify/MetafieldDefinition/1"]"#).try_into().unwrap();
        assert_eq!(group.name, "Apparel");
        assert_eq!(group.metafields, vec!["gid://shopify/MetafieldDefinition/1"]);
    }

    #[test]
    fn test_corrupt_metafields_are_reported() {
        let result: Result<MetafieldGroup, _> = row("{not a list").try_into();
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_encode_metafields() {
        let selection = MetafieldSelection::from_ids(["a", "b"]);
        assert_eq!(encode_metafields(&selection).unwrap(), r#"["a","b"]"#);
        assert_eq!(
            encode_metafields(&MetafieldSelection::default()).unwrap(),
            "[]"
        );
    }
}
