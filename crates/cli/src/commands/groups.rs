//! Metafield group management commands.
//!
//! # Usage
//!
//! ```bash
//! mg-cli groups list
//! mg-cli groups create --name "Apparel"
//! mg-cli groups delete --id 7f1d3f2e-6c55-4c47-9b37-3d1d1b7a8f10
//! ```

use metafield_groups_admin::db::{MetafieldGroupRepository, create_pool};
use metafield_groups_admin::models::GroupName;
use metafield_groups_core::MetafieldGroupId;
use sqlx::PgPool;

use super::{CommandError, database_url};

async fn connect() -> Result<PgPool, CommandError> {
    let url = database_url()?;
    Ok(create_pool(&url).await?)
}

/// Print every group with its metafield count.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be read.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let groups = MetafieldGroupRepository::new(&pool).list().await?;

    #[allow(clippy::print_stdout)]
    {
        if groups.is_empty() {
            println!("No metafield groups");
        }
        for group in &groups {
            println!(
                "{}  {}  ({} metafield(s))",
                group.id,
                group.name,
                group.metafields.len()
            );
        }
    }
    Ok(())
}

/// Create a group and print its id.
///
/// # Errors
///
/// Returns `CommandError` if the name is blank or the insert fails.
pub async fn create(name: &str) -> Result<MetafieldGroupId, CommandError> {
    let name = GroupName::parse(name).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let pool = connect().await?;
    let group = MetafieldGroupRepository::new(&pool).create(&name).await?;
    tracing::info!(group_id = %group.id, name = %group.name, "Metafield group created");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", group.id);
    }
    Ok(group.id)
}

/// Delete a group by id.
///
/// # Errors
///
/// Returns `CommandError` if the id is malformed or no such group exists.
pub async fn delete(id: &str) -> Result<(), CommandError> {
    let id: MetafieldGroupId = id
        .parse()
        .map_err(|_| CommandError::InvalidInput(format!("not a group id: {id}")))?;

    let pool = connect().await?;
    let deleted = MetafieldGroupRepository::new(&pool).delete(id).await?;
    tracing::info!(group_id = %deleted, "Metafield group deleted");
    Ok(())
}
