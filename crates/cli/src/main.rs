//! Metafield Groups CLI - Database migrations and group management.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! mg-cli migrate
//!
//! # Manage metafield groups
//! mg-cli groups list
//! mg-cli groups create --name "Apparel"
//! mg-cli groups delete --id <uuid>
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mg-cli")]
#[command(author, version, about = "Metafield Groups CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage metafield groups
    Groups {
        #[command(subcommand)]
        action: GroupsAction,
    },
}

#[derive(Subcommand)]
enum GroupsAction {
    /// List all groups
    List,
    /// Create a new group
    Create {
        /// Group display name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a group
    Delete {
        /// Group ID
        #[arg(short, long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "mg-cli failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Groups { action: GroupsAction::List } => commands::groups::list().await,
        Commands::Groups { action: GroupsAction::Create { name } } => {
            commands::groups::create(&name).await.map(drop)
        }
        Commands::Groups { action: GroupsAction::Delete { id } } => {
            commands::groups::delete(&id).await
        }
    }
}
