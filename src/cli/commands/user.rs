use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, output_users};
use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::database::{DatabaseManager, PgStore};
use crate::services::CredentialService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all accounts")]
    List,

    #[command(about = "Grant the admin role")]
    Promote {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Revoke the admin role")]
    Demote {
        #[arg(help = "Account email")]
        email: String,
    },
}

pub async fn handle(
    cmd: UserCommands,
    database: &DatabaseManager,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let credentials = CredentialService::new(Arc::new(PgStore::new(database.pool().clone())));
    run(cmd, &credentials, &output_format).await
}

/// Runs a user command against any credential backend.
pub async fn run(
    cmd: UserCommands,
    credentials: &CredentialService,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List => {
            let users = credentials.list_users().await?;
            output_users(output_format, &users)
        }
        UserCommands::Promote { email } => set_role(credentials, &email, Role::Admin, output_format).await,
        UserCommands::Demote { email } => set_role(credentials, &email, Role::User, output_format).await,
    }
}

async fn set_role(
    credentials: &CredentialService,
    email: &str,
    role: Role,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let user = credentials.set_role(email, role).await?;
    output_success(
        output_format,
        &format!("{} is now {}", user.email, user.role),
        Some(json!({ "user": user })),
    )
}
