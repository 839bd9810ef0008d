pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::DatabaseConfig;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "todoctl")]
#[command(about = "todoctl - maintenance commands for the todo API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply embedded database migrations")]
    Migrate,

    #[command(about = "Account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let config = DatabaseConfig::from_env().context("failed to load database configuration")?;
    let database = DatabaseManager::connect(&config)
        .await
        .context("failed to connect to database")?;

    let result = match cli.command {
        Commands::Migrate => commands::migrate::handle(&database, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, &database, output_format).await,
    };

    database.close().await;
    result
}

/// Renders a failed command once, on the stream that matches the output format.
pub fn report_failure(output_format: &OutputFormat, err: &anyhow::Error, verbose: bool) -> utils::ErrorReport {
    let message = if verbose {
        format!("{:?}", err)
    } else {
        format!("{:#}", err)
    };
    utils::error_report(output_format, &message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_global_json_flag() {
        let cli = Cli::try_parse_from(["todoctl", "user", "promote", "a@x.com", "--json"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::User { cmd: commands::user::UserCommands::Promote { email } } => {
                assert_eq!(email, "a@x.com")
            }
            _ => panic!("expected user promote"),
        }
    }

    #[test]
    fn test_failure_is_reported_on_one_stream() {
        let err = anyhow::anyhow!("no such user").context("promote failed");

        let json = report_failure(&OutputFormat::Json, &err, false);
        assert!(matches!(&json, utils::ErrorReport::Stdout(text) if text.contains("promote failed: no such user")));

        let text = report_failure(&OutputFormat::Text, &err, false);
        assert_eq!(
            text,
            utils::ErrorReport::Stderr("Error: promote failed: no such user".to_string())
        );
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["todoctl"]).is_err());
        assert!(Cli::try_parse_from(["todoctl", "user", "promote"]).is_err());
    }
}
