use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

pub async fn handle(database: &DatabaseManager, output_format: OutputFormat) -> anyhow::Result<()> {
    database.migrate().await?;
    output_success(&output_format, "Migrations applied", None)
}
