use crate::cli::utils::output_success;
use crate::cli::{open_database, OutputFormat};
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_database().await?;
    let checked = DatabaseManager::health_check(&pool).await;
    DatabaseManager::close(pool).await;
    checked?;

    output_success(&output_format, "Database schema is up to date", None)
}
