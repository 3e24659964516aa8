use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{open_database, OutputFormat};
use crate::database::{DatabaseManager, NewUser};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Register a user who can then sign in")]
    Add {
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "Email address, stored lowercased")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Explicit user id (assigned automatically if omitted)")]
        id: Option<i64>,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { name, email, password, id } => {
            let pool = open_database().await?;
            let created = DatabaseManager::create_user(&pool, &NewUser { id, name, email, password }).await;
            DatabaseManager::close(pool).await;
            let user = created?;

            output_success(
                &output_format,
                &format!("Created user {} <{}>", user.id, user.email),
                Some(json!({ "user": user })),
            )
        }
    }
}
