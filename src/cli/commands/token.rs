use clap::Subcommand;
use serde_json::json;

use crate::auth::SessionToken;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Print the session token a user receives on sign-in")]
    Issue {
        #[arg(help = "User id")]
        user_id: i64,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id } => {
            let token = SessionToken::issue(user_id)?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({"user_id": user_id, "token": token}))?);
                }
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}
