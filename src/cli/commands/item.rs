use clap::Subcommand;
use serde_json::json;
use sqlx::SqlitePool;

use crate::cli::utils::{output_empty_collection, output_success};
use crate::cli::{open_database, OutputFormat};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, Item, ItemStore, SqliteItemStore, SqliteUserStore, StoreError, User, UserStore};
use crate::handlers::protected::items::check_price;

#[derive(Subcommand)]
pub enum ItemCommands {
    #[command(about = "Create an item for the user with the given email")]
    Add {
        #[arg(long, help = "Owner's email")]
        email: String,
        #[arg(long, help = "Item name")]
        name: String,
        #[arg(long, help = "Integer price, at most ITEMS_MAX_PRICE")]
        price: i64,
    },

    #[command(about = "List the items of the user with the given email")]
    List {
        #[arg(long, help = "Owner's email")]
        email: String,
    },
}

async fn owner(users: &SqliteUserStore, email: &str) -> anyhow::Result<User> {
    match users.find_by_email(email).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound) => Err(anyhow::anyhow!("No user with email '{}'", email)),
        Err(e) => Err(e.into()),
    }
}

pub async fn handle(cmd: ItemCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_database().await?;
    let result = run(cmd, &pool, output_format).await;
    DatabaseManager::close(pool).await;
    result
}

async fn run(cmd: ItemCommands, pool: &SqlitePool, output_format: OutputFormat) -> anyhow::Result<()> {
    let users = SqliteUserStore::new(pool.clone());
    let items = SqliteItemStore::new(pool.clone());

    match cmd {
        ItemCommands::Add { email, name, price } => {
            let policy = AppConfig::from_env().items;
            check_price(&policy, price)?;

            let user = owner(&users, &email).await?;
            let item = Item { user_id: user.id, name, price };
            items.insert(&item).await?;

            output_success(
                &output_format,
                &format!("Created item '{}' for user {}", item.name, user.id),
                Some(json!({ "item": item })),
            )
        }
        ItemCommands::List { email } => {
            let user = owner(&users, &email).await?;
            let owned = items.list_by_owner(user.id).await?;

            if owned.is_empty() {
                return output_empty_collection(&output_format, "items", &format!("User {} has no items", user.id));
            }
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "items": owned }))?);
                }
                OutputFormat::Text => {
                    println!("{:<30} {:>12}", "NAME", "PRICE");
                    println!("{}", "-".repeat(43));
                    for item in &owned {
                        println!("{:<30} {:>12}", item.name, item.price);
                    }
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn migrated_pool() -> SqlitePool {
        let pool = DatabaseManager::in_memory().await.unwrap();
        DatabaseManager::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn add_rejects_price_over_policy() {
        let pool = migrated_pool().await;
        let cmd = ItemCommands::Add {
            email: "ann@example.com".to_string(),
            name: "lamp".to_string(),
            price: i64::MAX,
        };
        let err = run(cmd, &pool, OutputFormat::Text).await.unwrap_err();
        assert!(err.to_string().contains("at maximum"));
    }

    #[tokio::test]
    async fn unknown_owner_is_an_error() {
        let pool = migrated_pool().await;
        let cmd = ItemCommands::List { email: "nobody@example.com".to_string() };
        let err = run(cmd, &pool, OutputFormat::Text).await.unwrap_err();
        assert_eq!(err.to_string(), "No user with email 'nobody@example.com'");
    }
}
