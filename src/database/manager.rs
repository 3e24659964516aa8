use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::{NewUser, User};

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        token INTEGER UNIQUE,
        password TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        price INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS items_user_id ON items (user_id)",
];

/// Pool construction, schema setup and admin helpers. Holds no state: the
/// pool it builds is owned by whoever called `connect`.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for the configured database, creating the file if needed
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(format!("{}: {}", config.url, e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!("Created database pool for: {}", config.url);
        Ok(pool)
    }

    /// Private in-memory database. A single connection that never expires,
    /// since every sqlite memory connection is its own database.
    pub async fn in_memory() -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(pool)
    }

    /// Create the users and items tables if they do not exist yet
    pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Register a user. The email is stored lowercased so lookups can be
    /// case-insensitive.
    pub async fn create_user(pool: &SqlitePool, new_user: &NewUser) -> Result<User, DatabaseError> {
        let email = new_user.email.to_lowercase();
        let result = sqlx::query("INSERT INTO users (id, name, email, password) VALUES (?, ?, ?, ?)")
            .bind(new_user.id)
            .bind(&new_user.name)
            .bind(&email)
            .bind(&new_user.password)
            .execute(pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DatabaseError::DuplicateEmail(email.clone())
                }
                other => DatabaseError::Sqlx(other),
            })?;

        let id = result.last_insert_rowid();
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, token, password FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;

        info!("Created user {} <{}>", user.id, user.email);
        Ok(user)
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(pool: SqlitePool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
