use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::Item;
use crate::database::store::{ItemStore, StoreError};

/// Sqlite-backed item repository
#[derive(Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Item>, StoreError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT user_id, name, price FROM items WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Single statement, so a failed insert leaves nothing behind
    async fn insert(&self, item: &Item) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO items (user_id, name, price) VALUES (?, ?, ?)")
            .bind(item.user_id)
            .bind(&item.name)
            .bind(item.price)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
