use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::auth::SessionToken;
use crate::database::models::User;
use crate::database::store::{StoreError, UserStore};

const USER_COLUMNS: &str = "id, name, email, token, password";

/// Sqlite-backed user repository
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn not_found_on_missing_row(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::Sqlx(other),
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(email.to_lowercase())
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_on_missing_row)
    }

    async fn find_by_token(&self, token: SessionToken) -> Result<User, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE token = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_on_missing_row)
    }

    async fn update_token(&self, user_id: i64, token: SessionToken) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET token = ? WHERE id = ?")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let ctx = TestContext::new().await.unwrap();
        let user = ctx.add_user(3, "Ann", "Ann@Example.com", "pw").await.unwrap();

        let store = SqliteUserStore::new(ctx.pool.clone());
        let found = store.find_by_email("ANN@example.COM").await.unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.check_password("pw"));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let ctx = TestContext::new().await.unwrap();
        let store = SqliteUserStore::new(ctx.pool.clone());

        assert!(matches!(store.find_by_email("nobody@example.com").await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.find_by_token(SessionToken::from(20191)).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_token_overwrites_previous_token() {
        let ctx = TestContext::new().await.unwrap();
        ctx.add_user(4, "Bob", "bob@example.com", "pw").await.unwrap();
        let store = SqliteUserStore::new(ctx.pool.clone());

        store.update_token(4, SessionToken::from(111)).await.unwrap();
        store.update_token(4, SessionToken::from(222)).await.unwrap();

        assert!(matches!(store.find_by_token(SessionToken::from(111)).await, Err(StoreError::NotFound)));
        let user = store.find_by_token(SessionToken::from(222)).await.unwrap();
        assert_eq!(user.id, 4);
        assert_eq!(user.token, Some(SessionToken::from(222)));
    }
}
