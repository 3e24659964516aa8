use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::auth::SessionToken;
use crate::database::models::{Item, User};

/// Errors returned by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the requested record is not found")]
    NotFound,

    #[error("store call exceeded its {0:?} deadline")]
    Timeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Durable user records, keyed by email, token and id
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup; implementations lowercase `email` before matching.
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn find_by_token(&self, token: SessionToken) -> Result<User, StoreError>;

    /// Overwrite the user's token. Any previously issued token stops resolving.
    async fn update_token(&self, user_id: i64, token: SessionToken) -> Result<(), StoreError>;
}

/// Durable item records, owned by users
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Items whose owner is `user_id`, in insertion order.
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Item>, StoreError>;

    async fn insert(&self, item: &Item) -> Result<(), StoreError>;
}

/// Run a store call under a deadline. An elapsed deadline is reported as
/// `StoreError::Timeout`; callers decide whether that fails open or closed.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
