use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Something a user possesses. The owner is not enforced as a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub user_id: i64,
    pub name: String,
    pub price: i64,
}
