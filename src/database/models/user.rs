use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::SessionToken;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub token: Option<SessionToken>,
    #[serde(skip)]
    password: Option<String>,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            token: None,
            password: None,
        }
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    /// Plaintext equality against the stored secret. A user without a stored
    /// secret never matches.
    // TODO: store an argon2 hash and verify against it instead of comparing plaintext
    pub fn check_password(&self, candidate: &str) -> bool {
        matches!(&self.password, Some(stored) if stored == candidate)
    }
}

/// Input for creating a user through the admin tooling
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub password: String,
}
