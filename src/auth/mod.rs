use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed prefix of every issued session token.
///
/// The scheme is `"2019"` followed by the decimal user id. It is kept for
/// compatibility with existing sessions and is NOT a secure token: anyone who
/// knows a user id can forge that user's session. Replace it with random,
/// hashed tokens before exposing the service to untrusted clients.
pub const TOKEN_PREFIX: &str = "2019";

/// Opaque integer credential proving a prior successful sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SessionToken(i64);

impl SessionToken {
    /// Derive the token for a user. Pure and deterministic: the same id always
    /// yields the same token, and distinct ids never share one.
    pub fn issue(user_id: i64) -> Result<Self, TokenError> {
        if user_id < 0 {
            return Err(TokenError::InvalidUserId(user_id));
        }
        format!("{TOKEN_PREFIX}{user_id}")
            .parse::<i64>()
            .map(SessionToken)
            .map_err(|_| TokenError::Overflow(user_id))
    }

    /// Parse a presented credential. Anything that is not an integer is no token.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<i64>().ok().map(SessionToken)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for SessionToken {
    fn from(value: i64) -> Self {
        SessionToken(value)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("cannot issue a token for user id {0}")]
    InvalidUserId(i64),
    #[error("token for user id {0} does not fit in 64 bits")]
    Overflow(i64),
}
