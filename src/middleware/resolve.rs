use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::request::Parts;
use tracing::{debug, warn};

use super::pipeline::{Flow, Step};
use super::scope::RequestScope;
use crate::api::Presentation;
use crate::auth::SessionToken;
use crate::database::{with_deadline, StoreError, User, UserStore};

/// Attaches the user owning the presented session token, if there is one.
/// Never rejects: a missing, malformed or unknown token, and any store
/// failure, all leave the scope without a principal.
pub struct ResolveSession {
    users: Arc<dyn UserStore>,
    presentation: Arc<dyn Presentation>,
    deadline: Duration,
}

impl ResolveSession {
    pub fn new(users: Arc<dyn UserStore>, presentation: Arc<dyn Presentation>, deadline: Duration) -> Self {
        Self {
            users,
            presentation,
            deadline,
        }
    }

    pub async fn resolve(&self, parts: &Parts) -> Option<User> {
        let raw = self.presentation.presented_credential(parts)?;
        let Some(token) = SessionToken::parse(&raw) else {
            debug!("Ignoring non-numeric session token on {}", parts.uri.path());
            return None;
        };

        match with_deadline(self.deadline, self.users.find_by_token(token)).await {
            Ok(user) => {
                debug!("Resolved session for user {}", user.id);
                Some(user)
            }
            Err(StoreError::NotFound) => {
                debug!("Session token matches no user");
                None
            }
            // Lookup failures degrade to anonymous; the gate decides what that means
            Err(err) => {
                warn!("Session lookup failed, continuing without a user: {}", err);
                None
            }
        }
    }
}

#[async_trait]
impl Step for ResolveSession {
    fn name(&self) -> &'static str {
        "resolve_session"
    }

    async fn execute(&self, scope: &mut RequestScope<'_>) -> Flow {
        if let Some(user) = self.resolve(scope.parts()).await {
            scope.attach(user);
        }
        Flow::Continue
    }
}
