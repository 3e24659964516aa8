use std::sync::Arc;

use async_trait::async_trait;

use super::pipeline::{Flow, Step};
use super::scope::RequestScope;
use crate::api::Presentation;
use crate::error::AppError;

/// Lets a request through only when an earlier step attached a principal.
/// Otherwise answers with the presentation's unauthorized response.
pub struct RequireUser {
    presentation: Arc<dyn Presentation>,
}

impl RequireUser {
    pub fn new(presentation: Arc<dyn Presentation>) -> Self {
        Self { presentation }
    }
}

#[async_trait]
impl Step for RequireUser {
    fn name(&self) -> &'static str {
        "require_user"
    }

    async fn execute(&self, scope: &mut RequestScope<'_>) -> Flow {
        if scope.principal().is_some() {
            return Flow::Continue;
        }
        tracing::debug!("No signed-in user for {}", scope.parts().uri.path());
        Flow::Respond(self.presentation.error(AppError::Unauthorized))
    }
}
