use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::database::User;

/// The user a request acts on behalf of. Lives in the request extensions
/// under its own type, so no other value can be mistaken for it.
#[derive(Debug, Clone)]
pub struct Principal(User);

impl Principal {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_user(self) -> User {
        self.0
    }
}

/// Per-request state threaded through the pipeline steps. Starts without a
/// principal; a resolver step may attach one.
pub struct RequestScope<'a> {
    parts: &'a Parts,
    principal: Option<Principal>,
}

impl<'a> RequestScope<'a> {
    pub fn new(parts: &'a Parts) -> Self {
        Self {
            parts,
            principal: None,
        }
    }

    pub fn parts(&self) -> &Parts {
        self.parts
    }

    pub fn principal(&self) -> Option<&User> {
        self.principal.as_ref().map(Principal::user)
    }

    pub fn attach(&mut self, user: User) {
        self.principal = Some(Principal(user));
    }

    pub fn into_principal(self) -> Option<Principal> {
        self.principal
    }
}

/// Extractor for the signed-in user. Only valid behind a pipeline that
/// ends in `RequireUser`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.remove::<Principal>() {
            Some(principal) => Ok(CurrentUser(principal.into_user())),
            None => {
                tracing::error!("No principal on {}; route is missing its session gate", parts.uri.path());
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Try again later."))
            }
        }
    }
}
