// handlers/public/signin.rs - GET/POST /signin handlers

use axum::{
    extract::{Request, State},
    response::Response,
};
use tracing::{info, warn};

use crate::api::Credentials;
use crate::app::AppState;
use crate::auth::SessionToken;
use crate::database::{with_deadline, StoreError};
use crate::error::AppError;

/// GET /signin - the sign-in form
pub async fn form(State(state): State<AppState>) -> Response {
    state.presentation.signin_form()
}

/**
 * POST /signin - exchange email and password for a session token
 *
 * HTML: form fields `email`, `password`; success sets the `session`
 * cookie and redirects to /items.
 * JSON: `{"email": "...", "password": "..."}`; success returns
 * `{"access_token": "<token>", "token_type": "Bearer"}`.
 *
 * Signing in again replaces the stored token, so older tokens stop working.
 */
pub async fn submit(State(state): State<AppState>, request: Request) -> Response {
    let credentials = state.presentation.parse_credentials(request).await;
    match sign_in(&state, &credentials).await {
        Ok(token) => state.presentation.signed_in(token),
        Err(err) => state.presentation.error(err),
    }
}

pub async fn sign_in(state: &AppState, credentials: &Credentials) -> Result<SessionToken, AppError> {
    let user = match with_deadline(state.store_deadline, state.users.find_by_email(&credentials.email)).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            warn!("Sign-in rejected: no user with email '{}'", credentials.email);
            return Err(AppError::AuthenticationFailed);
        }
        Err(err) => return Err(err.into()),
    };

    if !user.check_password(&credentials.password) {
        warn!("Sign-in rejected: wrong password for user {}", user.id);
        return Err(AppError::AuthenticationFailed);
    }

    let token = SessionToken::issue(user.id).map_err(|e| AppError::internal(e.to_string()))?;
    with_deadline(state.store_deadline, state.users.update_token(user.id, token)).await?;

    info!("User {} signed in", user.id);
    Ok(token)
}
