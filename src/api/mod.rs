//! Presentation adapters. One business flow, two renderings: HTML pages
//! with a session cookie, or a JSON API with bearer tokens. A router is
//! built around exactly one of them.

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{header::LOCATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::auth::SessionToken;
use crate::database::Item;
use crate::error::AppError;

pub mod html;
pub mod json;

pub use html::HtmlPresentation;
pub use json::JsonPresentation;

/// Email and password as submitted to the sign-in endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Item fields as submitted by a client, before the price policy is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub price: i64,
}

#[async_trait]
pub trait Presentation: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Whether the router should serve the HTML-only form pages
    fn serves_forms(&self) -> bool;

    /// Raw session credential from this transport's location, if any
    fn presented_credential(&self, parts: &Parts) -> Option<String>;

    /// Unreadable bodies yield empty credentials, which then fail sign-in.
    async fn parse_credentials(&self, request: Request) -> Credentials;

    async fn parse_item(&self, request: Request) -> Result<ItemInput, AppError>;

    fn signin_form(&self) -> Response;

    fn new_item_form(&self) -> Response;

    fn signed_in(&self, token: SessionToken) -> Response;

    fn items(&self, items: &[Item]) -> Response;

    fn created(&self, item: &Item) -> Response;

    fn error(&self, err: AppError) -> Response;
}

/// 302 Found to `location`
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

pub(crate) fn log_internal(presentation: &str, err: &AppError) {
    if let AppError::Internal(detail) = err {
        tracing::error!("{} request failed: {}", presentation, detail);
    }
}
