use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{log_internal, Credentials, ItemInput, Presentation};
use crate::auth::SessionToken;
use crate::database::Item;
use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// JSON API, session token carried as a bearer token
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPresentation;

/// Body of a successful sign-in
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemBody {
    #[serde(default)]
    pub name: String,
    pub price: i64,
}

impl From<&Item> for ItemBody {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
        }
    }
}

#[async_trait]
impl Presentation for JsonPresentation {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serves_forms(&self) -> bool {
        false
    }

    fn presented_credential(&self, parts: &Parts) -> Option<String> {
        bearer_token(&parts.headers)
    }

    async fn parse_credentials(&self, request: Request) -> Credentials {
        match read_body::<Credentials>(request).await {
            Ok(credentials) => credentials,
            Err(reason) => {
                debug!("Unreadable sign-in body: {}", reason);
                Credentials::default()
            }
        }
    }

    async fn parse_item(&self, request: Request) -> Result<ItemInput, AppError> {
        match read_body::<ItemBody>(request).await {
            Ok(body) => Ok(ItemInput {
                name: body.name,
                price: body.price,
            }),
            Err(reason) => {
                debug!("Unreadable item body: {}", reason);
                Err(AppError::validation("Price must be integer", "price"))
            }
        }
    }

    // Form pages are never mounted when `serves_forms` is false; these only
    // satisfy the trait.
    fn signin_form(&self) -> Response {
        StatusCode::NOT_FOUND.into_response()
    }

    fn new_item_form(&self) -> Response {
        StatusCode::NOT_FOUND.into_response()
    }

    fn signed_in(&self, token: SessionToken) -> Response {
        Json(TokenResponse {
            access_token: token.to_string(),
            token_type: "Bearer".to_string(),
        })
        .into_response()
    }

    fn items(&self, items: &[Item]) -> Response {
        let body: Vec<ItemBody> = items.iter().map(ItemBody::from).collect();
        Json(body).into_response()
    }

    fn created(&self, item: &Item) -> Response {
        (StatusCode::CREATED, Json(ItemBody::from(item))).into_response()
    }

    fn error(&self, err: AppError) -> Response {
        log_internal(self.name(), &err);
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(err.to_json())).into_response()
    }
}

/// Decode the body as JSON whatever the request's content type says
async fn read_body<T: DeserializeOwned>(request: Request) -> Result<T, String> {
    let bytes = Bytes::from_request(request, &()).await.map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// Token part of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
