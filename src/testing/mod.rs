use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, extract::Request, response::Response, Router};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::api::{HtmlPresentation, JsonPresentation, Presentation};
use crate::app::{routes, AppState, Stores};
use crate::auth::SessionToken;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, Item, ItemStore, NewUser, StoreError, User, UserStore};

/// Migrated in-memory database plus a development config
pub struct TestContext {
    pub pool: SqlitePool,
    pub config: AppConfig,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = DatabaseManager::in_memory().await?;
        DatabaseManager::migrate(&pool).await?;
        Ok(Self {
            pool,
            config: AppConfig::development(),
        })
    }

    pub async fn add_user(&self, id: i64, name: &str, email: &str, password: &str) -> anyhow::Result<User> {
        let user = DatabaseManager::create_user(
            &self.pool,
            &NewUser {
                id: Some(id),
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await?;
        Ok(user)
    }

    pub fn stores(&self) -> Stores {
        Stores::sqlite(self.pool.clone())
    }

    pub fn html_app(&self) -> Router {
        self.app_with(self.stores(), Arc::new(HtmlPresentation::new(self.config.session.clone())))
    }

    pub fn json_app(&self) -> Router {
        self.app_with(self.stores(), Arc::new(JsonPresentation))
    }

    pub fn app_with(&self, stores: Stores, presentation: Arc<dyn Presentation>) -> Router {
        routes(AppState::new(stores, presentation, &self.config))
    }
}

/// Store whose every call fails with a connection error
pub struct BrokenStore;

#[async_trait]
impl UserStore for BrokenStore {
    async fn find_by_email(&self, _email: &str) -> Result<User, StoreError> {
        Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_token(&self, _token: SessionToken) -> Result<User, StoreError> {
        Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn update_token(&self, _user_id: i64, _token: SessionToken) -> Result<(), StoreError> {
        Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl ItemStore for BrokenStore {
    async fn list_by_owner(&self, _user_id: i64) -> Result<Vec<Item>, StoreError> {
        Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _item: &Item) -> Result<(), StoreError> {
        Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

/// User store that never answers within any reasonable deadline
pub struct StalledUsers;

#[async_trait]
impl UserStore for StalledUsers {
    async fn find_by_email(&self, _email: &str) -> Result<User, StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(StoreError::NotFound)
    }

    async fn find_by_token(&self, _token: SessionToken) -> Result<User, StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(StoreError::NotFound)
    }

    async fn update_token(&self, _user_id: i64, _token: SessionToken) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

pub fn get(uri: &str) -> Request {
    axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_header(uri: &str, name: &str, value: &str) -> Request {
    axum::http::Request::builder().uri(uri).header(name, value).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json(uri: &str, body: Value, bearer: Option<&str>) -> Request {
    let mut builder = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: &Router, request: Request) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
