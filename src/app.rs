use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{found, HtmlPresentation, JsonPresentation, Presentation};
use crate::config::{AppConfig, ItemPolicy, SecurityConfig};
use crate::database::{DatabaseManager, ItemStore, SqliteItemStore, SqliteUserStore, UserStore};
use crate::handlers::{protected, public};
use crate::middleware::{compose, Pipeline, RequireUser, ResolveSession};

/// Persistence handed to the routers
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
}

impl Stores {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserStore::new(pool.clone())),
            items: Arc::new(SqliteItemStore::new(pool)),
        }
    }
}

/// Everything a handler needs, fixed when the router is built
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub presentation: Arc<dyn Presentation>,
    pub policy: ItemPolicy,
    pub store_deadline: Duration,
}

impl AppState {
    pub fn new(stores: Stores, presentation: Arc<dyn Presentation>, config: &AppConfig) -> Self {
        Self {
            users: stores.users,
            items: stores.items,
            presentation,
            policy: config.items,
            store_deadline: config.database.query_timeout(),
        }
    }

    /// Resolve the session, then insist on a signed-in user
    pub fn protected_pipeline(&self) -> Pipeline {
        Pipeline::new()
            .step(ResolveSession::new(
                self.users.clone(),
                self.presentation.clone(),
                self.store_deadline,
            ))
            .step(RequireUser::new(self.presentation.clone()))
    }
}

/// Routes for one presentation. Form pages are only mounted when the
/// presentation serves them.
pub fn routes(state: AppState) -> Router {
    let forms = state.presentation.serves_forms();

    let signin = if forms {
        get(public::signin::form).post(public::signin::submit)
    } else {
        post(public::signin::submit)
    };
    let mut public_routes = Router::new().route("/signin", signin);
    let mut protected_routes =
        Router::new().route("/items", get(protected::items::index).post(protected::items::create));

    if forms {
        public_routes = public_routes.route("/", get(|| async { found("/signin") }));
        protected_routes = protected_routes.route("/items/new", get(protected::items::new_form));
    }

    let pipeline = state.protected_pipeline();
    public_routes
        .merge(compose(protected_routes, pipeline))
        .with_state(state)
}

/// HTML pages at the root, the JSON API under `/api`
pub fn app(pool: SqlitePool, config: &AppConfig) -> Router {
    let stores = Stores::sqlite(pool.clone());

    let html = AppState::new(stores.clone(), Arc::new(HtmlPresentation::new(config.session.clone())), config);
    let json = AppState::new(stores, Arc::new(JsonPresentation), config);

    let mut router = Router::new()
        .route("/health", get(health))
        .with_state(pool)
        .merge(routes(html))
        .nest("/api", routes(json));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    router.layer(TraceLayer::new_for_http())
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

async fn health(State(pool): State<SqlitePool>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
