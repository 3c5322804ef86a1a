//! Freelancer CRM HTTP API: axum router, per-request authentication,
//! request tracing and the JSON error envelope.

pub mod config;
pub mod error;
mod extract;
mod handlers;
mod middleware;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use crm_auth::{AuthConfig, AuthService};
use crm_db::repository::{
    SurrealAccountRepository, SurrealClientRepository, SurrealDashboardRepository,
    SurrealInteractionLogRepository, SurrealProjectRepository, SurrealReminderRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use config::{ConfigError, CorsOrigins, HttpConfig, LogFormat, ServerConfig};
pub use error::{ApiError, ApiResult};

/// Shared request state. Every repository wraps the same cloneable
/// SurrealDB handle.
#[derive(Clone)]
pub struct AppState {
    pub clients: SurrealClientRepository<Any>,
    pub projects: SurrealProjectRepository<Any>,
    pub logs: SurrealInteractionLogRepository<Any>,
    pub reminders: SurrealReminderRepository<Any>,
    pub dashboard: SurrealDashboardRepository<Any>,
    pub auth: Arc<AuthService<SurrealAccountRepository<Any>>>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, auth_config: AuthConfig) -> Self {
        Self {
            clients: SurrealClientRepository::new(db.clone()),
            projects: SurrealProjectRepository::new(db.clone()),
            logs: SurrealInteractionLogRepository::new(db.clone()),
            reminders: SurrealReminderRepository::new(db.clone()),
            dashboard: SurrealDashboardRepository::new(db.clone()),
            auth: Arc::new(AuthService::new(
                SurrealAccountRepository::new(db),
                auth_config,
            )),
        }
    }
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().cloned()),
    };
    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, request_id.clone()])
        .expose_headers([request_id])
}

pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    use handlers::{auth, clients, dashboard, health, logs, projects, reminders};

    let api = Router::new()
        .route("/health", get(health::health))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/login", post(auth::login))
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/logs", get(logs::list).post(logs::create))
        .route(
            "/logs/{id}",
            get(logs::get).put(logs::update).delete(logs::delete),
        )
        .route("/reminders", get(reminders::list).post(reminders::create))
        .route("/reminders/this-week", get(reminders::this_week))
        .route(
            "/reminders/{id}",
            get(reminders::get)
                .put(reminders::update)
                .delete(reminders::delete),
        )
        .route("/dashboard", get(dashboard::summary));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(cors_layer(&http.cors_allowed_origins))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .with_state(state)
}
