pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use std::path::Path;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{authenticate, authorize_admin};
use crate::state::AppState;

/// Full application router: `/health`, the `/api` tiers, then the static frontend.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(elevated_routes(state.clone()))
        .fallback(api_not_found);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback_service(frontend(&config.server.frontend_dir))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{auth, categories, todos};

    Router::new()
        .route("/auth/me", get(auth::me_get))
        .route("/auth/password", put(auth::password_put))
        .route(
            "/categories",
            get(categories::categories_get).post(categories::categories_post),
        )
        .route(
            "/categories/:id",
            get(categories::category_get)
                .put(categories::category_put)
                .delete(categories::category_delete),
        )
        .route("/todos", get(todos::todos_get).post(todos::todos_post))
        .route(
            "/todos/:id",
            get(todos::todo_get)
                .put(todos::todo_put)
                .delete(todos::todo_delete),
        )
        .route_layer(from_fn_with_state(state, authenticate))
}

fn elevated_routes(state: AppState) -> Router<AppState> {
    use handlers::elevated;

    // Layers run outermost-last: authenticate, then the admin gate.
    Router::new()
        .route("/admin/users", get(elevated::users_get))
        .route_layer(from_fn(authorize_admin))
        .route_layer(from_fn_with_state(state, authenticate))
}

async fn api_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Serves the bundled frontend, answering unknown paths with its index page.
fn frontend(dir: &str) -> ServeDir<ServeFile> {
    let index = Path::new(dir).join("index.html");
    ServeDir::new(dir).fallback(ServeFile::new(index))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    if state.ping().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        )
    } else {
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
