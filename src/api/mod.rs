pub mod admins;
pub mod auth;
pub mod colleges;
pub mod extractors;
pub mod members;

use axum::Router;

use crate::config::CONFIG;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        .nest("/auth", auth::auth_routes(state))
}

/// API routes under /api/*
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/system/version", axum::routing::get(get_version))
        .nest("/admins", admins::admins_routes(state.clone()))
        .nest("/colleges", colleges::colleges_routes(state.clone()))
        .nest("/members", members::members_routes(state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": CONFIG.version,
        "backend": "rust"
    }))
}
