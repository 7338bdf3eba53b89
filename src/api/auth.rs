use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::extractors::AuthAdmin;
use crate::error::{AppError, Result};
use crate::services::admins::AdminWithTenure;
use crate::services::security::{create_token, verify_password};
use crate::state::AppState;

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub admin: AdminWithTenure,
}

/// Authenticate an admin and issue an access token
async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let admin = state
        .directory
        .find_by_username(&data.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !admin.is_active || !verify_password(&data.password, &admin.hashed_password)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = create_token(&admin)?;
    state.directory.touch_login(admin.id).await?;
    let admin = state.directory.with_tenure(admin).await?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        admin,
    }))
}

/// The calling admin, joined with its active tenure
async fn me(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
) -> Result<Json<AdminWithTenure>> {
    Ok(Json(state.directory.with_tenure(admin).await?))
}
