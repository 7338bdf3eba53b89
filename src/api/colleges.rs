use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::extractors::{AuthAdmin, SuperAdminUser};
use crate::db::entities::prelude::*;
use crate::db::models::{CreateCollege, UpdateCollege};
use crate::error::{AppError, Result};
use crate::services::colleges::TenureHead;
use crate::state::AppState;

/// Create college routes
pub fn colleges_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_colleges).post(create_college))
        .route(
            "/:college_id",
            get(get_college).patch(update_college).delete(delete_college),
        )
        .route("/code/:code", get(get_college_by_code))
        .route("/:college_id/heads", get(college_heads))
        .route("/:college_id/history", get(college_history))
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List all colleges
async fn list_colleges(
    State(state): State<AppState>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<Vec<college::Model>>> {
    Ok(Json(state.registry.list().await?))
}

/// Create a new college (super-admin only)
async fn create_college(
    State(state): State<AppState>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<CreateCollege>,
) -> Result<Json<college::Model>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(state.registry.create(data).await?))
}

/// Get college by ID
async fn get_college(
    State(state): State<AppState>,
    Path(college_id): Path<i64>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<college::Model>> {
    Ok(Json(state.registry.get(college_id).await?))
}

/// Get college by code (case-folded)
async fn get_college_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<college::Model>> {
    state
        .registry
        .find_by_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("College not found".to_string()))
}

/// Update a college (super-admin only)
async fn update_college(
    State(state): State<AppState>,
    Path(college_id): Path<i64>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<UpdateCollege>,
) -> Result<Json<college::Model>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(state.registry.update(college_id, data).await?))
}

/// Soft-delete a college (super-admin only). Refused while the college has
/// active tenure heads.
async fn delete_college(
    State(state): State<AppState>,
    Path(college_id): Path<i64>,
    SuperAdminUser(_): SuperAdminUser,
) -> Result<Json<serde_json::Value>> {
    state.registry.delete(college_id).await?;
    Ok(Json(serde_json::json!({"message": "College deactivated"})))
}

/// The current-heads roster for a college
async fn college_heads(
    State(state): State<AppState>,
    Path(college_id): Path<i64>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<Vec<TenureHead>>> {
    Ok(Json(state.registry.current_heads(college_id).await?))
}

/// Full tenure history for a college, most recent start first
async fn college_history(
    State(state): State<AppState>,
    Path(college_id): Path<i64>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<Vec<tenure_record::Model>>> {
    // 404 for unknown colleges rather than an empty history
    state.registry.get(college_id).await?;
    Ok(Json(state.ledger.find_history_by_college(college_id).await?))
}
