use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::{AuthAdmin, SuperAdminUser};
use crate::db::entities::prelude::*;
use crate::db::models::{AssignTenure, CreateAdmin, EndTenure, TransferTenure, UpdateAdmin};
use crate::error::{AppError, Result};
use crate::services::admins::AdminWithTenure;
use crate::state::AppState;

/// Create admin-management routes
pub fn admins_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/unassigned", get(list_unassigned))
        .route("/:admin_id", get(get_admin).patch(update_admin))
        .route("/:admin_id/assign", post(assign_tenure))
        .route("/:admin_id/transfer", post(transfer_admin))
        .route("/:admin_id/end-tenure", post(end_tenure))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListAdminsQuery {
    pub role: Option<AdminRole>,
    pub college_id: Option<i64>,
    #[serde(default)]
    pub active_only: bool,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List admins, optionally filtered by role or by college
async fn list_admins(
    State(state): State<AppState>,
    AuthAdmin(_): AuthAdmin,
    Query(query): Query<ListAdminsQuery>,
) -> Result<Json<Vec<AdminWithTenure>>> {
    let admins = match (query.college_id, query.role) {
        (Some(college_id), _) => {
            state
                .directory
                .list_by_college(college_id, query.active_only)
                .await?
        }
        (None, Some(role)) => state.directory.list_by_role(role).await?,
        (None, None) => state.directory.list().await?,
    };

    let mut responses = Vec::with_capacity(admins.len());
    for admin in admins {
        responses.push(state.directory.with_tenure(admin).await?);
    }
    Ok(Json(responses))
}

/// College-admins with no active tenure
async fn list_unassigned(
    State(state): State<AppState>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<Vec<admin::Model>>> {
    Ok(Json(state.directory.list_unassigned().await?))
}

/// Create a new admin (super-admin only)
async fn create_admin(
    State(state): State<AppState>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<CreateAdmin>,
) -> Result<Json<AdminWithTenure>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let admin = state.directory.create(data).await?;
    Ok(Json(state.directory.with_tenure(admin).await?))
}

/// Get an admin joined with its active tenure
async fn get_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
    AuthAdmin(_): AuthAdmin,
) -> Result<Json<AdminWithTenure>> {
    let admin = state.directory.get(admin_id).await?;
    Ok(Json(state.directory.with_tenure(admin).await?))
}

/// Update an admin (super-admin only)
async fn update_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<UpdateAdmin>,
) -> Result<Json<AdminWithTenure>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let admin = state.directory.update(admin_id, data).await?;
    Ok(Json(state.directory.with_tenure(admin).await?))
}

/// Assign an admin to govern a college for a batch year (super-admin only)
async fn assign_tenure(
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<AssignTenure>,
) -> Result<Json<AdminWithTenure>> {
    state
        .coordinator
        .assign(admin_id, data.college_id, data.batch_year, data.start_date)
        .await?;

    let admin = state.directory.get(admin_id).await?;
    Ok(Json(state.directory.with_tenure(admin).await?))
}

/// Move an admin to another college, keeping the batch year (super-admin only)
async fn transfer_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<TransferTenure>,
) -> Result<Json<AdminWithTenure>> {
    state
        .coordinator
        .transfer_admin(admin_id, data.college_id)
        .await?;

    let admin = state.directory.get(admin_id).await?;
    Ok(Json(state.directory.with_tenure(admin).await?))
}

/// End an admin's active tenure (super-admin only). Idempotent.
async fn end_tenure(
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
    SuperAdminUser(_): SuperAdminUser,
    Json(data): Json<EndTenure>,
) -> Result<Json<serde_json::Value>> {
    state.coordinator.end_tenure(admin_id, data.end_date).await?;
    Ok(Json(serde_json::json!({"message": "Tenure ended"})))
}
