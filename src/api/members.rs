use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::entities::prelude::*;
use crate::db::models::RegisterMember;
use crate::error::{AppError, Result};
use crate::services::batch_validation::BatchValidation;
use crate::state::AppState;

/// Create member onboarding routes
pub fn members_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register_member))
        .route("/validate-batch", get(validate_batch))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ValidateBatchQuery {
    pub college_id: i64,
    pub batch_year: i32,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub member: member::Model,
    /// The admin governing the member's (college, batch year)
    pub admin_name: String,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Register a new member. The claimed (college, batch year) must have an
/// active governing admin.
async fn register_member(
    State(state): State<AppState>,
    Json(data): Json<RegisterMember>,
) -> Result<Json<RegisterResponse>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let validation = state
        .gateway
        .validate(data.college_id, data.batch_year)
        .await?;
    if !validation.valid {
        return Err(AppError::Validation(
            validation
                .error
                .unwrap_or_else(|| "registration rejected".to_string()),
        ));
    }

    let email = data.email.trim().to_lowercase();
    let existing = Member::find()
        .filter(member::Column::Email.eq(email.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let member = member::ActiveModel {
        full_name: Set(data.full_name),
        email: Set(email),
        college_id: Set(data.college_id),
        batch_year: Set(data.batch_year),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let member = member.insert(&state.db).await?;

    Ok(Json(RegisterResponse {
        member,
        admin_name: validation.admin_name.unwrap_or_default(),
    }))
}

/// Pre-check a (college, batch year) claim without registering
async fn validate_batch(
    State(state): State<AppState>,
    Query(query): Query<ValidateBatchQuery>,
) -> Result<Json<BatchValidation>> {
    Ok(Json(
        state
            .gateway
            .validate(query.college_id, query.batch_year)
            .await?,
    ))
}
