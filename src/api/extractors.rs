use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use sea_orm::EntityTrait;

use crate::db::entities::prelude::*;
use crate::error::AppError;
use crate::services::security::decode_token;
use crate::state::AppState;

/// Extractor for authenticated admins
pub struct AuthAdmin(pub admin::Model);

/// Extractor for super-admins
pub struct SuperAdminUser(pub admin::Model);

#[async_trait]
impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = extract_admin_from_token(parts, state).await?;
        Ok(AuthAdmin(admin))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SuperAdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = extract_admin_from_token(parts, state).await?;
        if admin.role != AdminRole::SuperAdmin {
            return Err(AppError::Forbidden(
                "Super-admin access required".to_string(),
            ));
        }
        Ok(SuperAdminUser(admin))
    }
}

/// Extract the admin from a bearer token
async fn extract_admin_from_token(
    parts: &Parts,
    state: &AppState,
) -> Result<admin::Model, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Bearer token required".to_string()))?;

    let claims = decode_token(token)?;
    let admin_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    let admin = Admin::find_by_id(admin_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown admin".to_string()))?;

    if !admin.is_active {
        return Err(AppError::Unauthorized(
            "Admin account is deactivated".to_string(),
        ));
    }

    Ok(admin)
}
