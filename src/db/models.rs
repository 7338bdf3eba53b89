use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::db::entities::admin::AdminRole;

// ============================================================================
// Admin Request Models (DTOs)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdmin {
    #[validate(length(min = 2, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,
    pub role: AdminRole,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAdmin {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignTenure {
    pub college_id: i64,
    pub batch_year: i32,
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferTenure {
    pub college_id: i64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EndTenure {
    pub end_date: Option<DateTime<Utc>>,
}

// ============================================================================
// College Request Models (DTOs)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollege {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 2, max = 16))]
    pub code: String,
    pub location: Option<String>,
    pub address: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateCollege {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Member Request Models (DTOs)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterMember {
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub college_id: i64,
    pub batch_year: i32,
}
