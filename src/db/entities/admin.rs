use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin role. Super-admins carry global privilege and can never be bound
/// to a college or batch year; only college-admins hold tenures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    #[sea_orm(string_value = "super-admin")]
    SuperAdmin,
    #[sea_orm(string_value = "college-admin")]
    CollegeAdmin,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    /// Stored lowercase; lookups case-fold before comparing.
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: String,
    pub role: AdminRole,
    /// JSON array of permission strings.
    pub permissions: Json,
    pub is_active: bool,
    pub last_login: Option<DateTimeUtc>,
    // Denormalized snapshot of the single active tenure record (if any).
    // Always empty for super-admins.
    pub current_college_id: Option<i64>,
    pub current_batch_year: Option<i32>,
    pub tenure_start: Option<DateTimeUtc>,
    pub tenure_end: Option<DateTimeUtc>,
    pub tenure_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenure_record::Entity")]
    TenureRecords,
}

impl Related<super::tenure_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenureRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
