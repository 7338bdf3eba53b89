use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One time-bounded assignment of an admin to govern a college for a batch
/// year. Rows are never deleted; ending a tenure flips `is_active` and
/// stamps `end_date`, so the table doubles as the governance audit trail.
///
/// Invariants (also enforced by partial unique indexes in the schema):
/// at most one active row per (college_id, batch_year), at most one active
/// row per admin_id, and `is_active` is true exactly when `end_date` is null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "college_tenure_heads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub college_id: i64,
    pub admin_id: i64,
    pub batch_year: i32,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id"
    )]
    Admin,
    #[sea_orm(
        belongs_to = "super::college::Entity",
        from = "Column::CollegeId",
        to = "super::college::Column::Id"
    )]
    College,
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::college::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::College.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
