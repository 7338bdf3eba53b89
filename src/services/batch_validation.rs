use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;

use crate::db::entities::prelude::*;
use crate::error::Result;
use crate::services::tenure::TenureLedger;

/// Outcome of validating a claimed (college, batch year) against the active
/// governance roster
#[derive(Debug, Clone, Serialize)]
pub struct BatchValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchValidation {
    fn ok(admin_name: String) -> Self {
        Self {
            valid: true,
            admin_name: Some(admin_name),
            error: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            valid: false,
            admin_name: None,
            error: Some(reason),
        }
    }
}

/// The join point between governance state and member onboarding: a member
/// may only register under a (college, batch year) that has an active
/// governing admin. Rejections carry a human-readable reason; only storage
/// faults surface as errors.
#[derive(Clone)]
pub struct BatchValidationGateway {
    db: DatabaseConnection,
}

impl BatchValidationGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn validate(&self, college_id: i64, batch_year: i32) -> Result<BatchValidation> {
        let Some(college) = College::find_by_id(college_id).one(&self.db).await? else {
            return Ok(BatchValidation::rejected("college not found".to_string()));
        };
        if !college.is_active {
            return Ok(BatchValidation::rejected(format!(
                "{} is no longer active",
                college.name
            )));
        }

        let Some(record) =
            TenureLedger::active_by_college_and_batch(&self.db, college_id, batch_year).await?
        else {
            return Ok(BatchValidation::rejected(format!(
                "no active admin for batch {} at {}",
                batch_year, college.name
            )));
        };

        let Some(admin) = Admin::find_by_id(record.admin_id).one(&self.db).await? else {
            return Ok(BatchValidation::rejected(format!(
                "no active admin for batch {} at {}",
                batch_year, college.name
            )));
        };

        Ok(BatchValidation::ok(admin.full_name))
    }
}
