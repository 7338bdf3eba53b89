use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::db::entities::prelude::*;
use crate::db::models::{CreateAdmin, UpdateAdmin};
use crate::error::{AppError, Result};
use crate::services::security::hash_password;
use crate::services::tenure::TenureLedger;

/// The active tenure of an admin, joined with its college, for API responses
#[derive(Debug, Clone, Serialize)]
pub struct ActiveTenureView {
    pub college_id: i64,
    pub college_name: String,
    pub college_code: String,
    pub batch_year: i32,
    pub start_date: DateTime<Utc>,
}

/// Admin joined with its single active tenure (if any)
#[derive(Debug, Clone, Serialize)]
pub struct AdminWithTenure {
    #[serde(flatten)]
    pub admin: admin::Model,
    pub tenure: Option<ActiveTenureView>,
}

/// Admin directory: CRUD and lookups over admins, plus the denormalized
/// joined view used for API responses. Email is case-folded on write and on
/// lookup.
#[derive(Clone)]
pub struct AdminDirectory {
    db: DatabaseConnection,
}

impl AdminDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, data: CreateAdmin) -> Result<admin::Model> {
        let email = data.email.trim().to_lowercase();

        if self.find_by_username(&data.username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let now = Utc::now();
        let admin = admin::ActiveModel {
            username: Set(data.username),
            email: Set(email),
            hashed_password: Set(hash_password(&data.password)?),
            full_name: Set(data.full_name),
            role: Set(data.role),
            permissions: Set(serde_json::json!(data.permissions)),
            is_active: Set(true),
            tenure_active: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(admin.insert(&self.db).await?)
    }

    pub async fn update(&self, admin_id: i64, data: UpdateAdmin) -> Result<admin::Model> {
        let admin = self.get(admin_id).await?;

        if let Some(ref email) = data.email {
            let email = email.trim().to_lowercase();
            if email != admin.email && self.find_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let mut active: admin::ActiveModel = admin.into();
        if let Some(email) = data.email {
            active.email = Set(email.trim().to_lowercase());
        }
        if let Some(full_name) = data.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(is_active) = data.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(permissions) = data.permissions {
            active.permissions = Set(serde_json::json!(permissions));
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn find_by_id(&self, admin_id: i64) -> Result<Option<admin::Model>> {
        Ok(Admin::find_by_id(admin_id).one(&self.db).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<admin::Model>> {
        Ok(Admin::find()
            .filter(admin::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<admin::Model>> {
        Ok(Admin::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn get(&self, admin_id: i64) -> Result<admin::Model> {
        self.find_by_id(admin_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<admin::Model>> {
        Ok(Admin::find()
            .order_by_asc(admin::Column::Username)
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_role(&self, role: AdminRole) -> Result<Vec<admin::Model>> {
        Ok(Admin::find()
            .filter(admin::Column::Role.eq(role))
            .order_by_asc(admin::Column::Username)
            .all(&self.db)
            .await?)
    }

    /// Admins who have (or once had) a tenure at the college. With
    /// `active_only`, just the current heads.
    pub async fn list_by_college(
        &self,
        college_id: i64,
        active_only: bool,
    ) -> Result<Vec<admin::Model>> {
        let mut query = TenureRecord::find()
            .filter(tenure_record::Column::CollegeId.eq(college_id));
        if active_only {
            query = query.filter(tenure_record::Column::IsActive.eq(true));
        }
        let records = query.all(&self.db).await?;

        let mut admin_ids: Vec<i64> = records.into_iter().map(|r| r.admin_id).collect();
        admin_ids.sort_unstable();
        admin_ids.dedup();

        Ok(Admin::find()
            .filter(admin::Column::Id.is_in(admin_ids))
            .order_by_asc(admin::Column::Username)
            .all(&self.db)
            .await?)
    }

    /// College-admins with no active tenure anywhere
    pub async fn list_unassigned(&self) -> Result<Vec<admin::Model>> {
        Ok(Admin::find()
            .filter(admin::Column::Role.eq(AdminRole::CollegeAdmin))
            .filter(admin::Column::TenureActive.eq(false))
            .order_by_asc(admin::Column::Username)
            .all(&self.db)
            .await?)
    }

    /// Join an admin with its active tenure record and that record's college
    pub async fn with_tenure(&self, admin: admin::Model) -> Result<AdminWithTenure> {
        let ledger = TenureLedger::new(self.db.clone());
        let tenure = match ledger.find_active_by_admin(admin.id).await? {
            Some(record) => {
                let college = College::find_by_id(record.college_id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "tenure record {} references missing college {}",
                            record.id, record.college_id
                        ))
                    })?;
                Some(ActiveTenureView {
                    college_id: college.id,
                    college_name: college.name,
                    college_code: college.code,
                    batch_year: record.batch_year,
                    start_date: record.start_date,
                })
            }
            None => None,
        };
        Ok(AdminWithTenure { admin, tenure })
    }

    /// Stamp last_login after a successful authentication
    pub async fn touch_login(&self, admin_id: i64) -> Result<()> {
        let admin = self.get(admin_id).await?;
        let mut active: admin::ActiveModel = admin.into();
        active.last_login = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }
}
