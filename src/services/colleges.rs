use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::db::entities::prelude::*;
use crate::db::models::{CreateCollege, UpdateCollege};
use crate::error::{AppError, Result};
use crate::services::tenure::TenureLedger;

/// One entry in a college's "current heads" roster
#[derive(Debug, Clone, Serialize)]
pub struct TenureHead {
    pub admin_id: i64,
    pub admin_name: String,
    pub admin_email: String,
    pub batch_year: i32,
    pub start_date: DateTime<Utc>,
}

/// College registry: CRUD over colleges plus the aggregated current-heads
/// projection. Deletion is soft-only and refused while any tenure at the
/// college is still active, so a college cannot vanish from under its heads.
#[derive(Clone)]
pub struct CollegeRegistry {
    db: DatabaseConnection,
}

impl CollegeRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, data: CreateCollege) -> Result<college::Model> {
        let code = data.code.trim().to_uppercase();

        if self.find_by_code(&code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "College code {} already exists",
                code
            )));
        }

        let now = Utc::now();
        let college = college::ActiveModel {
            name: Set(data.name),
            code: Set(code),
            location: Set(data.location),
            address: Set(data.address),
            contact_email: Set(data.contact_email),
            contact_phone: Set(data.contact_phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(college.insert(&self.db).await?)
    }

    /// Update college fields. Deactivating via `is_active: false` reaches the
    /// same state as `delete` and is refused under the same condition: no
    /// college leaves active tenure heads behind.
    pub async fn update(&self, college_id: i64, data: UpdateCollege) -> Result<college::Model> {
        let updated = self
            .db
            .transaction::<_, college::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let college = College::find_by_id(college_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| AppError::NotFound("College not found".to_string()))?;

                    if data.is_active == Some(false) && college.is_active {
                        let heads = TenureLedger::all_active_by_college(txn, college_id).await?;
                        if !heads.is_empty() {
                            return Err(AppError::Conflict(
                                "active tenure heads exist".to_string(),
                            ));
                        }
                    }

                    let mut active: college::ActiveModel = college.into();
                    if let Some(name) = data.name {
                        active.name = Set(name);
                    }
                    if let Some(location) = data.location {
                        active.location = Set(Some(location));
                    }
                    if let Some(address) = data.address {
                        active.address = Set(Some(address));
                    }
                    if let Some(contact_email) = data.contact_email {
                        active.contact_email = Set(Some(contact_email));
                    }
                    if let Some(contact_phone) = data.contact_phone {
                        active.contact_phone = Set(Some(contact_phone));
                    }
                    if let Some(is_active) = data.is_active {
                        active.is_active = Set(is_active);
                    }
                    active.updated_at = Set(Utc::now());
                    Ok(active.update(txn).await?)
                })
            })
            .await?;
        Ok(updated)
    }

    pub async fn find_by_id(&self, college_id: i64) -> Result<Option<college::Model>> {
        Ok(College::find_by_id(college_id).one(&self.db).await?)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<college::Model>> {
        Ok(College::find()
            .filter(college::Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await?)
    }

    pub async fn get(&self, college_id: i64) -> Result<college::Model> {
        self.find_by_id(college_id)
            .await?
            .ok_or_else(|| AppError::NotFound("College not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<college::Model>> {
        Ok(College::find()
            .order_by_asc(college::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Soft-delete a college. Fails with Conflict while any tenure at the
    /// college is still active.
    pub async fn delete(&self, college_id: i64) -> Result<()> {
        self.db
            .transaction::<_, (), AppError>(|txn| {
                Box::pin(async move {
                    let college = College::find_by_id(college_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| AppError::NotFound("College not found".to_string()))?;

                    let heads = TenureLedger::all_active_by_college(txn, college_id).await?;
                    if !heads.is_empty() {
                        return Err(AppError::Conflict(
                            "active tenure heads exist".to_string(),
                        ));
                    }

                    let mut active: college::ActiveModel = college.into();
                    active.is_active = Set(false);
                    active.updated_at = Set(Utc::now());
                    active.update(txn).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }

    /// The current-heads roster: one entry per active tenure at the college
    pub async fn current_heads(&self, college_id: i64) -> Result<Vec<TenureHead>> {
        // 404 for unknown colleges, empty roster for head-less ones
        self.get(college_id).await?;

        let rows = TenureRecord::find()
            .filter(tenure_record::Column::CollegeId.eq(college_id))
            .filter(tenure_record::Column::IsActive.eq(true))
            .order_by_asc(tenure_record::Column::BatchYear)
            .find_also_related(Admin)
            .all(&self.db)
            .await?;

        let mut heads = Vec::with_capacity(rows.len());
        for (record, admin) in rows {
            let admin = admin.ok_or_else(|| {
                AppError::Internal(format!(
                    "tenure record {} references missing admin {}",
                    record.id, record.admin_id
                ))
            })?;
            heads.push(TenureHead {
                admin_id: admin.id,
                admin_name: admin.full_name,
                admin_email: admin.email,
                batch_year: record.batch_year,
                start_date: record.start_date,
            });
        }
        Ok(heads)
    }
}
