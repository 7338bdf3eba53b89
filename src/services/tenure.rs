use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::prelude::*;
use crate::error::Result;

/// The tenure ledger: every admin-to-college assignment ever made, with its
/// batch year and validity interval. Append-mostly; the only mutation a row
/// ever sees after insert is the is_active/end_date transition (plus
/// reactivation of a prior (admin, college) row when the same pairing is
/// assigned again). There is no delete.
///
/// Reads go through the owned connection; writes are crate-internal and take
/// the caller's connection so the coordinator can run them inside a single
/// transaction.
#[derive(Clone)]
pub struct TenureLedger {
    db: DatabaseConnection,
}

impl TenureLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The active head for (college, batch year), if any
    pub async fn find_active_by_college_and_batch(
        &self,
        college_id: i64,
        batch_year: i32,
    ) -> Result<Option<tenure_record::Model>> {
        Self::active_by_college_and_batch(&self.db, college_id, batch_year).await
    }

    /// The admin's single active tenure, if any
    pub async fn find_active_by_admin(
        &self,
        admin_id: i64,
    ) -> Result<Option<tenure_record::Model>> {
        Self::active_by_admin(&self.db, admin_id).await
    }

    /// The multi-head roster: every currently active tenure at the college
    pub async fn find_all_active_by_college(
        &self,
        college_id: i64,
    ) -> Result<Vec<tenure_record::Model>> {
        Self::all_active_by_college(&self.db, college_id).await
    }

    /// Full governance history for a college, most recent start first
    pub async fn find_history_by_college(
        &self,
        college_id: i64,
    ) -> Result<Vec<tenure_record::Model>> {
        Ok(TenureRecord::find()
            .filter(tenure_record::Column::CollegeId.eq(college_id))
            .order_by_desc(tenure_record::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    // ------------------------------------------------------------------
    // Transaction-aware queries and mutations, used by the coordinator
    // ------------------------------------------------------------------

    pub(crate) async fn active_by_college_and_batch<C: ConnectionTrait>(
        conn: &C,
        college_id: i64,
        batch_year: i32,
    ) -> Result<Option<tenure_record::Model>> {
        Ok(TenureRecord::find()
            .filter(tenure_record::Column::CollegeId.eq(college_id))
            .filter(tenure_record::Column::BatchYear.eq(batch_year))
            .filter(tenure_record::Column::IsActive.eq(true))
            .one(conn)
            .await?)
    }

    pub(crate) async fn active_by_admin<C: ConnectionTrait>(
        conn: &C,
        admin_id: i64,
    ) -> Result<Option<tenure_record::Model>> {
        Ok(TenureRecord::find()
            .filter(tenure_record::Column::AdminId.eq(admin_id))
            .filter(tenure_record::Column::IsActive.eq(true))
            .one(conn)
            .await?)
    }

    pub(crate) async fn all_active_by_college<C: ConnectionTrait>(
        conn: &C,
        college_id: i64,
    ) -> Result<Vec<tenure_record::Model>> {
        Ok(TenureRecord::find()
            .filter(tenure_record::Column::CollegeId.eq(college_id))
            .filter(tenure_record::Column::IsActive.eq(true))
            .order_by_asc(tenure_record::Column::BatchYear)
            .all(conn)
            .await?)
    }

    /// Most recent record for an (admin, college) pairing, active or not
    pub(crate) async fn latest_for_admin_and_college<C: ConnectionTrait>(
        conn: &C,
        admin_id: i64,
        college_id: i64,
    ) -> Result<Option<tenure_record::Model>> {
        Ok(TenureRecord::find()
            .filter(tenure_record::Column::AdminId.eq(admin_id))
            .filter(tenure_record::Column::CollegeId.eq(college_id))
            .order_by_desc(tenure_record::Column::StartDate)
            .one(conn)
            .await?)
    }

    /// Insert a fresh open-ended record
    pub(crate) async fn open<C: ConnectionTrait>(
        conn: &C,
        college_id: i64,
        admin_id: i64,
        batch_year: i32,
        start_date: DateTime<Utc>,
    ) -> Result<tenure_record::Model> {
        let now = Utc::now();
        let record = tenure_record::ActiveModel {
            college_id: Set(college_id),
            admin_id: Set(admin_id),
            batch_year: Set(batch_year),
            start_date: Set(start_date),
            end_date: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(record.insert(conn).await?)
    }

    /// Reactivate an existing (admin, college) record for a new stint
    pub(crate) async fn reopen<C: ConnectionTrait>(
        conn: &C,
        record: tenure_record::Model,
        batch_year: i32,
        start_date: DateTime<Utc>,
    ) -> Result<tenure_record::Model> {
        let mut active: tenure_record::ActiveModel = record.into();
        active.batch_year = Set(batch_year);
        active.start_date = Set(start_date);
        active.end_date = Set(None);
        active.is_active = Set(true);
        active.updated_at = Set(Utc::now());
        Ok(active.update(conn).await?)
    }

    /// End an active record: flip the flag, stamp end_date. History stays.
    pub(crate) async fn close<C: ConnectionTrait>(
        conn: &C,
        record: tenure_record::Model,
        end_date: DateTime<Utc>,
    ) -> Result<tenure_record::Model> {
        let mut active: tenure_record::ActiveModel = record.into();
        active.end_date = Set(Some(end_date));
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        Ok(active.update(conn).await?)
    }
}
