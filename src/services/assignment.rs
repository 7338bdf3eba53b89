use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set, TransactionTrait,
};

use crate::db::entities::prelude::*;
use crate::error::{AppError, Result};
use crate::services::tenure::TenureLedger;

/// Orchestrates assign / end / transfer across the tenure ledger and the
/// admin directory. Every mutation runs as one transaction: either the
/// ledger row, the ended previous row and the admin snapshot all commit, or
/// none do. The partial unique indexes on the ledger back the same
/// invariants at the storage layer, so two racing assignments for one
/// (college, batch year) slot cannot both succeed.
#[derive(Clone)]
pub struct AssignmentCoordinator {
    db: DatabaseConnection,
}

impl AssignmentCoordinator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assign an admin to govern a college for a batch year.
    ///
    /// Only college-admins are assignable; a super-admin can never be bound
    /// to a college or batch year. If the admin currently governs a
    /// different college, that tenure is ended in the same transaction (a
    /// transfer). A prior record for the same (admin, college) pairing is
    /// reactivated instead of inserting a duplicate, so the pairing keeps a
    /// single ledger row across stints.
    pub async fn assign(
        &self,
        admin_id: i64,
        college_id: i64,
        batch_year: i32,
        start_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.db
            .transaction::<_, (), AppError>(move |txn| {
                Box::pin(async move {
                    Self::assign_in_txn(txn, admin_id, college_id, batch_year, start_date).await
                })
            })
            .await?;

        tracing::info!(
            admin_id,
            college_id,
            batch_year,
            "admin assigned as tenure head"
        );
        Ok(())
    }

    async fn assign_in_txn(
        txn: &DatabaseTransaction,
        admin_id: i64,
        college_id: i64,
        batch_year: i32,
        start_date: Option<DateTime<Utc>>,
    ) -> std::result::Result<(), AppError> {
        let now = Utc::now();

        let admin = Admin::find_by_id(admin_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;
        if !admin.is_active {
            return Err(AppError::Validation(
                "Admin account is deactivated".to_string(),
            ));
        }
        if admin.role == AdminRole::SuperAdmin {
            return Err(AppError::Validation(
                "A super-admin cannot be bound to a college or batch year".to_string(),
            ));
        }

        let college = College::find_by_id(college_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("College not found".to_string()))?;
        if !college.is_active {
            return Err(AppError::Validation("College is deactivated".to_string()));
        }

        // 1. The (college, batch year) slot may only be held by this admin
        if let Some(holder) =
            TenureLedger::active_by_college_and_batch(txn, college_id, batch_year).await?
        {
            if holder.admin_id != admin_id {
                return Err(AppError::Conflict(format!(
                    "Batch year {} at {} conflicts with an existing active assignment",
                    batch_year, college.code
                )));
            }
        }

        // 2. An admin holds at most one active assignment: end any tenure at
        //    a different college before opening the new one
        if let Some(current) = TenureLedger::active_by_admin(txn, admin_id).await? {
            if current.college_id != college_id {
                TenureLedger::close(txn, current, now).await?;
            }
        }

        // 3. Reactivate the (admin, college) row if one exists, else insert
        let start = start_date.unwrap_or(now);
        let record =
            match TenureLedger::latest_for_admin_and_college(txn, admin_id, college_id).await? {
                Some(existing) => TenureLedger::reopen(txn, existing, batch_year, start).await?,
                None => TenureLedger::open(txn, college_id, admin_id, batch_year, start).await?,
            };

        // 4. Mirror the active record into the admin snapshot
        let mut active: admin::ActiveModel = admin.into();
        active.current_college_id = Set(Some(college_id));
        active.current_batch_year = Set(Some(batch_year));
        active.tenure_start = Set(Some(record.start_date));
        active.tenure_end = Set(None);
        active.tenure_active = Set(true);
        active.updated_at = Set(now);
        active.update(txn).await?;

        Ok(())
    }

    /// End the admin's active tenure. Idempotent: ending an already-ended or
    /// never-started tenure is a successful no-op.
    pub async fn end_tenure(&self, admin_id: i64, end_date: Option<DateTime<Utc>>) -> Result<()> {
        self.db
            .transaction::<_, (), AppError>(move |txn| {
                Box::pin(async move {
                    let admin = Admin::find_by_id(admin_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

                    let Some(current) = TenureLedger::active_by_admin(txn, admin_id).await? else {
                        return Ok(());
                    };

                    let end = end_date.unwrap_or_else(Utc::now);
                    TenureLedger::close(txn, current, end).await?;

                    let mut active: admin::ActiveModel = admin.into();
                    active.current_college_id = Set(None);
                    active.current_batch_year = Set(None);
                    active.tenure_start = Set(None);
                    active.tenure_end = Set(Some(end));
                    active.tenure_active = Set(false);
                    active.updated_at = Set(Utc::now());
                    active.update(txn).await?;

                    Ok(())
                })
            })
            .await?;

        tracing::info!(admin_id, "tenure ended");
        Ok(())
    }

    /// Move an admin to another college, keeping the batch year of the
    /// current tenure. Runs the full assign inside one transaction together
    /// with the current-tenure lookup, so the batch year cannot go stale
    /// between the read and the move; an admin with no active tenure has
    /// nothing to transfer.
    pub async fn transfer_admin(&self, admin_id: i64, new_college_id: i64) -> Result<()> {
        self.db
            .transaction::<_, (), AppError>(move |txn| {
                Box::pin(async move {
                    if Admin::find_by_id(admin_id).one(txn).await?.is_none() {
                        return Err(AppError::NotFound("Admin not found".to_string()));
                    }

                    let current =
                        TenureLedger::active_by_admin(txn, admin_id).await?.ok_or_else(|| {
                            AppError::Validation(
                                "Admin has no active tenure to transfer".to_string(),
                            )
                        })?;

                    // Transferring to the current college would only reset the
                    // start date; treat it as a no-op.
                    if current.college_id == new_college_id {
                        return Ok(());
                    }

                    Self::assign_in_txn(txn, admin_id, new_college_id, current.batch_year, None)
                        .await
                })
            })
            .await?;

        tracing::info!(admin_id, new_college_id, "admin transferred");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_admin, create_test_college, create_test_db};
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};

    use crate::db::entities::tenure_record;

    async fn active_count_for_admin(db: &DatabaseConnection, admin_id: i64) -> u64 {
        TenureRecord::find()
            .filter(tenure_record::Column::AdminId.eq(admin_id))
            .filter(tenure_record::Column::IsActive.eq(true))
            .count(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_assign_round_trip() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator
            .assign(alice.id, college.id, 2025, None)
            .await
            .unwrap();

        let record = TenureLedger::new(db.clone())
            .find_active_by_admin(alice.id)
            .await
            .unwrap()
            .expect("active tenure");
        assert_eq!(record.college_id, college.id);
        assert_eq!(record.batch_year, 2025);
        assert!(record.is_active);
        assert!(record.end_date.is_none());

        // Snapshot mirrors the record
        let alice = Admin::find_by_id(alice.id).one(&db).await.unwrap().unwrap();
        assert_eq!(alice.current_college_id, Some(college.id));
        assert_eq!(alice.current_batch_year, Some(2025));
        assert!(alice.tenure_active);
        assert!(alice.tenure_end.is_none());
    }

    #[tokio::test]
    async fn test_batch_year_conflict_leaves_holder_untouched() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;
        let bob = create_test_admin(&db, "bob", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator
            .assign(alice.id, college.id, 2025, None)
            .await
            .unwrap();

        let err = coordinator
            .assign(bob.id, college.id, 2025, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Alice's record is unaffected, bob got nothing
        let ledger = TenureLedger::new(db.clone());
        let record = ledger.find_active_by_admin(alice.id).await.unwrap().unwrap();
        assert_eq!(record.batch_year, 2025);
        assert!(ledger.find_active_by_admin(bob.id).await.unwrap().is_none());

        // And bob's snapshot stayed clean: the failed transaction rolled back
        let bob = Admin::find_by_id(bob.id).one(&db).await.unwrap().unwrap();
        assert!(!bob.tenure_active);
    }

    #[tokio::test]
    async fn test_transfer_ends_previous_tenure() {
        let db = create_test_db().await;
        let c1 = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let c2 = create_test_college(&db, "Hillview Arts College", "HAC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;
        let bob = create_test_admin(&db, "bob", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator.assign(alice.id, c1.id, 2024, None).await.unwrap();
        coordinator.assign(bob.id, c1.id, 2025, None).await.unwrap();

        // Alice moves to the other college; assign models the transfer
        coordinator.assign(alice.id, c2.id, 2024, None).await.unwrap();

        assert_eq!(active_count_for_admin(&db, alice.id).await, 1);
        let ledger = TenureLedger::new(db.clone());
        let record = ledger.find_active_by_admin(alice.id).await.unwrap().unwrap();
        assert_eq!(record.college_id, c2.id);

        // Her old record at c1 is ended, not deleted
        let history = ledger.find_history_by_college(c1.id).await.unwrap();
        let old = history.iter().find(|r| r.admin_id == alice.id).unwrap();
        assert!(!old.is_active);
        assert!(old.end_date.is_some());

        // Bob's active record at c1 is untouched
        let bob_record = ledger.find_active_by_admin(bob.id).await.unwrap().unwrap();
        assert_eq!(bob_record.college_id, c1.id);
        assert_eq!(bob_record.batch_year, 2025);
    }

    #[tokio::test]
    async fn test_transfer_admin_routes_through_assign() {
        let db = create_test_db().await;
        let c1 = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let c2 = create_test_college(&db, "Hillview Arts College", "HAC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;
        let bob = create_test_admin(&db, "bob", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator.assign(alice.id, c1.id, 2025, None).await.unwrap();
        coordinator.assign(bob.id, c2.id, 2025, None).await.unwrap();

        // The target slot (c2, 2025) is held by bob: the transfer carries the
        // same conflict check as a direct assign
        let err = coordinator.transfer_admin(alice.id, c2.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Alice stays at c1
        let record = TenureLedger::new(db.clone())
            .find_active_by_admin(alice.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.college_id, c1.id);
    }

    #[tokio::test]
    async fn test_transfer_carries_batch_year_atomically() {
        let db = create_test_db().await;
        let c1 = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let c2 = create_test_college(&db, "Hillview Arts College", "HAC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator.assign(alice.id, c1.id, 2024, None).await.unwrap();
        coordinator.transfer_admin(alice.id, c2.id).await.unwrap();

        // One commit: the old record is closed, the new one carries the same
        // batch year, and the snapshot points at the new college
        assert_eq!(active_count_for_admin(&db, alice.id).await, 1);
        let ledger = TenureLedger::new(db.clone());
        let record = ledger.find_active_by_admin(alice.id).await.unwrap().unwrap();
        assert_eq!(record.college_id, c2.id);
        assert_eq!(record.batch_year, 2024);

        let old = ledger.find_history_by_college(c1.id).await.unwrap();
        assert!(!old[0].is_active);
        assert!(old[0].end_date.is_some());

        let alice = Admin::find_by_id(alice.id).one(&db).await.unwrap().unwrap();
        assert_eq!(alice.current_college_id, Some(c2.id));
        assert_eq!(alice.current_batch_year, Some(2024));

        // Transferring to the college already held is a no-op
        coordinator.transfer_admin(alice.id, c2.id).await.unwrap();
        assert_eq!(active_count_for_admin(&db, alice.id).await, 1);
    }

    #[tokio::test]
    async fn test_transfer_without_active_tenure() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db);
        let err = coordinator
            .transfer_admin(alice.id, college.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reassignment_reuses_prior_record() {
        let db = create_test_db().await;
        let c1 = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let c2 = create_test_college(&db, "Hillview Arts College", "HAC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator.assign(alice.id, c1.id, 2024, None).await.unwrap();
        coordinator.assign(alice.id, c2.id, 2024, None).await.unwrap();
        coordinator.assign(alice.id, c1.id, 2025, None).await.unwrap();

        // Coming back to c1 reactivated the existing (alice, c1) row instead
        // of inserting a second one
        let c1_rows = TenureRecord::find()
            .filter(tenure_record::Column::AdminId.eq(alice.id))
            .filter(tenure_record::Column::CollegeId.eq(c1.id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(c1_rows, 1);

        let record = TenureLedger::new(db.clone())
            .find_active_by_admin(alice.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.college_id, c1.id);
        assert_eq!(record.batch_year, 2025);
        assert!(record.end_date.is_none());
    }

    #[tokio::test]
    async fn test_end_tenure_is_idempotent() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        coordinator
            .assign(alice.id, college.id, 2025, None)
            .await
            .unwrap();

        coordinator.end_tenure(alice.id, None).await.unwrap();

        let ledger = TenureLedger::new(db.clone());
        let after_first = ledger.find_history_by_college(college.id).await.unwrap();
        let end_date = after_first[0].end_date;
        assert!(end_date.is_some());

        // Second call is a no-op and does not move the end date
        coordinator.end_tenure(alice.id, None).await.unwrap();
        let after_second = ledger.find_history_by_college(college.id).await.unwrap();
        assert_eq!(after_second, after_first);

        // Ending a never-started tenure also succeeds
        let bob = create_test_admin(&db, "bob", AdminRole::CollegeAdmin).await;
        coordinator.end_tenure(bob.id, None).await.unwrap();

        // Snapshot was cleared
        let alice = Admin::find_by_id(alice.id).one(&db).await.unwrap().unwrap();
        assert!(!alice.tenure_active);
        assert!(alice.current_college_id.is_none());
        assert!(alice.current_batch_year.is_none());
        assert_eq!(alice.tenure_end, end_date);
    }

    #[tokio::test]
    async fn test_super_admin_cannot_be_assigned() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let root = create_test_admin(&db, "root", AdminRole::SuperAdmin).await;

        let coordinator = AssignmentCoordinator::new(db);
        let err = coordinator
            .assign(root.id, college.id, 2025, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_admin_and_college() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db);
        let err = coordinator.assign(999, college.id, 2025, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = coordinator.assign(alice.id, 999, 2025, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deactivated_admin_rejected() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let mut active: admin::ActiveModel = alice.clone().into();
        active.is_active = Set(false);
        active.update(&db).await.unwrap();

        let coordinator = AssignmentCoordinator::new(db);
        let err = coordinator
            .assign(alice.id, college.id, 2025, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_per_admin_uniqueness_across_many_assigns() {
        let db = create_test_db().await;
        let c1 = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let c2 = create_test_college(&db, "Hillview Arts College", "HAC").await;
        let c3 = create_test_college(&db, "Lakeside Science College", "LSC").await;
        let alice = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        let coordinator = AssignmentCoordinator::new(db.clone());
        for (college, year) in [(c1.id, 2024), (c2.id, 2024), (c3.id, 2025), (c1.id, 2025)] {
            coordinator.assign(alice.id, college, year, None).await.unwrap();
            assert_eq!(active_count_for_admin(&db, alice.id).await, 1);
        }
    }
}
