use sea_orm::DatabaseConnection;

use crate::services::{
    AdminDirectory, AssignmentCoordinator, BatchValidationGateway, CollegeRegistry, TenureLedger,
};

/// Application state: the database handle plus the explicitly constructed
/// core components. Handlers receive their collaborators from here instead
/// of reaching for shared globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub coordinator: AssignmentCoordinator,
    pub directory: AdminDirectory,
    pub registry: CollegeRegistry,
    pub ledger: TenureLedger,
    pub gateway: BatchValidationGateway,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            coordinator: AssignmentCoordinator::new(db.clone()),
            directory: AdminDirectory::new(db.clone()),
            registry: CollegeRegistry::new(db.clone()),
            ledger: TenureLedger::new(db.clone()),
            gateway: BatchValidationGateway::new(db.clone()),
            db,
        }
    }
}
