//! Test helpers for unit testing against an in-memory SQLite database.

use sea_orm::{ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Set};

use crate::db::entities::prelude::*;
use crate::db::SCHEMA_SQL;

/// Create an in-memory SQLite database with the full schema applied.
///
/// Capped at one pooled connection: an in-memory SQLite database exists per
/// connection, so a larger pool would hand tests different empty databases.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);

    let db = Database::connect(opts)
        .await
        .expect("Failed to create test database");

    db.execute_unprepared(SCHEMA_SQL)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Insert a college and return the model
pub async fn create_test_college(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
) -> college::Model {
    let now = chrono::Utc::now();
    let college = college::ActiveModel {
        name: Set(name.to_string()),
        code: Set(code.to_string()),
        location: Set(None),
        address: Set(None),
        contact_email: Set(None),
        contact_phone: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    college.insert(db).await.unwrap()
}

/// Insert an admin with the given role and return the model
pub async fn create_test_admin(
    db: &DatabaseConnection,
    username: &str,
    role: AdminRole,
) -> admin::Model {
    let now = chrono::Utc::now();
    let admin = admin::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        // Not a real hash; password checks are covered in security tests
        hashed_password: Set("test-hash".to_string()),
        full_name: Set(format!("{} Adminson", username)),
        role: Set(role),
        permissions: Set(serde_json::json!([])),
        is_active: Set(true),
        tenure_active: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    admin.insert(db).await.unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_db() {
        let db = create_test_db().await;
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_helpers() {
        let db = create_test_db().await;
        let college = create_test_college(&db, "Riverside Engineering College", "REC").await;
        let admin = create_test_admin(&db, "alice", AdminRole::CollegeAdmin).await;

        assert_eq!(college.code, "REC");
        assert_eq!(admin.email, "alice@example.com");
        assert_eq!(admin.role, AdminRole::CollegeAdmin);
        assert!(!admin.tenure_active);
    }
}
