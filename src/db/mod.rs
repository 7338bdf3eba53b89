pub mod entities;
pub mod models;

pub use entities::prelude;
pub use models::*;

use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, Set,
};
use std::time::Duration;

use crate::config::CONFIG;
use crate::error::Result;
use crate::services::security::hash_password;
use entities::prelude::*;

/// Create the database connection, run migrations and seed the bootstrap
/// super-admin when the admins table is empty.
pub async fn connect() -> Result<DatabaseConnection> {
    tracing::info!("Connecting to database: {}", CONFIG.db_path.display());

    let mut opts = ConnectOptions::new(CONFIG.db_url());
    opts.max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600));

    let db = Database::connect(opts).await?;

    run_migrations(&db).await?;
    seed_defaults(&db).await?;

    Ok(db)
}

/// Run database migrations
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    tracing::info!("Running database migrations...");
    db.execute_unprepared(SCHEMA_SQL).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Seed the bootstrap super-admin so a fresh install can log in
async fn seed_defaults(db: &DatabaseConnection) -> Result<()> {
    let admin_count = Admin::find().count(db).await?;

    if admin_count == 0 {
        tracing::info!(
            "Seeding bootstrap super-admin '{}'...",
            CONFIG.bootstrap_username
        );

        let now = chrono::Utc::now();
        let root = admin::ActiveModel {
            username: Set(CONFIG.bootstrap_username.clone()),
            email: Set(CONFIG.bootstrap_email.to_lowercase()),
            hashed_password: Set(hash_password(&CONFIG.bootstrap_password)?),
            full_name: Set("Portal Administrator".to_string()),
            role: Set(AdminRole::SuperAdmin),
            permissions: Set(serde_json::json!(["*"])),
            is_active: Set(true),
            tenure_active: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        root.insert(db).await?;

        tracing::info!("Bootstrap super-admin seeded");
    }

    Ok(())
}

/// SQL schema for creating all tables.
///
/// The partial unique indexes on `college_tenure_heads` are the storage-level
/// enforcement of the governance invariants: at most one active head per
/// (college, batch year) and at most one active tenure per admin. Two racing
/// assignments for the same slot cannot both commit.
pub const SCHEMA_SQL: &str = r#"
-- Admins table
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,
    full_name TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'college-admin',
    permissions TEXT NOT NULL DEFAULT '[]',
    is_active BOOLEAN NOT NULL DEFAULT 1,
    last_login DATETIME,
    current_college_id INTEGER,
    current_batch_year INTEGER,
    tenure_start DATETIME,
    tenure_end DATETIME,
    tenure_active BOOLEAN NOT NULL DEFAULT 0,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (current_college_id) REFERENCES colleges(id)
);

CREATE INDEX IF NOT EXISTS idx_admins_username ON admins(username);
CREATE INDEX IF NOT EXISTS idx_admins_email ON admins(email);
CREATE INDEX IF NOT EXISTS idx_admins_role ON admins(role);

-- Colleges table
CREATE TABLE IF NOT EXISTS colleges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE,
    location TEXT,
    address TEXT,
    contact_email TEXT,
    contact_phone TEXT,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_colleges_code ON colleges(code);

-- Tenure ledger: which admin governs which college for which batch year.
-- Rows are never deleted; ending a tenure flips is_active and stamps end_date.
CREATE TABLE IF NOT EXISTS college_tenure_heads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    college_id INTEGER NOT NULL,
    admin_id INTEGER NOT NULL,
    batch_year INTEGER NOT NULL,
    start_date DATETIME NOT NULL,
    end_date DATETIME,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (college_id) REFERENCES colleges(id),
    FOREIGN KEY (admin_id) REFERENCES admins(id)
);

CREATE INDEX IF NOT EXISTS idx_tenure_college ON college_tenure_heads(college_id);
CREATE INDEX IF NOT EXISTS idx_tenure_admin ON college_tenure_heads(admin_id);

-- One active head per (college, batch year); one active tenure per admin
CREATE UNIQUE INDEX IF NOT EXISTS idx_tenure_active_college_batch
    ON college_tenure_heads(college_id, batch_year) WHERE is_active = 1;
CREATE UNIQUE INDEX IF NOT EXISTS idx_tenure_active_admin
    ON college_tenure_heads(admin_id) WHERE is_active = 1;

-- Members table (onboarding collaborator)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    college_id INTEGER NOT NULL,
    batch_year INTEGER NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (college_id) REFERENCES colleges(id)
);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_college_batch ON users(college_id, batch_year);
"#;
