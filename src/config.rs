use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Database
    pub db_path: PathBuf,

    // JWT
    pub jwt_secret: String,
    pub token_ttl_secs: i64,

    // Bootstrap super-admin (seeded when the admins table is empty)
    pub bootstrap_username: String,
    pub bootstrap_email: String,
    pub bootstrap_password: String,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            // Server
            host: env::var("PORTAL_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORTAL_API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            // Database
            db_path: PathBuf::from(
                env::var("PORTAL_DB_PATH").unwrap_or_else(|_| "/data/collegio.db".to_string()),
            ),

            // JWT
            jwt_secret: env::var("PORTAL_JWT_SECRET")
                .unwrap_or_else(|_| "insecure-dev-secret".to_string()),
            token_ttl_secs: env::var("PORTAL_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),

            // Bootstrap super-admin
            bootstrap_username: env::var("PORTAL_BOOTSTRAP_USERNAME")
                .unwrap_or_else(|_| "root".to_string()),
            bootstrap_email: env::var("PORTAL_BOOTSTRAP_EMAIL")
                .unwrap_or_else(|_| "root@localhost".to_string()),
            bootstrap_password: env::var("PORTAL_BOOTSTRAP_PASSWORD")
                .unwrap_or_else(|_| "changeme".to_string()),

            // Build info
            version: env!("CARGO_PKG_VERSION").to_string(),

            // Logging
            log_level: env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn db_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.db_path.display())
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
