use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::db::entities::admin::{self, AdminRole};
use crate::error::Result;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin id
    pub role: AdminRole,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, hashed: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, hashed)?)
}

/// Issue an access token for an admin
pub fn create_token(admin: &admin::Model) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: admin.id.to_string(),
        role: admin.role,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(CONFIG.token_ttl_secs)).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
    )?)
}

/// Decode and validate an access token
pub fn decode_token(token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_admin() -> admin::Model {
        let now = Utc::now();
        admin::Model {
            id: 42,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            hashed_password: "x".to_string(),
            full_name: "Alice".to_string(),
            role: AdminRole::CollegeAdmin,
            permissions: serde_json::json!([]),
            is_active: true,
            last_login: None,
            current_college_id: None,
            current_batch_year: None,
            tenure_start: None,
            tenure_end: None,
            tenure_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hashed = hash_password("s3cret-pass").unwrap();
        assert_ne!(hashed, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_token_roundtrip() {
        let admin = sample_admin();
        let token = create_token(&admin).unwrap();
        let claims = decode_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, AdminRole::CollegeAdmin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_token("not-a-token").is_err());
    }
}
