//! Token issue/verify and password hashing.
//!
//! Tokens are stateless HS256 bearer credentials carrying the admin user id;
//! they expire after the configured window (7 days by default) and are never
//! revoked server-side.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
        }
    }
}

/// Sign a token for the given admin user id.
pub fn issue_token(config: &AppConfig, subject: &str) -> Result<String, ApiError> {
    let claims = Claims::new(subject, config.jwt_expiry_hours);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("token generation failed: {}", e)))
}

/// Verify a token and return the embedded subject id.
///
/// Returns `None` for any malformed, tampered or expired token so the caller
/// can produce a uniform 401.
pub fn verify_token(secret: &str, token: &str) -> Option<String> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .ok()
        .map(|data| data.claims.sub)
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

/// Provision the admin account at startup if it does not exist yet.
pub async fn bootstrap_admin(pool: &SqlitePool, email: &str, password: &str) -> anyhow::Result<()> {
    let existing: Option<(String,)> =
        sqlx::query_as(r#"SELECT "id" FROM "admin_users" WHERE "email" = ?"#)
            .bind(email)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    sqlx::query(
        r#"INSERT INTO "admin_users" ("id", "email", "passwordHash", "createdAt") VALUES (?, ?, ?, ?)"#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    tracing::info!("provisioned admin account {}", email);
    Ok(())
}
