use std::env;
use std::path::PathBuf;

/// Process-wide configuration, loaded once at startup and carried in
/// [`crate::AppState`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// JWT signing key. Mandatory: there is deliberately no built-in
    /// default, startup fails when it is missing or empty.
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Base URL prepended to `/uploads/<filename>` in stored media URLs.
    pub public_url: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024; // 5 MiB

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("CMS_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(4000);

        let jwt_secret = env::var("CMS_JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("CMS_JWT_SECRET must be set to a non-empty signing key");
        }

        Ok(Self {
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:cms.db".to_string()),
            jwt_secret,
            jwt_expiry_hours: env::var("CMS_JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24 * 7),
            uploads_dir: env::var("CMS_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: env::var("CMS_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            public_url: env::var("CMS_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            admin_email: env::var("CMS_ADMIN_EMAIL").ok(),
            admin_password: env::var("CMS_ADMIN_PASSWORD").ok(),
        })
    }
}
