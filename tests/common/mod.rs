#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ngo_cms_api::config::AppConfig;
use ngo_cms_api::{app, auth, db, AppState};

pub const ADMIN_EMAIL: &str = "admin@example.org";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Small ceiling so the oversize-upload test stays cheap.
pub const TEST_MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// In-process application instance backed by an in-memory database and a
/// temporary uploads directory. Each test spawns its own for isolation.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
    uploads: TempDir,
}

pub async fn spawn() -> Result<TestApp> {
    let uploads = TempDir::new()?;
    let config = AppConfig {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiry_hours: 24 * 7,
        uploads_dir: uploads.path().to_path_buf(),
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        public_url: "http://localhost:4000".to_string(),
        admin_email: None,
        admin_password: None,
    };

    let pool = db::connect(&config.database_url).await?;
    auth::bootstrap_admin(&pool, ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let (admin_id,): (String,) =
        sqlx::query_as(r#"SELECT "id" FROM "admin_users" WHERE "email" = ?"#)
            .bind(ADMIN_EMAIL)
            .fetch_one(&pool)
            .await?;

    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };
    let token = auth::issue_token(&state.config, &admin_id)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(TestApp {
        router: app(state.clone()),
        state,
        token,
        uploads,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| anyhow::anyhow!("request failed: {}", e))?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.request("GET", path, None, None).await
    }

    pub async fn get_auth(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.request("GET", path, Some(&self.token), None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request("POST", path, None, Some(body)).await
    }

    pub async fn post_auth(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request("POST", path, Some(&self.token), Some(body)).await
    }

    pub async fn put_auth(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request("PUT", path, Some(&self.token), Some(body)).await
    }

    pub async fn delete_auth(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.request("DELETE", path, Some(&self.token), None).await
    }

    /// Multipart upload with a single `file` field.
    pub async fn upload(
        &self,
        token: Option<&str>,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<(StatusCode, Value)> {
        let boundary = "test-boundary-7f93a1";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| anyhow::anyhow!("request failed: {}", e))?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    /// Number of files currently in the uploads directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn uploads_path(&self) -> &std::path::Path {
        self.uploads.path()
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or("")
}
