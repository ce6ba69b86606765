//! Site settings: a singleton row, auto-created with defaults on first read.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;

use crate::db::models::SiteSettings;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::schemas;
use crate::AppState;

const DEFAULT_SITE_NAME: &str = "Our NGO";
const DEFAULT_PRIMARY_HEX: &str = "#0038B8";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

async fn load_or_create(state: &AppState) -> Result<SiteSettings, ApiError> {
    let existing: Option<SiteSettings> =
        sqlx::query_as(r#"SELECT * FROM "site_settings" WHERE "id" = 1"#)
            .fetch_optional(&state.db)
            .await?;

    if let Some(settings) = existing {
        return Ok(settings);
    }

    sqlx::query(
        r#"INSERT INTO "site_settings" ("id", "siteName", "primaryHex", "updatedAt") VALUES (1, ?, ?, ?)"#,
    )
    .bind(DEFAULT_SITE_NAME)
    .bind(DEFAULT_PRIMARY_HEX)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    let created: SiteSettings = sqlx::query_as(r#"SELECT * FROM "site_settings" WHERE "id" = 1"#)
        .fetch_one(&state.db)
        .await?;
    Ok(created)
}

/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<SiteSettings>, ApiError> {
    let settings = load_or_create(&state).await?;
    Ok(Json(settings))
}

/// PUT /api/settings (bearer) - partial update of the singleton
async fn update_settings(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<SiteSettings>, ApiError> {
    let fields = schemas::SETTINGS.validate_partial(&body)?;

    // Make sure the row exists before applying the merge
    let current = load_or_create(&state).await?;

    let site_name = fields
        .get("siteName")
        .and_then(Value::as_str)
        .unwrap_or(&current.site_name);
    let primary_hex = fields
        .get("primaryHex")
        .and_then(Value::as_str)
        .unwrap_or(&current.primary_hex);
    let logo_url = match fields.get("logoUrl").and_then(Value::as_str) {
        Some(url) => Some(url.to_string()),
        None => current.logo_url.clone(),
    };

    sqlx::query(
        r#"UPDATE "site_settings" SET "siteName" = ?, "primaryHex" = ?, "logoUrl" = ?, "updatedAt" = ? WHERE "id" = 1"#,
    )
    .bind(site_name)
    .bind(primary_hex)
    .bind(&logo_url)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    let updated: SiteSettings = sqlx::query_as(r#"SELECT * FROM "site_settings" WHERE "id" = 1"#)
        .fetch_one(&state.db)
        .await?;
    Ok(Json(updated))
}
