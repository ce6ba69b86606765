//! Media uploads: multipart image intake plus the admin media library.
//!
//! A file only ever exists on disk together with its media row: a failed
//! row insert deletes the just-written file before the error returns, and
//! a rejected file is never written at all.

use axum::extract::{Multipart, Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::models::MediaAsset;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(upload))
        .route("/:id", axum::routing::delete(delete))
}

/// Unique on-disk name: millisecond timestamp + random token + original
/// extension.
fn unique_filename(original: &str) -> String {
    let extension = original.rsplit('.').next().filter(|ext| {
        !ext.is_empty() && ext.len() <= 8 && *ext != original
    });
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    match extension {
        Some(ext) => format!("{}_{}.{}", Utc::now().timestamp_millis(), token, ext.to_lowercase()),
        None => format!("{}_{}", Utc::now().timestamp_millis(), token),
    }
}

/// POST /api/upload (bearer) - single multipart `file` field
async fn upload(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::upload(format!("Malformed upload: {}", e), "UPLOAD_ERROR"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::upload(format!("Failed to read upload: {}", e), "UPLOAD_ERROR"))?;
        file = Some((original_name, content_type, data.to_vec()));
    }

    let (original_name, content_type, data) =
        file.ok_or_else(|| ApiError::upload("No file provided", "NO_FILE"))?;

    if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::upload(
            "Invalid file type. Only images are allowed.",
            "INVALID_FILE_TYPE",
        ));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(ApiError::upload("File size too large", "FILE_TOO_LARGE"));
    }

    let filename = unique_filename(&original_name);
    let path = state.config.uploads_dir.join(&filename);
    tokio::fs::write(&path, &data).await?;

    let id = Uuid::new_v4().to_string();
    let url = format!("{}/uploads/{}", state.config.public_url, filename);
    let inserted = sqlx::query(
        r#"INSERT INTO "media" ("id", "url", "filename", "createdAt") VALUES (?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(&url)
    .bind(&filename)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await;

    if let Err(e) = inserted {
        // Compensate: no dangling file without a media row
        if let Err(cleanup) = tokio::fs::remove_file(&path).await {
            tracing::warn!("failed to remove orphaned upload {}: {}", filename, cleanup);
        }
        return Err(e.into());
    }

    tracing::info!("stored upload {} ({} bytes)", filename, data.len());
    Ok(Json(json!({ "url": url, "filename": filename, "id": id })))
}

/// GET /api/upload (bearer) - media library, newest first
async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<MediaAsset>>, ApiError> {
    let media: Vec<MediaAsset> =
        sqlx::query_as(r#"SELECT * FROM "media" ORDER BY "createdAt" DESC"#)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(media))
}

/// DELETE /api/upload/:id (bearer) - removes the record and the file.
/// A missing backing file is logged and ignored; the record is the source
/// of truth for listings.
async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let media: Option<MediaAsset> = sqlx::query_as(r#"SELECT * FROM "media" WHERE "id" = ?"#)
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;
    let media = media.ok_or_else(|| ApiError::not_found("Media not found"))?;

    sqlx::query(r#"DELETE FROM "media" WHERE "id" = ?"#)
        .bind(&id)
        .execute(&state.db)
        .await?;

    let path = state.config.uploads_dir.join(&media.filename);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("backing file missing for media {}: {}", media.id, e);
    }

    Ok(Json(json!({ "message": "Media deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_filenames_keep_the_extension() {
        let name = unique_filename("photo.JPG");
        assert!(name.ends_with(".jpg"));
        assert!(!name.contains("photo"));
    }

    #[test]
    fn extensionless_names_get_no_trailing_dot() {
        let name = unique_filename("photo");
        assert!(!name.contains('.'));
    }

    #[test]
    fn generated_names_do_not_collide() {
        let a = unique_filename("a.png");
        let b = unique_filename("a.png");
        assert_ne!(a, b);
    }
}
