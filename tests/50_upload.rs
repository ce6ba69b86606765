//! Media uploads: type/size gates, disk + database consistency, deletion.

mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{error_code, TEST_MAX_UPLOAD_BYTES};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

#[tokio::test]
async fn upload_requires_auth() -> Result<()> {
    let app = common::spawn().await?;

    let (status, _) = app.upload(None, "photo.png", "image/png", PNG_BYTES).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_file_count(), 0);
    Ok(())
}

#[tokio::test]
async fn non_image_uploads_are_rejected_before_writing() -> Result<()> {
    let app = common::spawn().await?;
    let token = app.token.clone();

    let (status, body) = app
        .upload(Some(&token), "notes.txt", "text/plain", b"hello")
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_FILE_TYPE");
    assert_eq!(app.stored_file_count(), 0);

    let (_, media) = app.get_auth("/api/upload").await?;
    assert!(media.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn oversize_uploads_are_rejected() -> Result<()> {
    let app = common::spawn().await?;
    let token = app.token.clone();
    let big = vec![0u8; TEST_MAX_UPLOAD_BYTES + 1];

    let (status, body) = app.upload(Some(&token), "big.png", "image/png", &big).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "FILE_TOO_LARGE");
    assert_eq!(app.stored_file_count(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_file_field_is_an_error() -> Result<()> {
    let app = common::spawn().await?;
    let token = app.token.clone();

    // A multipart body whose only field is not named "file"
    let boundary = "test-boundary-7f93a1";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token),
        )
        .body(axum::body::Body::from(body))?;

    use http_body_util::BodyExt;
    use tower::ServiceExt;
    let response = app.router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&json), "NO_FILE");
    Ok(())
}

#[tokio::test]
async fn valid_upload_lands_on_disk_and_in_the_library() -> Result<()> {
    let app = common::spawn().await?;
    let token = app.token.clone();

    let (status, body) = app
        .upload(Some(&token), "photo.png", "image/png", PNG_BYTES)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert!(body["url"].as_str().unwrap().ends_with(filename));

    let stored = app.uploads_path().join(filename);
    assert_eq!(std::fs::read(&stored)?, PNG_BYTES);

    let (_, media) = app.get_auth("/api/upload").await?;
    let media = media.as_array().unwrap();
    assert_eq!(media.len(), 1);
    assert_eq!(media[0]["filename"], filename);
    Ok(())
}

#[tokio::test]
async fn deleting_media_removes_the_row_and_the_file() -> Result<()> {
    let app = common::spawn().await?;
    let token = app.token.clone();

    let (_, body) = app
        .upload(Some(&token), "photo.png", "image/png", PNG_BYTES)
        .await?;
    let id = body["id"].as_str().unwrap().to_string();
    let filename = body["filename"].as_str().unwrap().to_string();

    let (status, _) = app.delete_auth(&format!("/api/upload/{id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.uploads_path().join(&filename).exists());

    let (_, media) = app.get_auth("/api/upload").await?;
    assert!(media.as_array().unwrap().is_empty());

    let (status, body) = app.delete_auth(&format!("/api/upload/{id}")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn delete_tolerates_a_missing_backing_file() -> Result<()> {
    let app = common::spawn().await?;
    let token = app.token.clone();

    let (_, body) = app
        .upload(Some(&token), "photo.png", "image/png", PNG_BYTES)
        .await?;
    let id = body["id"].as_str().unwrap().to_string();
    let filename = body["filename"].as_str().unwrap().to_string();

    std::fs::remove_file(app.uploads_path().join(&filename))?;

    // The row still goes away even though the file was already gone
    let (status, _) = app.delete_auth(&format!("/api/upload/{id}")).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, media) = app.get_auth("/api/upload").await?;
    assert!(media.as_array().unwrap().is_empty());
    Ok(())
}
