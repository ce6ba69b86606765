//! Login and password change.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::auth;
use crate::db::models::AdminUser;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::schemas;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/change-password", post(change_password))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same INVALID_CREDENTIALS
/// response so the endpoint leaks nothing about which part failed.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let fields = schemas::LOGIN.validate(&body)?;
    let email = fields["email"].as_str().unwrap_or_default();
    let password = fields["password"].as_str().unwrap_or_default();

    let user: Option<AdminUser> =
        sqlx::query_as(r#"SELECT * FROM "admin_users" WHERE "email" = ?"#)
            .bind(email)
            .fetch_optional(&state.db)
            .await?;

    let user = user.ok_or(ApiError::InvalidCredentials)?;
    if !auth::verify_password(password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::issue_token(&state.config, &user.id)?;
    Ok(Json(json!({
        "token": token,
        "user": { "id": user.id, "email": user.email },
    })))
}

/// POST /api/auth/change-password (bearer)
async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let fields = schemas::CHANGE_PASSWORD.validate(&body)?;
    let old_password = fields["oldPassword"].as_str().unwrap_or_default();
    let new_password = fields["newPassword"].as_str().unwrap_or_default();

    let record: Option<AdminUser> =
        sqlx::query_as(r#"SELECT * FROM "admin_users" WHERE "id" = ?"#)
            .bind(&user.user_id)
            .fetch_optional(&state.db)
            .await?;
    let record = record.ok_or_else(|| ApiError::not_found("User not found"))?;

    if !auth::verify_password(old_password, &record.password_hash) {
        return Err(ApiError::invalid_password("Current password is incorrect"));
    }

    let password_hash = auth::hash_password(new_password)?;
    sqlx::query(r#"UPDATE "admin_users" SET "passwordHash" = ? WHERE "id" = ?"#)
        .bind(&password_hash)
        .bind(&record.id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
