//! Success stories: slugged long-form content.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::SuccessStory;
use crate::db::repo::{self, Collection, ListParams, ListQuery, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::sanitize::sanitize_fields;
use crate::validation::schemas;
use crate::AppState;

static STORIES: Collection = Collection {
    table: "stories",
    searchable: &["title", "excerpt"],
    order_by: r#""createdAt" DESC"#,
    slug: true,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:key", get(get_by_slug).put(update).delete(delete))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<SuccessStory>>, ApiError> {
    let params = ListParams::from_query(&query);
    let page = repo::list(&state.db, &STORIES, &params).await?;
    Ok(Json(page))
}

async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SuccessStory>, ApiError> {
    repo::get_by_slug(&state.db, &STORIES, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Story not found"))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SuccessStory>), ApiError> {
    let mut fields = schemas::STORY.validate(&body)?;
    sanitize_fields(&mut fields, &["content"]);

    let story = repo::insert(&state.db, &STORIES, &fields).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<SuccessStory>, ApiError> {
    let mut fields = schemas::STORY.validate_partial(&body)?;
    sanitize_fields(&mut fields, &["content"]);

    let story = repo::update(&state.db, &STORIES, &id, &fields).await?;
    Ok(Json(story))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, &STORIES, &id).await?;
    Ok(Json(json!({ "message": "Story deleted successfully" })))
}
