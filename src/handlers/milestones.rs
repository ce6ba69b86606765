//! Milestones: ordered by the date they were achieved.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::Milestone;
use crate::db::repo::{self, Collection, ListParams, ListQuery, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::schemas;
use crate::AppState;

static MILESTONES: Collection = Collection {
    table: "milestones",
    searchable: &["title", "description"],
    order_by: r#""achievedOn" DESC"#,
    slug: false,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(delete))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Milestone>>, ApiError> {
    let params = ListParams::from_query(&query);
    let page = repo::list(&state.db, &MILESTONES, &params).await?;
    Ok(Json(page))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Milestone>, ApiError> {
    repo::get_by_id(&state.db, &MILESTONES, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Milestone not found"))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    let fields = schemas::MILESTONE.validate(&body)?;
    let milestone = repo::insert(&state.db, &MILESTONES, &fields).await?;
    Ok((StatusCode::CREATED, Json(milestone)))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Milestone>, ApiError> {
    let fields = schemas::MILESTONE.validate_partial(&body)?;
    let milestone = repo::update(&state.db, &MILESTONES, &id, &fields).await?;
    Ok(Json(milestone))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, &MILESTONES, &id).await?;
    Ok(Json(json!({ "message": "Milestone deleted successfully" })))
}
