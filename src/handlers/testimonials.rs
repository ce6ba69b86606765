//! Testimonials: unslugged, newest first.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::Testimonial;
use crate::db::repo::{self, Collection, ListParams, ListQuery, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::schemas;
use crate::AppState;

static TESTIMONIALS: Collection = Collection {
    table: "testimonials",
    searchable: &["name", "quote", "role"],
    order_by: r#""createdAt" DESC"#,
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
) -> Result<Json<Page<Testimonial>>, ApiError> {
    let params = ListParams::from_query(&query);
    let page = repo::list(&state.db, &TESTIMONIALS, &params).await?;
    Ok(Json(page))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Testimonial>, ApiError> {
    repo::get_by_id(&state.db, &TESTIMONIALS, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    let fields = schemas::TESTIMONIAL.validate(&body)?;
    let testimonial = repo::insert(&state.db, &TESTIMONIALS, &fields).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Testimonial>, ApiError> {
    let fields = schemas::TESTIMONIAL.validate_partial(&body)?;
    let testimonial = repo::update(&state.db, &TESTIMONIALS, &id, &fields).await?;
    Ok(Json(testimonial))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, &TESTIMONIALS, &id).await?;
    Ok(Json(json!({ "message": "Testimonial deleted successfully" })))
}
