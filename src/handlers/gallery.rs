//! Gallery images: featured first, then manual order.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::GalleryImage;
use crate::db::repo::{self, Collection, ListParams, ListQuery, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::{self, schemas};
use crate::AppState;

static GALLERY: Collection = Collection {
    table: "gallery_images",
    searchable: &["title", "description"],
    order_by: r#""featured" DESC, "order" DESC, "createdAt" DESC"#,
    slug: false,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/reorder", post(reorder))
        .route("/:id", get(get_by_id).put(update).delete(delete))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<GalleryImage>>, ApiError> {
    let params = ListParams::from_query(&query);
    let page = repo::list(&state.db, &GALLERY, &params).await?;
    Ok(Json(page))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GalleryImage>, ApiError> {
    repo::get_by_id(&state.db, &GALLERY, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Gallery image not found"))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<GalleryImage>), ApiError> {
    let mut fields = schemas::GALLERY_IMAGE.validate(&body)?;
    fields.entry("order").or_insert(json!(0));
    fields.entry("featured").or_insert(json!(false));

    let image = repo::insert(&state.db, &GALLERY, &fields).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<GalleryImage>, ApiError> {
    let fields = schemas::GALLERY_IMAGE.validate_partial(&body)?;
    let image = repo::update(&state.db, &GALLERY, &id, &fields).await?;
    Ok(Json(image))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, &GALLERY, &id).await?;
    Ok(Json(json!({ "message": "Gallery image deleted successfully" })))
}

async fn reorder(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let items = validation::validate_reorder(&body)?;
    repo::reorder(&state.db, &GALLERY, &items).await?;
    Ok(Json(json!({ "message": "Gallery order updated successfully" })))
}
