//! Blog posts: slugged, searchable, manually reorderable.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::db::models::BlogPost;
use crate::db::repo::{self, Collection, ListParams, ListQuery, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::sanitize::sanitize_fields;
use crate::validation::{self, schemas};
use crate::AppState;

static BLOGS: Collection = Collection {
    table: "blogs",
    searchable: &["title", "excerpt", "author"],
    order_by: r#""order" DESC, "publishedAt" DESC"#,
    slug: true,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/reorder", post(reorder))
        // GET takes a slug; PUT/DELETE take an id. One route entry because
        // the path shape is identical.
        .route("/:key", get(get_by_slug).put(update).delete(delete))
}

/// GET /api/blogs - paginated list with search
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<BlogPost>>, ApiError> {
    let params = ListParams::from_query(&query);
    let page = repo::list(&state.db, &BLOGS, &params).await?;
    Ok(Json(page))
}

/// GET /api/blogs/:slug
async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    repo::get_by_slug(&state.db, &BLOGS, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}

/// POST /api/blogs (bearer)
async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    let mut fields = schemas::BLOG.validate(&body)?;
    sanitize_fields(&mut fields, &["content"]);
    fields.entry("order").or_insert(json!(0));
    fields.insert("publishedAt".to_string(), json!(Utc::now().to_rfc3339()));

    let blog = repo::insert(&state.db, &BLOGS, &fields).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// PUT /api/blogs/:id (bearer) - partial update
async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<BlogPost>, ApiError> {
    let mut fields = schemas::BLOG.validate_partial(&body)?;
    sanitize_fields(&mut fields, &["content"]);

    let blog = repo::update(&state.db, &BLOGS, &id, &fields).await?;
    Ok(Json(blog))
}

/// DELETE /api/blogs/:id (bearer)
async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, &BLOGS, &id).await?;
    Ok(Json(json!({ "message": "Blog post deleted successfully" })))
}

/// POST /api/blogs/reorder (bearer) - all-or-nothing order rewrite
async fn reorder(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let items = validation::validate_reorder(&body)?;
    repo::reorder(&state.db, &BLOGS, &items).await?;
    Ok(Json(json!({ "message": "Blog order updated successfully" })))
}
