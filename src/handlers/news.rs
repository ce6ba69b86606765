//! News and events: slugged, filterable by type, ordered by event date.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::NewsItem;
use crate::db::repo::{self, Collection, ListParams, ListQuery, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::sanitize::sanitize_fields;
use crate::validation::schemas;
use crate::AppState;

static NEWS: Collection = Collection {
    table: "news",
    searchable: &["title", "body"],
    order_by: r#""date" DESC"#,
    slug: true,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:key", get(get_by_slug).put(update).delete(delete))
}

/// GET /api/news - paginated, `type=NEWS|EVENT` narrows the list
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<NewsItem>>, ApiError> {
    let mut params = ListParams::from_query(&query);
    if let Some(kind) = query.kind.as_deref() {
        if kind == "NEWS" || kind == "EVENT" {
            params = params.with_filter("type", kind.to_string());
        }
    }
    let page = repo::list(&state.db, &NEWS, &params).await?;
    Ok(Json(page))
}

async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<NewsItem>, ApiError> {
    repo::get_by_slug(&state.db, &NEWS, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("News item not found"))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<NewsItem>), ApiError> {
    let mut fields = schemas::NEWS.validate(&body)?;
    sanitize_fields(&mut fields, &["body"]);
    fields.entry("gallery").or_insert(json!([]));

    let item = repo::insert(&state.db, &NEWS, &fields).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<NewsItem>, ApiError> {
    let mut fields = schemas::NEWS.validate_partial(&body)?;
    sanitize_fields(&mut fields, &["body"]);

    let item = repo::update(&state.db, &NEWS, &id, &fields).await?;
    Ok(Json(item))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, &NEWS, &id).await?;
    Ok(Json(json!({ "message": "News item deleted successfully" })))
}
