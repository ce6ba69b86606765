//! Content management backend for a nonprofit website.
//!
//! Public read API plus a JWT-guarded admin surface over testimonials,
//! success stories, milestones, news/events, blog posts, gallery images,
//! media uploads and site settings.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod sanitize;
pub mod validation;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", handlers::auth::router())
        .nest("/testimonials", handlers::testimonials::router())
        .nest("/stories", handlers::stories::router())
        .nest("/milestones", handlers::milestones::router())
        .nest("/news", handlers::news::router())
        .nest("/blogs", handlers::blogs::router())
        .nest("/gallery", handlers::gallery::router())
        .nest("/settings", handlers::settings::router())
        .nest("/upload", handlers::upload::router());

    let uploads_dir = state.config.uploads_dir.clone();
    let body_limit = state.config.max_upload_bytes + 1024 * 1024;

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}
