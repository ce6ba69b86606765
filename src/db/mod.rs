//! SQLite pool and schema.
//!
//! The schema is created at startup with idempotent DDL. Column names are
//! camelCase so the wire format, the validation schemas and the storage
//! layer all share one vocabulary.

pub mod models;
pub mod repo;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // An in-memory database exists per connection, so it must not be
    // spread across a pool.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"CREATE TABLE IF NOT EXISTS "admin_users" (
            "id" TEXT PRIMARY KEY,
            "email" TEXT UNIQUE NOT NULL,
            "passwordHash" TEXT NOT NULL,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "testimonials" (
            "id" TEXT PRIMARY KEY,
            "name" TEXT NOT NULL,
            "role" TEXT,
            "quote" TEXT NOT NULL,
            "rating" INTEGER NOT NULL,
            "avatarUrl" TEXT,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "stories" (
            "id" TEXT PRIMARY KEY,
            "title" TEXT NOT NULL,
            "slug" TEXT UNIQUE NOT NULL,
            "excerpt" TEXT NOT NULL,
            "content" TEXT NOT NULL,
            "coverUrl" TEXT,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "milestones" (
            "id" TEXT PRIMARY KEY,
            "title" TEXT NOT NULL,
            "description" TEXT,
            "achievedOn" TEXT NOT NULL,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "news" (
            "id" TEXT PRIMARY KEY,
            "title" TEXT NOT NULL,
            "slug" TEXT UNIQUE NOT NULL,
            "type" TEXT NOT NULL,
            "date" TEXT NOT NULL,
            "body" TEXT NOT NULL,
            "heroUrl" TEXT,
            "gallery" TEXT NOT NULL DEFAULT '[]',
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "blogs" (
            "id" TEXT PRIMARY KEY,
            "title" TEXT NOT NULL,
            "slug" TEXT UNIQUE NOT NULL,
            "author" TEXT NOT NULL,
            "excerpt" TEXT NOT NULL,
            "content" TEXT NOT NULL,
            "coverUrl" TEXT,
            "order" INTEGER NOT NULL DEFAULT 0,
            "publishedAt" TEXT NOT NULL,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "gallery_images" (
            "id" TEXT PRIMARY KEY,
            "title" TEXT NOT NULL,
            "description" TEXT,
            "imageUrl" TEXT NOT NULL,
            "order" INTEGER NOT NULL DEFAULT 0,
            "featured" INTEGER NOT NULL DEFAULT 0,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "media" (
            "id" TEXT PRIMARY KEY,
            "url" TEXT NOT NULL,
            "filename" TEXT NOT NULL,
            "createdAt" TEXT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS "site_settings" (
            "id" INTEGER PRIMARY KEY CHECK ("id" = 1),
            "siteName" TEXT NOT NULL,
            "primaryHex" TEXT NOT NULL,
            "logoUrl" TEXT,
            "updatedAt" TEXT NOT NULL
        )"#,
    ];

    for ddl in statements {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
