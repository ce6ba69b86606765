//! Generic ordered-collection repository.
//!
//! Every content entity instantiates the same contract through a
//! [`Collection`] descriptor: paginated search-aware listing, slug/id
//! lookup, insert with slug-uniqueness, merge-only-supplied-fields update,
//! delete, and an all-or-nothing reorder batch. Identifiers are static and
//! always double-quoted ("order" is an SQL keyword).

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::ReorderItem;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 50;

/// Static description of one content table.
pub struct Collection {
    pub table: &'static str,
    /// Columns the search term is matched against (ORed).
    pub searchable: &'static [&'static str],
    /// Canonical ORDER BY clause for listings.
    pub order_by: &'static str,
    /// Whether the table carries a unique slug column.
    pub slug: bool,
}

/// Raw list query parameters as they arrive on the wire. Non-numeric page
/// or limit values fall back to defaults rather than erroring.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug)]
pub struct ListParams {
    pub page: i64,
    pub limit: i64,
    pub q: Option<String>,
    /// Exact-match filters, ANDed together and with the search term.
    pub filters: Vec<(&'static str, String)>,
}

impl ListParams {
    pub fn from_query(query: &ListQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = query
            .limit
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);

        Self {
            page,
            limit,
            q: query.q.clone().filter(|q| !q.is_empty()),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, column: &'static str, value: String) -> Self {
        self.filters.push((column, value));
        self
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

fn where_clause(params: &ListParams, collection: &Collection) -> (String, Vec<String>) {
    let mut predicates = Vec::new();
    let mut binds = Vec::new();

    for (column, value) in &params.filters {
        predicates.push(format!("\"{}\" = ?", column));
        binds.push(value.clone());
    }

    if let Some(q) = &params.q {
        let pattern = format!("%{}%", q);
        let search = collection
            .searchable
            .iter()
            .map(|column| format!("\"{}\" LIKE ?", column))
            .collect::<Vec<_>>()
            .join(" OR ");
        if !search.is_empty() {
            predicates.push(format!("({})", search));
            binds.extend(std::iter::repeat(pattern).take(collection.searchable.len()));
        }
    }

    if predicates.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", predicates.join(" AND ")), binds)
    }
}

pub async fn list<T>(
    pool: &SqlitePool,
    collection: &Collection,
    params: &ListParams,
) -> Result<Page<T>, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Serialize,
{
    let (where_sql, binds) = where_clause(params, collection);

    let count_sql = format!("SELECT COUNT(*) FROM \"{}\"{}", collection.table, where_sql);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_query = count_query.bind(bind);
    }
    let total = count_query.fetch_one(pool).await?;

    let items_sql = format!(
        "SELECT * FROM \"{}\"{} ORDER BY {} LIMIT ? OFFSET ?",
        collection.table, where_sql, collection.order_by
    );
    let mut items_query = sqlx::query_as::<_, T>(&items_sql);
    for bind in &binds {
        items_query = items_query.bind(bind);
    }
    let items = items_query
        .bind(params.limit)
        .bind((params.page - 1) * params.limit)
        .fetch_all(pool)
        .await?;

    Ok(Page {
        items,
        pagination: Pagination {
            page: params.page,
            limit: params.limit,
            total,
            pages: page_count(total, params.limit),
        },
    })
}

pub async fn get_by_slug<T>(
    pool: &SqlitePool,
    collection: &Collection,
    slug: &str,
) -> Result<Option<T>, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!("SELECT * FROM \"{}\" WHERE \"slug\" = ?", collection.table);
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_by_id<T>(
    pool: &SqlitePool,
    collection: &Collection,
    id: &str,
) -> Result<Option<T>, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!("SELECT * FROM \"{}\" WHERE \"id\" = ?", collection.table);
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a validated payload, generating the id and createdAt timestamp.
///
/// The slug is pre-checked, but the final guarantee comes from the UNIQUE
/// column constraint: a concurrent insert that slips past the check still
/// surfaces as `SLUG_EXISTS` through unique-violation mapping.
pub async fn insert<T>(
    pool: &SqlitePool,
    collection: &Collection,
    fields: &Map<String, Value>,
) -> Result<T, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    if collection.slug {
        if let Some(slug) = fields.get("slug").and_then(Value::as_str) {
            if slug_taken(pool, collection, slug, None).await? {
                return Err(ApiError::SlugExists);
            }
        }
    }

    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339();

    let mut columns = vec!["id".to_string(), "createdAt".to_string()];
    columns.extend(fields.keys().cloned());
    let column_sql = columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");

    let sql = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        collection.table, column_sql, placeholders
    );
    let mut query = sqlx::query(&sql).bind(&id).bind(&created_at);
    for value in fields.values() {
        query = bind_value(query, value);
    }

    query.execute(pool).await.map_err(|e| {
        if collection.slug && is_unique_violation(&e) {
            ApiError::SlugExists
        } else {
            ApiError::from(e)
        }
    })?;

    get_by_id(pool, collection, &id)
        .await?
        .ok_or_else(|| ApiError::internal("inserted row not found"))
}

/// Apply only the supplied fields to an existing row.
pub async fn update<T>(
    pool: &SqlitePool,
    collection: &Collection,
    id: &str,
    fields: &Map<String, Value>,
) -> Result<T, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let not_found = || ApiError::not_found(format!("{} not found", entity_label(collection)));

    let exists_sql = format!("SELECT COUNT(*) FROM \"{}\" WHERE \"id\" = ?", collection.table);
    let exists: i64 = sqlx::query_scalar(&exists_sql).bind(id).fetch_one(pool).await?;
    if exists == 0 {
        return Err(not_found());
    }

    if fields.is_empty() {
        return get_by_id(pool, collection, id).await?.ok_or_else(not_found);
    }

    if collection.slug {
        if let Some(slug) = fields.get("slug").and_then(Value::as_str) {
            if slug_taken(pool, collection, slug, Some(id)).await? {
                return Err(ApiError::SlugExists);
            }
        }
    }

    let assignments = fields
        .keys()
        .map(|k| format!("\"{}\" = ?", k))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = ?",
        collection.table, assignments
    );
    let mut query = sqlx::query(&sql);
    for value in fields.values() {
        query = bind_value(query, value);
    }

    query.bind(id).execute(pool).await.map_err(|e| {
        if collection.slug && is_unique_violation(&e) {
            ApiError::SlugExists
        } else {
            ApiError::from(e)
        }
    })?;

    get_by_id(pool, collection, id).await?.ok_or_else(not_found)
}

/// Delete a row; repeated deletes of the same id yield NOT_FOUND.
pub async fn delete(
    pool: &SqlitePool,
    collection: &Collection,
    id: &str,
) -> Result<(), ApiError> {
    let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = ?", collection.table);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!(
            "{} not found",
            entity_label(collection)
        )));
    }
    Ok(())
}

/// Apply a reorder batch as a single transaction. Any id that matches no
/// row aborts the whole batch; no record's order changes.
pub async fn reorder(
    pool: &SqlitePool,
    collection: &Collection,
    items: &[ReorderItem],
) -> Result<(), ApiError> {
    let sql = format!(
        "UPDATE \"{}\" SET \"order\" = ? WHERE \"id\" = ?",
        collection.table
    );

    let mut tx = pool.begin().await?;
    for item in items {
        let result = sqlx::query(&sql)
            .bind(item.order)
            .bind(&item.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back every prior update
            return Err(ApiError::not_found(format!(
                "{} not found: {}",
                entity_label(collection),
                item.id
            )));
        }
    }
    tx.commit().await?;
    Ok(())
}

async fn slug_taken(
    pool: &SqlitePool,
    collection: &Collection,
    slug: &str,
    exclude_id: Option<&str>,
) -> Result<bool, ApiError> {
    let count: i64 = match exclude_id {
        Some(id) => {
            let sql = format!(
                "SELECT COUNT(*) FROM \"{}\" WHERE \"slug\" = ? AND \"id\" <> ?",
                collection.table
            );
            sqlx::query_scalar(&sql).bind(slug).bind(id).fetch_one(pool).await?
        }
        None => {
            let sql = format!(
                "SELECT COUNT(*) FROM \"{}\" WHERE \"slug\" = ?",
                collection.table
            );
            sqlx::query_scalar(&sql).bind(slug).fetch_one(pool).await?
        }
    };
    Ok(count > 0)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed")
    )
}

fn entity_label(collection: &Collection) -> &'static str {
    match collection.table {
        "testimonials" => "Testimonial",
        "stories" => "Story",
        "milestones" => "Milestone",
        "news" => "News item",
        "blogs" => "Blog post",
        "gallery_images" => "Gallery image",
        "media" => "Media",
        _ => "Record",
    }
}

/// Bind a JSON value with the appropriate SQL type. Arrays and objects are
/// stored as JSON text.
fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
            q: None,
            kind: None,
        }
    }

    #[test]
    fn page_and_limit_default_when_missing_or_garbage() {
        let params = ListParams::from_query(&query(None, None));
        assert_eq!((params.page, params.limit), (1, 10));

        let params = ListParams::from_query(&query(Some("abc"), Some("xyz")));
        assert_eq!((params.page, params.limit), (1, 10));

        let params = ListParams::from_query(&query(Some("0"), Some("-3")));
        assert_eq!((params.page, params.limit), (1, 10));
    }

    #[test]
    fn limit_is_clamped_to_fifty() {
        let params = ListParams::from_query(&query(Some("2"), Some("500")));
        assert_eq!((params.page, params.limit), (2, 50));
    }

    #[test]
    fn page_count_is_ceiling_division() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(12, 5), 3);
    }
}
