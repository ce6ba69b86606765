//! Declarative payload validation.
//!
//! Each mutating endpoint describes its body as a [`Schema`] of field rules,
//! evaluated uniformly for every entity. Create mode enforces required
//! fields; partial mode (updates) treats every field as optional and returns
//! only the fields that were supplied. Unknown fields are dropped. Failures
//! collect into a field -> message map and never reach persistence.

pub mod schemas;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ApiError;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());
static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// String with a character-count range. `min: 1` means non-empty.
    Text { min: usize, max: usize },
    /// Non-empty HTML-bearing string; sanitized separately before storage.
    RichText,
    Int { min: i64, max: i64 },
    Bool,
    /// Absolute URL; the empty string is accepted (treated as "unset").
    Url,
    Slug,
    HexColor,
    Email,
    /// RFC 3339 datetime; canonicalized to UTC on success.
    DateTime,
    OneOf(&'static [&'static str]),
    /// Array of absolute URLs, at most `max` entries.
    UrlArray { max: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [Field],
}

impl Schema {
    /// Create-mode validation: required fields must be present.
    pub fn validate(&self, body: &Value) -> Result<Map<String, Value>, ApiError> {
        self.check(body, false)
    }

    /// Update-mode validation: every field optional, only supplied fields
    /// are returned.
    pub fn validate_partial(&self, body: &Value) -> Result<Map<String, Value>, ApiError> {
        self.check(body, true)
    }

    fn check(&self, body: &Value, partial: bool) -> Result<Map<String, Value>, ApiError> {
        let object = match body.as_object() {
            Some(object) => object,
            None => {
                return Err(ApiError::validation(
                    "Expected a JSON object",
                    HashMap::new(),
                ))
            }
        };

        let mut out = Map::new();
        let mut errors = HashMap::new();

        for field in self.fields {
            let value = match object.get(field.name) {
                Some(Value::Null) | None => {
                    if field.required && !partial {
                        errors.insert(
                            field.name.to_string(),
                            format!("{} is required", field.name),
                        );
                    }
                    continue;
                }
                Some(value) => value,
            };

            match check_rule(&field.rule, value) {
                Ok(canonical) => {
                    out.insert(field.name.to_string(), canonical);
                }
                Err(message) => {
                    errors.insert(field.name.to_string(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(ApiError::validation("Validation failed", errors))
        }
    }
}

fn check_rule(rule: &Rule, value: &Value) -> Result<Value, String> {
    match rule {
        Rule::Text { min, max } => {
            let s = value.as_str().ok_or("Must be a string")?;
            let len = s.chars().count();
            if len < *min {
                return Err(if *min == 1 {
                    "Must not be empty".to_string()
                } else {
                    format!("Must be at least {} characters", min)
                });
            }
            if len > *max {
                return Err(format!("Must be {} characters or less", max));
            }
            Ok(value.clone())
        }
        Rule::RichText => {
            let s = value.as_str().ok_or("Must be a string")?;
            if s.trim().is_empty() {
                return Err("Must not be empty".to_string());
            }
            Ok(value.clone())
        }
        Rule::Int { min, max } => {
            let n = value.as_i64().ok_or("Must be an integer")?;
            if n < *min {
                return Err(format!("Must be at least {}", min));
            }
            if n > *max {
                return Err(format!("Must be at most {}", max));
            }
            Ok(value.clone())
        }
        Rule::Bool => {
            value.as_bool().ok_or("Must be a boolean")?;
            Ok(value.clone())
        }
        Rule::Url => {
            let s = value.as_str().ok_or("Must be a string")?;
            if s.is_empty() || url::Url::parse(s).is_ok() {
                Ok(value.clone())
            } else {
                Err("Invalid URL".to_string())
            }
        }
        Rule::Slug => {
            let s = value.as_str().ok_or("Must be a string")?;
            if SLUG_RE.is_match(s) {
                Ok(value.clone())
            } else {
                Err("Invalid slug format".to_string())
            }
        }
        Rule::HexColor => {
            let s = value.as_str().ok_or("Must be a string")?;
            if HEX_COLOR_RE.is_match(s) {
                Ok(value.clone())
            } else {
                Err("Invalid hex color format".to_string())
            }
        }
        Rule::Email => {
            let s = value.as_str().ok_or("Must be a string")?;
            if EMAIL_RE.is_match(s) {
                Ok(value.clone())
            } else {
                Err("Invalid email format".to_string())
            }
        }
        Rule::DateTime => {
            let s = value.as_str().ok_or("Must be a string")?;
            match chrono::DateTime::parse_from_rfc3339(s) {
                Ok(dt) => Ok(Value::String(
                    dt.with_timezone(&chrono::Utc).to_rfc3339(),
                )),
                Err(_) => Err("Invalid date format".to_string()),
            }
        }
        Rule::OneOf(options) => {
            let s = value.as_str().ok_or("Must be a string")?;
            if options.contains(&s) {
                Ok(value.clone())
            } else {
                Err(format!("Must be one of: {}", options.join(", ")))
            }
        }
        Rule::UrlArray { max } => {
            let items = value.as_array().ok_or("Must be an array")?;
            if items.len() > *max {
                return Err(format!("Maximum {} entries", max));
            }
            for item in items {
                let s = item.as_str().ok_or("Must be an array of URLs")?;
                if url::Url::parse(s).is_err() {
                    return Err("Invalid URL in array".to_string());
                }
            }
            Ok(value.clone())
        }
    }
}

/// Reorder batch item: `{id, order}`.
#[derive(Debug, Clone)]
pub struct ReorderItem {
    pub id: String,
    pub order: i64,
}

/// Validate a reorder payload: a non-empty array of `{id, order}` with
/// non-empty string ids and non-negative integer orders. Whether each id
/// actually exists is checked transactionally by the repository.
pub fn validate_reorder(body: &Value) -> Result<Vec<ReorderItem>, ApiError> {
    let items = body.as_array().ok_or_else(|| {
        ApiError::validation("Expected an array of {id, order}", HashMap::new())
    })?;
    if items.is_empty() {
        return Err(ApiError::validation(
            "Expected a non-empty array of {id, order}",
            HashMap::new(),
        ));
    }

    let mut out = Vec::with_capacity(items.len());
    let mut errors = HashMap::new();

    for (index, item) in items.iter().enumerate() {
        let id = item.get("id").and_then(Value::as_str).unwrap_or("");
        if id.is_empty() {
            errors.insert(format!("[{}].id", index), "Invalid ID".to_string());
            continue;
        }
        let order = match item.get("order").and_then(Value::as_i64) {
            Some(order) if order >= 0 => order,
            _ => {
                errors.insert(
                    format!("[{}].order", index),
                    "Order must be a non-negative integer".to_string(),
                );
                continue;
            }
        };
        out.push(ReorderItem {
            id: id.to_string(),
            order,
        });
    }

    if !errors.is_empty() {
        return Err(ApiError::validation("Validation failed", errors));
    }
    Ok(out)
}
