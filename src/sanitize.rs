//! Allow-list HTML sanitization for rich-text fields.
//!
//! Runs on every create and on every update that touches an HTML-bearing
//! field, never only on read. Anything outside the allow-list (scripts,
//! inline event handlers, unknown tags) is stripped before storage.

use ammonia::Builder;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashSet;

const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "s", "h1", "h2", "h3", "h4", "h5", "h6",
    "ul", "ol", "li", "blockquote", "a", "img", "figure", "figcaption",
];

const ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title", "target", "rel"];

static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(HashSet::from_iter(ALLOWED_TAGS.iter().copied()))
        .generic_attributes(HashSet::from_iter(ALLOWED_ATTRIBUTES.iter().copied()))
        .link_rel(None);
    builder
});

pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Sanitize the named rich-text fields of a validated payload in place.
/// Fields absent from the payload (partial updates) are left untouched.
pub fn sanitize_fields(fields: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        let clean = match fields.get(*key) {
            Some(Value::String(html)) => sanitize_html(html),
            _ => continue,
        };
        fields.insert((*key).to_string(), Value::String(clean));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_tags_are_stripped() {
        let out = sanitize_html("<p>hi</p><script>alert(1)</script>");
        assert!(out.contains("<p>hi</p>"));
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn event_handlers_are_stripped() {
        let out = sanitize_html(r#"<p onclick="steal()">hi</p>"#);
        assert!(!out.contains("onclick"));
        assert!(out.contains("hi"));
    }

    #[test]
    fn allowed_markup_survives() {
        let input = r#"<h2>Title</h2><p><strong>bold</strong> and <em>italic</em></p><a href="https://example.org" target="_blank">link</a>"#;
        let out = sanitize_html(input);
        assert!(out.contains("<h2>Title</h2>"));
        assert!(out.contains("<strong>bold</strong>"));
        assert!(out.contains(r#"href="https://example.org""#));
    }

    #[test]
    fn unknown_tags_are_stripped_but_text_kept() {
        let out = sanitize_html("<marquee>hello</marquee>");
        assert!(!out.contains("marquee"));
        assert!(out.contains("hello"));
    }

    #[test]
    fn only_named_fields_are_touched() {
        let mut fields = Map::new();
        fields.insert("content".into(), json!("<script>x()</script><p>ok</p>"));
        fields.insert("title".into(), json!("<script> in a title"));
        sanitize_fields(&mut fields, &["content"]);

        assert!(!fields["content"].as_str().unwrap().contains("script"));
        assert_eq!(fields["title"], "<script> in a title");
    }
}
