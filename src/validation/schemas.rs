//! Field schemas for every mutating endpoint.
//!
//! Update handlers reuse the same schema through `validate_partial`, which
//! makes every field optional (partial update semantics).

use super::{Field, Rule, Schema};

pub static LOGIN: Schema = Schema {
    fields: &[
        Field { name: "email", rule: Rule::Email, required: true },
        Field { name: "password", rule: Rule::Text { min: 6, max: 128 }, required: true },
    ],
};

pub static CHANGE_PASSWORD: Schema = Schema {
    fields: &[
        Field { name: "oldPassword", rule: Rule::Text { min: 1, max: 128 }, required: true },
        Field { name: "newPassword", rule: Rule::Text { min: 6, max: 128 }, required: true },
    ],
};

pub static TESTIMONIAL: Schema = Schema {
    fields: &[
        Field { name: "name", rule: Rule::Text { min: 1, max: 100 }, required: true },
        Field { name: "role", rule: Rule::Text { min: 0, max: 100 }, required: false },
        Field { name: "quote", rule: Rule::Text { min: 1, max: 280 }, required: true },
        Field { name: "rating", rule: Rule::Int { min: 1, max: 5 }, required: true },
        Field { name: "avatarUrl", rule: Rule::Url, required: false },
    ],
};

pub static STORY: Schema = Schema {
    fields: &[
        Field { name: "title", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "slug", rule: Rule::Slug, required: true },
        Field { name: "excerpt", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "content", rule: Rule::RichText, required: true },
        Field { name: "coverUrl", rule: Rule::Url, required: false },
    ],
};

pub static MILESTONE: Schema = Schema {
    fields: &[
        Field { name: "title", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "description", rule: Rule::Text { min: 0, max: 500 }, required: false },
        Field { name: "achievedOn", rule: Rule::DateTime, required: true },
    ],
};

pub static NEWS: Schema = Schema {
    fields: &[
        Field { name: "title", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "slug", rule: Rule::Slug, required: true },
        Field { name: "type", rule: Rule::OneOf(&["NEWS", "EVENT"]), required: true },
        Field { name: "date", rule: Rule::DateTime, required: true },
        Field { name: "body", rule: Rule::RichText, required: true },
        Field { name: "heroUrl", rule: Rule::Url, required: false },
        Field { name: "gallery", rule: Rule::UrlArray { max: 8 }, required: false },
    ],
};

pub static BLOG: Schema = Schema {
    fields: &[
        Field { name: "title", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "slug", rule: Rule::Slug, required: true },
        Field { name: "author", rule: Rule::Text { min: 1, max: 100 }, required: true },
        Field { name: "excerpt", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "content", rule: Rule::RichText, required: true },
        Field { name: "coverUrl", rule: Rule::Url, required: false },
        Field { name: "order", rule: Rule::Int { min: 0, max: i64::MAX }, required: false },
    ],
};

pub static GALLERY_IMAGE: Schema = Schema {
    fields: &[
        Field { name: "title", rule: Rule::Text { min: 1, max: 200 }, required: true },
        Field { name: "description", rule: Rule::Text { min: 0, max: 500 }, required: false },
        Field { name: "imageUrl", rule: Rule::Url, required: true },
        Field { name: "order", rule: Rule::Int { min: 0, max: i64::MAX }, required: false },
        Field { name: "featured", rule: Rule::Bool, required: false },
    ],
};

pub static SETTINGS: Schema = Schema {
    fields: &[
        Field { name: "siteName", rule: Rule::Text { min: 1, max: 100 }, required: false },
        Field { name: "primaryHex", rule: Rule::HexColor, required: false },
        Field { name: "logoUrl", rule: Rule::Url, required: false },
    ],
};
