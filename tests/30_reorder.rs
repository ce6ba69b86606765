//! Atomic reorder: the whole batch applies or none of it does.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::error_code;

async fn seed_blogs(app: &common::TestApp, count: usize) -> Result<Vec<String>> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let (status, created) = app
            .post_auth(
                "/api/blogs",
                json!({
                    "title": format!("Post {i}"),
                    "slug": format!("post-{i}"),
                    "author": "Dana Levi",
                    "excerpt": "Summary.",
                    "content": "<p>Body.</p>",
                }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    Ok(ids)
}

async fn listed_ids(app: &common::TestApp) -> Result<Vec<String>> {
    let (_, list) = app.get("/api/blogs").await?;
    Ok(list["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect())
}

#[tokio::test]
async fn reorder_rewrites_list_order() -> Result<()> {
    let app = common::spawn().await?;
    let ids = seed_blogs(&app, 3).await?;

    // Highest order first; put the first-created post on top
    let (status, _) = app
        .post_auth(
            "/api/blogs/reorder",
            json!([
                { "id": ids[0], "order": 30 },
                { "id": ids[1], "order": 10 },
                { "id": ids[2], "order": 20 },
            ]),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let after = listed_ids(&app).await?;
    assert_eq!(after, vec![ids[0].clone(), ids[2].clone(), ids[1].clone()]);
    Ok(())
}

#[tokio::test]
async fn reorder_with_an_unknown_id_changes_nothing() -> Result<()> {
    let app = common::spawn().await?;
    let ids = seed_blogs(&app, 3).await?;
    let before = listed_ids(&app).await?;

    let (status, body) = app
        .post_auth(
            "/api/blogs/reorder",
            json!([
                { "id": ids[0], "order": 99 },
                { "id": "no-such-id", "order": 1 },
            ]),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");

    // The valid entry in the batch must not have been applied
    assert_eq!(listed_ids(&app).await?, before);
    Ok(())
}

#[tokio::test]
async fn reorder_rejects_malformed_batches() -> Result<()> {
    let app = common::spawn().await?;
    let ids = seed_blogs(&app, 1).await?;

    for bad in [
        json!({ "id": ids[0], "order": 1 }),            // not an array
        json!([]),                                        // empty batch
        json!([{ "id": "", "order": 1 }]),                // blank id
        json!([{ "id": ids[0], "order": -1 }]),           // negative order
        json!([{ "id": ids[0] }]),                        // missing order
    ] {
        let (status, body) = app.post_auth("/api/blogs/reorder", bad).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn gallery_list_puts_featured_images_first() -> Result<()> {
    let app = common::spawn().await?;

    for (title, featured, order) in [("plain", false, 50), ("starred", true, 0)] {
        let (status, _) = app
            .post_auth(
                "/api/gallery",
                json!({
                    "title": title,
                    "imageUrl": "https://cdn.example.org/img.jpg",
                    "featured": featured,
                    "order": order,
                }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = app.get("/api/gallery").await?;
    assert_eq!(list["items"][0]["title"], "starred");
    assert_eq!(list["items"][0]["featured"], true);
    Ok(())
}

#[tokio::test]
async fn reorder_requires_auth() -> Result<()> {
    let app = common::spawn().await?;

    let (status, _) = app
        .post("/api/blogs/reorder", json!([{ "id": "x", "order": 1 }]))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
