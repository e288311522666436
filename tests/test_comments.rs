mod common;

use axum::http::{Method, StatusCode};
use common::{Remotes, TestApp, test_app};
use serde_json::{Value, json};

async fn post_comment(app: &TestApp, user: &str, body: Value) -> Value {
    let (status, comment) = app
        .call(Method::POST, "/api/comments", Some(user), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    comment
}

#[tokio::test]
async fn comments_are_created_trimmed_and_repeatable() {
    let app = test_app(Remotes::default());

    let first = post_comment(&app, "user-a", json!({ "itemId": "42", "text": "  hello  " })).await;
    assert_eq!(first["text"], "hello");
    assert_eq!(first["userId"], "user-a");
    assert_eq!(first["parentId"], Value::Null);

    let second = post_comment(&app, "user-a", json!({ "itemId": "42", "text": "again" })).await;
    assert_ne!(first["id"], second["id"]);

    let (_, listed) = app
        .call(Method::GET, "/api/comments?itemId=42", None, None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn creating_comments_validates_input_and_auth() {
    let app = test_app(Remotes::default());

    let (status, _) = app
        .call(
            Method::POST,
            "/api/comments",
            None,
            Some(json!({ "itemId": "42", "text": "hi" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for body in [
        json!({ "itemId": "42" }),
        json!({ "text": "hi" }),
        json!({ "itemId": "42", "text": "   " }),
        json!({ "itemId": "", "text": "hi" }),
    ] {
        let (status, error) = app
            .call(Method::POST, "/api/comments", Some("user-a"), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {body}");
        assert_eq!(error["error"], "itemId and text are required");
    }
}

#[tokio::test]
async fn listing_requires_an_item_and_is_newest_first() {
    let app = test_app(Remotes::default());

    let (status, error) = app.call(Method::GET, "/api/comments", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Missing itemId query parameter");

    for text in ["first", "second", "third"] {
        post_comment(&app, "user-a", json!({ "itemId": "42", "text": text })).await;
    }
    post_comment(&app, "user-b", json!({ "itemId": "99", "text": "elsewhere" })).await;

    let (status, listed) = app
        .call(Method::GET, "/api/comments?itemId=42", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();

    let texts: Vec<&str> = listed.iter().map(|c| c["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);

    let stamps: Vec<chrono::DateTime<chrono::Utc>> = listed
        .iter()
        .map(|c| c["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn only_the_author_can_edit() {
    let app = test_app(Remotes::default());
    let parent = post_comment(&app, "user-a", json!({ "itemId": "42", "text": "root" })).await;
    let comment = post_comment(
        &app,
        "user-a",
        json!({ "itemId": "42", "text": "original", "parentId": parent["id"] }),
    )
    .await;
    let uri = format!("/api/comments/{}", comment["id"].as_str().unwrap());

    let (status, error) = app
        .call(Method::PUT, &uri, Some("user-b"), Some(json!({ "text": "hijacked" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["error"], "Not authorized");

    let (status, edited) = app
        .call(
            Method::PUT,
            &uri,
            Some("user-a"),
            Some(json!({ "text": "edited", "parentId": "somewhere-else" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["text"], "edited");
    assert_eq!(edited["parentId"], parent["id"]);

    let (status, untouched) = app
        .call(Method::PUT, &uri, Some("user-a"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(untouched["text"], "edited");

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/comments/00000000-0000-4000-8000-000000000000",
            Some("user-a"),
            Some(json!({ "text": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_parent_orphans_its_replies() {
    let app = test_app(Remotes::default());
    let parent = post_comment(&app, "user-a", json!({ "itemId": "42", "text": "parent" })).await;
    let reply = post_comment(
        &app,
        "user-b",
        json!({ "itemId": "42", "text": "reply", "parentId": parent["id"] }),
    )
    .await;
    let parent_uri = format!("/api/comments/{}", parent["id"].as_str().unwrap());

    let (status, _) = app
        .call(Method::DELETE, &parent_uri, Some("user-b"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(Method::DELETE, &parent_uri, Some("user-a"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, listed) = app
        .call(Method::GET, "/api/comments?itemId=42", None, None)
        .await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], reply["id"]);
    assert_eq!(listed[0]["parentId"], parent["id"]);

    let (status, _) = app
        .call(Method::DELETE, &parent_uri, Some("user-a"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn numeric_item_and_parent_ids_are_accepted() {
    let app = test_app(Remotes::default());

    let comment = post_comment(
        &app,
        "user-a",
        json!({ "itemId": 42, "text": "numeric", "parentId": 8863 }),
    )
    .await;
    assert_eq!(comment["itemId"], "42");
    assert_eq!(comment["parentId"], "8863");

    let (_, listed) = app
        .call(Method::GET, "/api/comments?itemId=42", None, None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = app
        .call(Method::GET, "/api/comments?itemId=1&itemId=2", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
