mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn comments_filter_by_blog_id_field() -> Result<()> {
    let app = common::spawn_app();
    let blog_a = app.insert("/blogs", &json!({ "title": "A" })).await?;
    let blog_b = app.insert("/blogs", &json!({ "title": "B" })).await?;

    app.insert("/comments", &json!({ "id": blog_a, "text": "first" })).await?;
    app.insert("/comments", &json!({ "id": blog_b, "text": "elsewhere" })).await?;
    app.insert("/comments", &json!({ "id": blog_a, "text": "second" })).await?;

    let res = app.get(&format!("/comment?id={}", blog_a)).await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json()?;
    let texts: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].clone())
        .collect();
    assert_eq!(texts, vec![json!("first"), json!("second")]);
    Ok(())
}

#[tokio::test]
async fn comment_filter_is_exact_and_typed() -> Result<()> {
    let app = common::spawn_app();
    app.insert("/comments", &json!({ "id": 7, "text": "numeric id" })).await?;
    app.insert("/comments", &json!({ "id": "7", "text": "string id" })).await?;

    let body = app.get("/comment?id=7").await?.json()?;
    let comments = body.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], json!("string id"));
    Ok(())
}

#[tokio::test]
async fn comment_without_id_lists_all() -> Result<()> {
    let app = common::spawn_app();
    app.insert("/comments", &json!({ "id": "x", "text": "one" })).await?;
    app.insert("/comments", &json!({ "text": "two" })).await?;

    assert_eq!(app.get("/comment").await?.json()?.as_array().unwrap().len(), 2);
    assert_eq!(app.get("/comments").await?.json()?.as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn users_are_created_and_listed() -> Result<()> {
    let app = common::spawn_app();
    app.insert("/users", &json!({ "email": "ada@example.com", "name": "Ada" })).await?;
    app.insert("/users", &json!({ "email": "alan@example.com" })).await?;

    let res = app.get("/users").await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json()?;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], json!("Ada"));
    assert!(users.iter().all(|u| u["_id"].is_string()));
    Ok(())
}

#[tokio::test]
async fn non_object_bodies_are_rejected() -> Result<()> {
    let app = common::spawn_app();

    let res = app.post_json("/users", &json!(["not", "an", "object"])).await?;
    assert!(res.status.is_client_error(), "unexpected status {}", res.status);
    Ok(())
}
