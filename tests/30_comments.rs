mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn comment_owner_comes_from_token() -> Result<()> {
    let app = TestApp::new();
    let (alice, _) = app.user("alice").await?;
    let (bob, bob_token) = app.user("bob").await?;
    let thread = app.create_thread(alice, "Question").await?;

    let res = app
        .post(
            "/comments",
            Some(&bob_token),
            json!({ "thread_id": thread, "content": "Answer", "user_id": alice }),
        )
        .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["payload"]["data"]["user_id"], bob);
    assert_eq!(res.body["messages"][0], "Comment created successfully");
    Ok(())
}

#[tokio::test]
async fn comment_on_missing_thread_is_404() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user("alice").await?;

    let res = app
        .post(
            "/comments",
            Some(&token),
            json!({ "thread_id": 999999, "content": "Hello?" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn blank_comment_is_bad_request() -> Result<()> {
    let app = TestApp::new();
    let (alice, token) = app.user("alice").await?;
    let thread = app.create_thread(alice, "Thread").await?;

    let res = app
        .post(
            "/comments",
            Some(&token),
            json!({ "thread_id": thread, "content": "" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn only_author_can_edit_or_delete_comment() -> Result<()> {
    let app = TestApp::new();
    let (alice, alice_token) = app.user("alice").await?;
    let (_, bob_token) = app.user("bob").await?;
    let thread = app.create_thread(alice, "Thread").await?;
    let comment = app.create_comment(&alice_token, thread, "First!").await?;
    let uri = format!("/comments/{}", comment);

    let res = app
        .put(&uri, Some(&bob_token), json!({ "content": "Edited by bob" }))
        .await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(
        res.body["messages"][0],
        "You are not authorized to update this comment"
    );

    let unchanged = app.get(&uri, Some(&alice_token)).await?;
    assert_eq!(unchanged.body["payload"]["data"]["content"], "First!");

    assert_eq!(
        app.delete(&uri, Some(&bob_token)).await?.status,
        StatusCode::FORBIDDEN
    );

    let res = app
        .put(&uri, Some(&alice_token), json!({ "content": "Edited" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["payload"]["data"]["content"], "Edited");

    assert_eq!(
        app.delete(&uri, Some(&alice_token)).await?.status,
        StatusCode::OK
    );
    assert_eq!(
        app.get(&uri, Some(&alice_token)).await?.status,
        StatusCode::NOT_FOUND
    );
    Ok(())
}

#[tokio::test]
async fn missing_comment_is_404_not_403() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user("alice").await?;

    let res = app
        .put("/comments/999999", Some(&token), json!({ "content": "x" }))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.delete("/comments/999999", Some(&token)).await?.status,
        StatusCode::NOT_FOUND
    );
    Ok(())
}

#[tokio::test]
async fn deleting_thread_removes_its_comments() -> Result<()> {
    let app = TestApp::new();
    let (alice, token) = app.user("alice").await?;
    let thread = app.create_thread(alice, "Doomed").await?;
    let comment = app.create_comment(&token, thread, "Soon gone").await?;

    let listed = app.get(&format!("/threads/{}/comments", thread), None).await?;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["payload"]["data"].as_array().map(Vec::len), Some(1));

    app.delete(&format!("/threads/{}", thread), Some(&token))
        .await?;

    assert_eq!(
        app.get(&format!("/comments/{}", comment), Some(&token))
            .await?
            .status,
        StatusCode::NOT_FOUND
    );
    Ok(())
}
