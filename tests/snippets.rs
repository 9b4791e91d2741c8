mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use common::TestApp;

#[tokio::test]
async fn create_view_then_expire() -> Result<()> {
    let mut app = TestApp::spawn().await?;
    app.signed_in("alice@example.com").await?;

    let res = app
        .post_form(
            "/snippet/create",
            &[("title", "Test"), ("content", "Body"), ("expires", "7")],
        )
        .await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let location = res.location().expect("redirect location").to_string();
    let id: i64 = location
        .strip_prefix("/snippet/view/")
        .expect("view path")
        .parse()?;
    assert!(id >= 1);

    let res = app.get(&location).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Body"), "content missing: {}", res.body);
    assert!(res.body.contains("Snippet successfully created!"));

    sqlx::query("UPDATE snippets SET expires = datetime('now', '-1 days') WHERE id = ?")
        .bind(id)
        .execute(&app.state.db)
        .await?;

    let res = app.get(&location).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "Not Found");

    Ok(())
}

#[tokio::test]
async fn invalid_ids_are_not_found() -> Result<()> {
    let mut app = TestApp::spawn().await?;

    for path in [
        "/snippet/view/abc",
        "/snippet/view/0",
        "/snippet/view/-3",
        "/snippet/view/1.5",
        "/snippet/view/999",
    ] {
        let res = app.get(path).await?;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{}", path);
    }

    Ok(())
}

#[tokio::test]
async fn invalid_form_is_rerendered_with_errors() -> Result<()> {
    let mut app = TestApp::spawn().await?;
    app.signed_in("alice@example.com").await?;

    let long_title = "x".repeat(101);
    let res = app
        .post_form(
            "/snippet/create",
            &[("title", &long_title), ("content", "   "), ("expires", "5")],
        )
        .await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.body.contains("This field cannot be more than 100 characters long"));
    assert!(res.body.contains("This field cannot be blank"));
    assert!(res.body.contains("This field must equal 1, 7 or 365"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snippets")
        .fetch_one(&app.state.db)
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn undecodable_form_is_a_bad_request() -> Result<()> {
    let mut app = TestApp::spawn().await?;
    app.signed_in("alice@example.com").await?;

    let res = app
        .post_form(
            "/snippet/create",
            &[("title", "Test"), ("content", "Body"), ("expires", "soon")],
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn create_form_defaults_to_one_year() -> Result<()> {
    let mut app = TestApp::spawn().await?;
    app.signed_in("alice@example.com").await?;

    let res = app.get("/snippet/create").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers[header::CACHE_CONTROL], "no-store");
    assert!(res.body.contains(r#"value="365" checked"#));

    Ok(())
}

#[tokio::test]
async fn home_lists_ten_newest() -> Result<()> {
    let mut app = TestApp::spawn().await?;

    for n in 1..=12 {
        app.state
            .snippets
            .insert(&format!("Snippet number {:02}", n), "body", 365)
            .await?;
    }

    let res = app.get("/").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Snippet number 12"));
    assert!(res.body.contains("Snippet number 03"));
    assert!(!res.body.contains("Snippet number 02"));
    assert!(!res.body.contains("Snippet number 01"));

    let newest = res.body.find("Snippet number 12").unwrap();
    let older = res.body.find("Snippet number 11").unwrap();
    assert!(newest < older);

    Ok(())
}
