#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Page availability and access control per route.

use axum::http::StatusCode;

mod common;
use common::{TestApp, assert_redirects, assert_status, response_text};

#[tokio::test]
async fn pages_availability_for_anonymous_user() {
    let app = TestApp::new().await;

    for path in ["/", "/auth/login/", "/auth/logout/", "/auth/signup/"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
    }
}

#[tokio::test]
async fn detail_page_available_for_anonymous_user() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    let response = app
        .get(&format!("/news/{}/", fixtures.news.id), None)
        .await;
    assert_status(&response, StatusCode::OK);
}

#[tokio::test]
async fn redirects_for_anonymous_user() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    for path in [
        format!("/edit_comment/{}/", fixtures.comment.id),
        format!("/delete_comment/{}/", fixtures.comment.id),
    ] {
        let response = app.get(&path, None).await;
        assert_redirects(&response, &format!("/auth/login/?next={path}"));
    }
}

#[tokio::test]
async fn access_for_author_only() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    for path in [
        format!("/edit_comment/{}/", fixtures.comment.id),
        format!("/delete_comment/{}/", fixtures.comment.id),
    ] {
        let response = app.get(&path, Some(&fixtures.author.cookies)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path} as author");
    }
}

#[tokio::test]
async fn access_denied_for_non_author() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    for path in [
        format!("/edit_comment/{}/", fixtures.comment.id),
        format!("/delete_comment/{}/", fixtures.comment.id),
    ] {
        let response = app.get(&path, Some(&fixtures.not_author.cookies)).await;
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "GET {path} as non-author"
        );
    }
}

#[tokio::test]
async fn missing_objects_are_not_found() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    let response = app.get("/news/9999/", None).await;
    assert_status(&response, StatusCode::NOT_FOUND);

    let response = app
        .get("/edit_comment/9999/", Some(&fixtures.author.cookies))
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);

    let response = app
        .get("/delete_comment/9999/", Some(&fixtures.author.cookies))
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_redirect_anonymous_users_first() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    for path in ["/edit_comment/abc/", "/delete_comment/abc/"] {
        let response = app.get(path, None).await;
        assert_redirects(&response, &format!("/auth/login/?next={path}"));

        let response = app.get(path, Some(&fixtures.author.cookies)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {path} as author");
    }

    let response = app.post_form("/news/abc/", &[("text", "hello")], None).await;
    assert_redirects(&response, "/auth/login/?next=/news/abc/");
}

#[tokio::test]
async fn non_author_404_looks_like_missing_comment() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    let hidden = app
        .get(
            &format!("/edit_comment/{}/", fixtures.comment.id),
            Some(&fixtures.not_author.cookies),
        )
        .await;
    let missing = app
        .get("/edit_comment/9999/", Some(&fixtures.not_author.cookies))
        .await;

    assert_eq!(hidden.status(), missing.status());
    assert_eq!(response_text(hidden).await, response_text(missing).await);
}

#[tokio::test]
async fn health_check_returns_healthy() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;
    assert_status(&response, StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&response_text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}
