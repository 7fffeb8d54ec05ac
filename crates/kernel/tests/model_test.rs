#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Model behaviour against a real database.

use chrono::{Duration, Utc};

use newsdesk_kernel::db;
use newsdesk_kernel::models::{Comment, CreateNews, News, User};
use newsdesk_kernel::models::news::TITLE_MAX_LENGTH;
use newsdesk_test_utils::{test_comment, test_news};

mod common;
use common::TestApp;

#[tokio::test]
async fn news_date_defaults_to_now() {
    let app = TestApp::new().await;
    let before = Utc::now() - Duration::seconds(1);

    let news = app.create_news(test_news("Fresh")).await;

    assert!(news.date >= before);
    assert!(news.date <= Utc::now());
}

#[tokio::test]
async fn news_title_is_validated() {
    let app = TestApp::new().await;

    let empty = News::create(
        &app.db,
        CreateNews {
            title: "  ".to_string(),
            text: String::new(),
            date: None,
        },
    )
    .await;
    assert!(empty.is_err());

    let long = News::create(
        &app.db,
        CreateNews {
            title: "x".repeat(TITLE_MAX_LENGTH + 1),
            text: String::new(),
            date: None,
        },
    )
    .await;
    assert!(long.is_err());

    assert_eq!(News::count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn stored_dates_round_trip() {
    let app = TestApp::new().await;
    let date = Utc::now() - Duration::days(3);

    let news = app.create_news(test_news("Dated").dated(date)).await;
    let loaded = News::find_by_id(&app.db, news.id).await.unwrap().unwrap();

    assert_eq!(loaded.date, news.date);
    assert_eq!(loaded.date.timestamp(), date.timestamp());
}

#[tokio::test]
async fn owned_queries_ignore_other_authors() {
    let (app, fixtures) = TestApp::with_fixtures().await;
    let id = fixtures.comment.id;
    let stranger = fixtures.not_author.user.id;

    assert!(Comment::find_owned(&app.db, id, stranger).await.unwrap().is_none());
    assert!(
        Comment::update_text(&app.db, id, stranger, "hijacked")
            .await
            .unwrap()
            .is_none()
    );
    assert!(!Comment::delete_owned(&app.db, id, stranger).await.unwrap());

    let comment = Comment::find_by_id(&app.db, id).await.unwrap().unwrap();
    assert_eq!(comment.text, "Test Comment");
}

#[tokio::test]
async fn comment_counts_per_news() {
    let (app, fixtures) = TestApp::with_fixtures().await;
    let other = app.create_news(test_news("Other")).await;
    app.create_comment(&other, &fixtures.author.user, test_comment("one"))
        .await;
    app.create_comment(&other, &fixtures.not_author.user, test_comment("two"))
        .await;

    assert_eq!(Comment::count_for_news(&app.db, fixtures.news.id).await.unwrap(), 1);
    assert_eq!(Comment::count_for_news(&app.db, other.id).await.unwrap(), 2);
    assert_eq!(app.comment_count().await, 3);
}

#[tokio::test]
async fn comment_entries_carry_author_name() {
    let (app, fixtures) = TestApp::with_fixtures().await;

    let entries = Comment::list_for_news(&app.db, fixtures.news.id).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].author_name, fixtures.author.user.username);
}

#[tokio::test]
async fn duplicate_username_is_a_unique_violation() {
    let app = TestApp::new().await;
    User::create_with_hash(&app.db, "reader", "hash").await.unwrap();

    let err = User::create_with_hash(&app.db, "reader", "other hash")
        .await
        .unwrap_err();

    assert!(db::is_unique_violation(&err));
    assert_eq!(User::count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn other_database_errors_are_not_unique_violations() {
    let app = TestApp::new().await;

    let err = sqlx::query("SELECT * FROM missing_table")
        .execute(&app.db)
        .await
        .map_err(anyhow::Error::from)
        .unwrap_err();

    assert!(!db::is_unique_violation(&err));
    assert!(!db::is_unique_violation(&anyhow::anyhow!("plain error")));
}
