//! News model: published items that readers can comment on.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// News record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub text: String,

    /// Publication date.
    pub date: DateTime<Utc>,
}

/// News row as listed on the home page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NewsSummary {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub comment_count: i64,
}

/// Input for creating a news item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNews {
    pub title: String,
    pub text: String,

    /// Publication date; the creation time when omitted.
    pub date: Option<DateTime<Utc>>,
}

/// Maximum title length.
pub const TITLE_MAX_LENGTH: usize = 200;

impl News {
    /// Create a news item.
    pub async fn create(pool: &SqlitePool, input: CreateNews) -> Result<Self> {
        if input.title.trim().is_empty() {
            anyhow::bail!("news title cannot be empty");
        }
        if input.title.chars().count() > TITLE_MAX_LENGTH {
            anyhow::bail!("news title is longer than {TITLE_MAX_LENGTH} characters");
        }

        let date = input.date.unwrap_or_else(Utc::now);

        let news = sqlx::query_as::<_, News>(
            "INSERT INTO news (title, text, date) VALUES (?, ?, ?) RETURNING id, title, text, date",
        )
        .bind(&input.title)
        .bind(&input.text)
        .bind(date)
        .fetch_one(pool)
        .await
        .context("failed to create news")?;

        Ok(news)
    }

    /// Find a news item by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>> {
        let news =
            sqlx::query_as::<_, News>("SELECT id, title, text, date FROM news WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await
                .context("failed to fetch news by id")?;

        Ok(news)
    }

    /// List the most recent news, newest first, with comment counts.
    pub async fn list_latest(pool: &SqlitePool, limit: i64) -> Result<Vec<NewsSummary>> {
        let news = sqlx::query_as::<_, NewsSummary>(
            r#"
            SELECT n.id, n.title, n.text, n.date, COUNT(c.id) AS comment_count
            FROM news n
            LEFT JOIN comment c ON c.news_id = n.id
            GROUP BY n.id
            ORDER BY n.date DESC, n.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("failed to list latest news")?;

        Ok(news)
    }

    /// Count all news items.
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(pool)
            .await
            .context("failed to count news")?;

        Ok(count)
    }
}
