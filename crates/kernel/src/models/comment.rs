//! Comment model: reader discussion attached to a news item.
//!
//! Mutating lookups are scoped to the author, so a comment owned by someone
//! else is indistinguishable from one that does not exist.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Comment record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,

    /// News item the comment belongs to.
    pub news_id: i64,

    /// User who wrote the comment.
    pub author_id: i64,

    pub text: String,
    pub created: DateTime<Utc>,
}

/// Comment joined with its author's username, for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentEntry {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Input for creating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub news_id: i64,
    pub author_id: i64,
    pub text: String,

    /// Creation time; now when omitted.
    pub created: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create a comment.
    pub async fn create(pool: &SqlitePool, input: CreateComment) -> Result<Self> {
        let created = input.created.unwrap_or_else(Utc::now);

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comment (news_id, author_id, text, created)
            VALUES (?, ?, ?, ?)
            RETURNING id, news_id, author_id, text, created
            "#,
        )
        .bind(input.news_id)
        .bind(input.author_id)
        .bind(&input.text)
        .bind(created)
        .fetch_one(pool)
        .await
        .context("failed to create comment")?;

        Ok(comment)
    }

    /// Find a comment by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, news_id, author_id, text, created FROM comment WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch comment by id")?;

        Ok(comment)
    }

    /// Find a comment by ID, only if `author_id` wrote it.
    pub async fn find_owned(pool: &SqlitePool, id: i64, author_id: i64) -> Result<Option<Self>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, news_id, author_id, text, created FROM comment WHERE id = ? AND author_id = ?",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch owned comment")?;

        Ok(comment)
    }

    /// List comments on a news item, oldest first.
    pub async fn list_for_news(pool: &SqlitePool, news_id: i64) -> Result<Vec<CommentEntry>> {
        let comments = sqlx::query_as::<_, CommentEntry>(
            r#"
            SELECT c.id, c.news_id, c.author_id, u.username AS author_name, c.text, c.created
            FROM comment c
            JOIN users u ON u.id = c.author_id
            WHERE c.news_id = ?
            ORDER BY c.created ASC, c.id ASC
            "#,
        )
        .bind(news_id)
        .fetch_all(pool)
        .await
        .context("failed to list comments for news")?;

        Ok(comments)
    }

    /// Count comments on a news item.
    pub async fn count_for_news(pool: &SqlitePool, news_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comment WHERE news_id = ?")
            .bind(news_id)
            .fetch_one(pool)
            .await
            .context("failed to count comments for news")?;

        Ok(count)
    }

    /// Count all comments.
    pub async fn count_all(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comment")
            .fetch_one(pool)
            .await
            .context("failed to count all comments")?;

        Ok(count)
    }

    /// Replace the text of a comment written by `author_id`.
    ///
    /// Returns `None` when no such comment exists for that author.
    pub async fn update_text(
        pool: &SqlitePool,
        id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Option<Self>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comment
            SET text = ?
            WHERE id = ? AND author_id = ?
            RETURNING id, news_id, author_id, text, created
            "#,
        )
        .bind(text)
        .bind(id)
        .bind(author_id)
        .fetch_optional(pool)
        .await
        .context("failed to update comment")?;

        Ok(comment)
    }

    /// Delete a comment written by `author_id`.
    pub async fn delete_owned(pool: &SqlitePool, id: i64, author_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comment WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(pool)
            .await
            .context("failed to delete comment")?;

        Ok(result.rows_affected() > 0)
    }
}
