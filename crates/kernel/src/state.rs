//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::form::ForbiddenWords;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// SQLite connection pool.
    db: SqlitePool,

    /// Theme engine for template rendering.
    theme: ThemeEngine,

    /// Words rejected in comment text.
    forbidden_words: ForbiddenWords,

    /// Site name shown in page headers.
    site_name: String,

    /// How many news items the home page lists.
    news_count_on_home_page: i64,
}

impl AppState {
    /// Create application state: connect, migrate and load templates.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        let theme = match &config.templates_dir {
            Some(dir) => ThemeEngine::new(dir).context("failed to load templates")?,
            None => ThemeEngine::builtin().context("failed to load built-in templates")?,
        };

        let forbidden_words = ForbiddenWords::new(&config.forbidden_words);
        info!(
            forbidden_words = config.forbidden_words.len(),
            news_count_on_home_page = config.news_count_on_home_page,
            "application state initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db,
                theme,
                forbidden_words,
                site_name: config.site_name.clone(),
                news_count_on_home_page: config.news_count_on_home_page,
            }),
        })
    }

    /// Get the database pool.
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }

    /// Get the comment word filter.
    pub fn forbidden_words(&self) -> &ForbiddenWords {
        &self.inner.forbidden_words
    }

    pub fn site_name(&self) -> &str {
        &self.inner.site_name
    }

    pub fn news_count_on_home_page(&self) -> i64 {
        self.inner.news_count_on_home_page
    }

    /// Check if the database answers queries.
    pub async fn db_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
