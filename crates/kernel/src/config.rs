//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::form::comment::BAD_WORDS;

/// Default number of news items shown on the home page.
pub const DEFAULT_NEWS_COUNT_ON_HOME_PAGE: i64 = 10;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// SQLite connection URL (default: sqlite://newsdesk.db?mode=rwc).
    pub database_url: String,

    /// Maximum database connections in pool (default: 5).
    pub database_max_connections: u32,

    /// Directory to load templates from instead of the built-in set.
    pub templates_dir: Option<PathBuf>,

    /// Site name shown in page headers (default: "Newsdesk").
    pub site_name: String,

    /// How many news items the home page lists (default: 10).
    pub news_count_on_home_page: i64,

    /// Words that may not appear in comment text.
    pub forbidden_words: Vec<String>,

    /// Send the session cookie only over HTTPS (default: false).
    pub cookie_secure: bool,

    /// Cookie SameSite policy: "strict", "lax", or "none" (default: "lax").
    pub cookie_same_site: String,

    /// Session inactivity expiry in hours (default: 24).
    pub session_expiry_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from a variable lookup; unset variables take
    /// their defaults.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://newsdesk.db?mode=rwc".to_string());

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let templates_dir = var("TEMPLATES_DIR").map(PathBuf::from);

        let site_name = var("SITE_NAME").unwrap_or_else(|| "Newsdesk".to_string());

        let news_count_on_home_page = var("NEWS_COUNT_ON_HOME_PAGE")
            .unwrap_or_else(|| DEFAULT_NEWS_COUNT_ON_HOME_PAGE.to_string())
            .parse::<i64>()
            .context("NEWS_COUNT_ON_HOME_PAGE must be a valid integer")?;
        if news_count_on_home_page < 1 {
            anyhow::bail!("NEWS_COUNT_ON_HOME_PAGE must be at least 1");
        }

        let forbidden_words = var("FORBIDDEN_WORDS")
            .map(|v| parse_list(&v))
            .unwrap_or_else(default_forbidden_words);

        let cookie_secure = var("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let cookie_same_site = var("COOKIE_SAME_SITE")
            .unwrap_or_else(|| "lax".to_string())
            .to_lowercase();

        let session_expiry_hours = var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse()
            .context("SESSION_EXPIRY_HOURS must be a valid integer")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            templates_dir,
            site_name,
            news_count_on_home_page,
            forbidden_words,
            cookie_secure,
            cookie_same_site,
            session_expiry_hours,
        })
    }

    /// Configuration backed by a private in-memory database.
    ///
    /// Used by the test harness; nothing is read from the environment.
    pub fn in_memory() -> Self {
        Self {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            templates_dir: None,
            site_name: "Newsdesk".to_string(),
            news_count_on_home_page: DEFAULT_NEWS_COUNT_ON_HOME_PAGE,
            forbidden_words: default_forbidden_words(),
            cookie_secure: false,
            cookie_same_site: "lax".to_string(),
            session_expiry_hours: 24,
        }
    }
}

fn default_forbidden_words() -> Vec<String> {
    BAD_WORDS.iter().map(|w| (*w).to_string()).collect()
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
