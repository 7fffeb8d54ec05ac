//! User model and account operations.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub pass: String,
    pub date_joined: DateTime<Utc>,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
}

impl User {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, pass, date_joined FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by id")?;

        Ok(user)
    }

    /// Find a user by username.
    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, pass, date_joined FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by username")?;

        Ok(user)
    }

    /// Create a new user with an Argon2id password hash.
    pub async fn create(pool: &SqlitePool, input: CreateUser) -> Result<Self> {
        let pass = hash_password(&input.password)?;
        Self::create_with_hash(pool, &input.username, &pass).await
    }

    /// Create a user from an already computed password hash.
    pub async fn create_with_hash(pool: &SqlitePool, username: &str, pass: &str) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, pass, date_joined)
            VALUES (?, ?, ?)
            RETURNING id, username, pass, date_joined
            "#,
        )
        .bind(username)
        .bind(pass)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .context("failed to create user")?;

        Ok(user)
    }

    /// Count all users.
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .context("failed to count users")?;

        Ok(count)
    }

    /// Verify a password against this user's hash.
    pub fn verify_password(&self, password: &str) -> bool {
        if self.pass.is_empty() {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&self.pass) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
