//! Session management using the application's SQLite database.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;

/// How often expired sessions are purged.
pub const EXPIRED_SESSION_SWEEP_SECS: u64 = 60 * 60;

/// Create the session store on `pool`, creating its table if needed.
pub async fn create_session_store(pool: SqlitePool) -> Result<SqliteStore> {
    let store = SqliteStore::new(pool);
    store
        .migrate()
        .await
        .context("failed to create session table")?;

    Ok(store)
}

/// Create the session layer on top of `store`.
pub fn create_session_layer(config: &Config, store: SqliteStore) -> SessionManagerLayer<SqliteStore> {
    let same_site = match config.cookie_same_site.as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    };

    SessionManagerLayer::new(store)
        .with_secure(config.cookie_secure)
        .with_http_only(true)
        .with_same_site(same_site)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            config.session_expiry_hours,
        )))
}

/// Periodically delete expired sessions in the background.
pub fn spawn_expired_session_cleanup(store: SqliteStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = tokio::time::Duration::from_secs(EXPIRED_SESSION_SWEEP_SECS);
        if let Err(e) = store.continuously_delete_expired(period).await {
            tracing::error!(error = %e, "expired session cleanup stopped");
        }
    })
}
