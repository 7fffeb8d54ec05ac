//! CSRF token generation and verification.
//!
//! Tokens are stored in the session together with their issue time and are
//! single-use.

use anyhow::{Result, bail};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tower_sessions::Session;

/// Session key for storing CSRF tokens.
const CSRF_SESSION_KEY: &str = "csrf_tokens";

/// Maximum number of tokens to store per session.
const MAX_TOKENS: usize = 10;

/// Token validity period in seconds (1 hour).
const TOKEN_VALIDITY_SECS: i64 = 3600;

/// Message shown when a submitted token does not verify.
pub const INVALID_TOKEN: &str = "Invalid form token. Please try again.";

/// Generate a CSRF token and store it in the session.
pub async fn generate_csrf_token(session: &Session) -> Result<String> {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random_bytes);

    let timestamp = chrono::Utc::now().timestamp();
    let token = derive_token(&random_bytes, timestamp);

    let mut tokens = stored_tokens(session).await;
    tokens.push(format!("{token}:{timestamp}"));

    // Keep only the most recent tokens
    if tokens.len() > MAX_TOKENS {
        let skip = tokens.len() - MAX_TOKENS;
        tokens.drain(..skip);
    }

    session
        .insert(CSRF_SESSION_KEY, tokens)
        .await
        .map_err(|e| anyhow::anyhow!("failed to store CSRF token: {e}"))?;

    Ok(token)
}

/// Verify a CSRF token against the session, consuming it on success.
pub async fn verify_csrf_token(session: &Session, submitted: &str) -> Result<bool> {
    if submitted.is_empty() {
        bail!("empty CSRF token");
    }

    let mut tokens = stored_tokens(session).await;
    if tokens.is_empty() {
        return Ok(false);
    }

    let now = chrono::Utc::now().timestamp();
    let Some(index) = tokens.iter().position(|entry| {
        parse_entry(entry).is_some_and(|(token, issued)| {
            token == submitted && now - issued <= TOKEN_VALIDITY_SECS
        })
    }) else {
        return Ok(false);
    };

    tokens.remove(index);
    tokens.retain(|entry| {
        parse_entry(entry).is_some_and(|(_, issued)| now - issued <= TOKEN_VALIDITY_SECS)
    });

    session
        .insert(CSRF_SESSION_KEY, tokens)
        .await
        .map_err(|e| anyhow::anyhow!("failed to update CSRF tokens: {e}"))?;

    Ok(true)
}

/// Check the token a form submitted, if it submitted one.
///
/// Submissions without a token field are accepted, matching clients that
/// post forms directly. A token that is present must verify.
pub async fn verify_submitted_token(session: &Session, submitted: Option<&str>) -> bool {
    match submitted {
        None => true,
        Some(token) => verify_csrf_token(session, token).await.unwrap_or(false),
    }
}

async fn stored_tokens(session: &Session) -> Vec<String> {
    session
        .get(CSRF_SESSION_KEY)
        .await
        .unwrap_or(None)
        .unwrap_or_default()
}

fn derive_token(random_bytes: &[u8], timestamp: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    hasher.update(timestamp.to_le_bytes());
    hex::encode(hasher.finalize())
}

fn parse_entry(entry: &str) -> Option<(&str, i64)> {
    let (token, issued) = entry.split_once(':')?;
    Some((token, issued.parse().ok()?))
}
