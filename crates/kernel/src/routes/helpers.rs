//! Shared route helpers: session identity, login redirects and page rendering.

use axum::extract::Path;
use axum::extract::rejection::PathRejection;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;

/// Session key for storing the authenticated user ID.
pub const SESSION_USER_ID: &str = "user_id";

/// Path of the login page.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Path of the news detail page.
pub fn detail_path(news_id: i64) -> String {
    format!("/news/{news_id}/")
}

/// Where comment mutations land: the detail page, scrolled to the comments.
pub fn comments_anchor(news_id: i64) -> String {
    format!("{}#comments", detail_path(news_id))
}

/// Login URL that sends the user back to `next` afterwards.
///
/// Slashes stay readable in the query string; everything else that needs
/// escaping is percent-encoded.
pub fn login_url(next: &str) -> String {
    format!(
        "{LOGIN_PATH}?next={}",
        urlencoding::encode(next).replace("%2F", "/")
    )
}

/// Load the logged-in user, if any.
///
/// A session pointing at a user that no longer exists counts as anonymous.
pub async fn current_user(state: &AppState, session: &Session) -> AppResult<Option<User>> {
    let user_id: Option<i64> = session.get(SESSION_USER_ID).await.ok().flatten();

    let Some(id) = user_id else {
        return Ok(None);
    };

    Ok(User::find_by_id(state.db(), id).await?)
}

/// Require an authenticated user, or redirect to login.
///
/// The redirect carries the requested path in `next`.
pub async fn require_login(state: &AppState, session: &Session, uri: &Uri) -> Result<User, Response> {
    match current_user(state, session).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            let next = uri
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or_else(|| uri.path());
            Err(Redirect::to(&login_url(next)).into_response())
        }
        Err(e) => Err(e.into_response()),
    }
}

/// Resolve an object id taken from the URL.
///
/// An id that does not parse names no object, so it is a 404 like any other
/// missing one. Handlers check login first so anonymous users are still
/// redirected.
pub fn object_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

/// Build a Tera context from a page context plus the site-wide variables.
///
/// Adds: `site_name`, `user_authenticated`, `current_user_id`,
/// `current_username`.
pub fn page_context<T: Serialize>(
    state: &AppState,
    user: Option<&User>,
    page: &T,
) -> AppResult<tera::Context> {
    let mut context = tera::Context::from_serialize(page)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to build page context: {e}")))?;

    context.insert("site_name", state.site_name());
    context.insert("user_authenticated", &user.is_some());
    context.insert("current_user_id", &user.map(|u| u.id));
    context.insert("current_username", &user.map(|u| u.username.as_str()));

    Ok(context)
}

/// Render a page template with 200 OK.
pub fn render_page<T: Serialize>(
    state: &AppState,
    template: &str,
    user: Option<&User>,
    page: &T,
) -> AppResult<Response> {
    let context = page_context(state, user, page)?;
    let html = state.theme().render(template, &context)?;
    Ok((StatusCode::OK, Html(html)).into_response())
}
