//! HTTP route handlers.

pub mod auth;
pub mod comment;
pub mod health;
pub mod helpers;
pub mod news;

use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::state::AppState;

/// All kernel routes, before state and middleware are attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(news::router())
        .merge(comment::router())
        .merge(auth::router())
        .merge(health::router())
}

/// The complete application as served by the binary and the tests.
///
/// Middleware (last added = first executed): TraceLayer → session → routes.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    router()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
