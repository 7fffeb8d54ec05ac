//! News pages: the home listing and the detail page with its comments.
//!
//! Posting to a detail page adds a comment to it.

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{OriginalUri, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::form::csrf::INVALID_TOKEN;
use crate::form::{CommentForm, generate_csrf_token, verify_submitted_token};
use crate::models::{Comment, CommentEntry, CreateComment, News, NewsSummary, User};
use crate::state::AppState;

use super::helpers::{comments_anchor, current_user, object_id, render_page, require_login};

/// Home page context.
#[derive(Debug, Serialize)]
pub struct HomeContext {
    /// Latest news, newest first, capped at the configured count.
    pub object_list: Vec<NewsSummary>,
}

/// Detail page context.
#[derive(Debug, Serialize)]
pub struct DetailContext {
    pub news: News,

    /// Comments, oldest first.
    pub comments: Vec<CommentEntry>,

    /// Comment form; only present for authenticated viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<CommentForm>,
}

/// Comment submission from the detail page.
#[derive(Debug, Deserialize)]
pub struct CommentSubmission {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "_token")]
    pub csrf_token: Option<String>,
}

/// Build the home page context.
pub async fn home_context(state: &AppState) -> AppResult<HomeContext> {
    let object_list = News::list_latest(state.db(), state.news_count_on_home_page()).await?;
    Ok(HomeContext { object_list })
}

/// Build the detail page context for `viewer`.
pub async fn detail_context(
    state: &AppState,
    news_id: i64,
    viewer: Option<&User>,
) -> AppResult<DetailContext> {
    let news = News::find_by_id(state.db(), news_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let comments = Comment::list_for_news(state.db(), news.id).await?;

    Ok(DetailContext {
        news,
        comments,
        form: viewer.map(|_| CommentForm::blank()),
    })
}

/// Home page handler.
///
/// GET /
async fn home(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let user = current_user(&state, &session).await?;
    let context = home_context(&state).await?;
    render_page(&state, "news/home.html", user.as_ref(), &context)
}

/// News detail handler.
///
/// GET /news/{pk}/
async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(news_id): Path<i64>,
) -> AppResult<Response> {
    let user = current_user(&state, &session).await?;
    let mut context = detail_context(&state, news_id, user.as_ref()).await?;

    if let Some(form) = context.form.as_mut() {
        form.token = generate_csrf_token(&session).await?;
    }

    render_page(&state, "news/detail.html", user.as_ref(), &context)
}

/// Comment creation handler.
///
/// POST /news/{pk}/
/// - Anonymous: redirect to login with `next`
/// - Invalid text: detail page again with the form errors
/// - Otherwise: comment stored, redirect to the comments section
async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    news_id: Result<Path<i64>, PathRejection>,
    OriginalUri(uri): OriginalUri,
    submission: Result<Form<CommentSubmission>, FormRejection>,
) -> AppResult<Response> {
    let user = match require_login(&state, &session, &uri).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    let news_id = object_id(news_id)?;
    let Form(submission) = submission.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut context = detail_context(&state, news_id, Some(&user)).await?;
    let mut form = CommentForm::bound(submission.text);

    if !verify_submitted_token(&session, submission.csrf_token.as_deref()).await {
        form.errors.add_form(INVALID_TOKEN);
    } else if let Some(text) = form.clean(state.forbidden_words()) {
        let comment = Comment::create(
            state.db(),
            CreateComment {
                news_id: context.news.id,
                author_id: user.id,
                text,
                created: None,
            },
        )
        .await?;

        info!(
            comment_id = comment.id,
            news_id = comment.news_id,
            user_id = user.id,
            "comment created"
        );
        return Ok(Redirect::to(&comments_anchor(comment.news_id)).into_response());
    }

    form.token = generate_csrf_token(&session).await?;
    context.form = Some(form);
    render_page(&state, "news/detail.html", Some(&user), &context)
}

/// Create the news router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/news/{pk}/", get(detail).post(add_comment))
}
