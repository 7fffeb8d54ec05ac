//! Comment edit and delete pages.
//!
//! Both are restricted to the comment's author. Anyone else gets a 404, so
//! the existence of other people's comments is not revealed.

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
use crate::models::{Comment, News, User};
use crate::state::AppState;

use super::helpers::{comments_anchor, object_id, render_page, require_login};

/// Edit page context.
#[derive(Debug, Serialize)]
pub struct EditContext {
    pub news: News,
    pub comment: Comment,
    pub form: CommentForm,
}

/// Delete confirmation context.
#[derive(Debug, Serialize)]
pub struct DeleteContext {
    pub news: News,
    pub comment: Comment,
    pub token: String,
}

/// Comment edit submission.
#[derive(Debug, Deserialize)]
pub struct EditSubmission {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "_token")]
    pub csrf_token: Option<String>,
}

/// Comment delete submission.
#[derive(Debug, Deserialize)]
pub struct DeleteSubmission {
    #[serde(rename = "_token")]
    pub csrf_token: Option<String>,
}

/// Load a comment owned by `user` together with its news item.
async fn load_owned(state: &AppState, comment_id: i64, user: &User) -> AppResult<(Comment, News)> {
    let comment = Comment::find_owned(state.db(), comment_id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    let news = News::find_by_id(state.db(), comment.news_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((comment, news))
}

/// Comment edit form.
///
/// GET /edit_comment/{pk}/
async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    comment_id: Result<Path<i64>, PathRejection>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Response> {
    let user = match require_login(&state, &session, &uri).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    let comment_id = object_id(comment_id)?;

    let (comment, news) = load_owned(&state, comment_id, &user).await?;
    let mut form = CommentForm::bound(comment.text.clone());
    form.token = generate_csrf_token(&session).await?;

    render_page(
        &state,
        "news/edit.html",
        Some(&user),
        &EditContext {
            news,
            comment,
            form,
        },
    )
}

/// Comment edit submission.
///
/// POST /edit_comment/{pk}/
async fn edit_submit(
    State(state): State<AppState>,
    session: Session,
    comment_id: Result<Path<i64>, PathRejection>,
    OriginalUri(uri): OriginalUri,
    submission: Result<Form<EditSubmission>, FormRejection>,
) -> AppResult<Response> {
    let user = match require_login(&state, &session, &uri).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    let comment_id = object_id(comment_id)?;
    let (comment, news) = load_owned(&state, comment_id, &user).await?;
    let Form(submission) = submission.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let mut form = CommentForm::bound(submission.text);

    if !verify_submitted_token(&session, submission.csrf_token.as_deref()).await {
        form.errors.add_form(INVALID_TOKEN);
    } else if let Some(text) = form.clean(state.forbidden_words()) {
        let updated = Comment::update_text(state.db(), comment.id, user.id, &text)
            .await?
            .ok_or(AppError::NotFound)?;

        info!(comment_id = updated.id, user_id = user.id, "comment edited");
        return Ok(Redirect::to(&comments_anchor(updated.news_id)).into_response());
    }

    form.token = generate_csrf_token(&session).await?;
    render_page(
        &state,
        "news/edit.html",
        Some(&user),
        &EditContext {
            news,
            comment,
            form,
        },
    )
}

/// Comment delete confirmation.
///
/// GET /delete_comment/{pk}/
async fn delete_confirm(
    State(state): State<AppState>,
    session: Session,
    comment_id: Result<Path<i64>, PathRejection>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Response> {
    let user = match require_login(&state, &session, &uri).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    let comment_id = object_id(comment_id)?;

    let (comment, news) = load_owned(&state, comment_id, &user).await?;
    let token = generate_csrf_token(&session).await?;

    render_page(
        &state,
        "news/delete.html",
        Some(&user),
        &DeleteContext {
            news,
            comment,
            token,
        },
    )
}

/// Comment deletion.
///
/// POST /delete_comment/{pk}/
///
/// The body is optional; a bare POST deletes as long as the session is the
/// author's.
async fn delete_submit(
    State(state): State<AppState>,
    session: Session,
    comment_id: Result<Path<i64>, PathRejection>,
    OriginalUri(uri): OriginalUri,
    submission: Result<Form<DeleteSubmission>, FormRejection>,
) -> AppResult<Response> {
    let user = match require_login(&state, &session, &uri).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    let comment_id = object_id(comment_id)?;

    let (comment, news) = load_owned(&state, comment_id, &user).await?;

    let submitted = submission.ok().and_then(|Form(s)| s.csrf_token);
    if !verify_submitted_token(&session, submitted.as_deref()).await {
        return Err(AppError::BadRequest(INVALID_TOKEN.to_string()));
    }

    if !Comment::delete_owned(state.db(), comment.id, user.id).await? {
        return Err(AppError::NotFound);
    }

    info!(
        comment_id = comment.id,
        news_id = news.id,
        user_id = user.id,
        "comment deleted"
    );
    Ok(Redirect::to(&comments_anchor(news.id)).into_response())
}

/// Create the comment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/edit_comment/{pk}/", get(edit_form).post(edit_submit))
        .route("/delete_comment/{pk}/", get(delete_confirm).post(delete_submit))
}
