//! Authentication routes (login, logout, signup).

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::db;
use crate::error::{AppError, AppResult};
use crate::form::account::{INVALID_LOGIN, USERNAME_TAKEN, is_safe_next};
use crate::form::csrf::INVALID_TOKEN;
use crate::form::{LoginForm, SignupForm, generate_csrf_token, verify_submitted_token};
use crate::models::{CreateUser, User};
use crate::state::AppState;

use super::helpers::{LOGIN_PATH, SESSION_USER_ID, current_user, render_page};

/// Query string accepted by the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Form-based login request.
#[derive(Debug, Deserialize)]
pub struct LoginFormRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
    #[serde(rename = "_token")]
    pub csrf_token: Option<String>,
}

/// Form-based signup request.
#[derive(Debug, Deserialize)]
pub struct SignupFormRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(rename = "_token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginContext {
    form: LoginForm,
}

#[derive(Debug, Serialize)]
struct SignupContext {
    form: SignupForm,
}

#[derive(Debug, Serialize)]
struct LogoutContext {}

/// Login form handler.
///
/// GET /auth/login/
async fn login_form(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> AppResult<Response> {
    let user = current_user(&state, &session).await?;
    let form = LoginForm {
        token: generate_csrf_token(&session).await?,
        next: query.next.filter(|n| is_safe_next(n)),
        ..LoginForm::default()
    };

    render_page(&state, "users/login.html", user.as_ref(), &LoginContext { form })
}

/// Form-based login handler.
///
/// POST /auth/login/
/// - Success: session bound to the user, redirect to `next` or the home page
/// - Failure: login form again with an error
async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(request): Form<LoginFormRequest>,
) -> AppResult<Response> {
    let mut form = LoginForm {
        username: request.username.trim().to_string(),
        next: request.next.filter(|n| is_safe_next(n)),
        ..LoginForm::default()
    };

    if !verify_submitted_token(&session, request.csrf_token.as_deref()).await {
        form.errors.add_form(INVALID_TOKEN);
    } else if form.clean(&request.password) {
        match authenticate(&state, &form.username, &request.password).await? {
            Some(user) => {
                start_session(&session, &user).await?;
                info!(user_id = user.id, "user logged in");

                let target = form.next.unwrap_or_else(|| "/".to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            None => {
                warn!(username = %form.username, "failed login attempt");
                form.errors.add_form(INVALID_LOGIN);
            }
        }
    }

    form.token = generate_csrf_token(&session).await?;
    render_page(&state, "users/login.html", None, &LoginContext { form })
}

/// Look up a user and check the password.
async fn authenticate(state: &AppState, username: &str, password: &str) -> AppResult<Option<User>> {
    let user = User::find_by_username(state.db(), username).await?;
    Ok(user.filter(|u| u.verify_password(password)))
}

/// Bind the session to `user`, rotating the session id.
async fn start_session(session: &Session, user: &User) -> AppResult<()> {
    session.cycle_id().await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("failed to cycle session id: {e}"))
    })?;
    session.insert(SESSION_USER_ID, user.id).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("failed to insert user_id into session: {e}"))
    })?;
    Ok(())
}

/// Logout handler.
///
/// GET or POST /auth/logout/
/// - Clears the session and renders the logged-out page
async fn logout(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let user_id: Option<i64> = session.get(SESSION_USER_ID).await.ok().flatten();

    session.flush().await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("failed to flush session: {e}"))
    })?;

    if let Some(uid) = user_id {
        info!(user_id = uid, "user logged out");
    }

    render_page(&state, "users/logout.html", None, &LogoutContext {})
}

/// Signup form handler.
///
/// GET /auth/signup/
async fn signup_form(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let user = current_user(&state, &session).await?;
    let form = SignupForm {
        token: generate_csrf_token(&session).await?,
        ..SignupForm::default()
    };

    render_page(&state, "users/signup.html", user.as_ref(), &SignupContext { form })
}

/// Signup handler.
///
/// POST /auth/signup/
/// - Success: account created, redirect to the login page
/// - Failure: signup form again with the field errors
async fn signup_submit(
    State(state): State<AppState>,
    session: Session,
    Form(request): Form<SignupFormRequest>,
) -> AppResult<Response> {
    let mut form = SignupForm {
        username: request.username.trim().to_string(),
        ..SignupForm::default()
    };

    if !verify_submitted_token(&session, request.csrf_token.as_deref()).await {
        form.errors.add_form(INVALID_TOKEN);
    } else if form.clean(&request.password1, &request.password2) {
        if User::find_by_username(state.db(), &form.username)
            .await?
            .is_some()
        {
            form.errors.add_field("username", USERNAME_TAKEN);
        } else {
            let created = User::create(
                state.db(),
                CreateUser {
                    username: form.username.clone(),
                    password: request.password1,
                },
            )
            .await;

            match created {
                Ok(user) => {
                    info!(user_id = user.id, username = %user.username, "user signed up");
                    return Ok(Redirect::to(LOGIN_PATH).into_response());
                }
                // Lost a race with a concurrent signup for the same name
                Err(e) if db::is_unique_violation(&e) => {
                    form.errors.add_field("username", USERNAME_TAKEN);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    let user = current_user(&state, &session).await?;
    form.token = generate_csrf_token(&session).await?;
    render_page(&state, "users/signup.html", user.as_ref(), &SignupContext { form })
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login/", get(login_form).post(login_submit))
        .route("/auth/logout/", get(logout).post(logout))
        .route("/auth/signup/", get(signup_form).post(signup_submit))
}
