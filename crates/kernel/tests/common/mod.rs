#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every [`TestApp`] is the REAL kernel router and state on top of its own
//! in-memory database, so tests never share rows or sessions.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions_sqlx_store::SqliteStore;

use newsdesk_kernel::models::{Comment, CreateComment, CreateNews, News, User};
use newsdesk_kernel::{AppState, Config, routes, session};
use newsdesk_test_utils::{TestComment, TestNews, TestUser};

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub db: SqlitePool,
    pub state: AppState,
    pub sessions: SqliteStore,
}

/// A logged-in user and the cookies of their session.
pub struct Client {
    pub user: User,
    pub cookies: String,
}

/// The standard fixture set: two users with sessions, one news item and
/// one comment written by `author`.
pub struct Fixtures {
    pub author: Client,
    pub not_author: Client,
    pub news: News,
    pub comment: Comment,
}

impl TestApp {
    /// Create a new test application with full kernel initialization.
    pub async fn new() -> Self {
        Self::with_config(Config::in_memory()).await
    }

    /// Create a test application from a custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let state = AppState::new(&config)
            .await
            .expect("Failed to initialize AppState");
        let db = state.db().clone();

        let sessions = session::create_session_store(db.clone())
            .await
            .expect("Failed to create session store");
        let router = routes::app(
            state.clone(),
            session::create_session_layer(&config, sessions.clone()),
        );

        Self {
            router,
            db,
            state,
            sessions,
        }
    }

    /// Number of stored sessions.
    pub async fn session_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tower_sessions")
            .fetch_one(&self.db)
            .await
            .expect("Failed to count sessions")
    }

    /// Create the app together with the standard fixtures.
    pub async fn with_fixtures() -> (Self, Fixtures) {
        let app = Self::new().await;
        let author = app.client(&newsdesk_test_utils::author()).await;
        let not_author = app.client(&newsdesk_test_utils::not_author()).await;
        let news = app
            .create_news(newsdesk_test_utils::test_news("Test News"))
            .await;
        let comment = app
            .create_comment(
                &news,
                &author.user,
                newsdesk_test_utils::test_comment("Test Comment"),
            )
            .await;

        let fixtures = Fixtures {
            author,
            not_author,
            news,
            comment,
        };
        (app, fixtures)
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET `path`, optionally with session cookies.
    pub async fn get(&self, path: &str, cookies: Option<&str>) -> Response {
        let mut builder = Request::get(path);
        if let Some(cookies) = cookies.filter(|c| !c.is_empty()) {
            builder = builder.header(header::COOKIE, cookies);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// POST url-encoded `fields` to `path`, optionally with session cookies.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        cookies: Option<&str>,
    ) -> Response {
        let mut builder = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookies) = cookies.filter(|c| !c.is_empty()) {
            builder = builder.header(header::COOKIE, cookies);
        }
        self.request(builder.body(Body::from(encode_form(fields))).unwrap())
            .await
    }

    /// POST to `path` with no body and no content type.
    pub async fn post_empty(&self, path: &str, cookies: Option<&str>) -> Response {
        let mut builder = Request::post(path);
        if let Some(cookies) = cookies.filter(|c| !c.is_empty()) {
            builder = builder.header(header::COOKIE, cookies);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Create a user directly in the database.
    pub async fn create_user(&self, fixture: &TestUser) -> User {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        // Minimal Argon2 params for test speed; verification reads the
        // params from the hash, so login still goes through the real code.
        let password = fixture.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let params = argon2::Params::new(4 * 1024, 1, 1, None)
                .expect("test Argon2 params are valid");
            let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .expect("Failed to hash password")
                .to_string()
        })
        .await
        .expect("Argon2 hashing task panicked");

        User::create_with_hash(&self.db, &fixture.username, &password_hash)
            .await
            .expect("Failed to create test user")
    }

    /// Log in through the login form and return the session cookies.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form(
                "/auth/login/",
                &[("username", username), ("password", password)],
                None,
            )
            .await;

        assert!(
            response.status().is_redirection(),
            "Login failed for user '{username}' (status {})",
            response.status()
        );

        extract_cookies(&response)
    }

    /// Create a user and log them in.
    pub async fn client(&self, fixture: &TestUser) -> Client {
        let user = self.create_user(fixture).await;
        let cookies = self.login(&fixture.username, &fixture.password).await;
        Client { user, cookies }
    }

    /// Create a news item from a fixture.
    pub async fn create_news(&self, fixture: TestNews) -> News {
        News::create(
            &self.db,
            CreateNews {
                title: fixture.title,
                text: fixture.text,
                date: fixture.date,
            },
        )
        .await
        .expect("Failed to create test news")
    }

    /// Create a comment on `news` by `author` from a fixture.
    pub async fn create_comment(&self, news: &News, author: &User, fixture: TestComment) -> Comment {
        Comment::create(
            &self.db,
            CreateComment {
                news_id: news.id,
                author_id: author.id,
                text: fixture.text,
                created: fixture.created,
            },
        )
        .await
        .expect("Failed to create test comment")
    }

    /// Number of stored comments.
    pub async fn comment_count(&self) -> i64 {
        Comment::count_all(&self.db)
            .await
            .expect("Failed to count comments")
    }
}

/// URL-encode form fields.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Extract Set-Cookie headers from a response for use in subsequent requests.
pub fn extract_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Read a response body as a string.
pub async fn response_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Assert that `response` redirects to exactly `expected`.
pub fn assert_redirects(response: &Response, expected: &str) {
    assert!(
        response.status().is_redirection(),
        "Expected a redirect to {expected}, got status {}",
        response.status()
    );
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, expected, "Unexpected redirect target");
}

/// Assert the status of `response`.
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "Unexpected status code");
}

/// Pull the CSRF token out of a rendered form.
pub fn form_token(html: &str) -> String {
    let re = regex::Regex::new(r#"name="_token" value="([0-9a-f]{64})""#).unwrap();
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("No CSRF token in page")
}
