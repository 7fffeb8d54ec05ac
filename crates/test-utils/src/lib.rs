//! Newsdesk test utilities.
//!
//! Fixture builders for users, news and comments, plus assertion helpers
//! for rendered pages and ordered listings.

use chrono::{DateTime, Duration, Utc};

/// Username and password of the standard comment author fixture.
pub const AUTHOR: (&str, &str) = ("test_author", "test_password");

/// Username and password of the standard "someone else" fixture.
pub const NOT_AUTHOR: (&str, &str) = ("not_author", "password");

/// A test user fixture.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub password: String,
}

/// Create a test user with a default password.
pub fn test_user(username: &str) -> TestUser {
    TestUser {
        username: username.to_string(),
        password: "test_password".to_string(),
    }
}

/// The user who writes comments in the standard fixtures.
pub fn author() -> TestUser {
    test_user(AUTHOR.0).with_password(AUTHOR.1)
}

/// An authenticated user who did not write the fixture comment.
pub fn not_author() -> TestUser {
    test_user(NOT_AUTHOR.0).with_password(NOT_AUTHOR.1)
}

impl TestUser {
    /// Set the password.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }
}

/// A news item fixture.
#[derive(Debug, Clone)]
pub struct TestNews {
    pub title: String,
    pub text: String,

    /// Publication date; the database default (now) when unset.
    pub date: Option<DateTime<Utc>>,
}

/// Create a news fixture with placeholder text.
pub fn test_news(title: &str) -> TestNews {
    TestNews {
        title: title.to_string(),
        text: "Some content".to_string(),
        date: None,
    }
}

/// `count` news fixtures titled "News 0", "News 1", ...
pub fn news_batch(count: usize) -> Vec<TestNews> {
    (0..count).map(|i| test_news(&format!("News {i}"))).collect()
}

impl TestNews {
    /// Set the text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Set an explicit publication date.
    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Publish `days` days before now.
    pub fn days_ago(self, days: i64) -> Self {
        self.dated(Utc::now() - Duration::days(days))
    }
}

/// A comment fixture.
#[derive(Debug, Clone)]
pub struct TestComment {
    pub text: String,

    /// Creation time; now when unset.
    pub created: Option<DateTime<Utc>>,
}

/// Create a comment fixture.
pub fn test_comment(text: &str) -> TestComment {
    TestComment {
        text: text.to_string(),
        created: None,
    }
}

impl TestComment {
    /// Set an explicit creation time.
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Created `days` days before now.
    pub fn days_ago(self, days: i64) -> Self {
        self.created_at(Utc::now() - Duration::days(days))
    }
}

/// Assertion helpers.
pub mod assert {
    use std::fmt::Debug;

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that values never increase.
    pub fn descending<T: PartialOrd + Debug>(values: &[T]) {
        assert!(
            values.windows(2).all(|w| w[0] >= w[1]),
            "Expected descending order, got: {values:?}"
        );
    }

    /// Assert that values never decrease.
    pub fn ascending<T: PartialOrd + Debug>(values: &[T]) {
        assert!(
            values.windows(2).all(|w| w[0] <= w[1]),
            "Expected ascending order, got: {values:?}"
        );
    }
}
