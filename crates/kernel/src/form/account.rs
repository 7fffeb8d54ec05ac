//! Login and signup forms.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::types::{FormErrors, REQUIRED};

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Shown for any failed login, whether or not the username exists.
pub const INVALID_LOGIN: &str = "Please enter a correct username and password.";

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[allow(clippy::expect_used)]
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex literal"));

/// Login form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub errors: FormErrors,
    pub token: String,

    /// Where to go after logging in.
    pub next: Option<String>,
}

impl LoginForm {
    /// Check that both fields were filled in.
    pub fn clean(&mut self, password: &str) -> bool {
        if self.username.trim().is_empty() {
            self.errors.add_field("username", REQUIRED);
        }
        if password.is_empty() {
            self.errors.add_field("password", REQUIRED);
        }
        self.errors.is_empty()
    }
}

/// Signup form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub errors: FormErrors,
    pub token: String,
}

impl SignupForm {
    /// Validate the username and the two password entries.
    ///
    /// Username uniqueness needs the database and is checked by the caller.
    pub fn clean(&mut self, password1: &str, password2: &str) -> bool {
        let username = self.username.trim();
        if username.is_empty() {
            self.errors.add_field("username", REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_LENGTH {
            self.errors.add_field(
                "username",
                format!("Ensure this value has at most {USERNAME_MAX_LENGTH} characters."),
            );
        } else if !USERNAME_RE.is_match(username) {
            self.errors.add_field(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if password1.is_empty() {
            self.errors.add_field("password1", REQUIRED);
        }
        if password2.is_empty() {
            self.errors.add_field("password2", REQUIRED);
        }
        if password1.is_empty() || password2.is_empty() {
            return false;
        }

        if password1 != password2 {
            self.errors
                .add_field("password2", "The two password fields didn't match.");
        } else {
            if password1.chars().count() < PASSWORD_MIN_LENGTH {
                self.errors.add_field(
                    "password2",
                    format!(
                        "This password is too short. It must contain at least {PASSWORD_MIN_LENGTH} characters."
                    ),
                );
            }
            if password1.chars().all(|c| c.is_ascii_digit()) {
                self.errors
                    .add_field("password2", "This password is entirely numeric.");
            }
        }

        self.errors.is_empty()
    }
}

/// Whether `next` is a local path that is safe to redirect to.
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}
