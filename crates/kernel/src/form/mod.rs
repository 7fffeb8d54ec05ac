//! Form handling: validation, field errors and CSRF protection.
//!
//! Forms are plain serializable structs rendered through Tera templates.
//! Validation never fails a request; problems are collected as
//! [`ValidationError`]s and the form is rendered again.

pub mod account;
pub mod comment;
pub mod csrf;
mod types;

pub use account::{LoginForm, SignupForm};
pub use comment::{BAD_WORDS, CommentForm, ForbiddenWords, WARNING};
pub use csrf::{generate_csrf_token, verify_csrf_token, verify_submitted_token};
pub use types::{FormErrors, REQUIRED, ValidationError};
