//! Comment form and forbidden-word filtering.

use serde::Serialize;

use super::types::{FormErrors, REQUIRED};

/// Words rejected in comment text unless overridden by configuration.
pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];

/// Warning shown when a comment contains a forbidden word.
pub const WARNING: &str = "Не ругайтесь!";

/// Case-insensitive list of words a comment may not contain.
#[derive(Debug, Clone)]
pub struct ForbiddenWords {
    words: Vec<String>,
}

impl ForbiddenWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Return the first forbidden word found anywhere in `text`.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.words
            .iter()
            .find(|word| lowered.contains(word.as_str()))
            .map(String::as_str)
    }
}

impl Default for ForbiddenWords {
    fn default() -> Self {
        Self::new(BAD_WORDS)
    }
}

/// The comment form shown under a news item and on the edit page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentForm {
    pub text: String,
    pub errors: FormErrors,

    /// CSRF token rendered into the form.
    pub token: String,
}

impl CommentForm {
    /// An empty form.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A form holding submitted (or existing) text.
    pub fn bound(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Validate the text, recording errors on the form.
    ///
    /// Returns the text to store when the form is valid.
    pub fn clean(&mut self, forbidden: &ForbiddenWords) -> Option<String> {
        if self.text.trim().is_empty() {
            self.errors.add_field("text", REQUIRED);
        } else if forbidden.find_in(&self.text).is_some() {
            self.errors.add_field("text", WARNING);
        }

        self.errors.is_empty().then(|| self.text.clone())
    }
}
