//! Shared form error types.

use serde::{Deserialize, Serialize};

/// Message for a required field left blank.
pub const REQUIRED: &str = "This field is required.";

/// Validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name (None for form-level errors).
    pub field: Option<String>,

    /// Error message.
    pub message: String,
}

impl ValidationError {
    /// Create a field-level error.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            message: message.into(),
        }
    }

    /// Create a form-level error.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Errors collected while validating a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(Vec<ValidationError>);

impl FormErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Record an error against a single field.
    pub fn add_field(&mut self, name: &str, message: impl Into<String>) {
        self.push(ValidationError::field(name, message));
    }

    /// Record an error that concerns the whole form.
    pub fn add_form(&mut self, message: impl Into<String>) {
        self.push(ValidationError::form(message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages attached to `name`, in the order they were added.
    pub fn for_field(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field.as_deref() == Some(name))
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Form-level messages.
    pub fn non_field(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.as_str())
            .collect()
    }
}
