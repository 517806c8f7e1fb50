//! Payload validation.
//!
//! Create and replace payloads implement [`Validatable`]; handlers run the
//! check before touching the database and surface failures as 422 responses
//! with field-level messages.

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Declared constraints of a write payload.
pub trait Validatable {
    /// Returns every violated constraint, or `Ok(())` when the payload is
    /// acceptable.
    ///
    /// # Errors
    ///
    /// One [`ValidationError`] per violated constraint.
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_field() {
        let err = ValidationError::new("title", "Title must not be empty");
        assert_eq!(format!("{err}"), "title: Title must not be empty");
    }
}
