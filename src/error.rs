//! Error types for the contact directory.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::{ContactId, FieldErrors};
use thiserror::Error;

/// Which unique field a duplicate collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    PhoneNumber,
    /// A remote store reported a collision without naming the field
    EmailOrPhone,
}

impl std::fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::PhoneNumber => write!(f, "phone number"),
            Self::EmailOrPhone => write!(f, "email or phone number"),
        }
    }
}

/// Errors surfaced by contact operations.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// One or more fields are missing or malformed
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Email or phone collides with another active contact
    #[error("A contact with the same {field} already exists: {value}")]
    Duplicate { field: DuplicateField, value: String },

    /// The id is not in the active set
    #[error("Contact not found: {0}")]
    NotFound(ContactId),

    /// The id is not part of the current filtered view
    #[error("Contact {0} is not in the current view")]
    NotInView(ContactId),

    /// The persistence collaborator was unreachable or answered unexpectedly
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed to encode or decode JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to produce an export file
    #[error("Export failed: {0}")]
    Export(String),
}

impl DirectoryError {
    /// Duplicate error for a colliding field value.
    pub fn duplicate(field: DuplicateField, value: impl Into<String>) -> Self {
        Self::Duplicate {
            field,
            value: value.into(),
        }
    }

    /// Whether the error means the target id is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<FieldErrors> for DirectoryError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with DirectoryError
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = ContactId::new("abc").unwrap();
        assert_eq!(
            DirectoryError::NotFound(id.clone()).to_string(),
            "Contact not found: abc"
        );
        assert_eq!(
            DirectoryError::NotInView(id).to_string(),
            "Contact abc is not in the current view"
        );

        let err = DirectoryError::duplicate(DuplicateField::Email, "a@x.com");
        assert_eq!(
            err.to_string(),
            "A contact with the same email already exists: a@x.com"
        );

        let err = ConfigError::InvalidValue {
            var: "DEFAULT_PAGE_SIZE".to_string(),
            reason: "Must be greater than zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for DEFAULT_PAGE_SIZE: Must be greater than zero"
        );
    }

    #[test]
    fn test_validation_error_from_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Valid email is required.");
        let err: DirectoryError = errors.into();
        assert_eq!(
            err.to_string(),
            "Validation failed: email: Valid email is required."
        );
        assert!(!err.is_not_found());
    }
}
