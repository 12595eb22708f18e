//! Domain error model.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Domain-level error.
///
/// Only the two client-facing failure kinds live here. Storage failures are an
/// infrastructure concern and have their own error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation; carries per-field messages.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A referenced record does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// An identifier is not a positive integer.
    #[error("invalid {resource} id {raw:?}")]
    InvalidId { resource: &'static str, raw: String },
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid_id(resource: &'static str, raw: impl Into<String>) -> Self {
        Self::InvalidId {
            resource,
            raw: raw.into(),
        }
    }

    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_resource_and_id() {
        let err = DomainError::not_found("Product", 7);
        assert_eq!(err.to_string(), "Product 7 not found");
    }

    #[test]
    fn field_error_is_validation() {
        let err = DomainError::field("title", "This field is required.");
        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.messages("title"), ["This field is required."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
