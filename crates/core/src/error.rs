//! Business-rule failures shared by the record crates.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Why a record operation was refused.
///
/// Only rule failures live here; stores and repositories report their own
/// errors and map these at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input the user can correct. The text is shown as-is.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Arithmetic or consistency rule broken by otherwise valid input.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("record not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Text fit for a toast, if the user can act on it.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Validation(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_reaches_the_user() {
        assert_eq!(
            DomainError::validation("Please select a customer").user_message(),
            Some("Please select a customer")
        );
        assert_eq!(DomainError::invariant("total overflow").user_message(), None);
        assert_eq!(DomainError::not_found().to_string(), "record not found");
    }
}
