//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Coordinates outside the valid range
    #[error(transparent)]
    InvalidCoordinates(#[from] crate::value_objects::InvalidCoordinates),

    /// A snapshot is missing one of its required sections
    #[error("Incomplete weather data: {0}")]
    IncompleteSnapshot(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Create an incomplete snapshot error
    pub fn incomplete(section: impl Into<String>) -> Self {
        Self::IncompleteSnapshot(section.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::InvalidCoordinates;

    #[test]
    fn incomplete_snapshot_message() {
        let err = DomainError::incomplete("missing forecast");
        assert_eq!(err.to_string(), "Incomplete weather data: missing forecast");
    }

    #[test]
    fn invalid_coordinates_is_transparent() {
        let err = DomainError::from(InvalidCoordinates);
        assert_eq!(err.to_string(), InvalidCoordinates.to_string());
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("bad".to_string());
        assert_eq!(err.to_string(), "Validation failed: bad");
    }
}
