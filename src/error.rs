//! Crate error type.
//!
//! Only configuration problems are errors. Unreachable regions, missing
//! candidates and unprofitable treatments are ordinary outcomes and are
//! encoded in the result types instead.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised before (or instead of) running a computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input snapshot failed validation.
    #[error("invalid input ({} issue(s)): {}", .0.len(), join_messages(.0))]
    Validation(Vec<ValidationError>),
    /// A region id that is not part of the region graph.
    #[error("unknown region '{0}'")]
    UnknownRegion(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_validation_display_lists_messages() {
        let err = Error::from(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate region ID: R1"),
            ValidationError::new(ValidationErrorKind::NegativeValue, "responders is negative"),
        ]);
        let text = err.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("Duplicate region ID: R1; responders is negative"));
    }

    #[test]
    fn test_unknown_region_display() {
        assert_eq!(
            Error::UnknownRegion("R9".into()).to_string(),
            "unknown region 'R9'"
        );
    }
}
