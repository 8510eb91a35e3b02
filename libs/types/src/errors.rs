//! Error types for entity validation
//!
//! Every failure here is a client mistake: a bad, missing or out-of-domain
//! field. Storage and authorization failures live in the crates that own them.

use thiserror::Error;

/// Field-level validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: this field is required")]
    MissingField { field: &'static str },

    #[error("{field}: this field may not be blank")]
    Blank { field: &'static str },

    #[error("{field}: ensure this field has no more than {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("{field}: {value} is not a valid choice")]
    OutOfDomain { field: &'static str, value: i64 },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::Blank { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfDomain { field, .. }
            | ValidationError::Invalid { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_domain_display() {
        let err = ValidationError::OutOfDomain {
            field: "severity",
            value: 9,
        };
        assert_eq!(err.to_string(), "severity: 9 is not a valid choice");
    }

    #[test]
    fn test_too_long_display() {
        let err = ValidationError::TooLong {
            field: "source",
            max: 50,
            len: 51,
        };
        assert!(err.to_string().contains("50"));
        assert!(err.to_string().contains("51"));
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(ValidationError::MissingField { field: "status" }.field(), "status");
        assert_eq!(ValidationError::Blank { field: "source" }.field(), "source");
    }
}
