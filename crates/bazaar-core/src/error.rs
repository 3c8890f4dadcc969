//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CoreError        - Structural and domain failures                 │
//! │  └── ValidationError  - Rejected user input                            │
//! │                                                                         │
//! │  variant-cli errors (separate crate)                                   │
//! │  └── CliError         - I/O, script parsing, aborted runs              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Failure
//! - **Rejections** (empty value, duplicate name, option limit): the state is
//!   left untouched and the caller may show feedback or simply ignore it.
//! - **Precondition violations** (index out of range, unknown variant key):
//!   the caller asked for something that does not exist. Propagate these.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core form logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No option exists at the given position.
    #[error("Option index {index} out of range (have {len} options)")]
    OptionIndexOutOfRange { index: usize, len: usize },

    /// No value exists at the given position inside an option.
    #[error("Value index {index} out of range for option {option} (have {len} values)")]
    ValueIndexOutOfRange {
        option: usize,
        index: usize,
        len: usize,
    },

    /// Adding another option slot would exceed the configured maximum.
    #[error("A product cannot have more than {max} options")]
    TooManyOptions { max: usize },

    /// Removing the option would leave the form without any option slot.
    #[error("At least one option must remain")]
    LastOptionRequired,

    /// No variant carries the given combination key.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// The Cartesian product grew beyond the configured limit.
    ///
    /// ## When This Occurs
    /// ```text
    /// Color: 20 values × Size: 20 values × Material: 10 values
    ///      │
    ///      ▼
    /// 4000 combinations > max_variants (1000)
    ///      │
    ///      ▼
    /// TooManyVariants { count: 4000, max: 1000 }, option change rolled back
    /// ```
    #[error("Options would produce {count} variants, maximum is {max}")]
    TooManyVariants { count: usize, max: usize },

    /// A loaded product record could not be turned into form state.
    #[error("Malformed product record: {reason}")]
    MalformedRecord { reason: String },

    /// JSON encoding or decoding of a combination failed.
    #[error("Combination JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true when the error is an expected rejection of user input
    /// that left the form state unchanged.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::TooManyOptions { .. }
                | CoreError::LastOptionRequired
                | CoreError::TooManyVariants { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (not a number, forbidden character, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same option value twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TooManyVariants {
            count: 4000,
            max: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Options would produce 4000 variants, maximum is 1000"
        );

        let err = CoreError::OptionIndexOutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "Option index 3 out of range (have 2 options)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Duplicate {
            field: "option value".to_string(),
            value: "Red".to_string(),
        };
        assert_eq!(err.to_string(), "option value 'Red' already exists");

        let err = ValidationError::Required {
            field: "option name".to_string(),
        };
        assert_eq!(err.to_string(), "option name is required");
    }

    #[test]
    fn test_rejections_vs_precondition_violations() {
        let rejected: CoreError = ValidationError::Required {
            field: "option value".to_string(),
        }
        .into();
        assert!(rejected.is_rejection());
        assert!(CoreError::LastOptionRequired.is_rejection());

        assert!(!CoreError::OptionIndexOutOfRange { index: 9, len: 1 }.is_rejection());
        assert!(!CoreError::VariantNotFound("Red|S".to_string()).is_rejection());
    }
}
