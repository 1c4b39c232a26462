//! # Error Types
//!
//! Domain-specific error types for kardex-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kardex-core errors (this file)                                        │
//! │  ├── CoreError        - Decision logic failures                        │
//! │  └── ValidationError  - Input / invariant violations                   │
//! │                                                                         │
//! │  kardex-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → API layer               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, value)
//! 3. Errors are enum variants, never String
//! 4. Caller contract violations fail fast, never silently coerced

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core decision logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller passed input that breaks a contract of the core.
    ///
    /// ## When This Occurs
    /// - `base_price <= 0` handed to the discount resolver
    /// - Negative stock quantity handed to the classifier
    /// - A discount candidate with both or neither target set
    /// - A percentage discount outside (0, 100%]
    /// - A stock threshold with `max_stock < min_stock`
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl CoreError {
    /// Returns true when the error is a caller contract violation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CoreError::InvalidInput(_))
    }

    /// Returns the underlying validation failure.
    pub fn validation(&self) -> &ValidationError {
        match self {
            CoreError::InvalidInput(err) => err,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before decision logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields contradict each other.
    ///
    /// ## When This Occurs
    /// - Discount with both `item_id` and `presentation_id`
    /// - Threshold with `max_stock` below `min_stock`
    /// - Discount whose `valid_to` precedes `valid_from`
    #[error("{fields} conflict: {reason}")]
    Conflict { fields: String, reason: String },
}

impl ValidationError {
    pub(crate) fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub(crate) fn must_not_be_negative(field: &str) -> Self {
        ValidationError::MustNotBeNegative {
            field: field.to_string(),
        }
    }

    pub(crate) fn conflict(fields: &str, reason: &str) -> Self {
        ValidationError::Conflict {
            fields: fields.to_string(),
            reason: reason.to_string(),
        }
    }
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::must_be_positive("base_price");
        assert_eq!(err.to_string(), "base_price must be positive");

        let err = ValidationError::conflict("min_stock/max_stock", "max below min");
        assert_eq!(err.to_string(), "min_stock/max_stock conflict: max below min");
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::must_not_be_negative("quantity");
        let core_err: CoreError = validation_err.into();
        assert!(core_err.is_invalid_input());
        assert_eq!(
            core_err.to_string(),
            "Invalid input: quantity must not be negative"
        );
    }
}
