//! # Error Types
//!
//! Domain-specific error types for platter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  platter-core errors (this file)                                       │
//! │  ├── CoreError        - Malformed backend records                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  platter-db errors (separate crate)                                    │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  platter-client errors (app)                                           │
//! │  └── ApiError         - What the mobile UI sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → toast in the UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations themselves never fail: an extras mismatch creates a new
//! line, an unknown product id is a no-op. Errors only arise when turning
//! untrusted input (backend records, UI requests) into domain values.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures converting external records into domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A discount record from the backend cannot be evaluated.
    ///
    /// ## When This Occurs
    /// - `percentage` type without a percentage, or outside 0–100
    /// - `fixed` type without a fixed value, or a negative one
    /// - delivery mode outside the 0/1/2 mapping
    /// - schedule bound not in `HH:MM` form
    #[error("Invalid discount {id}: {source}")]
    InvalidDiscount {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Wraps a validation failure with the id of the offending discount.
    pub fn invalid_discount(id: impl Into<String>, source: ValidationError) -> Self {
        CoreError::InvalidDiscount {
            id: id.into(),
            source,
        }
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

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., a schedule bound that is not `HH:MM`).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A required extra group has no selection.
    #[error("Please choose an option for {group}")]
    MissingRequiredExtra { group: String },

    /// The selection references a group the product doesn't offer.
    #[error("Unknown extra group: {group}")]
    UnknownExtraGroup { group: String },

    /// The selection references an option its group doesn't offer.
    #[error("{option} is not an option of {group}")]
    UnknownExtraOption { group: String, option: String },
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
        let err = CoreError::invalid_discount(
            "D1",
            ValidationError::OutOfRange {
                field: "percentage".to_string(),
                min: 0,
                max: 100,
            },
        );
        assert_eq!(
            err.to_string(),
            "Invalid discount D1: percentage must be between 0 and 100"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MissingRequiredExtra {
            group: "Size".to_string(),
        };
        assert_eq!(err.to_string(), "Please choose an option for Size");

        let err = ValidationError::Negative {
            field: "fixedValue".to_string(),
        };
        assert_eq!(err.to_string(), "fixedValue must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "productId".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
