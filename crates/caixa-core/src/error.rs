//! # Error Types
//!
//! Domain-specific error types for caixa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caixa-core errors (this file)                                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  caixa-gateway errors (separate crate)                                 │
//! │  └── GatewayError     - Remote row store failures                      │
//! │                                                                         │
//! │  caixa-store errors (separate crate)                                   │
//! │  └── StoreError       - AuthRequired / Remote / Validation             │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → user-visible notice              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller-supplied data violates an entity
/// invariant. The store actions run validation before any remote write.
#[derive(Debug, Error)]
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// A sale line item references a product that is not in the snapshot.
    #[error("unknown product: {product_id}")]
    UnknownProduct { product_id: String },

    /// A sale needs at least one line item.
    #[error("a sale needs at least one item")]
    NoLineItems,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::UnknownProduct {
            product_id: "p-42".to_string(),
        };
        assert_eq!(err.to_string(), "unknown product: p-42");

        let err = ValidationError::OutOfRange {
            field: "recurrence day".to_string(),
            min: 1,
            max: 31,
        };
        assert_eq!(err.to_string(), "recurrence day must be between 1 and 31");
    }
}
