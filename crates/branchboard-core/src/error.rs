//! # Error Types
//!
//! Domain-specific error types for branchboard-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError            - What every store command can fail with         │
//! │  ├── NotFound            unresolved id reference                       │
//! │  ├── Validation          range / computed-value mismatch               │
//! │  ├── InvariantViolation  stock would go negative                       │
//! │  └── InsufficientStock   sale quantity exceeds stock                   │
//! │                                                                         │
//! │  ValidationError      - Field-level input failures (wrapped above)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → dashboard shell                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable: a failed command leaves the store exactly as
//! it was before the call.

use thiserror::Error;

use crate::money::Money;
use crate::types::{BranchId, EntityKind, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by store commands and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An id does not resolve to an existing row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: u64 },

    /// Input failed a range, format or consistency check.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation would leave stock negative.
    ///
    /// ## When This Occurs
    /// - `adjust_stock` with a delta larger than the stock on hand
    /// - A delta that overflows the stock counter
    #[error("Stock for product {product_id} cannot change by {delta}: current {current}")]
    InvariantViolation {
        product_id: ProductId,
        current: i64,
        delta: i64,
    },

    /// Insufficient stock to complete a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Dashboard shows: "Only 3 in stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },
}

impl CoreError {
    /// Creates a NotFound error for a given entity kind and raw id.
    pub fn not_found(entity: EntityKind, id: impl Into<u64>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
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

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A reference field names a row that does not exist.
    #[error("{field} references unknown {entity} {id}")]
    UnknownReference {
        field: String,
        entity: EntityKind,
        id: u64,
    },

    /// A submitted sale amount disagrees with the discount-adjusted price.
    #[error("amount {actual} does not match expected {expected} (tolerance {tolerance})")]
    AmountMismatch {
        expected: Money,
        actual: Money,
        tolerance: Money,
    },

    /// A sale was booked at a different branch than the product's stock.
    #[error("sale branch {sale_branch} does not hold product stock (product branch {product_branch})")]
    BranchMismatch {
        sale_branch: BranchId,
        product_branch: BranchId,
    },
}

impl ValidationError {
    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
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
        let err = CoreError::InsufficientStock {
            product_id: ProductId::new(1),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 1: available 3, requested 5"
        );

        let err = CoreError::not_found(EntityKind::Product, 999u32);
        assert_eq!(err.to_string(), "Product not found: 999");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::AmountMismatch {
            expected: Money::from_minor(84_550),
            actual: Money::from_minor(89_000),
            tolerance: Money::zero(),
        };
        assert_eq!(
            err.to_string(),
            "amount 89000 does not match expected 84550 (tolerance 0)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
