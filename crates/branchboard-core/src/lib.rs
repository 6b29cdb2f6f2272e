//! # branchboard-core: Pure Business Logic for Branchboard
//!
//! The domain model of the retail dashboard: branches, employees, products,
//! customer groups, sales and action-log entries, plus the integrity rules
//! every mutation must pass. Zero I/O, zero shared state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Branchboard Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Mobile Dashboard (external shell)                │   │
//! │  │   Overview ──► Products ──► Employees ──► Action Logs           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands / queries                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    branchboard-store                            │   │
//! │  │   EntityStore ──► ActivityLog ──► aggregation                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ branchboard-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ CoreError │  │ integrity │  │   │
//! │  │   │   Sale    │  │ discounts │  │           │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities, identifiers, drafts and value types
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Integrity Validator (foreign keys, ranges, sale amounts)
//!
//! ## Example Usage
//!
//! ```rust
//! use branchboard_core::money::Money;
//! use branchboard_core::types::DiscountRate;
//!
//! let price = Money::from_minor(89_000);
//! let amount = price.apply_discount(DiscountRate::from_percent(5));
//! assert_eq!(amount.minor(), 84_550);
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Longest accepted name/category/description, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Upper bound of a discount rate in basis points (100%).
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Default tolerance when checking a submitted sale amount, in minor units.
///
/// Zero means the submitted amount must equal the rounded expected amount.
pub const DEFAULT_AMOUNT_TOLERANCE: Money = Money::from_minor(0);
