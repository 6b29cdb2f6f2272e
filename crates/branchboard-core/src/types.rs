//! # Domain Types
//!
//! Core domain types used throughout Branchboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Branch      │◄──│    Employee     │   │  CustomerGroup  │       │
//! │  │  id, name,      │   │  id, name,      │   │  id, name,      │       │
//! │  │  location       │   │  branch_id, role│   │  discount (bps) │       │
//! │  └────────▲────────┘   └────────▲────────┘   └────────▲────────┘       │
//! │           │                     │                     │                 │
//! │  ┌────────┴────────┐   ┌────────┴─────────────────────┴───────┐       │
//! │  │    Product      │◄──│                 Sale                  │       │
//! │  │  price, stock,  │   │  product, employee, branch, group,   │       │
//! │  │  branch_id      │   │  quantity, amount (validated)         │       │
//! │  └─────────────────┘   └───────────────────────────────────────┘       │
//! │                                                                         │
//! │  ActionLogEntry: append-only evidence of every mutation                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Drafts vs Entities
//! Callers submit `New*` drafts without ids. The store assigns the id and
//! returns the stored entity, so ids are unique and never change.

use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::MAX_DISCOUNT_BPS;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export)]
        pub struct $name($inner);

        impl $name {
            #[inline]
            pub const fn new(raw: $inner) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0 as u64
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Branch`].
    BranchId(u32)
);
entity_id!(
    /// Identifies an [`Employee`].
    EmployeeId(u32)
);
entity_id!(
    /// Identifies a [`Product`].
    ProductId(u32)
);
entity_id!(
    /// Identifies a [`CustomerGroup`].
    CustomerGroupId(u32)
);
entity_id!(
    /// Identifies a [`Sale`].
    SaleId(u32)
);
entity_id!(
    /// Identifies an [`ActionLogEntry`]. Strictly increasing in creation order.
    ActionLogId(u64)
);

/// The kinds of row an id can point at. Used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Branch,
    Employee,
    Product,
    CustomerGroup,
    Sale,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Branch => "Branch",
            EntityKind::Employee => "Employee",
            EntityKind::Product => "Product",
            EntityKind::CustomerGroup => "Customer group",
            EntityKind::Sale => "Sale",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. Whole percentages from the dashboard (`5` for 5%)
/// become `500` bps, and fractional tiers (2.5%) stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        DiscountRate(percent.saturating_mul(100))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Whether the rate lies within 0%..=100%.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 <= MAX_DISCOUNT_BPS
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Branch
// =============================================================================

/// A physical retail location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub location: String,
}

/// Draft for [`Branch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBranch {
    pub name: String,
    pub location: String,
}

impl NewBranch {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        NewBranch {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn into_branch(self, id: BranchId) -> Branch {
        Branch {
            id,
            name: self.name,
            location: self.location,
        }
    }
}

// =============================================================================
// Employee
// =============================================================================

/// A staff member assigned to one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub branch_id: BranchId,
    pub role: String,
}

/// Draft for [`Employee`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub branch_id: BranchId,
    pub role: String,
}

impl NewEmployee {
    pub fn new(name: impl Into<String>, branch_id: BranchId, role: impl Into<String>) -> Self {
        NewEmployee {
            name: name.into(),
            branch_id,
            role: role.into(),
        }
    }

    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            branch_id: self.branch_id,
            role: self.role,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product stocked at one branch.
///
/// ## Invariants (enforced by the store)
/// - `price >= 0`
/// - `stock >= 0`, changed only by stock adjustments and sales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Unit price in minor units.
    pub price: Money,
    /// Units on hand at `branch_id`.
    pub stock: i64,
    pub branch_id: BranchId,
}

impl Product {
    /// Checks if `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// In stock when at least one unit is on hand.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        if self.stock > 0 {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }
}

/// Draft for [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: i64,
    pub branch_id: BranchId,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            stock: self.stock,
            branch_id: self.branch_id,
        }
    }
}

/// Whether a product can currently be sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

// =============================================================================
// Customer Group
// =============================================================================

/// A named discount tier applied to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: CustomerGroupId,
    pub name: String,
    pub discount: DiscountRate,
}

/// Draft for [`CustomerGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomerGroup {
    pub name: String,
    pub discount: DiscountRate,
}

impl NewCustomerGroup {
    pub fn new(name: impl Into<String>, discount: DiscountRate) -> Self {
        NewCustomerGroup {
            name: name.into(),
            discount,
        }
    }

    pub fn into_customer_group(self, id: CustomerGroupId) -> CustomerGroup {
        CustomerGroup {
            id,
            name: self.name,
            discount: self.discount,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub employee_id: EmployeeId,
    pub branch_id: BranchId,
    pub customer_group_id: CustomerGroupId,
    pub quantity: i64,
    /// Discount-adjusted total in minor units.
    pub amount: Money,
}

/// Draft for [`Sale`].
///
/// `amount` is what the till computed. The store recomputes it from the
/// product price and the group discount and rejects a mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub employee_id: EmployeeId,
    pub branch_id: BranchId,
    pub customer_group_id: CustomerGroupId,
    pub quantity: i64,
    pub amount: Money,
}

impl NewSale {
    pub fn into_sale(self, id: SaleId) -> Sale {
        Sale {
            id,
            date: self.date,
            product_id: self.product_id,
            employee_id: self.employee_id,
            branch_id: self.branch_id,
            customer_group_id: self.customer_group_id,
            quantity: self.quantity,
            amount: self.amount,
        }
    }
}

// =============================================================================
// Action Log
// =============================================================================

/// What kind of mutation a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Sale,
    StockUpdate,
    ProductCreated,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Sale => write!(f, "sale"),
            ActionType::StockUpdate => write!(f, "stock_update"),
            ActionType::ProductCreated => write!(f, "product_created"),
        }
    }
}

/// An append-only record of a store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub id: ActionLogId,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub action_type: ActionType,
    pub employee_id: EmployeeId,
    pub branch_id: BranchId,
    pub description: String,
}

/// The authenticated employee on whose behalf a command runs.
///
/// Supplied by the dashboard session; the core never authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub employee_id: EmployeeId,
    pub branch_id: BranchId,
}

impl Actor {
    pub const fn new(employee_id: EmployeeId, branch_id: BranchId) -> Self {
        Actor {
            employee_id,
            branch_id,
        }
    }
}

// =============================================================================
// Reporting Periods
// =============================================================================

/// Bucket size for revenue trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    /// First day of the period containing `date`.
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            // day 1 exists in every month
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// First day of the period after the one starting at `period_start`.
    ///
    /// `None` only at the end of chrono's representable calendar.
    pub fn next(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => period_start.succ_opt(),
            Granularity::Month => self
                .truncate(period_start)
                .checked_add_months(Months::new(1)),
        }
    }
}

/// Inclusive calendar date range. Empty when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
