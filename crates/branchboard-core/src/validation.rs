//! # Validation Module
//!
//! The Integrity Validator: stateless checks run by the store before any
//! mutation is committed.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale(draft)                                   │
//! │                                                                         │
//! │  1. validate_numeric_ranges(draft)   quantity >= 1, amount >= 0         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. validate_foreign_keys(draft, store)   every FK resolves             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. validate_sale_branch(draft, product)  sale branch == product branch │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  4. stock check (store)               quantity <= product.stock         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  5. validate_sale_amount(...)         amount == round(price×qty×(1-d))  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Commit (all-or-nothing)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here mutates anything. A failure rejects the command and the
//! store stays exactly as it was.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    ActionLogEntry, Actor, BranchId, CustomerGroup, CustomerGroupId, DiscountRate, EmployeeId,
    EntityKind, NewCustomerGroup, NewEmployee, NewProduct, NewSale, Product, ProductId,
};
use crate::{MAX_DISCOUNT_BPS, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Foreign Keys
// =============================================================================

/// A single reference from one entity to another row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKey {
    Branch(BranchId),
    Employee(EmployeeId),
    Product(ProductId),
    CustomerGroup(CustomerGroupId),
}

impl ForeignKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            ForeignKey::Branch(_) => EntityKind::Branch,
            ForeignKey::Employee(_) => EntityKind::Employee,
            ForeignKey::Product(_) => EntityKind::Product,
            ForeignKey::CustomerGroup(_) => EntityKind::CustomerGroup,
        }
    }

    pub fn raw_id(&self) -> u64 {
        match *self {
            ForeignKey::Branch(id) => id.into(),
            ForeignKey::Employee(id) => id.into(),
            ForeignKey::Product(id) => id.into(),
            ForeignKey::CustomerGroup(id) => id.into(),
        }
    }

    /// Field name used in validation messages.
    pub fn field(&self) -> &'static str {
        match self {
            ForeignKey::Branch(_) => "branchId",
            ForeignKey::Employee(_) => "employeeId",
            ForeignKey::Product(_) => "productId",
            ForeignKey::CustomerGroup(_) => "customerGroupId",
        }
    }
}

/// Entities that reference other rows.
pub trait ForeignKeys {
    fn foreign_keys(&self) -> Vec<ForeignKey>;
}

/// Existence check supplied by whoever holds the rows.
pub trait EntityLookup {
    fn contains(&self, key: ForeignKey) -> bool;
}

impl ForeignKeys for NewEmployee {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::Branch(self.branch_id)]
    }
}

impl ForeignKeys for NewProduct {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::Branch(self.branch_id)]
    }
}

impl ForeignKeys for Product {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::Branch(self.branch_id)]
    }
}

impl ForeignKeys for NewSale {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::Product(self.product_id),
            ForeignKey::Employee(self.employee_id),
            ForeignKey::Branch(self.branch_id),
            ForeignKey::CustomerGroup(self.customer_group_id),
        ]
    }
}

impl ForeignKeys for crate::types::Sale {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::Product(self.product_id),
            ForeignKey::Employee(self.employee_id),
            ForeignKey::Branch(self.branch_id),
            ForeignKey::CustomerGroup(self.customer_group_id),
        ]
    }
}

impl ForeignKeys for Actor {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::Employee(self.employee_id),
            ForeignKey::Branch(self.branch_id),
        ]
    }
}

impl ForeignKeys for ActionLogEntry {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::Employee(self.employee_id),
            ForeignKey::Branch(self.branch_id),
        ]
    }
}

/// Checks that every foreign key of `entity` resolves in `lookup`.
///
/// ## Rules
/// - An entity that presents no foreign keys at all is rejected.
/// - The first unresolved key is reported as `CoreError::NotFound`.
///
/// ## Example
/// ```rust
/// use branchboard_core::validation::{validate_foreign_keys, EntityLookup, ForeignKey};
/// use branchboard_core::{Actor, BranchId, CoreError, EmployeeId};
///
/// struct OnlyBranchOne;
/// impl EntityLookup for OnlyBranchOne {
///     fn contains(&self, key: ForeignKey) -> bool {
///         key == ForeignKey::Branch(BranchId::new(1))
///     }
/// }
///
/// let actor = Actor::new(EmployeeId::new(7), BranchId::new(1));
/// let err = validate_foreign_keys(&actor, &OnlyBranchOne).unwrap_err();
/// assert!(matches!(err, CoreError::NotFound { id: 7, .. }));
/// ```
pub fn validate_foreign_keys<E, L>(entity: &E, lookup: &L) -> CoreResult<()>
where
    E: ForeignKeys + ?Sized,
    L: EntityLookup + ?Sized,
{
    let keys = entity.foreign_keys();

    if keys.is_empty() {
        return Err(ValidationError::required("foreign keys").into());
    }

    match keys.into_iter().find(|key| !lookup.contains(*key)) {
        Some(missing) => Err(CoreError::not_found(missing.kind(), missing.raw_id())),
        None => Ok(()),
    }
}

/// Like [`validate_foreign_keys`], but reports a dangling reference as a
/// [`ValidationError::UnknownReference`] on the offending field.
///
/// Used for entity creation, where an unresolved reference is bad input
/// rather than a lookup miss.
pub fn validate_references<E, L>(entity: &E, lookup: &L) -> ValidationResult<()>
where
    E: ForeignKeys + ?Sized,
    L: EntityLookup + ?Sized,
{
    let keys = entity.foreign_keys();

    if keys.is_empty() {
        return Err(ValidationError::required("foreign keys"));
    }

    match keys.into_iter().find(|key| !lookup.contains(*key)) {
        Some(missing) => Err(ValidationError::UnknownReference {
            field: missing.field().to_string(),
            entity: missing.kind(),
            id: missing.raw_id(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Numeric Ranges
// =============================================================================

/// Entities with numeric fields that have fixed legal ranges.
pub trait NumericRanges {
    fn check_ranges(&self) -> ValidationResult<()>;
}

impl NumericRanges for NewProduct {
    fn check_ranges(&self) -> ValidationResult<()> {
        validate_price(self.price)?;
        validate_stock(self.stock)
    }
}

impl NumericRanges for Product {
    fn check_ranges(&self) -> ValidationResult<()> {
        validate_price(self.price)?;
        validate_stock(self.stock)
    }
}

impl NumericRanges for NewCustomerGroup {
    fn check_ranges(&self) -> ValidationResult<()> {
        validate_discount(self.discount)
    }
}

impl NumericRanges for CustomerGroup {
    fn check_ranges(&self) -> ValidationResult<()> {
        validate_discount(self.discount)
    }
}

impl NumericRanges for NewSale {
    fn check_ranges(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_amount(self.amount)
    }
}

/// price/stock/amount >= 0; discount within [0, 100]%; quantity >= 1.
pub fn validate_numeric_ranges<E: NumericRanges + ?Sized>(entity: &E) -> ValidationResult<()> {
    entity.check_ranges()
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use branchboard_core::money::Money;
/// use branchboard_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_minor(89_000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_minor(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    non_negative("price", price.minor())
}

/// Stock is a count of units on hand: zero or more.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    non_negative("stock", stock)
}

/// Sale amounts are zero (fully discounted) or more.
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    non_negative("amount", amount.minor())
}

/// A sale moves at least one unit.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Discounts range from 0% to 100% inclusive.
pub fn validate_discount(discount: DiscountRate) -> ValidationResult<()> {
    if !discount.is_valid() {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: MAX_DISCOUNT_BPS as i64,
        });
    }

    Ok(())
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (branch, employee, product, group, role...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Sale Amount
// =============================================================================

/// The amount a sale of `quantity` units of `product` to `group` must carry.
///
/// `round_half_even(price × quantity × (1 − discount))`. Errors only when the
/// gross total overflows.
pub fn expected_sale_amount(
    product: &Product,
    quantity: i64,
    group: &CustomerGroup,
) -> ValidationResult<Money> {
    let gross = product
        .price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::MAX / product.price.minor().max(1),
        })?;

    Ok(gross.apply_discount(group.discount))
}

/// Recomputes the sale amount and compares it with what was submitted.
///
/// ## Policy
/// A mismatch beyond `tolerance` is rejected, never silently corrected.
///
/// ## Example
/// ```rust
/// use branchboard_core::money::Money;
/// use branchboard_core::validation::validate_sale_amount;
/// use branchboard_core::*;
/// use chrono::NaiveDate;
///
/// let product = NewProduct {
///     name: "ASUS Laptop".into(),
///     category: "Electronics".into(),
///     price: Money::from_minor(89_000),
///     stock: 15,
///     branch_id: BranchId::new(1),
/// }
/// .into_product(ProductId::new(1));
/// let group = NewCustomerGroup::new("Tech Lovers", DiscountRate::from_percent(5))
///     .into_customer_group(CustomerGroupId::new(1));
/// let mut sale = NewSale {
///     date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
///     product_id: product.id,
///     employee_id: EmployeeId::new(1),
///     branch_id: BranchId::new(1),
///     customer_group_id: group.id,
///     quantity: 1,
///     amount: Money::from_minor(84_550),
/// };
///
/// assert!(validate_sale_amount(&sale, &product, &group, Money::zero()).is_ok());
/// sale.amount = Money::from_minor(89_000);
/// assert!(validate_sale_amount(&sale, &product, &group, Money::zero()).is_err());
/// ```
pub fn validate_sale_amount(
    sale: &NewSale,
    product: &Product,
    group: &CustomerGroup,
    tolerance: Money,
) -> ValidationResult<Money> {
    let expected = expected_sale_amount(product, sale.quantity, group)?;

    if (sale.amount - expected).abs() > tolerance.abs() {
        return Err(ValidationError::AmountMismatch {
            expected,
            actual: sale.amount,
            tolerance,
        });
    }

    Ok(expected)
}

/// A sale draws down stock at the product's own branch only.
pub fn validate_sale_branch(sale: &NewSale, product: &Product) -> ValidationResult<()> {
    if sale.branch_id != product.branch_id {
        return Err(ValidationError::BranchMismatch {
            sale_branch: sale.branch_id,
            product_branch: product.branch_id,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
