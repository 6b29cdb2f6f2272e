//! # Entity Store
//!
//! The single owner of every branch, employee, product, customer group, sale
//! and log entry. All mutations go through the commands on [`EntityStore`].
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    EntityStore (shared by Arc)                          │
//! │                                                                         │
//! │   add_product ─┐                                                        │
//! │   adjust_stock ├──► write guard ──► validate ──► commit + log           │
//! │   record_sale ─┘        (exclusive)      │                              │
//! │                                          └─ Err: nothing written        │
//! │                                                                         │
//! │   queries ────────► read guard ──► pure function over &StoreState       │
//! │   snapshot() ─────► read guard ──► owned clone                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A command validates everything before its first write, so a panic can
//! never leave the state half-applied. Poisoned guards are therefore
//! recovered rather than propagated.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use branchboard_core::validation::{
    validate_foreign_keys, validate_name, validate_numeric_ranges, validate_references,
    validate_sale_amount, validate_sale_branch,
};
use branchboard_core::{
    ActionLogEntry, ActionType, Actor, Branch, BranchId, CoreError, CoreResult, CustomerGroup,
    CustomerGroupId, DateRange, Employee, EmployeeId, EntityKind, Granularity, Money, NewBranch,
    NewCustomerGroup, NewEmployee, NewProduct, NewSale, Product, ProductId, Sale, SaleId,
    StockStatus, ValidationError,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::activity::{Clock, SystemClock};
use crate::aggregation::{
    self, BranchRevenue, DashboardSummary, EmployeeRevenue, InventorySummary, PeriodRevenue,
};
use crate::config::StoreConfig;
use crate::state::StoreState;

/// Thread-safe in-memory store.
///
/// ## Usage
/// ```rust
/// use branchboard_core::*;
/// use branchboard_store::EntityStore;
///
/// let store = EntityStore::new();
/// let branch = store.add_branch(NewBranch::new("Main Branch", "Dhaka")).unwrap();
/// let employee = store
///     .add_employee(NewEmployee::new("Rafiq Ahmed", branch.id, "Sales Executive"))
///     .unwrap();
/// let actor = Actor::new(employee.id, branch.id);
///
/// let product = store
///     .add_product(actor, NewProduct {
///         name: "ASUS Laptop".into(),
///         category: "Electronics".into(),
///         price: Money::from_minor(89_000),
///         stock: 15,
///         branch_id: branch.id,
///     })
///     .unwrap();
///
/// assert_eq!(store.adjust_stock(actor, product.id, -5).unwrap(), 10);
/// assert_eq!(store.recent_activity(1)[0].action_type, ActionType::StockUpdate);
/// ```
#[derive(Debug)]
pub struct EntityStore {
    state: RwLock<StoreState>,
    config: StoreConfig,
}

impl Default for EntityStore {
    fn default() -> Self {
        EntityStore::new()
    }
}

impl EntityStore {
    /// Empty store with default configuration and the system clock.
    pub fn new() -> Self {
        EntityStore::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        EntityStore::with_clock(config, Arc::new(SystemClock))
    }

    /// Empty store whose log entries are stamped by `clock`.
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        EntityStore {
            state: RwLock::new(StoreState::new(clock)),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against a consistent view of the state under the read lock.
    pub fn read_with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StoreState) -> R,
    {
        f(&self.read())
    }

    /// Owned copy of the whole state, taken atomically.
    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    // =========================================================================
    // Setup Commands
    // =========================================================================

    pub fn add_branch(&self, draft: NewBranch) -> CoreResult<Branch> {
        validate_name("name", &draft.name)?;
        validate_name("location", &draft.location)?;

        let mut state = self.write();
        let id = state.next_branch_id().ok_or_else(|| exhausted("branches"))?;
        let branch = draft.into_branch(id);
        state.insert_branch(branch.clone());

        info!(branch_id = %branch.id, name = %branch.name, "Branch added");
        Ok(branch)
    }

    /// Adds an employee to an existing branch.
    ///
    /// An unknown `branch_id` is a [`ValidationError::UnknownReference`].
    pub fn add_employee(&self, draft: NewEmployee) -> CoreResult<Employee> {
        validate_name("name", &draft.name)?;
        validate_name("role", &draft.role)?;

        let mut state = self.write();
        validate_references(&draft, &*state)
            .inspect_err(|e| warn!(error = %e, "Employee rejected"))?;

        let id = state.next_employee_id().ok_or_else(|| exhausted("employees"))?;
        let employee = draft.into_employee(id);
        state.insert_employee(employee.clone());

        info!(employee_id = %employee.id, branch_id = %employee.branch_id, "Employee added");
        Ok(employee)
    }

    pub fn add_customer_group(&self, draft: NewCustomerGroup) -> CoreResult<CustomerGroup> {
        validate_name("name", &draft.name)?;
        validate_numeric_ranges(&draft)?;

        let mut state = self.write();
        let id = state
            .next_customer_group_id()
            .ok_or_else(|| exhausted("customer groups"))?;
        let group = draft.into_customer_group(id);
        state.insert_customer_group(group.clone());

        info!(
            customer_group_id = %group.id,
            discount_bps = group.discount.bps(),
            "Customer group added"
        );
        Ok(group)
    }

    // =========================================================================
    // Business Commands
    // =========================================================================

    /// Adds a product to an existing branch and logs `ProductCreated`.
    ///
    /// ## Errors
    /// - `NotFound`: the actor's employee or branch does not exist
    /// - `Validation`: empty name/category, negative price/stock, or an
    ///   unknown `branch_id` (`UnknownReference`)
    pub fn add_product(&self, actor: Actor, draft: NewProduct) -> CoreResult<Product> {
        let mut state = self.write();
        validate_foreign_keys(&actor, &*state)?;

        validate_name("name", &draft.name)?;
        validate_name("category", &draft.category)?;
        validate_numeric_ranges(&draft)?;
        validate_references(&draft, &*state)
            .inspect_err(|e| warn!(error = %e, "Product rejected"))?;
        if state.units_after(draft.stock).is_none() {
            let err = ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX - state.units_on_hand(),
            };
            warn!(error = %err, "Product rejected");
            return Err(err.into());
        }

        let id = state.next_product_id().ok_or_else(|| exhausted("products"))?;
        let product = draft.into_product(id);

        let branch_name = state
            .branch(product.branch_id)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        state.insert_product(product.clone());
        state.log_mut().append(
            ActionType::ProductCreated,
            actor.employee_id,
            actor.branch_id,
            format!("Added {} to {}", product.name, branch_name),
        );

        info!(
            product_id = %product.id,
            branch_id = %product.branch_id,
            stock = product.stock,
            "Product added"
        );
        Ok(product)
    }

    /// Changes a product's stock by `delta` and returns the new level.
    ///
    /// ## Errors
    /// - `NotFound`: unknown product, or an actor that does not resolve
    /// - `InvariantViolation`: the result would be negative, or would overflow
    ///   the product's stock or the store-wide units on hand
    pub fn adjust_stock(&self, actor: Actor, product_id: ProductId, delta: i64) -> CoreResult<i64> {
        let mut state = self.write();
        validate_foreign_keys(&actor, &*state)?;

        let product = state
            .product(product_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Product, product_id))
            .inspect_err(|e| warn!(error = %e, "Stock adjustment rejected"))?;

        let current = product.stock;
        let new_stock = current
            .checked_add(delta)
            .filter(|stock| *stock >= 0)
            .filter(|_| state.units_after(delta).is_some())
            .ok_or(CoreError::InvariantViolation {
                product_id,
                current,
                delta,
            })
            .inspect_err(|e| warn!(error = %e, "Stock adjustment rejected"))?;

        let name = product.name.clone();
        state.set_stock(product_id, new_stock);
        state.log_mut().append(
            ActionType::StockUpdate,
            actor.employee_id,
            actor.branch_id,
            format!("Updated {name} stock to {new_stock} units ({delta:+})"),
        );

        info!(product_id = %product_id, delta, new_stock, "Stock adjusted");
        Ok(new_stock)
    }

    /// Records a sale, draws down stock and logs `Sale`.
    ///
    /// ## Check Order
    /// ```text
    /// quantity >= 1, amount >= 0        → Validation
    /// product/employee/branch/group     → NotFound
    /// sale branch == product branch     → Validation (BranchMismatch)
    /// quantity <= stock                 → InsufficientStock
    /// amount == expected ± tolerance    → Validation (AmountMismatch)
    /// revenue + amount <= i64::MAX      → Validation (OutOfRange)
    /// ```
    /// The log entry is attributed to the sale's own employee and branch.
    pub fn record_sale(&self, draft: NewSale) -> CoreResult<Sale> {
        let mut state = self.write();

        let checked = Self::check_sale(&state, &draft, self.config.amount_tolerance)
            .inspect_err(|e| warn!(product_id = %draft.product_id, error = %e, "Sale rejected"));
        let (product_name, group_name, stock_before) = checked?;

        let id = state.next_sale_id().ok_or_else(|| exhausted("sales"))?;
        let sale = draft.into_sale(id);

        let new_stock = stock_before - sale.quantity;
        state.set_stock(sale.product_id, new_stock);
        state.insert_sale(sale.clone());
        state.log_mut().append(
            ActionType::Sale,
            sale.employee_id,
            sale.branch_id,
            format!(
                "Sold {} × {} to {} group",
                sale.quantity, product_name, group_name
            ),
        );

        info!(
            sale_id = %sale.id,
            product_id = %sale.product_id,
            quantity = sale.quantity,
            amount = %sale.amount,
            new_stock,
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Every check `record_sale` makes, without writing. Returns the product
    /// and group names for the log line and the stock on hand before the sale.
    fn check_sale(
        state: &StoreState,
        draft: &NewSale,
        tolerance: Money,
    ) -> CoreResult<(String, String, i64)> {
        validate_numeric_ranges(draft)?;
        validate_foreign_keys(draft, state)?;

        let product = state
            .product(draft.product_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Product, draft.product_id))?;
        let group = state.customer_group(draft.customer_group_id).ok_or_else(|| {
            CoreError::not_found(EntityKind::CustomerGroup, draft.customer_group_id)
        })?;

        validate_sale_branch(draft, product)?;

        if !product.can_sell(draft.quantity) {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
                requested: draft.quantity,
            });
        }

        validate_sale_amount(draft, product, group, tolerance)?;

        if state.revenue_after(draft.amount).is_none() {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: 0,
                max: i64::MAX - state.revenue().minor(),
            }
            .into());
        }

        Ok((product.name.clone(), group.name.clone(), product.stock))
    }

    // =========================================================================
    // Entity Queries
    // =========================================================================

    pub fn branch(&self, id: BranchId) -> Option<Branch> {
        self.read().branch(id).cloned()
    }

    pub fn employee(&self, id: EmployeeId) -> Option<Employee> {
        self.read().employee(id).cloned()
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.read().product(id).cloned()
    }

    pub fn customer_group(&self, id: CustomerGroupId) -> Option<CustomerGroup> {
        self.read().customer_group(id).cloned()
    }

    pub fn sale(&self, id: SaleId) -> Option<Sale> {
        self.read().sale(id).cloned()
    }

    pub fn branches(&self) -> Vec<Branch> {
        self.read().branches().into_iter().cloned().collect()
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.read().employees().into_iter().cloned().collect()
    }

    pub fn products(&self) -> Vec<Product> {
        self.read().products().into_iter().cloned().collect()
    }

    pub fn customer_groups(&self) -> Vec<CustomerGroup> {
        self.read().customer_groups().into_iter().cloned().collect()
    }

    pub fn sales(&self) -> Vec<Sale> {
        self.read().sales().into_iter().cloned().collect()
    }

    pub fn employees_by_branch(&self, branch_id: BranchId) -> Vec<Employee> {
        self.read()
            .employees_by_branch(branch_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn products_by_branch(&self, branch_id: BranchId) -> Vec<Product> {
        self.read()
            .products_by_branch(branch_id)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // Dashboard Queries
    // =========================================================================

    pub fn total_revenue(&self) -> Money {
        debug!("total_revenue query");
        aggregation::total_revenue(&self.read())
    }

    pub fn revenue_by_period(
        &self,
        granularity: Granularity,
        range: Option<DateRange>,
    ) -> CoreResult<Vec<PeriodRevenue>> {
        debug!(?granularity, ?range, "revenue_by_period query");
        aggregation::revenue_by_period(&self.read(), granularity, range)
    }

    pub fn stock_status(&self, product_id: ProductId) -> CoreResult<StockStatus> {
        debug!(product_id = %product_id, "stock_status query");
        aggregation::stock_status(&self.read(), product_id)
    }

    pub fn recent_activity(&self, limit: usize) -> Vec<ActionLogEntry> {
        debug!(limit, "recent_activity query");
        aggregation::recent_activity(&self.read(), limit)
    }

    pub fn revenue_by_branch(&self) -> Vec<BranchRevenue> {
        aggregation::revenue_by_branch(&self.read())
    }

    pub fn revenue_by_employee(&self) -> Vec<EmployeeRevenue> {
        aggregation::revenue_by_employee(&self.read())
    }

    pub fn inventory_summary(&self) -> InventorySummary {
        aggregation::inventory_summary(&self.read())
    }

    /// All overview cards from a single read of the state.
    pub fn dashboard_summary(&self, recent_limit: usize) -> DashboardSummary {
        debug!(recent_limit, "dashboard_summary query");
        aggregation::dashboard_summary(&self.read(), recent_limit)
    }

    // =========================================================================
    // Activity Queries
    // =========================================================================

    pub fn activity_by_employee(&self, employee_id: EmployeeId) -> Vec<ActionLogEntry> {
        self.read().log().by_employee(employee_id)
    }

    pub fn activity_by_branch(&self, branch_id: BranchId) -> Vec<ActionLogEntry> {
        self.read().log().by_branch(branch_id)
    }

    pub fn activity_by_action_type(&self, action_type: ActionType) -> Vec<ActionLogEntry> {
        self.read().log().by_action_type(action_type)
    }

    pub fn activity_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<ActionLogEntry> {
        self.read().log().between(start, end)
    }
}

fn exhausted(collection: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: collection.to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use branchboard_core::DiscountRate;
    use chrono::NaiveDate;

    struct Fixture {
        store: EntityStore,
        actor: Actor,
        branch: BranchId,
        product: ProductId,
        group: CustomerGroupId,
    }

    fn fixture() -> Fixture {
        fixture_with(StoreConfig::default())
    }

    fn fixture_with(config: StoreConfig) -> Fixture {
        let store = EntityStore::with_config(config);
        let branch = store.add_branch(NewBranch::new("Main Branch", "Dhaka")).unwrap();
        let employee = store
            .add_employee(NewEmployee::new("Rafiq Ahmed", branch.id, "Sales Executive"))
            .unwrap();
        let group = store
            .add_customer_group(NewCustomerGroup::new(
                "Tech Lovers",
                DiscountRate::from_percent(5),
            ))
            .unwrap();
        let actor = Actor::new(employee.id, branch.id);
        let product = store
            .add_product(
                actor,
                NewProduct {
                    name: "ASUS Laptop".to_string(),
                    category: "Electronics".to_string(),
                    price: Money::from_minor(89_000),
                    stock: 15,
                    branch_id: branch.id,
                },
            )
            .unwrap();

        Fixture {
            store,
            actor,
            branch: branch.id,
            product: product.id,
            group: group.id,
        }
    }

    fn sale(f: &Fixture, quantity: i64, amount: i64) -> NewSale {
        NewSale {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            product_id: f.product,
            employee_id: f.actor.employee_id,
            branch_id: f.branch,
            customer_group_id: f.group,
            quantity,
            amount: Money::from_minor(amount),
        }
    }

    #[test]
    fn test_setup_commands_assign_sequential_ids() {
        let store = EntityStore::new();
        let a = store.add_branch(NewBranch::new("A", "Dhaka")).unwrap();
        let b = store.add_branch(NewBranch::new("B", "Sylhet")).unwrap();

        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
        assert_eq!(store.branches(), vec![a, b]);
        // setup commands do not log
        assert!(store.recent_activity(10).is_empty());
    }

    #[test]
    fn test_add_branch_rejects_blank_name() {
        let store = EntityStore::new();
        let err = store.add_branch(NewBranch::new("   ", "Dhaka")).unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationError::required("name")));
        assert!(store.branches().is_empty());
    }

    #[test]
    fn test_add_employee_unknown_branch() {
        let store = EntityStore::new();
        let err = store
            .add_employee(NewEmployee::new("Fatima Khan", BranchId::new(9), "Sales Manager"))
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnknownReference { id: 9, .. })
        ));
    }

    #[test]
    fn test_add_customer_group_rejects_discount_over_100() {
        let store = EntityStore::new();
        let err = store
            .add_customer_group(NewCustomerGroup::new("Greedy", DiscountRate::from_percent(101)))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_add_product_logs_creation() {
        let f = fixture();
        let log = f.store.recent_activity(10);

        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action_type, ActionType::ProductCreated);
        assert_eq!(log[0].employee_id, f.actor.employee_id);
        assert_eq!(log[0].description, "Added ASUS Laptop to Main Branch");
    }

    #[test]
    fn test_add_product_unknown_branch_is_validation_error() {
        let f = fixture();
        let err = f
            .store
            .add_product(
                f.actor,
                NewProduct {
                    name: "Samsung TV".to_string(),
                    category: "Electronics".to_string(),
                    price: Money::from_minor(65_000),
                    stock: 5,
                    branch_id: BranchId::new(42),
                },
            )
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnknownReference { .. })
        ));
        assert_eq!(f.store.products().len(), 1);
        assert_eq!(f.store.recent_activity(10).len(), 1);
    }

    #[test]
    fn test_add_product_negative_price() {
        let f = fixture();
        let err = f
            .store
            .add_product(
                f.actor,
                NewProduct {
                    name: "Broken".to_string(),
                    category: "Misc".to_string(),
                    price: Money::from_minor(-1),
                    stock: 1,
                    branch_id: f.branch,
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_actor_is_not_found() {
        let f = fixture();
        let ghost = Actor::new(EmployeeId::new(77), f.branch);

        let err = f.store.adjust_stock(ghost, f.product, 1).unwrap_err();
        assert_eq!(err, CoreError::not_found(EntityKind::Employee, 77u32));
        assert_eq!(f.store.product(f.product).unwrap().stock, 15);
    }

    #[test]
    fn test_adjust_stock_rejects_negative_result() {
        let f = fixture();
        let err = f.store.adjust_stock(f.actor, f.product, -16).unwrap_err();

        assert_eq!(
            err,
            CoreError::InvariantViolation {
                product_id: f.product,
                current: 15,
                delta: -16,
            }
        );
        assert_eq!(f.store.product(f.product).unwrap().stock, 15);
    }

    #[test]
    fn test_adjust_stock_overflow() {
        let f = fixture();
        let err = f.store.adjust_stock(f.actor, f.product, i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation { .. }));
    }

    #[test]
    fn test_adjust_stock_logs_update() {
        let f = fixture();
        assert_eq!(f.store.adjust_stock(f.actor, f.product, -15).unwrap(), 0);

        let entry = &f.store.recent_activity(1)[0];
        assert_eq!(entry.action_type, ActionType::StockUpdate);
        assert_eq!(entry.description, "Updated ASUS Laptop stock to 0 units (-15)");
        assert_eq!(
            f.store.stock_status(f.product).unwrap(),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn test_record_sale_commits_and_logs() {
        let f = fixture();
        let sale = f.store.record_sale(sale(&f, 1, 84_550)).unwrap();

        assert_eq!(sale.id.get(), 1);
        assert_eq!(f.store.product(f.product).unwrap().stock, 14);
        assert_eq!(f.store.sale(sale.id), Some(sale));

        let entry = &f.store.recent_activity(1)[0];
        assert_eq!(entry.action_type, ActionType::Sale);
        assert_eq!(entry.description, "Sold 1 × ASUS Laptop to Tech Lovers group");
    }

    #[test]
    fn test_record_sale_branch_mismatch() {
        let f = fixture();
        let other = f.store.add_branch(NewBranch::new("Sylhet Branch", "Sylhet")).unwrap();

        let mut draft = sale(&f, 1, 84_550);
        draft.branch_id = other.id;
        let err = f.store.record_sale(draft).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::BranchMismatch { .. })
        ));
        assert_eq!(f.store.product(f.product).unwrap().stock, 15);
    }

    #[test]
    fn test_record_sale_rejects_zero_quantity() {
        let f = fixture();
        let err = f.store.record_sale(sale(&f, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_record_sale_tolerance_from_config() {
        let f = fixture_with(StoreConfig {
            amount_tolerance: Money::from_minor(1),
            ..StoreConfig::default()
        });

        assert!(f.store.record_sale(sale(&f, 1, 84_551)).is_ok());
        assert!(f.store.record_sale(sale(&f, 1, 84_552)).is_err());
        assert_eq!(f.store.product(f.product).unwrap().stock, 14);
    }

    #[test]
    fn test_record_sale_rejects_revenue_past_i64() {
        let f = fixture();
        let walk_in = f
            .store
            .add_customer_group(NewCustomerGroup::new("Walk-in", DiscountRate::zero()))
            .unwrap();
        let yacht = f
            .store
            .add_product(
                f.actor,
                NewProduct {
                    name: "Yacht".to_string(),
                    category: "Marine".to_string(),
                    price: Money::from_minor(5_000_000_000_000_000_000),
                    stock: 2,
                    branch_id: f.branch,
                },
            )
            .unwrap();
        let draft = NewSale {
            product_id: yacht.id,
            customer_group_id: walk_in.id,
            ..sale(&f, 1, 5_000_000_000_000_000_000)
        };

        f.store.record_sale(draft.clone()).unwrap();
        let err = f.store.record_sale(draft).unwrap_err();

        assert_eq!(
            err,
            CoreError::Validation(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: 0,
                max: i64::MAX - 5_000_000_000_000_000_000,
            })
        );
        assert_eq!(f.store.sales().len(), 1);
        assert_eq!(f.store.product(yacht.id).unwrap().stock, 1);

        let expected = Money::from_minor(5_000_000_000_000_000_000);
        assert_eq!(f.store.total_revenue(), expected);
        assert_eq!(f.store.revenue_by_branch()[0].revenue, expected);
        assert_eq!(f.store.revenue_by_employee()[0].revenue, expected);
        assert_eq!(f.store.dashboard_summary(5).total_revenue, expected);
    }

    #[test]
    fn test_add_product_rejects_units_past_i64() {
        let f = fixture();
        let bulk = |stock: i64| NewProduct {
            name: "Screws".to_string(),
            category: "Hardware".to_string(),
            price: Money::from_minor(1),
            stock,
            branch_id: f.branch,
        };

        // fixture product holds 15
        f.store.add_product(f.actor, bulk(i64::MAX - 15)).unwrap();
        let err = f.store.add_product(f.actor, bulk(i64::MAX)).unwrap_err();

        assert_eq!(
            err,
            CoreError::Validation(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: 0,
            })
        );
        assert_eq!(f.store.products().len(), 2);

        let inventory = f.store.inventory_summary();
        assert_eq!(inventory.product_count, 2);
        assert_eq!(inventory.units_on_hand, i64::MAX);
    }

    #[test]
    fn test_adjust_stock_rejects_units_past_i64() {
        let f = fixture();
        let cable = f
            .store
            .add_product(
                f.actor,
                NewProduct {
                    name: "Cable".to_string(),
                    category: "Electronics".to_string(),
                    price: Money::from_minor(500),
                    stock: 0,
                    branch_id: f.branch,
                },
            )
            .unwrap();
        f.store.adjust_stock(f.actor, f.product, i64::MAX - 15).unwrap();

        // the cable's own stock would fit, the store-wide total would not
        let err = f.store.adjust_stock(f.actor, cable.id, 1).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvariantViolation {
                product_id: cable.id,
                current: 0,
                delta: 1,
            }
        );
        assert_eq!(f.store.product(cable.id).unwrap().stock, 0);
        assert_eq!(f.store.inventory_summary().units_on_hand, i64::MAX);

        f.store.adjust_stock(f.actor, f.product, -1).unwrap();
        assert_eq!(f.store.adjust_stock(f.actor, cable.id, 1).unwrap(), 1);
        assert_eq!(f.store.inventory_summary().units_on_hand, i64::MAX);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let f = fixture();
        let before = f.store.snapshot();
        f.store.adjust_stock(f.actor, f.product, 5).unwrap();

        assert_eq!(before.product(f.product).unwrap().stock, 15);
        assert_eq!(f.store.product(f.product).unwrap().stock, 20);
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EntityStore>();
    }
}
