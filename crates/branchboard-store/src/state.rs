//! # Store State
//!
//! The canonical collections. [`crate::EntityStore`] keeps one `StoreState`
//! behind its lock; [`crate::EntityStore::snapshot`] hands out owned copies.
//!
//! Rows are never removed, so every collection assigns `len + 1` as the next
//! id and every lookup is a single `HashMap` get.
//!
//! ## Running Totals
//! Revenue across all sales and units on hand across all products are kept
//! alongside the rows. Amounts and stock are never negative, so every
//! per-branch, per-employee or per-period sum is bounded by these totals.
//! The store refuses any write that would push a total past `i64::MAX`,
//! which keeps every aggregation overflow-free.

use std::collections::HashMap;
use std::sync::Arc;

use branchboard_core::validation::{EntityLookup, ForeignKey};
use branchboard_core::{
    Branch, BranchId, CustomerGroup, CustomerGroupId, Employee, EmployeeId, Money, Product,
    ProductId, Sale, SaleId,
};

use crate::activity::{ActivityLog, Clock, SystemClock};

/// Every entity collection plus the action log.
#[derive(Debug, Clone)]
pub struct StoreState {
    branches: HashMap<BranchId, Branch>,
    employees: HashMap<EmployeeId, Employee>,
    products: HashMap<ProductId, Product>,
    customer_groups: HashMap<CustomerGroupId, CustomerGroup>,
    sales: HashMap<SaleId, Sale>,
    log: ActivityLog,
    revenue: Money,
    units_on_hand: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        StoreState::new(Arc::new(SystemClock))
    }
}

impl StoreState {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        StoreState {
            branches: HashMap::new(),
            employees: HashMap::new(),
            products: HashMap::new(),
            customer_groups: HashMap::new(),
            sales: HashMap::new(),
            log: ActivityLog::new(clock),
            revenue: Money::zero(),
            units_on_hand: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(&id)
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&id)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn customer_group(&self, id: CustomerGroupId) -> Option<&CustomerGroup> {
        self.customer_groups.get(&id)
    }

    pub fn sale(&self, id: SaleId) -> Option<&Sale> {
        self.sales.get(&id)
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Sum of every sale amount.
    pub fn revenue(&self) -> Money {
        self.revenue
    }

    /// Sum of every product's stock.
    pub fn units_on_hand(&self) -> i64 {
        self.units_on_hand
    }

    // -------------------------------------------------------------------------
    // Headroom checks (`None` when a total would overflow)
    // -------------------------------------------------------------------------

    pub(crate) fn revenue_after(&self, amount: Money) -> Option<Money> {
        self.revenue.checked_add(amount)
    }

    pub(crate) fn units_after(&self, delta: i64) -> Option<i64> {
        self.units_on_hand.checked_add(delta)
    }

    // -------------------------------------------------------------------------
    // Listings (ascending id)
    // -------------------------------------------------------------------------

    pub fn branches(&self) -> Vec<&Branch> {
        sorted_by_id(self.branches.values(), |b| b.id)
    }

    pub fn employees(&self) -> Vec<&Employee> {
        sorted_by_id(self.employees.values(), |e| e.id)
    }

    pub fn products(&self) -> Vec<&Product> {
        sorted_by_id(self.products.values(), |p| p.id)
    }

    pub fn customer_groups(&self) -> Vec<&CustomerGroup> {
        sorted_by_id(self.customer_groups.values(), |g| g.id)
    }

    pub fn sales(&self) -> Vec<&Sale> {
        sorted_by_id(self.sales.values(), |s| s.id)
    }

    pub fn employees_by_branch(&self, branch_id: BranchId) -> Vec<&Employee> {
        sorted_by_id(
            self.employees.values().filter(|e| e.branch_id == branch_id),
            |e| e.id,
        )
    }

    pub fn products_by_branch(&self, branch_id: BranchId) -> Vec<&Product> {
        sorted_by_id(
            self.products.values().filter(|p| p.branch_id == branch_id),
            |p| p.id,
        )
    }

    /// Unordered iteration over sales, for aggregations that sum.
    pub(crate) fn sales_iter(&self) -> impl Iterator<Item = &Sale> {
        self.sales.values()
    }

    pub(crate) fn products_iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    // -------------------------------------------------------------------------
    // Id assignment
    // -------------------------------------------------------------------------
    // Rows are never removed, so `len + 1` is unused and larger than every id.

    pub(crate) fn next_branch_id(&self) -> Option<BranchId> {
        next_raw(self.branches.len()).map(BranchId::new)
    }

    pub(crate) fn next_employee_id(&self) -> Option<EmployeeId> {
        next_raw(self.employees.len()).map(EmployeeId::new)
    }

    pub(crate) fn next_product_id(&self) -> Option<ProductId> {
        next_raw(self.products.len()).map(ProductId::new)
    }

    pub(crate) fn next_customer_group_id(&self) -> Option<CustomerGroupId> {
        next_raw(self.customer_groups.len()).map(CustomerGroupId::new)
    }

    pub(crate) fn next_sale_id(&self) -> Option<SaleId> {
        next_raw(self.sales.len()).map(SaleId::new)
    }

    // -------------------------------------------------------------------------
    // Writes (only called by EntityStore after validation, including the
    // headroom checks above)
    // -------------------------------------------------------------------------

    pub(crate) fn insert_branch(&mut self, branch: Branch) {
        self.branches.insert(branch.id, branch);
    }

    pub(crate) fn insert_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id, employee);
    }

    pub(crate) fn insert_product(&mut self, product: Product) {
        self.units_on_hand = self.units_on_hand.saturating_add(product.stock);
        self.products.insert(product.id, product);
    }

    pub(crate) fn insert_customer_group(&mut self, group: CustomerGroup) {
        self.customer_groups.insert(group.id, group);
    }

    pub(crate) fn insert_sale(&mut self, sale: Sale) {
        self.revenue = Money::from_minor(self.revenue.minor().saturating_add(sale.amount.minor()));
        self.sales.insert(sale.id, sale);
    }

    /// Sets a product's stock and returns the previous level.
    pub(crate) fn set_stock(&mut self, id: ProductId, stock: i64) -> Option<i64> {
        let product = self.products.get_mut(&id)?;
        let previous = std::mem::replace(&mut product.stock, stock);
        self.units_on_hand = self
            .units_on_hand
            .saturating_sub(previous)
            .saturating_add(stock);
        Some(previous)
    }

    pub(crate) fn log_mut(&mut self) -> &mut ActivityLog {
        &mut self.log
    }
}

impl EntityLookup for StoreState {
    fn contains(&self, key: ForeignKey) -> bool {
        match key {
            ForeignKey::Branch(id) => self.branches.contains_key(&id),
            ForeignKey::Employee(id) => self.employees.contains_key(&id),
            ForeignKey::Product(id) => self.products.contains_key(&id),
            ForeignKey::CustomerGroup(id) => self.customer_groups.contains_key(&id),
        }
    }
}

/// `None` once the id space is exhausted.
fn next_raw(len: usize) -> Option<u32> {
    u32::try_from(len).ok()?.checked_add(1)
}

fn sorted_by_id<'a, T, K, I, F>(rows: I, key: F) -> Vec<&'a T>
where
    I: Iterator<Item = &'a T>,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut rows: Vec<&T> = rows.collect();
    rows.sort_by_key(|row| key(row));
    rows
}
