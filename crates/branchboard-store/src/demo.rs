//! # Demo Dataset
//!
//! Three branches with one employee each, four products, three customer
//! groups and a few sales spread over two months. Used by the `seed`
//! binary and by tests that want a realistic store.
//!
//! Sale amounts are computed with [`expected_sale_amount`], so every demo
//! sale passes the amount check under any tolerance.

use branchboard_core::validation::expected_sale_amount;
use branchboard_core::{
    Actor, CoreError, CoreResult, DiscountRate, Money, NewBranch, NewCustomerGroup, NewEmployee,
    NewProduct, NewSale,
};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::store::EntityStore;

/// Errors from loading the demo dataset.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Store(#[from] CoreError),

    #[error("Invalid demo sale date {0}-{1}-{2}")]
    InvalidDate(i32, u32, u32),
}

/// (name, location)
const BRANCHES: [(&str, &str); 3] = [
    ("Main Branch", "Dhaka"),
    ("Chittagong Branch", "Chittagong"),
    ("Sylhet Branch", "Sylhet"),
];

/// (name, branch index, role)
const EMPLOYEES: [(&str, usize, &str); 3] = [
    ("Rafiq Ahmed", 0, "Sales Executive"),
    ("Fatima Khan", 1, "Sales Manager"),
    ("Imran Hossain", 2, "Sales Executive"),
];

/// (name, category, price, stock, branch index)
const PRODUCTS: [(&str, &str, i64, i64, usize); 4] = [
    ("ASUS Laptop", "Electronics", 89_000, 15, 0),
    ("iPhone 13", "Electronics", 120_000, 8, 0),
    ("Samsung TV", "Electronics", 65_000, 5, 1),
    ("Office Chair", "Furniture", 12_000, 20, 2),
];

/// (name, discount percent)
const CUSTOMER_GROUPS: [(&str, u32); 3] = [
    ("Tech Lovers", 5),
    ("Regular Customers", 2),
    ("VIP", 10),
];

/// ((year, month, day), product index, group index, quantity)
///
/// Each sale is made by the employee of the product's branch.
const SALES: [((i32, u32, u32), usize, usize, i64); 5] = [
    ((2024, 2, 28), 3, 1, 4),
    ((2024, 3, 15), 0, 0, 1),
    ((2024, 3, 15), 1, 2, 2),
    ((2024, 3, 16), 2, 1, 1),
    ((2024, 3, 20), 0, 1, 1),
];

/// Loads the demo dataset into `store`.
///
/// Intended for an empty store; on a populated one the new rows simply get
/// the next free ids.
pub fn seed(store: &EntityStore) -> Result<(), DemoError> {
    let branches = BRANCHES
        .iter()
        .map(|(name, location)| store.add_branch(NewBranch::new(*name, *location)))
        .collect::<CoreResult<Vec<_>>>()?;

    let employees = EMPLOYEES
        .iter()
        .map(|(name, branch, role)| {
            store.add_employee(NewEmployee::new(*name, branches[*branch].id, *role))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let groups = CUSTOMER_GROUPS
        .iter()
        .map(|(name, percent)| {
            store.add_customer_group(NewCustomerGroup::new(
                *name,
                DiscountRate::from_percent(*percent),
            ))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    // one employee per branch, index-aligned
    let actors: Vec<Actor> = employees
        .iter()
        .map(|e| Actor::new(e.id, e.branch_id))
        .collect();

    let products = PRODUCTS
        .iter()
        .map(|(name, category, price, stock, branch)| {
            store.add_product(
                actors[*branch],
                NewProduct {
                    name: name.to_string(),
                    category: category.to_string(),
                    price: Money::from_minor(*price),
                    stock: *stock,
                    branch_id: branches[*branch].id,
                },
            )
        })
        .collect::<CoreResult<Vec<_>>>()?;

    for ((y, m, d), product_index, group_index, quantity) in SALES {
        let product = &products[product_index];
        let group = &groups[group_index];
        let seller = actors[PRODUCTS[product_index].4];

        let date = NaiveDate::from_ymd_opt(y, m, d).ok_or(DemoError::InvalidDate(y, m, d))?;
        let amount = expected_sale_amount(product, quantity, group).map_err(CoreError::from)?;

        store.record_sale(NewSale {
            date,
            product_id: product.id,
            employee_id: seller.employee_id,
            branch_id: product.branch_id,
            customer_group_id: group.id,
            quantity,
            amount,
        })?;
    }

    info!(
        branches = branches.len(),
        products = products.len(),
        sales = SALES.len(),
        "Demo data seeded"
    );
    Ok(())
}
