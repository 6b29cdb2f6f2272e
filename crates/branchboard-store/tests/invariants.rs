//! Random command sequences never break the stock, price or reference rules.

use branchboard_core::validation::{
    expected_sale_amount, validate_foreign_keys, validate_numeric_ranges,
};
use branchboard_core::*;
use branchboard_store::EntityStore;
use chrono::NaiveDate;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Command {
    AddProduct { price: i64, stock: i64 },
    AdjustStock { product: usize, delta: i64 },
    Sell { product: usize, group: usize, quantity: i64, exact: bool },
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        (-100i64..200_000, -5i64..50)
            .prop_map(|(price, stock)| Command::AddProduct { price, stock }),
        (0usize..6, -30i64..30)
            .prop_map(|(product, delta)| Command::AdjustStock { product, delta }),
        (0usize..6, 0usize..3, -1i64..20, any::<bool>()).prop_map(
            |(product, group, quantity, exact)| Command::Sell {
                product,
                group,
                quantity,
                exact,
            }
        ),
    ]
}

struct World {
    store: EntityStore,
    actor: Actor,
    groups: Vec<CustomerGroup>,
}

fn world() -> World {
    let store = EntityStore::new();
    let branch = store.add_branch(NewBranch::new("Main Branch", "Dhaka")).unwrap();
    let employee = store
        .add_employee(NewEmployee::new("Rafiq Ahmed", branch.id, "Sales Executive"))
        .unwrap();
    let groups = [("Tech Lovers", 5), ("Regular Customers", 2), ("VIP", 10)]
        .into_iter()
        .map(|(name, percent)| {
            store
                .add_customer_group(NewCustomerGroup::new(name, DiscountRate::from_percent(percent)))
                .unwrap()
        })
        .collect();

    World {
        store,
        actor: Actor::new(employee.id, branch.id),
        groups,
    }
}

/// Runs `command`; returns the product whose stock it changed and by how much.
fn apply(world: &World, command: &Command) -> Option<(ProductId, i64)> {
    let products = world.store.products();
    match *command {
        Command::AddProduct { price, stock } => {
            let _ = world.store.add_product(
                world.actor,
                NewProduct {
                    name: "Item".to_string(),
                    category: "General".to_string(),
                    price: Money::from_minor(price),
                    stock,
                    branch_id: world.actor.branch_id,
                },
            );
            None
        }
        Command::AdjustStock { product, delta } => {
            let id = products
                .get(product)
                .map_or(ProductId::new(999), |p| p.id);
            world
                .store
                .adjust_stock(world.actor, id, delta)
                .ok()
                .map(|_| (id, delta))
        }
        Command::Sell {
            product,
            group,
            quantity,
            exact,
        } => {
            let product = products.get(product)?;
            let group = &world.groups[group];
            let expected = expected_sale_amount(product, quantity.max(1), group)
                .unwrap_or(Money::zero());
            let amount = if exact {
                expected
            } else {
                expected + Money::from_minor(1)
            };
            world
                .store
                .record_sale(NewSale {
                    date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                    product_id: product.id,
                    employee_id: world.actor.employee_id,
                    branch_id: product.branch_id,
                    customer_group_id: group.id,
                    quantity,
                    amount,
                })
                .ok()
                .map(|sale| (sale.product_id, -sale.quantity))
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    /// Property: no sequence of commands drives stock or price negative,
    /// every sale and log entry keeps resolving, and the running unit total
    /// matches the products.
    #[test]
    fn store_invariants_hold(commands in proptest::collection::vec(command_strategy(), 1..40)) {
        let world = world();

        for command in &commands {
            apply(&world, command);

            let state = world.store.snapshot();
            for product in state.products() {
                prop_assert!(validate_numeric_ranges(product).is_ok());
                prop_assert!(validate_foreign_keys(product, &state).is_ok());
            }
            for group in state.customer_groups() {
                prop_assert!(validate_numeric_ranges(group).is_ok());
            }
            for sale in state.sales() {
                prop_assert!(validate_foreign_keys(sale, &state).is_ok());
                prop_assert!(sale.quantity >= 1);
            }
            for entry in state.log().iter() {
                prop_assert!(validate_foreign_keys(entry, &state).is_ok());
            }

            let units: i64 = state.products().iter().map(|p| p.stock).sum();
            prop_assert_eq!(state.units_on_hand(), units);
            prop_assert_eq!(world.store.inventory_summary().units_on_hand, units);
        }
    }

    /// Property: a command changes exactly the stock it reports and nothing
    /// else; a rejected command leaves every product untouched.
    #[test]
    fn stock_changes_only_on_success(commands in proptest::collection::vec(command_strategy(), 1..40)) {
        let world = world();

        for command in &commands {
            let before = world.store.products();
            let change = apply(&world, command);

            for product in &before {
                let expected = match change {
                    Some((id, delta)) if id == product.id => product.stock + delta,
                    _ => product.stock,
                };
                prop_assert_eq!(world.store.product(product.id).unwrap().stock, expected);
            }
        }

        let state = world.store.snapshot();
        let log = state.log();
        prop_assert_eq!(log.by_action_type(ActionType::Sale).len(), state.sales().len());
        prop_assert_eq!(
            log.by_action_type(ActionType::ProductCreated).len(),
            state.products().len()
        );

        let revenue: i64 = state.sales().iter().map(|s| s.amount.minor()).sum();
        prop_assert_eq!(state.revenue().minor(), revenue);
        prop_assert_eq!(world.store.total_revenue().minor(), revenue);
    }
}
