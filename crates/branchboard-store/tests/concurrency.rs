//! Many tills selling from one shelf at once.

use std::sync::Arc;
use std::thread;

use branchboard_core::*;
use branchboard_store::EntityStore;
use chrono::NaiveDate;

const INITIAL_STOCK: i64 = 50;
const THREADS: usize = 8;
const ATTEMPTS_PER_THREAD: usize = 20;

fn setup() -> (Arc<EntityStore>, NewSale, Actor) {
    let store = Arc::new(EntityStore::new());
    let branch = store.add_branch(NewBranch::new("Main Branch", "Dhaka")).unwrap();
    let employee = store
        .add_employee(NewEmployee::new("Rafiq Ahmed", branch.id, "Sales Executive"))
        .unwrap();
    let group = store
        .add_customer_group(NewCustomerGroup::new("Walk-in", DiscountRate::zero()))
        .unwrap();
    let actor = Actor::new(employee.id, branch.id);
    let product = store
        .add_product(
            actor,
            NewProduct {
                name: "Office Chair".to_string(),
                category: "Furniture".to_string(),
                price: Money::from_minor(12_000),
                stock: INITIAL_STOCK,
                branch_id: branch.id,
            },
        )
        .unwrap();

    let sale = NewSale {
        date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        product_id: product.id,
        employee_id: employee.id,
        branch_id: branch.id,
        customer_group_id: group.id,
        quantity: 1,
        amount: Money::from_minor(12_000),
    };
    (store, sale, actor)
}

#[test]
fn concurrent_sales_never_oversell() {
    let (store, sale, _) = setup();

    let sold: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let sale = sale.clone();
                s.spawn(move || {
                    (0..ATTEMPTS_PER_THREAD)
                        .filter(|_| store.record_sale(sale.clone()).is_ok())
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(sold as i64, INITIAL_STOCK);
    assert_eq!(store.product(sale.product_id).unwrap().stock, 0);
    assert_eq!(store.sales().len(), INITIAL_STOCK as usize);
    assert_eq!(
        store.total_revenue(),
        Money::from_minor(12_000 * INITIAL_STOCK)
    );
    assert_eq!(
        store.activity_by_action_type(ActionType::Sale).len(),
        INITIAL_STOCK as usize
    );
}

#[test]
fn readers_see_consistent_state_during_writes() {
    let (store, sale, actor) = setup();
    let product_id = sale.product_id;

    thread::scope(|s| {
        let writer = Arc::clone(&store);
        s.spawn(move || {
            for _ in 0..INITIAL_STOCK {
                writer.record_sale(sale.clone()).unwrap();
                writer.adjust_stock(actor, product_id, 1).unwrap();
            }
        });

        let reader = Arc::clone(&store);
        s.spawn(move || {
            for _ in 0..200 {
                reader.read_with(|state| {
                    let product = state.product(product_id).unwrap();
                    let sold: i64 = state.sales().iter().map(|s| s.quantity).sum();
                    let restocked = state
                        .log()
                        .by_action_type(ActionType::StockUpdate)
                        .len() as i64;
                    assert_eq!(product.stock, INITIAL_STOCK - sold + restocked);
                });
            }
        });
    });

    assert_eq!(store.product(product_id).unwrap().stock, INITIAL_STOCK);
}
