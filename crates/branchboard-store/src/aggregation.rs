//! # Aggregation Engine
//!
//! Dashboard metrics derived from a [`StoreState`]. Every function here is a
//! pure read: same state in, same output out. Nothing is cached; the store
//! recomputes on each query.
//!
//! ## Dashboard Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Overview screen                                                        │
//! │  ┌──────────────────┐ ┌──────────────────┐                              │
//! │  │ Total Sales      │ │ Active Products  │   ◄── total_revenue,         │
//! │  │                  │ │                  │       inventory_summary      │
//! │  └──────────────────┘ └──────────────────┘                              │
//! │  ┌────────────────────────────────────────┐                             │
//! │  │ Sales Trend  ╱╲__╱‾‾                   │   ◄── revenue_by_period      │
//! │  └────────────────────────────────────────┘                             │
//! │  ┌────────────────────────────────────────┐                             │
//! │  │ Recent Activity                        │   ◄── recent_activity        │
//! │  └────────────────────────────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use branchboard_core::{
    ActionLogEntry, BranchId, CoreError, CoreResult, DateRange, EmployeeId, EntityKind,
    Granularity, Money, ProductId, StockStatus, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::state::StoreState;

/// Most buckets a zero-filled trend may hold (ten years of days).
pub const MAX_PERIOD_BUCKETS: usize = 3_660;

// =============================================================================
// View Types
// =============================================================================

/// Revenue for one trend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRevenue {
    /// First day of the bucket.
    #[ts(as = "String")]
    pub period_start: NaiveDate,
    pub revenue: Money,
    pub sale_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BranchRevenue {
    pub branch_id: BranchId,
    pub branch_name: String,
    pub revenue: Money,
    pub sale_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRevenue {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub revenue: Money,
    pub sale_count: usize,
}

/// Stock overview across all branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub units_on_hand: i64,
}

/// Everything the overview screen shows, computed from one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_revenue: Money,
    pub sale_count: usize,
    pub inventory: InventorySummary,
    pub recent_activity: Vec<ActionLogEntry>,
}

// =============================================================================
// Core Metrics
// =============================================================================

/// Sum of `amount` over all sales.
pub fn total_revenue(state: &StoreState) -> Money {
    state.revenue()
}

/// Sales grouped into day or month buckets, oldest first.
///
/// ## Buckets
/// - `range = None`: only periods that have at least one sale.
/// - `range = Some(r)`: sales outside `r` are ignored and every period that
///   overlaps `r` is present, zero-filled when empty.
///
/// ## Errors
/// - `Validation` (`OutOfRange`): `r` spans more than [`MAX_PERIOD_BUCKETS`]
///   periods at this granularity
///
/// ## Example
/// ```text
/// sales: 2024-01-10 (100), 2024-03-02 (50), 2024-03-20 (25)
///
/// Month, None                   → [Jan: 100, Mar: 75]
/// Month, Some(Jan 1 ..= Mar 31) → [Jan: 100, Feb: 0, Mar: 75]
/// ```
pub fn revenue_by_period(
    state: &StoreState,
    granularity: Granularity,
    range: Option<DateRange>,
) -> CoreResult<Vec<PeriodRevenue>> {
    let mut buckets: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();

    if let Some(range) = range {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let mut period = granularity.truncate(range.start);
        while period <= range.end {
            if buckets.len() == MAX_PERIOD_BUCKETS {
                return Err(ValidationError::OutOfRange {
                    field: "range".to_string(),
                    min: 1,
                    max: MAX_PERIOD_BUCKETS as i64,
                }
                .into());
            }
            buckets.insert(period, (Money::zero(), 0));
            match granularity.next(period) {
                Some(next) => period = next,
                None => break,
            }
        }
    }

    let in_range = |date: NaiveDate| range.map_or(true, |r| r.contains(date));

    for sale in state.sales_iter().filter(|s| in_range(s.date)) {
        let bucket = buckets
            .entry(granularity.truncate(sale.date))
            .or_insert((Money::zero(), 0));
        bucket.0 += sale.amount;
        bucket.1 += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(period_start, (revenue, sale_count))| PeriodRevenue {
            period_start,
            revenue,
            sale_count,
        })
        .collect())
}

/// `InStock` when at least one unit is on hand.
pub fn stock_status(state: &StoreState, product_id: ProductId) -> CoreResult<StockStatus> {
    state
        .product(product_id)
        .map(|p| p.stock_status())
        .ok_or_else(|| CoreError::not_found(EntityKind::Product, product_id))
}

/// The `limit` most recent log entries, newest first.
pub fn recent_activity(state: &StoreState, limit: usize) -> Vec<ActionLogEntry> {
    state.log().recent(limit)
}

// =============================================================================
// Breakdown Views
// =============================================================================

/// Revenue per branch, one row for every branch (zero when it has no sales).
pub fn revenue_by_branch(state: &StoreState) -> Vec<BranchRevenue> {
    let mut totals: BTreeMap<BranchId, (Money, usize)> = BTreeMap::new();
    for sale in state.sales_iter() {
        let entry = totals.entry(sale.branch_id).or_default();
        entry.0 += sale.amount;
        entry.1 += 1;
    }

    state
        .branches()
        .into_iter()
        .map(|branch| {
            let (revenue, sale_count) = totals.get(&branch.id).copied().unwrap_or_default();
            BranchRevenue {
                branch_id: branch.id,
                branch_name: branch.name.clone(),
                revenue,
                sale_count,
            }
        })
        .collect()
}

/// Revenue per employee, only employees who made at least one sale.
pub fn revenue_by_employee(state: &StoreState) -> Vec<EmployeeRevenue> {
    let mut totals: BTreeMap<EmployeeId, (Money, usize)> = BTreeMap::new();
    for sale in state.sales_iter() {
        let entry = totals.entry(sale.employee_id).or_default();
        entry.0 += sale.amount;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(employee_id, (revenue, sale_count))| EmployeeRevenue {
            employee_id,
            employee_name: state
                .employee(employee_id)
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            revenue,
            sale_count,
        })
        .collect()
}

pub fn inventory_summary(state: &StoreState) -> InventorySummary {
    let empty = InventorySummary {
        units_on_hand: state.units_on_hand(),
        ..InventorySummary::default()
    };
    state
        .products_iter()
        .fold(empty, |mut summary, product| {
            summary.product_count += 1;
            match product.stock_status() {
                StockStatus::InStock => summary.in_stock += 1,
                StockStatus::OutOfStock => summary.out_of_stock += 1,
            }
            summary
        })
}

pub fn dashboard_summary(state: &StoreState, recent_limit: usize) -> DashboardSummary {
    DashboardSummary {
        total_revenue: total_revenue(state),
        sale_count: state.sales_iter().count(),
        inventory: inventory_summary(state),
        recent_activity: recent_activity(state, recent_limit),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
