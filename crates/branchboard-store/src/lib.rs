//! # branchboard-store: In-Memory Entity Store for Branchboard
//!
//! Holds every entity collection and the action log behind one lock, runs
//! the integrity rules from `branchboard-core` before each mutation, and
//! derives the dashboard metrics on demand.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Branchboard Data Flow                            │
//! │                                                                         │
//! │  Dashboard adapter (record_sale, recent_activity, ...)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                branchboard-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  EntityStore  │    │  StoreState   │    │ aggregation  │  │   │
//! │  │   │  (store.rs)   │───►│  (state.rs)   │◄───│   (pure fns) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ RwLock        │    │ HashMaps      │    │ revenue      │  │   │
//! │  │   │ commands      │    │ ActivityLog   │    │ stock status │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            branchboard-core (types, validation)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `EntityStore` and its commands
//! - [`state`] - Collections and lookups behind the lock
//! - [`activity`] - Append-only action log and clocks
//! - [`aggregation`] - Dashboard metrics
//! - [`config`] - Environment-driven settings
//! - [`demo`] - Demo dataset for the `seed` binary
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use branchboard_store::{demo, EntityStore};
//!
//! let store = Arc::new(EntityStore::new());
//! demo::seed(&store).unwrap();
//!
//! let summary = store.dashboard_summary(5);
//! assert_eq!(summary.sale_count, 5);
//! assert_eq!(summary.recent_activity.len(), 5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activity;
pub mod aggregation;
pub mod config;
pub mod demo;
pub mod state;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use activity::{ActivityLog, Clock, ManualClock, SystemClock};
pub use aggregation::{
    BranchRevenue, DashboardSummary, EmployeeRevenue, InventorySummary, PeriodRevenue,
};
pub use config::{ConfigError, StoreConfig};
pub use state::StoreState;
pub use store::EntityStore;
