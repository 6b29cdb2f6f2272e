//! # Activity Log
//!
//! Append-only record of every store mutation.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  entries (append order = id order)                                      │
//! │                                                                         │
//! │   #1 10:30 Sale   #2 11:15 StockUpdate   #3 11:15 Sale                 │
//! │                                                                         │
//! │  recent(2)  →  [#3, #2]                                                 │
//! │                                                                         │
//! │  Newest timestamp first; equal timestamps fall back to the higher id.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries are never rewritten or removed. Every feed on this type sorts
//! through [`ActivityLog::feed`], the single definition of reverse-chronological.

use std::cmp::Reverse;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use branchboard_core::{ActionLogEntry, ActionLogId, ActionType, BranchId, EmployeeId};
use chrono::{DateTime, Duration, Utc};

// =============================================================================
// Clock
// =============================================================================

/// Source of log timestamps.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. For tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Activity Log
// =============================================================================

/// The action log.
///
/// ## Usage
/// ```rust
/// use branchboard_core::{ActionType, BranchId, EmployeeId};
/// use branchboard_store::activity::ActivityLog;
///
/// let mut log = ActivityLog::default();
/// let first = log.append(ActionType::Sale, EmployeeId::new(1), BranchId::new(1), "Sold laptop");
/// let second = log.append(ActionType::StockUpdate, EmployeeId::new(1), BranchId::new(1), "Restocked");
///
/// assert!(second.id > first.id);
/// assert_eq!(log.recent(1), vec![second]);
/// ```
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: Vec<ActionLogEntry>,
    clock: Arc<dyn Clock>,
}

impl Default for ActivityLog {
    fn default() -> Self {
        ActivityLog::new(Arc::new(SystemClock))
    }
}

impl ActivityLog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        ActivityLog {
            entries: Vec::new(),
            clock,
        }
    }

    /// Appends a new entry stamped with the next id and the current time.
    ///
    /// Foreign keys are not checked here: the store validates the
    /// attribution before it appends.
    pub fn append(
        &mut self,
        action_type: ActionType,
        employee_id: EmployeeId,
        branch_id: BranchId,
        description: impl Into<String>,
    ) -> ActionLogEntry {
        // entries are never removed, so the next id is always len + 1
        let id = ActionLogId::new(self.entries.len() as u64 + 1);

        let entry = ActionLogEntry {
            id,
            timestamp: self.clock.now(),
            action_type,
            employee_id,
            branch_id,
            description: description.into(),
        };

        self.entries.push(entry.clone());
        entry
    }

    /// The `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ActionLogEntry> {
        Self::feed(self.entries.iter(), limit)
    }

    /// Entries attributed to one employee, newest first.
    pub fn by_employee(&self, employee_id: EmployeeId) -> Vec<ActionLogEntry> {
        Self::feed(
            self.entries.iter().filter(|e| e.employee_id == employee_id),
            usize::MAX,
        )
    }

    /// Entries recorded at one branch, newest first.
    pub fn by_branch(&self, branch_id: BranchId) -> Vec<ActionLogEntry> {
        Self::feed(
            self.entries.iter().filter(|e| e.branch_id == branch_id),
            usize::MAX,
        )
    }

    /// Entries of one action type, newest first.
    pub fn by_action_type(&self, action_type: ActionType) -> Vec<ActionLogEntry> {
        Self::feed(
            self.entries.iter().filter(|e| e.action_type == action_type),
            usize::MAX,
        )
    }

    /// Entries with `start <= timestamp <= end`, newest first.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<ActionLogEntry> {
        Self::feed(
            self.entries
                .iter()
                .filter(|e| start <= e.timestamp && e.timestamp <= end),
            usize::MAX,
        )
    }

    pub fn get(&self, id: ActionLogId) -> Option<&ActionLogEntry> {
        // ids are 1-based positions
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.entries.get(index)
    }

    /// All entries in append (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn feed<'a>(
        entries: impl Iterator<Item = &'a ActionLogEntry>,
        limit: usize,
    ) -> Vec<ActionLogEntry> {
        let mut selected: Vec<&ActionLogEntry> = entries.collect();
        selected.sort_by_key(|e| Reverse((e.timestamp, e.id)));
        selected.into_iter().take(limit).cloned().collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
