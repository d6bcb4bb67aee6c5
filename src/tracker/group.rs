//! Per-group tracker records.
//!
//! A tracker counts the reporters created for a group and the reports they
//! have emitted. Together the two counts locate each report within a pass:
//! when `call_count % reporter_count == 0` the report opens a new pass and the
//! receiver should overwrite its total; otherwise it contributes to the
//! running total.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counts for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTracker {
    /// Reporters ever created for this group. Only grows.
    pub reporter_count: u64,
    /// Completed reports across every reporter in this group. Only grows.
    pub call_count: u64,
    /// When the tracker was first created.
    pub created_at: DateTime<Utc>,
}

impl GroupTracker {
    /// Create a fresh tracker with both counts at zero.
    pub fn new() -> Self {
        Self {
            reporter_count: 0,
            call_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Whether the next report adds to the running total.
    ///
    /// False for the first report of each pass. A tracker with no reporters
    /// never accumulates. Pass boundaries are derived from the counts alone,
    /// so a reporter added while a pass is under way shifts them.
    pub fn accumulate(&self) -> bool {
        self.call_count
            .checked_rem(self.reporter_count)
            .is_some_and(|position| position != 0)
    }

    /// Number of passes that have started.
    pub fn passes_started(&self) -> u64 {
        if self.reporter_count == 0 {
            return 0;
        }
        self.call_count.div_ceil(self.reporter_count)
    }
}

impl Default for GroupTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared reference to one group's tracker.
///
/// Every reporter in a group holds a clone. The counts sit behind one mutex;
/// a second, group-wide invocation lock serializes whole report cycles
/// (read flag, emit, count) so reporters may be driven from several threads.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    group: Arc<str>,
    inner: Arc<Mutex<GroupTracker>>,
    invocation: Arc<Mutex<()>>,
}

impl TrackerHandle {
    pub(crate) fn new(group: &str) -> Self {
        Self {
            group: Arc::from(group),
            inner: Arc::new(Mutex::new(GroupTracker::new())),
            invocation: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GroupTracker> {
        // Counters stay consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Hold the group's invocation lock for one report cycle.
    ///
    /// The counts stay readable while the guard is held. Reporting for the
    /// same group from inside a sink deadlocks.
    pub(crate) fn begin_call(&self) -> MutexGuard<'_, ()> {
        self.invocation.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The group this tracker belongs to.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Current reporter count.
    pub fn reporter_count(&self) -> u64 {
        self.lock().reporter_count
    }

    /// Current call count.
    pub fn call_count(&self) -> u64 {
        self.lock().call_count
    }

    /// Accumulate flag for the next report, from the current counts.
    pub fn accumulate(&self) -> bool {
        self.lock().accumulate()
    }

    /// Count one more reporter. Returns the new reporter count.
    pub(crate) fn add_reporter(&self) -> u64 {
        let mut tracker = self.lock();
        tracker.reporter_count += 1;
        tracker.reporter_count
    }

    /// Count one completed report. Returns the new call count.
    pub(crate) fn complete_call(&self) -> u64 {
        let mut tracker = self.lock();
        tracker.call_count += 1;
        tracker.call_count
    }

    /// Copy of the current counts.
    pub fn get(&self) -> GroupTracker {
        self.lock().clone()
    }

    /// Serializable view of the current counts.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let tracker = self.get();
        TrackerSnapshot {
            group: self.group.to_string(),
            reporter_count: tracker.reporter_count,
            call_count: tracker.call_count,
            passes_started: tracker.passes_started(),
            next_accumulate: tracker.accumulate(),
            created_at: tracker.created_at,
        }
    }

    /// Whether two handles refer to the same tracker record.
    pub fn same_tracker(&self, other: &TrackerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Point-in-time view of a group tracker, for inspection and CLI output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerSnapshot {
    /// Group name.
    pub group: String,
    /// Reporters created for the group.
    pub reporter_count: u64,
    /// Reports emitted by the group.
    pub call_count: u64,
    /// Passes that have started.
    pub passes_started: u64,
    /// Accumulate flag the next report would carry.
    pub next_accumulate: bool,
    /// When the tracker was created.
    pub created_at: DateTime<Utc>,
}
