//! Group tracker registry.
//!
//! Maps group names to their trackers. Each application wires one registry
//! and passes it to every `create_reporter` call; tests build their own so
//! that counts never leak between cases. [`TrackerRegistry::global`] exists
//! for the outermost wiring layer only.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use super::{TrackerHandle, TrackerSnapshot};

/// Group used when a reporter names none.
pub const DEFAULT_GROUP: &str = "global";

/// Registry of group trackers.
///
/// Thread-safe implementation using `RwLock<HashMap>`. Trackers are created
/// lazily and only ever removed all at once by [`TrackerRegistry::reset`].
#[derive(Debug, Default)]
pub struct TrackerRegistry {
    trackers: RwLock<HashMap<String, TrackerHandle>>,
}

impl TrackerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    ///
    /// Reach for this only where the application is assembled. Library code
    /// and tests should take a `&TrackerRegistry` instead.
    pub fn global() -> &'static TrackerRegistry {
        static GLOBAL: OnceLock<TrackerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TrackerRegistry::new)
    }

    /// Return the tracker for `group`, creating a zeroed one if absent.
    pub fn get_or_create(&self, group: &str) -> TrackerHandle {
        if let Some(handle) = self
            .trackers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(group)
        {
            return handle.clone();
        }

        let mut trackers = self.trackers.write().unwrap_or_else(|e| e.into_inner());
        trackers
            .entry(group.to_string())
            .or_insert_with(|| {
                tracing::debug!(group, "creating group tracker");
                TrackerHandle::new(group)
            })
            .clone()
    }

    /// Count a new reporter against `group` and return its tracker.
    ///
    /// Called once per reporter, at creation.
    pub fn register_reporter(&self, group: &str) -> TrackerHandle {
        let handle = self.get_or_create(group);
        let reporters = handle.add_reporter();
        tracing::debug!(group, reporters, "registered size reporter");
        handle
    }

    /// Look up a tracker without creating it.
    pub fn get(&self, group: &str) -> Option<TrackerHandle> {
        self.trackers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(group)
            .cloned()
    }

    /// Check if a group has a tracker.
    pub fn contains(&self, group: &str) -> bool {
        self.get(group).is_some()
    }

    /// Number of groups with a tracker.
    pub fn len(&self) -> usize {
        self.trackers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if no group has a tracker.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counts of every group, sorted by group name.
    pub fn snapshot(&self) -> Vec<TrackerSnapshot> {
        let mut snapshots: Vec<TrackerSnapshot> = self
            .trackers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(TrackerHandle::snapshot)
            .collect();
        snapshots.sort_by(|a, b| a.group.cmp(&b.group));
        snapshots
    }

    /// **Administrative.** Remove every tracker.
    ///
    /// For test setup and hot reload only. Reporters created before the reset
    /// keep their old tracker; reporters created after it start a new one
    /// from zero, so a group mixing both no longer shares pass boundaries.
    pub fn reset(&self) {
        let mut trackers = self.trackers.write().unwrap_or_else(|e| e.into_inner());
        tracing::warn!(groups = trackers.len(), "resetting group tracker registry");
        trackers.clear();
    }
}
