//! Group trackers for the overwrite/accumulate protocol.
//!
//! Reporters in the same group share one tracker. The registry hands out
//! trackers by group name and is the only place they are created or dropped.

pub mod group;
pub mod registry;

pub use group::{GroupTracker, TrackerHandle, TrackerSnapshot};
pub use registry::{TrackerRegistry, DEFAULT_GROUP};
