//! Size Reporter - grouped element size reporting
//!
//! A size reporter measures one element (width, height and page-relative
//! top), rounds the values to optional grow multiples and hands them to a
//! callback. Reporters that share a group also share a tracker, which tells
//! each report whether it opens a new pass (overwrite) or continues one
//! (accumulate), so a receiver can sum a group's sizes without double
//! counting across resizes.

pub mod binding;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod reporter;
pub mod tracker;

pub use binding::{attach, Debounce, HostBinding, ManualBinding, TimerHost};
#[cfg(feature = "web")]
pub use binding::WindowBinding;
pub use config::Config;
pub use error::{FailOpen, ReporterError, Result};
#[cfg(feature = "web")]
pub use geometry::DomGeometry;
pub use geometry::{
    is_valid_unit, round, ClientRect, DimensionKind, GeometrySource, GrowMultiples, RoundOp,
    StaticGeometry,
};
pub use reporter::{
    create_reporter, reset_registry, Report, ReportOptions, ReportSink, SizeReporter, SizeTotal,
};
pub use tracker::{GroupTracker, TrackerHandle, TrackerRegistry, TrackerSnapshot, DEFAULT_GROUP};

// CLI commands
pub use cli::{RoundCommand, SimulateCommand};
