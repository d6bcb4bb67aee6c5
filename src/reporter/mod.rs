//! Size reporters.
//!
//! A reporter is bound to one selector, one sink and one set of options when
//! it is created, and registers itself with its group's tracker. Each
//! invocation measures, rounds, tags the report with the group's accumulate
//! flag and emits it.

pub mod options;
pub mod report;
pub mod size_reporter;

pub use options::ReportOptions;
pub use report::{Report, SizeTotal};
pub use size_reporter::{create_reporter, reset_registry, ReportSink, SizeReporter};
