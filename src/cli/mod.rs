//! CLI commands for the size reporter.
//!
//! - **simulate**: run a scenario's reporters over a static page
//! - **round**: evaluate the rounding/grow transform for one value

pub mod round;
pub mod scenario;
pub mod simulate;

pub use round::{RoundCommand, RoundOptions, RoundOutput};
pub use scenario::{ElementDecl, ReporterDecl, Scenario};
pub use simulate::{SimulateCommand, SimulateOptions, SimulateOutput};
