//! Simulate command.
//!
//! Creates every reporter a scenario declares against a fresh registry and a
//! static page, runs a number of passes in which each reporter reports once,
//! and shows the emitted reports, the receiver-side totals and the final
//! tracker counts.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cli::scenario::Scenario;
use crate::config::Config;
use crate::error::{ReporterError, Result};
use crate::reporter::{Report, SizeReporter, SizeTotal};
use crate::tracker::{TrackerRegistry, TrackerSnapshot};

/// Options for the simulate command.
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Passes to run; falls back to the scenario, then the config.
    pub passes: Option<u32>,
}

/// One report as emitted during the simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmittedReport {
    /// Pass number, starting at 1.
    pub pass: u32,
    /// Reporter index in declaration order, starting at 1.
    pub reporter: usize,
    /// Selector the reporter measures.
    pub selector: String,
    /// Group the reporter counts against.
    pub group: String,
    /// The report itself.
    pub report: Report,
}

/// Receiver-side total of a group after the last report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupTotal {
    /// Group name.
    pub group: String,
    /// Accumulated total.
    pub total: SizeTotal,
}

/// Output format for the simulate command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateOutput {
    /// Whether the simulation ran.
    pub success: bool,
    /// Passes run.
    pub passes: u32,
    /// Every emitted report, in emission order.
    pub reports: Vec<EmittedReport>,
    /// Final totals per group.
    pub totals: Vec<GroupTotal>,
    /// Final tracker counts per group.
    pub trackers: Vec<TrackerSnapshot>,
    /// Error message if the simulation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulateOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            passes: 0,
            reports: Vec::new(),
            totals: Vec::new(),
            trackers: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Simulation failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        if self.reports.is_empty() {
            return "No reporters declared.".to_string();
        }

        let mut lines = vec![format!(
            "Simulated {} pass(es), {} report(s):",
            self.passes,
            self.reports.len()
        )];
        lines.push(String::new());
        lines.push(format!(
            "{:<5} {:<4} {:<20} {:<12} {:>8} {:>8} {:>8}  {}",
            "PASS", "#", "SELECTOR", "GROUP", "WIDTH", "HEIGHT", "TOP", "MODE"
        ));
        lines.push("-".repeat(86));

        for emitted in &self.reports {
            let report = &emitted.report;
            lines.push(format!(
                "{:<5} {:<4} {:<20} {:<12} {:>8} {:>8} {:>8}  {}",
                emitted.pass,
                emitted.reporter,
                emitted.selector,
                emitted.group,
                format_dimension(report.width),
                format_dimension(report.height),
                format_dimension(report.top),
                if report.accumulate { "accumulate" } else { "overwrite" }
            ));
        }

        lines.push(String::new());
        lines.push("Totals:".to_string());
        for total in &self.totals {
            lines.push(format!(
                "  {:<12} width={} height={} top={} ({} contribution(s))",
                total.group,
                format_dimension(total.total.width),
                format_dimension(total.total.height),
                format_dimension(total.total.top),
                total.total.contributions
            ));
        }

        lines.push(String::new());
        lines.push("Trackers:".to_string());
        for tracker in &self.trackers {
            lines.push(format!(
                "  {:<12} reporters={} calls={} passes={}",
                tracker.group, tracker.reporter_count, tracker.call_count, tracker.passes_started
            ));
        }

        lines.join("\n")
    }
}

fn format_dimension(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// The simulate command implementation.
pub struct SimulateCommand {
    config: Config,
}

impl SimulateCommand {
    /// Create a new simulate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the simulation for a scenario.
    pub fn run(&self, scenario: &Scenario, options: &SimulateOptions) -> SimulateOutput {
        match self.simulate(scenario, options) {
            Ok(output) => output,
            Err(err) => SimulateOutput::failure(err.to_string()),
        }
    }

    fn simulate(&self, scenario: &Scenario, options: &SimulateOptions) -> Result<SimulateOutput> {
        let passes = options
            .passes
            .or(scenario.passes)
            .unwrap_or(self.config.simulation.passes);
        if passes == 0 {
            return Err(ReporterError::scenario("passes must be at least 1"));
        }

        let registry = TrackerRegistry::new();
        let geometry = Arc::new(scenario.geometry());
        let emitted: Rc<RefCell<Vec<(usize, Report)>>> = Rc::new(RefCell::new(Vec::new()));

        let mut reporters = Vec::with_capacity(scenario.reporters.len());
        for (index, decl) in scenario.reporters.iter().enumerate() {
            let sink = {
                let emitted = Rc::clone(&emitted);
                move |report: Report| emitted.borrow_mut().push((index, report))
            };
            let reporter = SizeReporter::new(
                &registry,
                &decl.selector,
                sink,
                decl.options(&self.config.reporter),
                Arc::clone(&geometry),
            )
            .map_err(|e| ReporterError::scenario(format!("reporter #{}: {}", index + 1, e)))?;
            reporters.push(reporter);
        }

        let mut reports = Vec::new();
        let mut totals: BTreeMap<String, SizeTotal> = BTreeMap::new();
        for pass in 1..=passes {
            for reporter in reporters.iter_mut() {
                reporter.report();
            }
            for (index, report) in emitted.borrow_mut().drain(..) {
                let reporter = &reporters[index];
                totals
                    .entry(reporter.group().to_string())
                    .or_default()
                    .apply(&report);
                reports.push(EmittedReport {
                    pass,
                    reporter: index + 1,
                    selector: reporter.selector().to_string(),
                    group: reporter.group().to_string(),
                    report,
                });
            }
        }

        tracing::debug!(
            reporters = reporters.len(),
            passes,
            reports = reports.len(),
            "simulation finished"
        );

        Ok(SimulateOutput {
            success: true,
            passes,
            reports,
            totals: totals
                .into_iter()
                .map(|(group, total)| GroupTotal { group, total })
                .collect(),
            trackers: registry.snapshot(),
            error: None,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SimulateOutput, options: &SimulateOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|e| {
                format!(r#"{{"success":false,"error":"serialization failed: {}"}}"#, e)
            })
        } else {
            output.format_text()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
page_y_offset = 200.0

[[elements]]
selector = ".mock"
top = 202.2
right = 600.0
bottom = 600.0
left = 202.2

[[reporters]]
selector = ".mock"
report_width = true
report_height = true
report_top = true
"#;

    const TWO_IN_GROUP: &str = r#"
[[elements]]
selector = ".a"
top = 0.0
right = 100.0
bottom = 30.0
left = 0.0

[[elements]]
selector = ".b"
top = 30.0
right = 100.0
bottom = 80.0
left = 0.0

[[reporters]]
selector = ".a"
group = "stack"
report_height = true

[[reporters]]
selector = ".b"
group = "stack"
report_height = true
"#;

    fn run(content: &str, options: SimulateOptions) -> SimulateOutput {
        let scenario = Scenario::parse(content).unwrap();
        SimulateCommand::new(Config::default()).run(&scenario, &options)
    }

    #[test]
    fn test_single_reporter() {
        let output = run(SCENARIO, SimulateOptions::default());
        assert!(output.success);
        assert_eq!(output.passes, 1);
        assert_eq!(output.reports.len(), 1);

        let report = output.reports[0].report;
        assert_eq!(report.width, Some(398.0));
        assert_eq!(report.height, Some(398.0));
        assert_eq!(report.top, Some(402.0));
        assert!(!report.accumulate);

        assert_eq!(output.trackers.len(), 1);
        assert_eq!(output.trackers[0].group, "global");
        assert_eq!(output.trackers[0].call_count, 1);
    }

    #[test]
    fn test_group_totals_reset_each_pass() {
        let output = run(
            TWO_IN_GROUP,
            SimulateOptions {
                passes: Some(3),
                ..Default::default()
            },
        );
        assert!(output.success);
        assert_eq!(output.reports.len(), 6);

        let flags: Vec<bool> = output.reports.iter().map(|r| r.report.accumulate).collect();
        assert_eq!(flags, vec![false, true, false, true, false, true]);
        assert_eq!(output.reports[5].pass, 3);

        assert_eq!(output.totals.len(), 1);
        assert_eq!(output.totals[0].total.height, Some(80.0));
        assert_eq!(output.totals[0].total.contributions, 2);

        let tracker = &output.trackers[0];
        assert_eq!(tracker.reporter_count, 2);
        assert_eq!(tracker.call_count, 6);
        assert_eq!(tracker.passes_started, 3);
    }

    #[test]
    fn test_passes_precedence() {
        let scenario = Scenario::parse(&format!("passes = 2\n{}", SCENARIO)).unwrap();
        let mut config = Config::default();
        config.simulation.passes = 5;
        let command = SimulateCommand::new(config);

        let from_scenario = command.run(&scenario, &SimulateOptions::default());
        assert_eq!(from_scenario.passes, 2);

        let from_cli = command.run(
            &scenario,
            &SimulateOptions {
                passes: Some(4),
                ..Default::default()
            },
        );
        assert_eq!(from_cli.passes, 4);
    }

    #[test]
    fn test_zero_passes_fails() {
        let output = run(
            SCENARIO,
            SimulateOptions {
                passes: Some(0),
                ..Default::default()
            },
        );
        assert!(!output.success);
        assert!(output.error.unwrap().contains("passes"));
    }

    #[test]
    fn test_empty_selector_fails_with_index() {
        let output = run(
            "[[reporters]]\nselector = \".a\"\n\n[[reporters]]\nselector = \"\"\n",
            SimulateOptions::default(),
        );
        assert!(!output.success);
        let error = output.error.unwrap();
        assert!(error.contains("reporter #2"));
        assert!(error.contains("InvalidArgument: selector"));
    }

    #[test]
    fn test_format_text() {
        let output = run(SCENARIO, SimulateOptions::default());
        let text = output.format_text();
        assert!(text.contains("Simulated 1 pass(es), 1 report(s):"));
        assert!(text.contains(".mock"));
        assert!(text.contains("overwrite"));
        assert!(text.contains("reporters=1 calls=1 passes=1"));
    }

    #[test]
    fn test_format_text_no_reporters() {
        let output = run("", SimulateOptions::default());
        assert!(output.success);
        assert_eq!(output.format_text(), "No reporters declared.");
    }

    #[test]
    fn test_format_output_json_and_quiet() {
        let command = SimulateCommand::new(Config::default());
        let output = run(SCENARIO, SimulateOptions::default());

        let json = command.format_output(
            &output,
            &SimulateOptions {
                json: true,
                ..Default::default()
            },
        );
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["reports"][0]["report"]["width"], 398.0);

        let quiet = command.format_output(
            &output,
            &SimulateOptions {
                quiet: true,
                ..Default::default()
            },
        );
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_failure_text() {
        let output = SimulateOutput::failure("boom");
        assert_eq!(output.format_text(), "Simulation failed: boom");
    }
}
