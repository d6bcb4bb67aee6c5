//! Size Reporter - grouped element size reporting
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use size_reporter::cli::round::{RoundCommand, RoundOptions};
use size_reporter::cli::scenario::Scenario;
use size_reporter::cli::simulate::{SimulateCommand, SimulateOptions};
use size_reporter::config::{config_home, Config};
use size_reporter::error::exit_codes;
use size_reporter::geometry::DimensionKind;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "SIZE_REPORTER_LOG";

// =============================================================================
// CLI Definition
// =============================================================================

/// Size Reporter - grouped element size reporting
#[derive(Parser)]
#[command(name = "size-reporter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario's reporters over a static page
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,
        /// Number of passes; overrides the scenario and config
        #[arg(long, short)]
        passes: Option<u32>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Round a single value with the grow rules
    Round {
        /// Value to round
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Dimension the value belongs to
        #[arg(long, short, value_enum)]
        kind: Option<KindArg>,
        /// Grow unit for the dimension (implies --rules)
        #[arg(long, short)]
        grow: Option<f64>,
        /// Apply directional rounding even without a grow unit
        #[arg(long)]
        rules: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

/// Dimension argument for `round`.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Top,
    Width,
    Height,
}

impl From<KindArg> for DimensionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Top => DimensionKind::Top,
            KindArg::Width => DimensionKind::Width,
            KindArg::Height => DimensionKind::Height,
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    setup_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("size-reporter error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to `crash.log` in the config home and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("size-reporter panic: {}", info);

        if let Some(home) = config_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Install the stderr log subscriber, filtered by `SIZE_REPORTER_LOG`.
fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            scenario,
            passes,
            json,
            quiet,
        } => run_simulate(&scenario, passes, json, quiet),
        Commands::Round {
            value,
            kind,
            grow,
            rules,
            json,
            quiet,
        } => Ok(run_round(
            value,
            RoundOptions {
                json,
                quiet,
                kind: kind.map(DimensionKind::from),
                grow,
                rules,
            },
        )),
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn run_simulate(
    path: &Path,
    passes: Option<u32>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let options = SimulateOptions {
        json,
        quiet,
        passes,
    };
    let cmd = SimulateCommand::new(Config::load());

    let output = match Scenario::load(path) {
        Ok(scenario) => cmd.run(&scenario, &options),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not load scenario");
            size_reporter::cli::SimulateOutput::failure(e.to_string())
        }
    };

    let formatted = cmd.format_output(&output, &options);
    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_round(value: f64, options: RoundOptions) -> ExitCode {
    let cmd = RoundCommand::new();
    let output = cmd.run(value, &options);

    let formatted = cmd.format_output(&output, &options);
    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    success_to_exit_code(true)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 1);
        assert_eq!(exit_codes::CRASH, 3);
    }

    #[test]
    fn test_success_to_exit_code() {
        assert_eq!(
            success_to_exit_code(true),
            ExitCode::from(exit_codes::SUCCESS as u8)
        );
        assert_eq!(
            success_to_exit_code(false),
            ExitCode::from(exit_codes::ERROR as u8)
        );
    }

    #[test]
    fn test_kind_conversion() {
        assert_eq!(DimensionKind::from(KindArg::Top), DimensionKind::Top);
        assert_eq!(DimensionKind::from(KindArg::Width), DimensionKind::Width);
        assert_eq!(DimensionKind::from(KindArg::Height), DimensionKind::Height);
    }

    #[test]
    fn test_cli_parse_simulate() {
        let cli = Cli::parse_from([
            "size-reporter",
            "simulate",
            "page.toml",
            "--passes",
            "3",
            "--json",
        ]);
        match cli.command {
            Commands::Simulate {
                scenario,
                passes,
                json,
                quiet,
            } => {
                assert_eq!(scenario, PathBuf::from("page.toml"));
                assert_eq!(passes, Some(3));
                assert!(json);
                assert!(!quiet);
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_parse_round() {
        let cli = Cli::parse_from([
            "size-reporter",
            "round",
            "397.8",
            "--kind",
            "width",
            "--grow",
            "10",
        ]);
        match cli.command {
            Commands::Round {
                value,
                kind,
                grow,
                rules,
                ..
            } => {
                assert_eq!(value, 397.8);
                assert!(matches!(kind, Some(KindArg::Width)));
                assert_eq!(grow, Some(10.0));
                assert!(!rules);
            }
            _ => panic!("Expected Round command"),
        }
    }

    #[test]
    fn test_cli_parse_round_negative_value() {
        let cli = Cli::parse_from(["size-reporter", "round", "-2.5", "--rules"]);
        match cli.command {
            Commands::Round { value, rules, .. } => {
                assert_eq!(value, -2.5);
                assert!(rules);
            }
            _ => panic!("Expected Round command"),
        }
    }
}
