//! Configuration loading for the size reporter.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.size-reporter/config.toml`)
//! 3. User config (`~/.size-reporter/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. Reporters run with sensible defaults when
//! no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FailOpen, ReporterError, Result};
use crate::geometry::{is_valid_unit, DimensionKind, GrowMultiples};
use crate::reporter::ReportOptions;
use crate::tracker::DEFAULT_GROUP;

/// Name of the per-project and per-user config directory.
pub const CONFIG_DIR_NAME: &str = ".size-reporter";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Defaults for reporters that do not set an option themselves.
    pub reporter: ReporterDefaults,
    /// Simulation settings for the `simulate` command.
    pub simulation: SimulationConfig,
}

/// Default reporter options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReporterDefaults {
    /// Group for reporters that name none.
    pub group: String,
    /// Report width by default.
    pub report_width: bool,
    /// Report height by default.
    pub report_height: bool,
    /// Report top by default.
    pub report_top: bool,
    /// Default grow mapping. Absent means round-to-nearest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow: Option<GrowMultiples>,
}

impl Default for ReporterDefaults {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.to_string(),
            report_width: false,
            report_height: false,
            report_top: false,
            grow: None,
        }
    }
}

impl ReporterDefaults {
    /// Build reporter options from these defaults.
    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            group: Some(self.group.clone()),
            report_width: self.report_width,
            report_height: self.report_height,
            report_top: self.report_top,
            grow: self.grow,
        }
    }

    fn set_grow(&mut self, kind: DimensionKind, unit: f64) {
        let grow = self.grow.unwrap_or_default();
        self.grow = Some(match kind {
            DimensionKind::Top => grow.with_top(unit),
            DimensionKind::Width => grow.with_width(unit),
            DimensionKind::Height => grow.with_height(unit),
        });
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Passes to run when the command line gives none.
    pub passes: u32,
}

/// Minimum valid passes value.
pub const MIN_PASSES: u32 = 1;

impl SimulationConfig {
    /// Check if a passes value is valid (must be >= 1).
    pub fn is_valid_passes(value: u32) -> bool {
        value >= MIN_PASSES
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { passes: 1 }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.size-reporter/config.toml` in cwd)
    /// 3. User config (`~/.size-reporter/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.size-reporter/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = config_home()?;
        Self::load_optional(&home.join("config.toml"))
    }

    /// Load project config from `.size-reporter/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_optional(&project_config_path(cwd))
    }

    /// Load a config file that may legitimately be absent.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        Self::load_from_file(path)
            .map(Some)
            .fail_open_default(&format!("loading {}", path.display()))
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| ReporterError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| ReporterError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // SIZE_REPORTER_GROUP
        if let Ok(val) = env::var("SIZE_REPORTER_GROUP") {
            if val.trim().is_empty() {
                tracing::warn!(
                    "Invalid SIZE_REPORTER_GROUP value '{}'. Must be non-empty. Using '{}'.",
                    val,
                    self.reporter.group
                );
            } else {
                self.reporter.group = val;
            }
        }

        // SIZE_REPORTER_GROW_TOP / _WIDTH / _HEIGHT
        for (var, kind) in [
            ("SIZE_REPORTER_GROW_TOP", DimensionKind::Top),
            ("SIZE_REPORTER_GROW_WIDTH", DimensionKind::Width),
            ("SIZE_REPORTER_GROW_HEIGHT", DimensionKind::Height),
        ] {
            if let Ok(val) = env::var(var) {
                match val.parse::<f64>() {
                    Ok(unit) if is_valid_unit(unit) => self.reporter.set_grow(kind, unit),
                    _ => tracing::warn!(
                        "Invalid {} value '{}'. Expected a positive number. Ignoring.",
                        var,
                        val
                    ),
                }
            }
        }

        // SIZE_REPORTER_PASSES
        if let Ok(val) = env::var("SIZE_REPORTER_PASSES") {
            match val.parse::<u32>() {
                Ok(n) if SimulationConfig::is_valid_passes(n) => self.simulation.passes = n,
                _ => tracing::warn!(
                    "Invalid SIZE_REPORTER_PASSES value '{}'. Must be >= {}. Using '{}'.",
                    val,
                    MIN_PASSES,
                    self.simulation.passes
                ),
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence field by field: every value in
    /// `other` that differs from the default replaces the value in `self`.
    ///
    /// # Limitation
    ///
    /// A layer cannot set a value back to its default to undo a lower layer,
    /// because "not set" and "set to default" are indistinguishable here.
    fn merge(mut self, other: Config) -> Self {
        let default_reporter = ReporterDefaults::default();
        if other.reporter.group != default_reporter.group {
            self.reporter.group = other.reporter.group;
        }
        if other.reporter.report_width != default_reporter.report_width {
            self.reporter.report_width = other.reporter.report_width;
        }
        if other.reporter.report_height != default_reporter.report_height {
            self.reporter.report_height = other.reporter.report_height;
        }
        if other.reporter.report_top != default_reporter.report_top {
            self.reporter.report_top = other.reporter.report_top;
        }
        if other.reporter.grow.is_some() {
            self.reporter.grow = other.reporter.grow;
        }

        let default_simulation = SimulationConfig::default();
        if other.simulation.passes != default_simulation.passes {
            self.simulation.passes = other.simulation.passes;
        }

        self
    }
}

/// Get the user config directory.
///
/// `SIZE_REPORTER_HOME` wins when set and non-empty; otherwise
/// `~/.size-reporter`. Returns `None` when neither is available.
pub fn config_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("SIZE_REPORTER_HOME") {
        if home.is_empty() {
            tracing::warn!("SIZE_REPORTER_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}

/// Path of the project config file for a working directory.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(CONFIG_DIR_NAME).join("config.toml")
}
