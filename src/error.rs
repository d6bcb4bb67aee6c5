//! Error types for the size reporter.
//!
//! Only reporter creation can fail at runtime. Once a `SizeReporter` exists,
//! every invocation completes: a missing element degrades to a zero rectangle
//! and the rounding transform never divides by zero. The remaining variants
//! cover the configuration and scenario files read by the CLI.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for size reporter operations.
#[derive(Error, Debug)]
pub enum ReporterError {
    /// A creation precondition was violated (empty selector, missing sink).
    #[error("InvalidArgument: {argument}: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },

    /// I/O errors while reading config or scenario files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Simulation scenario errors (duplicate element, zero passes, rejected reporter).
    #[error("scenario error: {message}")]
    Scenario { message: String },
}

/// A specialized Result type for size reporter operations.
pub type Result<T> = std::result::Result<T, ReporterError>;

impl ReporterError {
    /// Create an invalid argument error for the named argument.
    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    /// Create the error raised for an empty or missing selector.
    pub fn invalid_selector() -> Self {
        Self::invalid_argument("selector", "invalid selector supplied to create_reporter")
    }

    /// Create the error raised for a missing report sink.
    pub fn invalid_reporter() -> Self {
        Self::invalid_argument(
            "reporter",
            "invalid reporter function supplied to create_reporter",
        )
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a scenario error.
    pub fn scenario(message: impl Into<String>) -> Self {
        Self::Scenario {
            message: message.into(),
        }
    }

    /// Whether this error came from a creation precondition.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// The argument name for `InvalidArgument` errors.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { argument, .. } => Some(*argument),
            _ => None,
        }
    }
}

impl From<io::Error> for ReporterError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ReporterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ReporterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Extension trait for fail-open error handling.
///
/// Configuration is optional: a broken file must never stop reporting, so
/// callers log a warning and fall back to defaults.
pub trait FailOpen<T> {
    /// Convert an error to a default value, logging a warning.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the size-reporter CLI.
pub mod exit_codes {
    /// The command completed successfully.
    pub const SUCCESS: i32 = 0;

    /// The command failed (bad scenario, invalid reporter declaration).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
