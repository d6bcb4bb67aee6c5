//! Round command.
//!
//! Evaluates the rounding/grow transform for a single value, showing which
//! operation and unit were chosen.

use serde::{Deserialize, Serialize};

use crate::geometry::{round, DimensionKind, GrowMultiples, RoundOp};

/// Options for the round command.
#[derive(Debug, Clone, Default)]
pub struct RoundOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Dimension the value belongs to.
    pub kind: Option<DimensionKind>,
    /// Grow unit for `kind`. Implies a grow mapping.
    pub grow: Option<f64>,
    /// Supply an (empty) grow mapping even without `grow`.
    pub rules: bool,
}

impl RoundOptions {
    /// The grow mapping these options describe, if any.
    pub fn grow_multiples(&self) -> Option<GrowMultiples> {
        if self.grow.is_none() && !self.rules {
            return None;
        }
        let mapping = GrowMultiples::new();
        Some(match (self.kind, self.grow) {
            (Some(DimensionKind::Top), Some(unit)) => mapping.with_top(unit),
            (Some(DimensionKind::Width), Some(unit)) => mapping.with_width(unit),
            (Some(DimensionKind::Height), Some(unit)) => mapping.with_height(unit),
            _ => mapping,
        })
    }
}

/// Output format for the round command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundOutput {
    /// The raw value.
    pub value: f64,
    /// The rounded value.
    pub result: f64,
    /// Operation applied: `floor`, `ceil` or `nearest`.
    pub op: String,
    /// Unit the value was quantized to.
    pub unit: f64,
    /// Dimension, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DimensionKind>,
}

impl RoundOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        let kind = self.kind.map_or("-", |kind| kind.as_str());
        format!(
            "{} -> {} ({} to multiple of {}, kind {})",
            self.value, self.result, self.op, self.unit, kind
        )
    }
}

/// The round command implementation.
#[derive(Debug, Default)]
pub struct RoundCommand;

impl RoundCommand {
    /// Create a new round command.
    pub fn new() -> Self {
        Self
    }

    /// Run the transform for one value.
    pub fn run(&self, value: f64, options: &RoundOptions) -> RoundOutput {
        let grow = options.grow_multiples();
        let op = RoundOp::select(options.kind, grow.as_ref());
        let unit = match (options.kind, grow.as_ref()) {
            (Some(kind), Some(grow)) => grow.unit_for(kind),
            _ => 1.0,
        };

        RoundOutput {
            value,
            result: round(value, options.kind, grow.as_ref()),
            op: match op {
                RoundOp::Floor => "floor",
                RoundOp::Ceil => "ceil",
                RoundOp::Nearest => "nearest",
            }
            .to_string(),
            unit,
            kind: options.kind,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RoundOutput, options: &RoundOptions) -> String {
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

    fn run(value: f64, options: RoundOptions) -> RoundOutput {
        RoundCommand::new().run(value, &options)
    }

    #[test]
    fn test_plain_value_rounds_to_nearest() {
        let output = run(397.8, RoundOptions::default());
        assert_eq!(output.result, 398.0);
        assert_eq!(output.op, "nearest");
        assert_eq!(output.unit, 1.0);
    }

    #[test]
    fn test_kind_without_rules_rounds_to_nearest() {
        let output = run(
            402.2,
            RoundOptions {
                kind: Some(DimensionKind::Width),
                ..Default::default()
            },
        );
        assert_eq!(output.result, 402.0);
        assert_eq!(output.op, "nearest");
    }

    #[test]
    fn test_grow_width() {
        let output = run(
            397.8,
            RoundOptions {
                kind: Some(DimensionKind::Width),
                grow: Some(10.0),
                ..Default::default()
            },
        );
        assert_eq!(output.result, 400.0);
        assert_eq!(output.op, "ceil");
        assert_eq!(output.unit, 10.0);
    }

    #[test]
    fn test_rules_without_grow_is_directional() {
        let output = run(
            402.8,
            RoundOptions {
                kind: Some(DimensionKind::Top),
                rules: true,
                ..Default::default()
            },
        );
        assert_eq!(output.result, 402.0);
        assert_eq!(output.op, "floor");
    }

    #[test]
    fn test_grow_multiples() {
        assert_eq!(RoundOptions::default().grow_multiples(), None);
        let options = RoundOptions {
            kind: Some(DimensionKind::Height),
            grow: Some(4.0),
            ..Default::default()
        };
        assert_eq!(
            options.grow_multiples(),
            Some(GrowMultiples::new().with_height(4.0))
        );
    }

    #[test]
    fn test_format_text() {
        let output = run(
            397.8,
            RoundOptions {
                kind: Some(DimensionKind::Width),
                grow: Some(10.0),
                ..Default::default()
            },
        );
        assert_eq!(
            output.format_text(),
            "397.8 -> 400 (ceil to multiple of 10, kind width)"
        );
    }

    #[test]
    fn test_format_output_json() {
        let options = RoundOptions {
            json: true,
            ..Default::default()
        };
        let command = RoundCommand::new();
        let output = command.run(2.5, &options);
        let parsed: RoundOutput =
            serde_json::from_str(&command.format_output(&output, &options)).unwrap();
        assert_eq!(parsed.result, 3.0);
        assert_eq!(parsed.kind, None);
    }
}
