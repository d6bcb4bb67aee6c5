//! Report values and the receiving-side accumulator.

use serde::{Deserialize, Serialize};

/// One measurement emitted by a size reporter.
///
/// Dimensions the reporter was not asked for are `None`, which is distinct
/// from a measured `0.0`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Report {
    /// Rounded width, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Rounded height, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rounded page-absolute top, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// True when the receiver should add this report to its running total,
    /// false when it should start a new total.
    pub accumulate: bool,
}

/// Running per-group total on the receiving end.
///
/// Applies the accumulate protocol: a report with `accumulate == false`
/// replaces the total, any other report is added to it dimension by
/// dimension.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SizeTotal {
    /// Summed width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Summed height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Summed top.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Reports folded into the current total.
    pub contributions: u32,
}

impl SizeTotal {
    /// An empty total.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a report into the total.
    pub fn apply(&mut self, report: &Report) {
        if !report.accumulate {
            *self = Self {
                width: report.width,
                height: report.height,
                top: report.top,
                contributions: 1,
            };
            return;
        }

        self.width = add(self.width, report.width);
        self.height = add(self.height, report.height);
        self.top = add(self.top, report.top);
        self.contributions += 1;
    }
}

fn add(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(total), Some(value)) => Some(total + value),
        (total, None) => total,
        (None, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_dimensions_are_omitted() {
        let report = Report {
            width: Some(0.0),
            accumulate: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"width":0.0,"accumulate":false}"#);
    }

    #[test]
    fn test_total_overwrites_then_accumulates() {
        let mut total = SizeTotal::new();
        total.apply(&Report {
            height: Some(100.0),
            accumulate: false,
            ..Default::default()
        });
        total.apply(&Report {
            height: Some(40.0),
            accumulate: true,
            ..Default::default()
        });
        assert_eq!(total.height, Some(140.0));
        assert_eq!(total.contributions, 2);

        // New pass resets the total.
        total.apply(&Report {
            height: Some(90.0),
            accumulate: false,
            ..Default::default()
        });
        assert_eq!(total.height, Some(90.0));
        assert_eq!(total.contributions, 1);
    }

    #[test]
    fn test_total_mixed_dimensions() {
        let mut total = SizeTotal::new();
        total.apply(&Report {
            width: Some(10.0),
            accumulate: false,
            ..Default::default()
        });
        total.apply(&Report {
            height: Some(5.0),
            accumulate: true,
            ..Default::default()
        });
        assert_eq!(total.width, Some(10.0));
        assert_eq!(total.height, Some(5.0));
        assert_eq!(total.top, None);
    }
}
