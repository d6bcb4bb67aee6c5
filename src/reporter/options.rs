//! Per-reporter options.

use serde::{Deserialize, Serialize};

use crate::geometry::{DimensionKind, GrowMultiples};
use crate::tracker::DEFAULT_GROUP;

/// What a reporter measures and how it rounds.
///
/// Fixed once the reporter is created. All dimensions are off by default; a
/// reporter with nothing enabled still emits reports carrying only the
/// accumulate flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportOptions {
    /// Group whose tracker this reporter counts against. `None` or empty means
    /// [`DEFAULT_GROUP`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Report `width`.
    pub report_width: bool,
    /// Report `height`.
    pub report_height: bool,
    /// Report `top`.
    pub report_top: bool,
    /// Grow units. Presence alone switches rounding to floor/ceil.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow: Option<GrowMultiples>,
}

impl ReportOptions {
    /// Options reporting nothing, in the default group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reporting width, height and top.
    pub fn all() -> Self {
        Self::new().width().height().top()
    }

    /// Set the group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Enable `width`.
    pub fn width(mut self) -> Self {
        self.report_width = true;
        self
    }

    /// Enable `height`.
    pub fn height(mut self) -> Self {
        self.report_height = true;
        self
    }

    /// Enable `top`.
    pub fn top(mut self) -> Self {
        self.report_top = true;
        self
    }

    /// Set the grow mapping.
    pub fn grow(mut self, grow: GrowMultiples) -> Self {
        self.grow = Some(grow);
        self
    }

    /// The group name in effect.
    pub fn group_name(&self) -> &str {
        match self.group.as_deref() {
            Some(group) if !group.is_empty() => group,
            _ => DEFAULT_GROUP,
        }
    }

    /// Whether a dimension is enabled.
    pub fn reports(&self, kind: DimensionKind) -> bool {
        match kind {
            DimensionKind::Top => self.report_top,
            DimensionKind::Width => self.report_width,
            DimensionKind::Height => self.report_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReportOptions::new();
        assert_eq!(options.group_name(), "global");
        assert!(!options.reports(DimensionKind::Width));
        assert!(!options.reports(DimensionKind::Height));
        assert!(!options.reports(DimensionKind::Top));
        assert!(options.grow.is_none());
    }

    #[test]
    fn test_empty_group_uses_default() {
        assert_eq!(ReportOptions::new().group("").group_name(), "global");
        assert_eq!(ReportOptions::new().group("nav").group_name(), "nav");
    }

    #[test]
    fn test_builder() {
        let options = ReportOptions::all().grow(GrowMultiples::new().with_width(10.0));
        assert!(options.reports(DimensionKind::Width));
        assert!(options.reports(DimensionKind::Height));
        assert!(options.reports(DimensionKind::Top));
        assert_eq!(options.grow.unwrap().width, Some(10.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options: ReportOptions = toml::from_str(
            r#"
report_width = true

[grow]
width = 10.0
"#,
        )
        .unwrap();
        assert!(options.report_width);
        assert!(!options.report_top);
        assert_eq!(options.group_name(), "global");
        assert_eq!(options.grow, Some(GrowMultiples::new().with_width(10.0)));
    }
}
