//! Simulation scenarios.
//!
//! A scenario describes a static page (scroll offset, client-top offset and
//! element rects) and the reporters to create against it, in TOML:
//!
//! ```toml
//! page_y_offset = 200.0
//!
//! [[elements]]
//! selector = ".mock"
//! top = 202.2
//! right = 600.0
//! bottom = 600.0
//! left = 202.2
//!
//! [[reporters]]
//! selector = ".mock"
//! report_width = true
//! grow = { width = 10.0 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ReporterDefaults;
use crate::error::{ReporterError, Result};
use crate::geometry::{ClientRect, GrowMultiples, StaticGeometry};
use crate::reporter::ReportOptions;

/// A complete simulation scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scenario {
    /// Page scroll offset.
    pub page_y_offset: f64,
    /// Document client-top offset.
    pub client_top: f64,
    /// Passes to run. Overrides the config, overridden by the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passes: Option<u32>,
    /// Elements present on the page.
    pub elements: Vec<ElementDecl>,
    /// Reporters to create, in invocation order.
    pub reporters: Vec<ReporterDecl>,
}

/// One element on the simulated page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementDecl {
    /// Selector the element answers to.
    pub selector: String,
    /// Viewport-relative top edge.
    pub top: f64,
    /// Viewport-relative right edge.
    pub right: f64,
    /// Viewport-relative bottom edge.
    pub bottom: f64,
    /// Viewport-relative left edge.
    pub left: f64,
}

impl ElementDecl {
    /// The element's client rect.
    pub fn rect(&self) -> ClientRect {
        ClientRect::new(self.top, self.right, self.bottom, self.left)
    }
}

/// One reporter declaration. Unset fields fall back to the configured
/// reporter defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReporterDecl {
    /// Selector to measure. May name an element that does not exist.
    pub selector: String,
    /// Group override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Width flag override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_width: Option<bool>,
    /// Height flag override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_height: Option<bool>,
    /// Top flag override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_top: Option<bool>,
    /// Grow mapping override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow: Option<GrowMultiples>,
}

impl ReporterDecl {
    /// Resolve this declaration against the configured defaults.
    pub fn options(&self, defaults: &ReporterDefaults) -> ReportOptions {
        let base = defaults.options();
        ReportOptions {
            group: self.group.clone().or(base.group),
            report_width: self.report_width.unwrap_or(base.report_width),
            report_height: self.report_height.unwrap_or(base.report_height),
            report_top: self.report_top.unwrap_or(base.report_top),
            grow: self.grow.or(base.grow),
        }
    }
}

impl Scenario {
    /// Load a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read and a serde error
    /// if it is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ReporterError::storage(path, e))?;
        Self::parse(&content)
    }

    /// Parse a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a serde error for invalid TOML or a scenario error for a
    /// duplicate element selector.
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        for (index, element) in self.elements.iter().enumerate() {
            if self.elements[..index]
                .iter()
                .any(|other| other.selector == element.selector)
            {
                return Err(ReporterError::scenario(format!(
                    "element #{} repeats selector '{}'",
                    index + 1,
                    element.selector
                )));
            }
        }
        Ok(())
    }

    /// Build the in-memory page this scenario describes.
    pub fn geometry(&self) -> StaticGeometry {
        let geometry = StaticGeometry::new()
            .with_page_y_offset(self.page_y_offset)
            .with_client_top(self.client_top);
        for element in &self.elements {
            geometry.insert(element.selector.clone(), element.rect());
        }
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometrySource;
    use tempfile::TempDir;

    const SCENARIO: &str = r#"
page_y_offset = 200.0
passes = 2

[[elements]]
selector = ".mock"
top = 202.2
right = 600.0
bottom = 600.0
left = 202.2

[[reporters]]
selector = ".mock"
report_width = true
grow = { width = 10.0 }

[[reporters]]
selector = ".nothing"
group = "other"
"#;

    #[test]
    fn test_parse() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        assert_eq!(scenario.page_y_offset, 200.0);
        assert_eq!(scenario.client_top, 0.0);
        assert_eq!(scenario.passes, Some(2));
        assert_eq!(scenario.elements.len(), 1);
        assert_eq!(scenario.reporters.len(), 2);
        assert_eq!(scenario.reporters[1].group.as_deref(), Some("other"));
    }

    #[test]
    fn test_geometry() {
        let geometry = Scenario::parse(SCENARIO).unwrap().geometry();
        assert_eq!(geometry.page_y_offset(), 200.0);
        let rect = geometry.bounding_rect(".mock").unwrap();
        assert_eq!(rect.right, 600.0);
        assert!(geometry.bounding_rect(".nothing").is_none());
    }

    #[test]
    fn test_reporter_decl_falls_back_to_defaults() {
        let defaults = ReporterDefaults {
            group: "cards".to_string(),
            report_top: true,
            grow: Some(GrowMultiples::new().with_top(5.0)),
            ..Default::default()
        };
        let scenario = Scenario::parse(SCENARIO).unwrap();

        let first = scenario.reporters[0].options(&defaults);
        assert_eq!(first.group_name(), "cards");
        assert!(first.report_width);
        assert!(first.report_top);
        assert_eq!(first.grow, Some(GrowMultiples::new().with_width(10.0)));

        let second = scenario.reporters[1].options(&defaults);
        assert_eq!(second.group_name(), "other");
        assert!(!second.report_width);
        assert_eq!(second.grow, Some(GrowMultiples::new().with_top(5.0)));
    }

    #[test]
    fn test_duplicate_selector_rejected() {
        let content = r#"
[[elements]]
selector = ".a"

[[elements]]
selector = ".a"
"#;
        let err = Scenario::parse(content).unwrap_err();
        assert!(matches!(err, ReporterError::Scenario { .. }));
        assert!(err.to_string().contains("element #2"));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = Scenario::parse("elements = 3").unwrap_err();
        assert!(matches!(err, ReporterError::Serde { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenario.toml");
        fs::write(&path, SCENARIO).unwrap();

        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.reporters.len(), 2);

        let missing = Scenario::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ReporterError::Storage { .. })));
    }
}
