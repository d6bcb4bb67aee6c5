//! Rounding and grow transform for reported dimensions.
//!
//! Raw client-rect values are fractional and jitter between layouts. Each
//! reported dimension is quantized to a unit before it leaves the reporter:
//!
//! - No grow mapping: round to the nearest integer, whatever the dimension.
//! - Grow mapping present (even an empty one): `top` is floored, `width` and
//!   `height` are ceiled, each to the mapping's unit for that dimension
//!   (unit 1 when the entry is missing). Without a dimension the value is
//!   rounded to the nearest integer.
//!
//! Growing `width` to the next multiple of 10 therefore inflates the box for
//! layout snapping, while flooring `top` never moves it past its raw edge.

use serde::{Deserialize, Serialize};

/// The dimension a value belongs to. Selects the rounding direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    /// Page-absolute top edge. Rounded toward negative infinity.
    Top,
    /// Element width. Rounded toward positive infinity.
    Width,
    /// Element height. Rounded toward positive infinity.
    Height,
}

impl DimensionKind {
    /// Lowercase name as used in config files and CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionKind::Top => "top",
            DimensionKind::Width => "width",
            DimensionKind::Height => "height",
        }
    }
}

impl std::fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional grow units keyed by dimension.
///
/// A unit of 10 for `width` reports widths as the next multiple of 10.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowMultiples {
    /// Unit for the `top` dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Unit for the `width` dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Unit for the `height` dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl GrowMultiples {
    /// An empty mapping. Switches rounding to floor/ceil with unit 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `top` unit.
    pub fn with_top(mut self, unit: f64) -> Self {
        self.top = Some(unit);
        self
    }

    /// Set the `width` unit.
    pub fn with_width(mut self, unit: f64) -> Self {
        self.width = Some(unit);
        self
    }

    /// Set the `height` unit.
    pub fn with_height(mut self, unit: f64) -> Self {
        self.height = Some(unit);
        self
    }

    /// The configured entry for a dimension, as written.
    pub fn get(&self, kind: DimensionKind) -> Option<f64> {
        match kind {
            DimensionKind::Top => self.top,
            DimensionKind::Width => self.width,
            DimensionKind::Height => self.height,
        }
    }

    /// The unit to quantize `kind` to.
    ///
    /// Missing, zero, negative and non-finite entries all yield 1.0 so the
    /// transform never divides by zero.
    pub fn unit_for(&self, kind: DimensionKind) -> f64 {
        match self.get(kind) {
            Some(unit) if is_valid_unit(unit) => unit,
            _ => 1.0,
        }
    }

    /// Whether no dimension has an entry.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Check if a grow unit is usable (finite and strictly positive).
pub fn is_valid_unit(unit: f64) -> bool {
    unit.is_finite() && unit > 0.0
}

/// Rounding direction applied to `value / unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOp {
    /// Toward negative infinity.
    Floor,
    /// Toward positive infinity.
    Ceil,
    /// To the nearest integer, halves away from zero.
    Nearest,
}

impl RoundOp {
    /// Pick the rounding direction for a dimension and grow mapping.
    pub fn select(kind: Option<DimensionKind>, grow: Option<&GrowMultiples>) -> Self {
        if grow.is_none() {
            return RoundOp::Nearest;
        }
        match kind {
            Some(DimensionKind::Top) => RoundOp::Floor,
            Some(DimensionKind::Width) | Some(DimensionKind::Height) => RoundOp::Ceil,
            None => RoundOp::Nearest,
        }
    }

    /// Apply the operation to a value.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundOp::Floor => value.floor(),
            RoundOp::Ceil => value.ceil(),
            RoundOp::Nearest => value.round(),
        }
    }
}

/// Quantize `value` according to its dimension and the grow mapping.
///
/// Computes `op(value / unit) * unit` with `op` from [`RoundOp::select`] and
/// `unit` from [`GrowMultiples::unit_for`] (1.0 without a mapping or a kind).
pub fn round(value: f64, kind: Option<DimensionKind>, grow: Option<&GrowMultiples>) -> f64 {
    let op = RoundOp::select(kind, grow);
    let unit = match (kind, grow) {
        (Some(kind), Some(grow)) => grow.unit_for(kind),
        _ => 1.0,
    };
    op.apply(value / unit) * unit
}
