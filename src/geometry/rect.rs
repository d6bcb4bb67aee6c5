//! Viewport-relative element rectangles.

use serde::{Deserialize, Serialize};

/// Bounding rectangle of an element, in viewport-relative CSS pixels.
///
/// Mirrors the `top`/`right`/`bottom`/`left` edges of a DOM client rect.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientRect {
    /// Distance from the viewport top to the element's top edge.
    pub top: f64,
    /// Distance from the viewport left to the element's right edge.
    pub right: f64,
    /// Distance from the viewport top to the element's bottom edge.
    pub bottom: f64,
    /// Distance from the viewport left to the element's left edge.
    pub left: f64,
}

impl ClientRect {
    /// Zero-sized rectangle at the origin, used when no element matches.
    pub const ZERO: ClientRect = ClientRect {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Create a rectangle from its four edges.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Horizontal extent (`right - left`).
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent (`bottom - top`).
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}
