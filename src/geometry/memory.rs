//! In-memory geometry source.
//!
//! Serves rectangles from a selector map instead of a live document. Used by
//! tests, the `simulate` command and headless hosts.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ClientRect, GeometrySource};

#[derive(Debug, Default)]
struct Viewport {
    page_y_offset: f64,
    client_top: f64,
}

/// In-memory geometry source.
///
/// Thread-safe implementation using `RwLock`, so a shared `Arc<StaticGeometry>`
/// can be mutated by a test while reporters hold it.
#[derive(Debug, Default)]
pub struct StaticGeometry {
    /// Rectangles keyed by exact selector string.
    rects: RwLock<HashMap<String, ClientRect>>,
    /// Scroll and client-top offsets.
    viewport: RwLock<Viewport>,
}

impl StaticGeometry {
    /// Create an empty source: no elements, zero offsets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the page scroll offset.
    pub fn with_page_y_offset(self, offset: f64) -> Self {
        self.set_page_y_offset(offset);
        self
    }

    /// Builder: set the document client-top offset.
    pub fn with_client_top(self, offset: f64) -> Self {
        self.set_client_top(offset);
        self
    }

    /// Builder: add an element.
    pub fn with_rect(self, selector: impl Into<String>, rect: ClientRect) -> Self {
        self.insert(selector, rect);
        self
    }

    /// Add or replace the rect for a selector.
    pub fn insert(&self, selector: impl Into<String>, rect: ClientRect) {
        self.rects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(selector.into(), rect);
    }

    /// Remove an element. Returns its last rect, if any.
    pub fn remove(&self, selector: &str) -> Option<ClientRect> {
        self.rects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(selector)
    }

    /// Set the page scroll offset.
    pub fn set_page_y_offset(&self, offset: f64) {
        self.viewport
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .page_y_offset = offset;
    }

    /// Set the document client-top offset.
    pub fn set_client_top(&self, offset: f64) {
        self.viewport
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .client_top = offset;
    }

    /// Remove all elements. Offsets are kept.
    pub fn clear(&self) {
        self.rects.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Number of known elements.
    pub fn len(&self) -> usize {
        self.rects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if no elements are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GeometrySource for StaticGeometry {
    fn bounding_rect(&self, selector: &str) -> Option<ClientRect> {
        self.rects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(selector)
            .copied()
    }

    fn page_y_offset(&self) -> f64 {
        self.viewport
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .page_y_offset
    }

    fn client_top(&self) -> f64 {
        self.viewport
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .client_top
    }
}
