//! Browser geometry source backed by `web-sys`.
//!
//! Reads `document.querySelector(selector).getBoundingClientRect()`,
//! `window.pageYOffset` and `document.documentElement.clientTop`. A selector
//! the browser rejects is treated like one that matches nothing, and a page
//! without a window or document reports zero offsets.

use web_sys::{Document, Window};

use super::{ClientRect, GeometrySource};

/// Geometry of the live document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomGeometry;

impl DomGeometry {
    /// Create a source reading the global window.
    pub fn new() -> Self {
        Self
    }

    fn window() -> Option<Window> {
        web_sys::window()
    }

    fn document() -> Option<Document> {
        Self::window()?.document()
    }
}

impl GeometrySource for DomGeometry {
    fn bounding_rect(&self, selector: &str) -> Option<ClientRect> {
        let element = match Self::document()?.query_selector(selector) {
            Ok(element) => element?,
            Err(err) => {
                tracing::debug!(selector, ?err, "querySelector rejected selector");
                return None;
            }
        };
        let rect = element.get_bounding_client_rect();
        Some(ClientRect::new(rect.top(), rect.right(), rect.bottom(), rect.left()))
    }

    fn page_y_offset(&self) -> f64 {
        Self::window()
            .and_then(|window| window.page_y_offset().ok())
            .unwrap_or(0.0)
    }

    fn client_top(&self) -> f64 {
        Self::document()
            .and_then(|document| document.document_element())
            .map(|element| f64::from(element.client_top()))
            .unwrap_or(0.0)
    }
}
