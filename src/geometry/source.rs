//! Geometry source trait.
//!
//! The reporter never touches the DOM directly. A `GeometrySource` answers
//! three questions about the host page: where an element is, how far the page
//! is scrolled, and the document element's own client-top offset.

use std::rc::Rc;
use std::sync::Arc;

use super::ClientRect;

/// Host-provided geometry lookups.
pub trait GeometrySource {
    /// Viewport-relative bounding rect of the first element matching
    /// `selector`, or `None` when nothing matches.
    fn bounding_rect(&self, selector: &str) -> Option<ClientRect>;

    /// Current vertical scroll offset of the page.
    fn page_y_offset(&self) -> f64;

    /// Top offset of the document element's client area (normally 0).
    fn client_top(&self) -> f64;

    /// Page-absolute top of a viewport-relative rect.
    fn page_top(&self, rect: &ClientRect) -> f64 {
        rect.top + self.page_y_offset() - self.client_top()
    }
}

impl<T: GeometrySource + ?Sized> GeometrySource for &T {
    fn bounding_rect(&self, selector: &str) -> Option<ClientRect> {
        (**self).bounding_rect(selector)
    }

    fn page_y_offset(&self) -> f64 {
        (**self).page_y_offset()
    }

    fn client_top(&self) -> f64 {
        (**self).client_top()
    }
}

/// Allows sharing one source between several reporters and the test driving it.
impl<T: GeometrySource + ?Sized> GeometrySource for Arc<T> {
    fn bounding_rect(&self, selector: &str) -> Option<ClientRect> {
        (**self).bounding_rect(selector)
    }

    fn page_y_offset(&self) -> f64 {
        (**self).page_y_offset()
    }

    fn client_top(&self) -> f64 {
        (**self).client_top()
    }
}

impl<T: GeometrySource + ?Sized> GeometrySource for Rc<T> {
    fn bounding_rect(&self, selector: &str) -> Option<ClientRect> {
        (**self).bounding_rect(selector)
    }

    fn page_y_offset(&self) -> f64 {
        (**self).page_y_offset()
    }

    fn client_top(&self) -> f64 {
        (**self).client_top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl GeometrySource for Fixed {
        fn bounding_rect(&self, selector: &str) -> Option<ClientRect> {
            (selector == ".mock").then(|| ClientRect::new(202.2, 600.0, 600.0, 202.2))
        }

        fn page_y_offset(&self) -> f64 {
            200.0
        }

        fn client_top(&self) -> f64 {
            2.0
        }
    }

    #[test]
    fn test_page_top_composes_offsets() {
        let rect = ClientRect::new(10.0, 0.0, 0.0, 0.0);
        assert_eq!(Fixed.page_top(&rect), 208.0);
    }

    #[test]
    fn test_wrappers_delegate() {
        let arc = Arc::new(Fixed);
        let rc = Rc::new(Fixed);
        assert!(arc.bounding_rect(".mock").is_some());
        assert!(rc.bounding_rect(".nothing").is_none());
        assert_eq!((&Fixed).page_y_offset(), 200.0);
        assert_eq!(arc.client_top(), 2.0);
    }
}
