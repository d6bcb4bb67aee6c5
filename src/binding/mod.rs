//! Host lifecycle bindings.
//!
//! The core reporter is invoked on demand. A host binding decides *when*:
//! once the element is ready, and again after each (debounced) viewport
//! resize. Bindings are implemented per host; [`ManualBinding`] drives
//! reporters from tests and headless hosts.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::geometry::GeometrySource;
use crate::reporter::SizeReporter;

pub mod debounce;
#[cfg(feature = "web")]
pub mod web;

pub use debounce::{Debounce, TimerHost};

#[cfg(feature = "web")]
pub use web::WindowBinding;

/// Hooks a host offers for scheduling reports.
pub trait HostBinding {
    /// Run `callback` once the host considers the element ready.
    fn on_ready(&mut self, callback: Box<dyn FnOnce()>);

    /// Run `callback` after each viewport resize, debounced by the host.
    fn on_resize(&mut self, callback: Box<dyn FnMut()>);
}

/// Wire a reporter to a binding: report when ready and after every resize.
///
/// Returns the shared reporter so the caller can still invoke it directly.
pub fn attach<B, S>(binding: &mut B, reporter: SizeReporter<S>) -> Rc<RefCell<SizeReporter<S>>>
where
    B: HostBinding + ?Sized,
    S: GeometrySource + 'static,
{
    let reporter = Rc::new(RefCell::new(reporter));

    let on_ready = Rc::clone(&reporter);
    binding.on_ready(Box::new(move || on_ready.borrow_mut().report()));

    let on_resize = Rc::clone(&reporter);
    binding.on_resize(Box::new(move || on_resize.borrow_mut().report()));

    reporter
}

/// Binding whose events are fired by hand.
#[derive(Default)]
pub struct ManualBinding {
    ready: Vec<Box<dyn FnOnce()>>,
    resize: Vec<Box<dyn FnMut()>>,
}

impl ManualBinding {
    /// Create a binding with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run and drop every pending ready callback, in registration order.
    pub fn fire_ready(&mut self) {
        for callback in self.ready.drain(..) {
            callback();
        }
    }

    /// Run every resize callback, in registration order.
    pub fn fire_resize(&mut self) {
        for callback in self.resize.iter_mut() {
            callback();
        }
    }

    /// Ready callbacks not yet fired.
    pub fn pending_ready(&self) -> usize {
        self.ready.len()
    }

    /// Registered resize callbacks.
    pub fn resize_listeners(&self) -> usize {
        self.resize.len()
    }
}

impl HostBinding for ManualBinding {
    fn on_ready(&mut self, callback: Box<dyn FnOnce()>) {
        self.ready.push(callback);
    }

    fn on_resize(&mut self, callback: Box<dyn FnMut()>) {
        self.resize.push(callback);
    }
}

impl fmt::Debug for ManualBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualBinding")
            .field("pending_ready", &self.ready.len())
            .field("resize_listeners", &self.resize.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ClientRect, StaticGeometry};
    use crate::reporter::{Report, ReportOptions};
    use crate::tracker::TrackerRegistry;
    use std::sync::Arc;

    fn recorded_reporter(
        registry: &TrackerRegistry,
        geometry: &Arc<StaticGeometry>,
        reports: &Rc<RefCell<Vec<Report>>>,
    ) -> SizeReporter<Arc<StaticGeometry>> {
        let reports = Rc::clone(reports);
        SizeReporter::new(
            registry,
            ".contained",
            move |report: Report| reports.borrow_mut().push(report),
            ReportOptions::new().width(),
            Arc::clone(geometry),
        )
        .unwrap()
    }

    #[test]
    fn test_attach_reports_on_ready_once() {
        let registry = TrackerRegistry::new();
        let geometry = Arc::new(StaticGeometry::new());
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut binding = ManualBinding::new();

        attach(&mut binding, recorded_reporter(&registry, &geometry, &reports));
        assert_eq!(binding.pending_ready(), 1);
        assert_eq!(binding.resize_listeners(), 1);

        binding.fire_ready();
        binding.fire_ready();
        assert_eq!(reports.borrow().len(), 1);
        assert_eq!(binding.pending_ready(), 0);
    }

    #[test]
    fn test_attach_reports_after_resize() {
        let registry = TrackerRegistry::new();
        let geometry = Arc::new(StaticGeometry::new());
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut binding = ManualBinding::new();

        let reporter = attach(&mut binding, recorded_reporter(&registry, &geometry, &reports));
        binding.fire_ready();

        geometry.insert(".contained", ClientRect::new(0.0, 640.0, 20.0, 0.0));
        binding.fire_resize();
        reporter.borrow_mut().report();

        let widths: Vec<Option<f64>> = reports.borrow().iter().map(|r| r.width).collect();
        assert_eq!(widths, vec![Some(0.0), Some(640.0), Some(640.0)]);
    }

    #[test]
    fn test_two_attached_reporters_accumulate_within_a_pass() {
        let registry = TrackerRegistry::new();
        let geometry = Arc::new(StaticGeometry::new());
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut binding = ManualBinding::new();

        attach(&mut binding, recorded_reporter(&registry, &geometry, &reports));
        attach(&mut binding, recorded_reporter(&registry, &geometry, &reports));

        binding.fire_ready();
        binding.fire_resize();

        let flags: Vec<bool> = reports.borrow().iter().map(|r| r.accumulate).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn test_debug() {
        let binding = ManualBinding::new();
        assert_eq!(
            format!("{:?}", binding),
            "ManualBinding { pending_ready: 0, resize_listeners: 0 }"
        );
    }
}
