//! The size reporter and its factory.

use std::fmt;

use crate::error::{ReporterError, Result};
use crate::geometry::{round, ClientRect, DimensionKind, GeometrySource};
use crate::tracker::{TrackerHandle, TrackerRegistry};

use super::{Report, ReportOptions};

/// Receiver of reports.
///
/// Implemented for every `FnMut(Report)`, so a closure is the usual sink.
pub trait ReportSink {
    /// Handle one report.
    fn receive(&mut self, report: Report);
}

impl<F: FnMut(Report)> ReportSink for F {
    fn receive(&mut self, report: Report) {
        self(report)
    }
}

/// Create a size reporter for `selector`.
///
/// `sink` is `None` when the caller has no report function; that, or an
/// empty selector, fails with `InvalidArgument` before the group tracker is
/// touched, so a failed creation never counts as a reporter.
///
/// # Errors
///
/// Returns `ReporterError::InvalidArgument` for an empty or blank selector
/// (`selector`) or a missing sink (`reporter`).
pub fn create_reporter<S, K>(
    registry: &TrackerRegistry,
    selector: &str,
    sink: Option<K>,
    options: ReportOptions,
    source: S,
) -> Result<SizeReporter<S>>
where
    S: GeometrySource,
    K: ReportSink + 'static,
{
    if selector.trim().is_empty() {
        return Err(ReporterError::invalid_selector());
    }
    let sink = sink.ok_or_else(ReporterError::invalid_reporter)?;

    let tracker = registry.register_reporter(options.group_name());

    Ok(SizeReporter {
        selector: selector.to_string(),
        sink: Box::new(sink),
        options,
        tracker,
        source,
    })
}

/// **Administrative.** Clear every group tracker in `registry`.
///
/// Reporters created earlier keep their old tracker. Only call this from
/// test setup or when rebuilding every reporter.
pub fn reset_registry(registry: &TrackerRegistry) {
    registry.reset();
}

/// Reports the size and top of one element to one sink.
///
/// Each call to [`SizeReporter::report`] reads the element's geometry,
/// rounds it, tags it with the group's accumulate flag, hands it to the sink
/// and then counts the call against the group.
pub struct SizeReporter<S> {
    selector: String,
    sink: Box<dyn ReportSink>,
    options: ReportOptions,
    tracker: TrackerHandle,
    source: S,
}

impl<S: GeometrySource> SizeReporter<S> {
    /// Convenience constructor taking a sink directly.
    ///
    /// # Errors
    ///
    /// Returns `ReporterError::InvalidArgument` for an empty selector.
    pub fn new<K>(
        registry: &TrackerRegistry,
        selector: &str,
        sink: K,
        options: ReportOptions,
        source: S,
    ) -> Result<Self>
    where
        K: ReportSink + 'static,
    {
        create_reporter(registry, selector, Some(sink), options, source)
    }

    /// Measure and emit one report.
    ///
    /// The whole cycle runs under the group's invocation lock, so reports
    /// from other threads in the same group never interleave with it. The
    /// sink must not report for the same group.
    pub fn report(&mut self) {
        let _call = self.tracker.begin_call();
        let counts = self.tracker.get();
        let report = self.measure_with(counts.accumulate());
        tracing::trace!(
            selector = %self.selector,
            group = self.tracker.group(),
            call_count = counts.call_count,
            reporter_count = counts.reporter_count,
            accumulate = report.accumulate,
            "emitting size report"
        );
        self.sink.receive(report);
        self.tracker.complete_call();
    }

    /// Build the report the next call to [`SizeReporter::report`] would
    /// emit, without emitting it or counting the call.
    pub fn measure(&self) -> Report {
        self.measure_with(self.tracker.accumulate())
    }

    fn measure_with(&self, accumulate: bool) -> Report {
        let rect = self
            .source
            .bounding_rect(&self.selector)
            .unwrap_or(ClientRect::ZERO);

        Report {
            width: self.dimension(DimensionKind::Width, || rect.width()),
            height: self.dimension(DimensionKind::Height, || rect.height()),
            top: self.dimension(DimensionKind::Top, || self.source.page_top(&rect)),
            accumulate,
        }
    }

    fn dimension(&self, kind: DimensionKind, raw: impl FnOnce() -> f64) -> Option<f64> {
        self.options
            .reports(kind)
            .then(|| round(raw(), Some(kind), self.options.grow.as_ref()))
    }

    /// The selector this reporter measures.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The options fixed at creation.
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// The group tracker this reporter counts against.
    pub fn tracker(&self) -> &TrackerHandle {
        &self.tracker
    }

    /// The group name in effect.
    pub fn group(&self) -> &str {
        self.tracker.group()
    }
}

impl<S> fmt::Debug for SizeReporter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeReporter")
            .field("selector", &self.selector)
            .field("options", &self.options)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}
