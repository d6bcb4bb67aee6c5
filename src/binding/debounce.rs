//! Trailing-edge debounce over a host timer.

use std::cell::Cell;

/// A host timer that runs one fixed callback after a delay.
///
/// The callback is owned by the timer and reused for every scheduling, so
/// cancelling a pending run never strands it.
pub trait TimerHost {
    /// Handle identifying a scheduled run.
    type Handle: Copy;

    /// Schedule the callback after `delay_ms`. `None` if the host refused.
    fn set_timeout(&self, delay_ms: i32) -> Option<Self::Handle>;

    /// Cancel a scheduled run. Cancelling a run that already happened is a
    /// no-op.
    fn clear_timeout(&self, handle: Self::Handle);
}

/// Runs the timer's callback once events stop arriving for `delay_ms`.
///
/// At most one run is pending at a time. Dropping the debounce cancels it.
pub struct Debounce<T: TimerHost> {
    timer: T,
    delay_ms: i32,
    pending: Cell<Option<T::Handle>>,
}

impl<T: TimerHost> Debounce<T> {
    /// Debounce `timer` by `delay_ms` (negative delays count as zero).
    pub fn new(timer: T, delay_ms: i32) -> Self {
        Self {
            timer,
            delay_ms: delay_ms.max(0),
            pending: Cell::new(None),
        }
    }

    /// Record an event: cancel the pending run and schedule a fresh one.
    pub fn trigger(&self) {
        self.cancel();
        self.pending.set(self.timer.set_timeout(self.delay_ms));
    }

    /// Cancel the pending run, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            self.timer.clear_timeout(handle);
        }
    }

    /// Whether a run has been scheduled and not cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// The configured delay.
    pub fn delay_ms(&self) -> i32 {
        self.delay_ms
    }

    /// The underlying timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }
}

impl<T: TimerHost> Drop for Debounce<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
