//! Browser binding: ready via a zero-delay timeout, debounced `resize`
//! listener on `window`.
//!
//! Each resize listener owns one timeout callback that every debounced run
//! reuses. Dropping the binding removes the listeners and cancels pending
//! runs, which is the host's equivalent of unmounting the component.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::debounce::{Debounce, TimerHost};
use super::HostBinding;

/// Default resize debounce, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: i32 = 100;

/// `window.setTimeout` with one reusable callback.
struct WindowTimer {
    fire: Closure<dyn FnMut()>,
}

impl TimerHost for WindowTimer {
    type Handle = i32;

    fn set_timeout(&self, delay_ms: i32) -> Option<i32> {
        let window = web_sys::window()?;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.fire.as_ref().unchecked_ref(),
            delay_ms,
        ) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(?err, "failed to schedule resize callback");
                None
            }
        }
    }

    fn clear_timeout(&self, handle: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle);
        }
    }
}

/// One registered `resize` listener and its debounced callback.
struct ResizeListener {
    listener: Closure<dyn FnMut()>,
    debounce: Rc<Debounce<WindowTimer>>,
}

/// Binding to the global `window`.
pub struct WindowBinding {
    debounce_ms: i32,
    listeners: Vec<ResizeListener>,
}

impl WindowBinding {
    /// Create a binding with the default debounce.
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE_MS)
    }

    /// Create a binding that waits `debounce_ms` after the last resize event.
    pub fn with_debounce(debounce_ms: i32) -> Self {
        Self {
            debounce_ms: debounce_ms.max(0),
            listeners: Vec::new(),
        }
    }

    /// The debounce delay in milliseconds.
    pub fn debounce_ms(&self) -> i32 {
        self.debounce_ms
    }
}

impl Default for WindowBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WindowBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowBinding")
            .field("debounce_ms", &self.debounce_ms)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl HostBinding for WindowBinding {
    fn on_ready(&mut self, callback: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("no global window; ready callback dropped");
            return;
        };
        // Zero-delay and never cancelled, so the one-shot closure is always
        // invoked and freed.
        let handler = Closure::once_into_js(move || callback());
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(handler.unchecked_ref(), 0)
        {
            tracing::warn!(?err, "failed to schedule ready callback");
        }
    }

    fn on_resize(&mut self, callback: Box<dyn FnMut()>) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("no global window; resize callback dropped");
            return;
        };

        let timer = WindowTimer {
            fire: Closure::wrap(callback),
        };
        let debounce = Rc::new(Debounce::new(timer, self.debounce_ms));

        let listener = {
            let debounce = Rc::clone(&debounce);
            Closure::<dyn FnMut()>::new(move || debounce.trigger())
        };

        if let Err(err) =
            window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        {
            tracing::warn!(?err, "failed to add resize listener");
            return;
        }
        self.listeners.push(ResizeListener { listener, debounce });
    }
}

impl Drop for WindowBinding {
    fn drop(&mut self) {
        let window = web_sys::window();
        for ResizeListener { listener, debounce } in self.listeners.drain(..) {
            debounce.cancel();
            let Some(window) = window.as_ref() else {
                continue;
            };
            if let Err(err) = window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                tracing::warn!(?err, "failed to remove resize listener");
            }
        }
    }
}
