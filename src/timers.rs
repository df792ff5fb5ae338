use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Deferred work on the page's event loop.
///
/// Intervals run until their task returns `ControlFlow::Break`; there is no
/// other way to cancel one.
pub trait Timers {
    /// Milliseconds on a monotonic clock.
    fn now(&self) -> f64;
    fn after(&self, ms: u32, task: Box<dyn FnOnce()>);
    fn every(&self, ms: u32, task: Box<dyn FnMut() -> ControlFlow<()>>);
    fn next_frame(&self, task: Box<dyn FnOnce()>);
}

/// Timers backed by `setTimeout`, `setInterval` and `requestAnimationFrame`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimers;

impl Timers for BrowserTimers {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn after(&self, ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(ms, task).forget();
    }

    fn every(&self, ms: u32, mut task: Box<dyn FnMut() -> ControlFlow<()>>) {
        let interval_handle: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
        let interval_handle_clone = interval_handle.clone();

        let interval = Interval::new(ms, move || {
            if task().is_break() {
                if let Some(interval) = interval_handle_clone.borrow_mut().take() {
                    // dropping clears the interval; do it outside this callback
                    Timeout::new(0, move || drop(interval)).forget();
                }
            }
        });

        *interval_handle.borrow_mut() = Some(interval);
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            Timeout::new(16, task).forget();
            return;
        };
        let callback = Closure::once_into_js(task);
        if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
            log::warn!("requestAnimationFrame rejected: {:?}", err);
        }
    }
}
