//! Wall-clock sources for the scale pulse
//!
//! Position integration runs on the caller's per-tick delta, but the pulse is
//! driven by absolute time so it stays frame-rate independent.

use std::cell::Cell;

/// Source of absolute time in seconds
pub trait Clock {
    fn now_seconds(&self) -> f64;
}

/// Real time: UNIX epoch natively, `Date.now()` in the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_seconds(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    #[cfg(target_arch = "wasm32")]
    fn now_seconds(&self) -> f64 {
        js_sys::Date::now() * 0.001
    }
}

/// Manually advanced clock for deterministic runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_seconds(&self) -> f64 {
        (**self).now_seconds()
    }
}
