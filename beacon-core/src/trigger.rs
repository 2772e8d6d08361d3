//! Debounced trigger button input
//!
//! Safe to feed from an interrupt handler: all state is atomic and no call
//! blocks.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// Atomic button state with edge debouncing
pub struct TriggerButton {
    pressed: AtomicBool,
    last_edge: AtomicU32,
    debounce_ms: AtomicU32,
    presses: AtomicU32,
}

impl TriggerButton {
    /// Create new released button
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            pressed: AtomicBool::new(false),
            last_edge: AtomicU32::new(0),
            debounce_ms: AtomicU32::new(debounce_ms),
            presses: AtomicU32::new(0),
        }
    }

    /// Record an edge seen at `now_ms` (called from interrupt handler)
    ///
    /// Returns true when the edge is an accepted press, i.e. the caller
    /// should fire the trigger. Edges inside the debounce window of the last
    /// accepted edge, and repeated levels, are ignored. The level change is
    /// claimed with a compare-exchange, so when several contexts report the
    /// same edge only one of them accepts it.
    pub fn on_edge(&self, pressed: bool, now_ms: u32) -> bool {
        let last = self.last_edge.load(Ordering::Acquire);
        let debounce = self.debounce_ms.load(Ordering::Relaxed);
        let untouched = self.presses.load(Ordering::Acquire) == 0 && !self.is_pressed();
        let settled = untouched || now_ms.wrapping_sub(last) >= debounce;

        if !settled {
            return false;
        }
        if self
            .pressed
            .compare_exchange(!pressed, pressed, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        self.last_edge.store(now_ms, Ordering::Release);
        if pressed {
            self.presses.fetch_add(1, Ordering::AcqRel);
        }
        pressed
    }

    /// Check if button is held
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    /// Accepted presses so far
    pub fn presses(&self) -> u32 {
        self.presses.load(Ordering::Relaxed)
    }

    /// Change the debounce window
    pub fn set_debounce_ms(&self, debounce_ms: u32) {
        self.debounce_ms.store(debounce_ms, Ordering::Relaxed);
    }
}

impl Default for TriggerButton {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
