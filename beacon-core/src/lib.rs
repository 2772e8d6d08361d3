#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Beacon Core
//!
//! Morse beacon core logic: turns a text message into a timed sequence of
//! dots, dashes and gaps and drives it through a run-to-completion signal
//! state machine, repeatedly, while an asynchronous trigger may swap the
//! message between passes.

#[macro_use]
mod fmt;

pub mod types;
pub mod symbols;
pub mod fsm;
pub mod encoder;
pub mod trigger;
pub mod hal;

#[cfg(feature = "std")]
pub mod controller;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use symbols::{lookup, Pattern};
pub use fsm::*;
pub use encoder::*;
pub use trigger::*;
pub use hal::{Duration, HalError, SignalOutput, StatusDisplay};

#[cfg(feature = "std")]
pub use controller::*;

/// Beacon library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: conventional proportions scaled for a visible lamp,
/// stop requests observed once per pass.
pub fn default_config() -> ControllerConfig {
    ControllerConfig {
        timing: TimingPolicy::default(),
        stop_granularity: StopGranularity::Pass,
    }
}
