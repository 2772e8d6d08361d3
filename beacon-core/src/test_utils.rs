//! Test utilities for beacon core functionality
//!
//! Recording sinks share one [`Journal`], so a test sees output, display and
//! hold events interleaved in the order the worker produced them.

use std::sync::{Arc, Mutex, PoisonError};

use embedded_hal::delay::DelayNs;
use crate::hal::{HalError, SignalOutput, StatusDisplay};
use crate::types::{Channel, Symbol};

/// One recorded side effect
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Activate(Channel),
    Deactivate(Channel),
    Render(String),
    Clear,
    /// Hold requested, in milliseconds
    Hold(u32),
}

/// Shared, thread-safe event log
#[derive(Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| predicate(e))
            .count()
    }

    pub fn output(&self) -> RecordingOutput {
        RecordingOutput { journal: self.clone() }
    }

    pub fn display(&self) -> RecordingDisplay {
        RecordingDisplay { journal: self.clone() }
    }

    /// Delay that records and returns immediately
    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay { journal: self.clone(), sleep: false }
    }

    /// Delay that records and really sleeps
    pub fn sleeping_delay(&self) -> RecordingDelay {
        RecordingDelay { journal: self.clone(), sleep: true }
    }

    /// Split events into passes: each starts at a `Render` and carries the
    /// rendered text and the events up to the next `Render`
    pub fn passes(&self) -> Vec<(String, Vec<Event>)> {
        let mut passes: Vec<(String, Vec<Event>)> = Vec::new();
        for event in self.events() {
            match event {
                Event::Render(text) => passes.push((text, Vec::new())),
                other => {
                    if let Some((_, events)) = passes.last_mut() {
                        events.push(other);
                    }
                }
            }
        }
        passes
    }
}

/// Symbols rendered by a run of events, read off the activate calls
pub fn symbols_of(events: &[Event]) -> Vec<Symbol> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Activate(Channel::Dot) => Some(Symbol::Dot),
            Event::Activate(Channel::Dash) => Some(Symbol::Dash),
            _ => None,
        })
        .collect()
}

/// Output sink that records every call
pub struct RecordingOutput {
    journal: Journal,
}

impl SignalOutput for RecordingOutput {
    type Error = HalError;

    fn activate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.journal.push(Event::Activate(channel));
        Ok(())
    }

    fn deactivate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.journal.push(Event::Deactivate(channel));
        Ok(())
    }
}

/// Output sink that records every call and fails every activate
pub struct FailingOutput {
    journal: Journal,
}

impl FailingOutput {
    pub fn new(journal: &Journal) -> Self {
        Self { journal: journal.clone() }
    }
}

impl SignalOutput for FailingOutput {
    type Error = HalError;

    fn activate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.journal.push(Event::Activate(channel));
        Err(HalError::GpioError)
    }

    fn deactivate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.journal.push(Event::Deactivate(channel));
        Ok(())
    }
}

/// Status display that records every call
pub struct RecordingDisplay {
    journal: Journal,
}

impl StatusDisplay for RecordingDisplay {
    type Error = HalError;

    fn render(&mut self, text: &str) -> Result<(), Self::Error> {
        self.journal.push(Event::Render(text.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.journal.push(Event::Clear);
        Ok(())
    }
}

/// Hold primitive that records requested durations
pub struct RecordingDelay {
    journal: Journal,
    sleep: bool,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.journal.push(Event::Hold(ms));
        if self.sleep {
            std::thread::sleep(std::time::Duration::from_millis(ms as u64));
        }
    }
}

/// Hold primitive that returns immediately
#[derive(Copy, Clone, Debug, Default)]
pub struct InstantDelay;

impl DelayNs for InstantDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, _ms: u32) {}
}
