//! Message encoder: walks text and drives the signal machine unit by unit

use core::iter::Peekable;
use core::slice;
use core::str::{Chars, SplitWhitespace};
use embedded_hal::delay::DelayNs;
use crate::fsm::SignalMachine;
use crate::hal::{Duration, SignalOutput};
use crate::symbols::{lookup, Pattern};
use crate::types::{Symbol, TimingPolicy, Unit};

/// Decision returned by the per-unit poll of [`MessageEncoder::transmit_with`]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Flow {
    /// Run the unit
    Continue,
    /// End the pass before this unit
    Stop,
}

/// Outcome of one pass
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct TransmitReport {
    /// Units driven, gaps included
    pub units: u32,
    /// Dot and dash units driven
    pub symbols: u32,
    /// Units whose output reported a fault
    pub faults: u32,
    /// False if the poll stopped the pass early
    pub completed: bool,
}

/// Ordered units for one pass over a message
///
/// Words are separated by whitespace. Gaps are placed by position: a symbol
/// gap between symbols of a character, a letter gap between characters of a
/// word (whether or not they have a pattern), a word gap between words.
/// Nothing trails the last unit.
pub struct Units<'a> {
    words: Peekable<SplitWhitespace<'a>>,
    chars: Option<Peekable<Chars<'a>>>,
    symbols: Peekable<slice::Iter<'static, Symbol>>,
    char_open: bool,
    pending: Option<Unit>,
}

impl<'a> Units<'a> {
    fn new(text: &'a str) -> Self {
        let empty: Pattern = &[];
        Self {
            words: text.split_whitespace().peekable(),
            chars: None,
            symbols: empty.iter().peekable(),
            char_open: false,
            pending: None,
        }
    }
}

impl Iterator for Units<'_> {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        if let Some(unit) = self.pending.take() {
            return Some(unit);
        }

        loop {
            if let Some(symbol) = self.symbols.next() {
                if self.symbols.peek().is_some() {
                    self.pending = Some(Unit::SymbolGap);
                }
                return Some(symbol.unit());
            }

            if self.char_open {
                self.char_open = false;
                if self.chars.as_mut().is_some_and(|chars| chars.peek().is_some()) {
                    return Some(Unit::LetterGap);
                }
            }

            if let Some(chars) = self.chars.as_mut() {
                if let Some(c) = chars.next() {
                    self.symbols = lookup(c).iter().peekable();
                    self.char_open = true;
                    continue;
                }

                self.chars = None;
                if self.words.peek().is_some() {
                    return Some(Unit::WordGap);
                }
            }

            let word = self.words.next()?;
            self.chars = Some(word.chars().peekable());
        }
    }
}

impl core::iter::FusedIterator for Units<'_> {}

/// Turns text into timed units
pub struct MessageEncoder;

impl MessageEncoder {
    /// Units one pass over `text` produces, without driving anything
    pub fn units(text: &str) -> Units<'_> {
        Units::new(text)
    }

    /// Number of dots and dashes in `text`
    pub fn symbol_count(text: &str) -> usize {
        text.chars().map(|c| lookup(c).len()).sum()
    }

    /// Time one pass over `text` takes with `timing`
    pub fn pass_duration(text: &str, timing: &TimingPolicy) -> Duration {
        let mut total = Duration::from_millis(0);
        for unit in Self::units(text) {
            total += timing.duration_of(unit);
        }
        total
    }

    /// Drive one full pass over `text` through `machine`
    ///
    /// `text` is a snapshot: the caller decides what message the next pass
    /// uses. An empty or all-whitespace message returns at once.
    pub fn transmit<O, D>(
        text: &str,
        machine: &mut SignalMachine,
        output: &mut O,
        delay: &mut D,
    ) -> TransmitReport
    where
        O: SignalOutput + ?Sized,
        D: DelayNs + ?Sized,
    {
        Self::transmit_with(text, machine, output, delay, |_| Flow::Continue)
    }

    /// Like [`MessageEncoder::transmit`], asking `poll` before every unit
    ///
    /// Returning [`Flow::Stop`] ends the pass between units; a unit already
    /// started always completes.
    pub fn transmit_with<O, D, F>(
        text: &str,
        machine: &mut SignalMachine,
        output: &mut O,
        delay: &mut D,
        mut poll: F,
    ) -> TransmitReport
    where
        O: SignalOutput + ?Sized,
        D: DelayNs + ?Sized,
        F: FnMut(Unit) -> Flow,
    {
        let mut report = TransmitReport::default();

        for unit in Self::units(text) {
            if poll(unit) == Flow::Stop {
                debug!("Encoder: pass stopped after {} units", report.units);
                return report;
            }

            if machine.run_unit(unit, output, delay).is_err() {
                report.faults += 1;
            }

            report.units += 1;
            if unit.is_keyed() {
                report.symbols += 1;
            }
        }

        report.completed = true;
        report
    }
}
