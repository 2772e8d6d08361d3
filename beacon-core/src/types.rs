//! Core data types for the beacon

use core::fmt::Write;
use heapless::String;
use crate::hal::Duration;

/// Morse code symbols
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Short element
    Dot,
    /// Long element
    Dash,
}

impl Symbol {
    /// Output channel that renders this symbol
    pub const fn channel(&self) -> Channel {
        match self {
            Symbol::Dot => Channel::Dot,
            Symbol::Dash => Channel::Dash,
        }
    }

    /// Unit that emits this symbol
    pub const fn unit(&self) -> Unit {
        match self {
            Symbol::Dot => Unit::Dot,
            Symbol::Dash => Unit::Dash,
        }
    }
}

/// Physical output channels; may map to distinct indicators
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Dot,
    Dash,
}

/// One discrete timed emission or gap
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    Dot,
    Dash,
    /// Between symbols of one character
    SymbolGap,
    /// Between characters of one word
    LetterGap,
    /// Between words
    WordGap,
}

impl Unit {
    /// State the signal machine holds while running this unit
    pub const fn state(&self) -> SignalState {
        match self {
            Unit::Dot => SignalState::EmittingDot,
            Unit::Dash => SignalState::EmittingDash,
            Unit::SymbolGap => SignalState::SymbolGap,
            Unit::LetterGap => SignalState::LetterGap,
            Unit::WordGap => SignalState::WordGap,
        }
    }

    /// Output channel driven during this unit, `None` for gaps
    pub const fn channel(&self) -> Option<Channel> {
        match self {
            Unit::Dot => Some(Channel::Dot),
            Unit::Dash => Some(Channel::Dash),
            Unit::SymbolGap | Unit::LetterGap | Unit::WordGap => None,
        }
    }

    /// Returns true if this unit produces output
    pub const fn is_keyed(&self) -> bool {
        self.channel().is_some()
    }
}

/// Signal state machine states
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SignalState {
    /// Nothing emitting; initial and terminal state
    Idle = 0,
    EmittingDot = 1,
    EmittingDash = 2,
    SymbolGap = 3,
    LetterGap = 4,
    WordGap = 5,
}

impl SignalState {
    /// Short lowercase name used in status lines
    pub const fn as_str(&self) -> &'static str {
        match self {
            SignalState::Idle => "idle",
            SignalState::EmittingDot => "dot",
            SignalState::EmittingDash => "dash",
            SignalState::SymbolGap => "symbol_gap",
            SignalState::LetterGap => "letter_gap",
            SignalState::WordGap => "word_gap",
        }
    }

    /// Convert from the raw value stored in an atomic
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => SignalState::EmittingDot,
            2 => SignalState::EmittingDash,
            3 => SignalState::SymbolGap,
            4 => SignalState::LetterGap,
            5 => SignalState::WordGap,
            _ => SignalState::Idle,
        }
    }
}

/// Transmission controller lifecycle (one-shot)
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControllerState {
    NotStarted = 0,
    Running = 1,
    /// Stop requested, worker finishing its current unit or pass
    Stopping = 2,
    /// Worker exited and teardown ran
    Stopped = 3,
}

impl ControllerState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ControllerState::NotStarted => "not_started",
            ControllerState::Running => "running",
            ControllerState::Stopping => "stopping",
            ControllerState::Stopped => "stopped",
        }
    }

    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => ControllerState::Running,
            2 => ControllerState::Stopping,
            3 => ControllerState::Stopped,
            _ => ControllerState::NotStarted,
        }
    }
}

/// Where the transmission loop looks at the stop flag
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopGranularity {
    /// Only at the top of the loop, before a new pass
    Pass,
    /// Also before every unit; the unit in flight still completes
    Unit,
}

/// Named durations for every unit
///
/// Expected ordering: `dash > dot` and `word_gap > letter_gap > symbol_gap`.
/// This is a documented precondition, see [`TimingPolicy::check`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingPolicy {
    pub dot: Duration,
    pub dash: Duration,
    pub symbol_gap: Duration,
    pub letter_gap: Duration,
    pub word_gap: Duration,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            dot: Duration::from_millis(500),
            dash: Duration::from_millis(1500),
            symbol_gap: Duration::from_millis(250),
            letter_gap: Duration::from_millis(750),
            word_gap: Duration::from_millis(3000),
        }
    }
}

impl TimingPolicy {
    /// Create a policy from explicit durations
    pub const fn new(
        dot: Duration,
        dash: Duration,
        symbol_gap: Duration,
        letter_gap: Duration,
        word_gap: Duration,
    ) -> Self {
        Self { dot, dash, symbol_gap, letter_gap, word_gap }
    }

    /// Standard proportions from Words Per Minute (PARIS standard: 50 units per word)
    pub fn from_wpm(wpm: u32) -> Result<Self, &'static str> {
        if wpm == 0 || wpm > 100 {
            return Err("WPM must be between 1 and 100");
        }

        let unit = Duration::from_millis(1200 / wpm as u64);

        Ok(Self {
            dot: unit,
            dash: unit * 3,
            symbol_gap: unit,
            letter_gap: unit * 3,
            word_gap: unit * 7,
        })
    }

    /// Duration held for `unit`
    pub fn duration_of(&self, unit: Unit) -> Duration {
        match unit {
            Unit::Dot => self.dot,
            Unit::Dash => self.dash,
            Unit::SymbolGap => self.symbol_gap,
            Unit::LetterGap => self.letter_gap,
            Unit::WordGap => self.word_gap,
        }
    }

    /// Report the first violated ordering precondition, if any
    pub fn check(&self) -> Result<(), &'static str> {
        if self.dash <= self.dot {
            return Err("dash must be longer than dot");
        }
        if self.letter_gap <= self.symbol_gap {
            return Err("letter gap must be longer than symbol gap");
        }
        if self.word_gap <= self.letter_gap {
            return Err("word gap must be longer than letter gap");
        }
        Ok(())
    }
}

/// Transmission controller configuration
#[derive(Copy, Clone, Debug)]
pub struct ControllerConfig {
    pub timing: TimingPolicy,
    pub stop_granularity: StopGranularity,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        crate::default_config()
    }
}

/// Controller-level failures
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconError {
    /// `start` called on a controller that was already started
    AlreadyStarted,
    /// The worker thread could not be created
    SpawnFailed,
    /// The worker thread panicked; teardown still ran
    WorkerPanicked,
}

#[cfg(feature = "std")]
impl core::fmt::Display for BeaconError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BeaconError::AlreadyStarted => write!(f, "Transmission controller already started"),
            BeaconError::SpawnFailed => write!(f, "Failed to spawn transmission worker"),
            BeaconError::WorkerPanicked => write!(f, "Transmission worker panicked"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BeaconError {}

/// Snapshot of the running beacon for telemetry
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusReport {
    pub controller: ControllerState,
    pub signal: SignalState,
    pub passes: u32,
}

impl StatusReport {
    /// Comma-delimited line: `{controller},{signal},{passes}`
    pub fn to_line(&self) -> String<48> {
        let mut line = String::new();
        // Longest names plus a u32 fit in 48 bytes
        let _ = write!(
            line,
            "{},{},{}",
            self.controller.as_str(),
            self.signal.as_str(),
            self.passes
        );
        line
    }
}
