//! Finite State Machine for timed signal units

use embedded_hal::delay::DelayNs;
use crate::hal::{hold, SignalOutput};
use crate::types::{Channel, SignalState, TimingPolicy, Unit};

/// Run-to-completion signal machine
///
/// Every transition is `Idle -> unit state -> Idle`: the enter action turns the
/// unit's channel on (gaps drive nothing), the machine holds for the unit's
/// duration, and the exit action turns the channel off. A unit is never
/// preempted; the next one is accepted only after the hold returns.
pub struct SignalMachine {
    state: SignalState,
    timing: TimingPolicy,
    lit: Option<Channel>,
    units_run: u32,
}

impl SignalMachine {
    /// Create new machine in `Idle` with the given timing
    pub fn new(timing: TimingPolicy) -> Self {
        Self {
            state: SignalState::Idle,
            timing,
            lit: None,
            units_run: 0,
        }
    }

    /// Get current state; `Idle` between units
    pub fn current_state(&self) -> SignalState {
        self.state
    }

    /// Number of units driven to completion
    pub fn units_run(&self) -> u32 {
        self.units_run
    }

    /// Get current timing
    pub fn timing(&self) -> &TimingPolicy {
        &self.timing
    }

    /// Replace timing; applies from the next unit
    pub fn set_timing(&mut self, timing: TimingPolicy) {
        self.timing = timing;
    }

    /// Drive one unit through enter, hold and exit
    ///
    /// Output faults do not shorten the unit: the hold and the exit action
    /// always run and the machine always ends in `Idle`. The first fault is
    /// returned afterwards.
    pub fn run_unit<O, D>(&mut self, unit: Unit, output: &mut O, delay: &mut D) -> Result<(), O::Error>
    where
        O: SignalOutput + ?Sized,
        D: DelayNs + ?Sized,
    {
        let mut fault = None;

        self.state = unit.state();
        trace!("Signal: enter {:?}", self.state);

        if let Some(channel) = unit.channel() {
            self.lit = Some(channel);
            if let Err(e) = output.activate(channel) {
                warn!("Signal: activate failed for {:?}", channel);
                fault = Some(e);
            }
        }

        hold(delay, self.timing.duration_of(unit));

        if let Some(channel) = unit.channel() {
            match output.deactivate(channel) {
                Ok(()) => self.lit = None,
                Err(e) => {
                    warn!("Signal: deactivate failed for {:?}", channel);
                    fault.get_or_insert(e);
                }
            }
        }

        self.state = SignalState::Idle;
        self.units_run = self.units_run.wrapping_add(1);

        match fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Turn off any channel left on and return to `Idle`
    ///
    /// Only does work after an interrupted unit or a failed deactivate.
    pub fn release<O: SignalOutput + ?Sized>(&mut self, output: &mut O) -> Result<(), O::Error> {
        self.state = SignalState::Idle;
        match self.lit.take() {
            Some(channel) => {
                debug!("Signal: releasing {:?}", channel);
                output.deactivate(channel)
            }
            None => Ok(()),
        }
    }

    /// Channel currently believed to be on
    pub fn lit_channel(&self) -> Option<Channel> {
        self.lit
    }
}

impl Default for SignalMachine {
    fn default() -> Self {
        Self::new(TimingPolicy::default())
    }
}
