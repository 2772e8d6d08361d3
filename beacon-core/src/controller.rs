//! Transmission controller: owns the active message, the stop flag and the
//! background worker that repeats the message until told to stop

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use embedded_hal::delay::DelayNs;
use crate::encoder::{Flow, MessageEncoder};
use crate::fsm::SignalMachine;
use crate::hal::{hold, SignalOutput, StatusDisplay};
use crate::trigger::TriggerButton;
use crate::types::{
    BeaconError, ControllerConfig, ControllerState, SignalState, StatusReport, StopGranularity,
};

/// State shared between the worker and trigger contexts
struct Shared {
    active: Mutex<String>,
    stop: AtomicBool,
    lifecycle: AtomicU8,
    signal: AtomicU8,
    passes: AtomicU32,
}

impl Shared {
    fn snapshot(&self) -> String {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn lifecycle(&self) -> ControllerState {
        ControllerState::from_u8(self.lifecycle.load(Ordering::Acquire))
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Cloneable entry point for trigger contexts (button callbacks, signal handlers)
///
/// No method blocks on the transmission loop; the only lock is the message
/// slot, which the worker holds just long enough to clone it.
#[derive(Clone)]
pub struct ControllerHandle {
    shared: Arc<Shared>,
}

impl ControllerHandle {
    /// Replace the active message; the worker picks it up at its next pass
    pub fn set_active_message(&self, message: impl Into<String>) {
        let message = message.into();
        {
            let mut slot = self.shared.active.lock().unwrap_or_else(PoisonError::into_inner);
            if *slot == message {
                return;
            }
            *slot = message;
        }

        if self.shared.lifecycle() == ControllerState::Stopped {
            debug!("Controller: message set after teardown, ignored");
        } else {
            info!("Controller: active message changed");
        }
    }

    /// Ask the worker to stop; cooperative, never interrupts a unit
    pub fn request_stop(&self) {
        if self.shared.stop.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Controller: stop requested");
        let _ = self.shared.lifecycle.compare_exchange(
            ControllerState::Running as u8,
            ControllerState::Stopping as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Current lifecycle state
    pub fn state(&self) -> ControllerState {
        self.shared.lifecycle()
    }

    /// Copy of the active message
    pub fn active_message(&self) -> String {
        self.shared.snapshot()
    }

    /// Completed passes
    pub fn passes(&self) -> u32 {
        self.shared.passes.load(Ordering::Acquire)
    }

    /// Unit the worker is running, `Idle` between units
    pub fn current_signal(&self) -> SignalState {
        SignalState::from_u8(self.shared.signal.load(Ordering::Relaxed))
    }

    /// Returns true once `request_stop` has been called
    pub fn is_stop_requested(&self) -> bool {
        self.shared.stop_requested()
    }

    /// Telemetry snapshot
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            controller: self.state(),
            signal: self.current_signal(),
            passes: self.passes(),
        }
    }
}

/// Everything the transmission loop owns exclusively
struct Worker<O: SignalOutput, S: StatusDisplay, D: DelayNs> {
    machine: SignalMachine,
    output: O,
    display: S,
    delay: D,
    granularity: StopGranularity,
    shared: Arc<Shared>,
}

impl<O: SignalOutput, S: StatusDisplay, D: DelayNs> Worker<O, S, D> {
    fn run(&mut self) {
        info!("Controller: transmission loop started");

        while !self.shared.stop_requested() {
            let message = self.shared.snapshot();

            if let Err(e) = self.display.render(&format!("Sending:\n{}", message)) {
                warn!("Controller: display render failed: {:?}", e);
            }
            debug!("Controller: pass {} sending {:?}", self.shared.passes.load(Ordering::Relaxed) + 1, message);

            let shared = Arc::clone(&self.shared);
            let granularity = self.granularity;
            let report = MessageEncoder::transmit_with(
                &message,
                &mut self.machine,
                &mut self.output,
                &mut self.delay,
                |unit| {
                    if granularity == StopGranularity::Unit && shared.stop_requested() {
                        return Flow::Stop;
                    }
                    shared.signal.store(unit.state() as u8, Ordering::Relaxed);
                    Flow::Continue
                },
            );
            self.shared.signal.store(SignalState::Idle as u8, Ordering::Relaxed);

            if report.faults > 0 {
                warn!("Controller: {} output faults during pass", report.faults);
            }
            if report.completed {
                self.shared.passes.fetch_add(1, Ordering::AcqRel);
            }
            if report.units == 0 && report.completed {
                // Nothing to send; wait a word gap instead of spinning
                hold(&mut self.delay, self.machine.timing().word_gap);
            }
        }
    }
}

impl<O: SignalOutput, S: StatusDisplay, D: DelayNs> Drop for Worker<O, S, D> {
    fn drop(&mut self) {
        if let Err(e) = self.machine.release(&mut self.output) {
            warn!("Controller: output release failed: {:?}", e);
        }
        if let Err(e) = self.display.clear() {
            warn!("Controller: display clear failed: {:?}", e);
        }
        self.shared.signal.store(SignalState::Idle as u8, Ordering::Relaxed);
        self.shared.lifecycle.store(ControllerState::Stopped as u8, Ordering::Release);
        info!("Controller: teardown complete after {} passes", self.shared.passes.load(Ordering::Acquire));
    }
}

/// One-shot transmission controller
///
/// `NotStarted -> Running -> Stopping -> Stopped`. The worker owns the
/// signal machine, the output and the display; teardown (release output,
/// clear display) runs exactly once when the worker ends, including when it
/// panics. Dropping the controller requests stop and joins the worker.
pub struct TransmissionController<O, S, D>
where
    O: SignalOutput,
    S: StatusDisplay,
    D: DelayNs,
{
    handle: ControllerHandle,
    worker: Option<Worker<O, S, D>>,
    thread: Option<JoinHandle<()>>,
}

impl<O, S, D> TransmissionController<O, S, D>
where
    O: SignalOutput + Send + 'static,
    S: StatusDisplay + Send + 'static,
    D: DelayNs + Send + 'static,
{
    /// Create a controller that will transmit `message` once started
    pub fn new(config: ControllerConfig, output: O, display: S, delay: D, message: impl Into<String>) -> Self {
        if let Err(reason) = config.timing.check() {
            warn!("Controller: unusual timing: {}", reason);
        }

        let shared = Arc::new(Shared {
            active: Mutex::new(message.into()),
            stop: AtomicBool::new(false),
            lifecycle: AtomicU8::new(ControllerState::NotStarted as u8),
            signal: AtomicU8::new(SignalState::Idle as u8),
            passes: AtomicU32::new(0),
        });

        let worker = Worker {
            machine: SignalMachine::new(config.timing),
            output,
            display,
            delay,
            granularity: config.stop_granularity,
            shared: Arc::clone(&shared),
        };

        Self {
            handle: ControllerHandle { shared },
            worker: Some(worker),
            thread: None,
        }
    }

    /// Spawn the worker; a second call returns `AlreadyStarted`
    pub fn start(&mut self) -> Result<(), BeaconError> {
        let Some(mut worker) = self.worker.take() else {
            warn!("Controller: start called twice");
            return Err(BeaconError::AlreadyStarted);
        };

        let shared = &self.handle.shared;
        shared.lifecycle.store(ControllerState::Running as u8, Ordering::Release);
        if shared.stop_requested() {
            let _ = shared.lifecycle.compare_exchange(
                ControllerState::Running as u8,
                ControllerState::Stopping as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }

        let thread = thread::Builder::new()
            .name("beacon-tx".into())
            .spawn(move || worker.run())
            .map_err(|_| {
                error!("Controller: failed to spawn worker");
                BeaconError::SpawnFailed
            })?;

        self.thread = Some(thread);
        Ok(())
    }
}

impl<O, S, D> TransmissionController<O, S, D>
where
    O: SignalOutput,
    S: StatusDisplay,
    D: DelayNs,
{
    /// Handle for trigger contexts
    pub fn handle(&self) -> ControllerHandle {
        self.handle.clone()
    }

    /// See [`ControllerHandle::set_active_message`]
    pub fn set_active_message(&self, message: impl Into<String>) {
        self.handle.set_active_message(message);
    }

    /// See [`ControllerHandle::request_stop`]
    pub fn request_stop(&self) {
        self.handle.request_stop();
    }

    /// Current lifecycle state
    pub fn state(&self) -> ControllerState {
        self.handle.state()
    }

    /// Join the worker; returns at once if it was never started
    ///
    /// Does not request stop by itself.
    pub fn wait(&mut self) -> Result<(), BeaconError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| {
                error!("Controller: worker panicked");
                BeaconError::WorkerPanicked
            }),
            None => Ok(()),
        }
    }

    /// Request stop and join the worker
    pub fn stop(&mut self) -> Result<(), BeaconError> {
        self.request_stop();
        self.wait()
    }
}

impl<O, S, D> Drop for TransmissionController<O, S, D>
where
    O: SignalOutput,
    S: StatusDisplay,
    D: DelayNs,
{
    fn drop(&mut self) {
        self.handle.request_stop();
        let _ = self.wait();
    }
}

/// Button behaviour: each press moves to the message after the active one
///
/// The ring is read against the active slot, so a message set from elsewhere
/// is respected: pressing while it is active goes back to the first entry.
pub struct MessageToggle {
    handle: ControllerHandle,
    messages: Vec<String>,
}

impl MessageToggle {
    /// Messages must be non-empty for `press` to do anything
    pub fn new(handle: ControllerHandle, messages: Vec<String>) -> Self {
        Self { handle, messages }
    }

    /// Make the message after the active one active
    pub fn press(&self) -> Option<&str> {
        if self.messages.is_empty() {
            return None;
        }
        let next = match self.position() {
            Some(index) => (index + 1) % self.messages.len(),
            None => 0,
        };
        let message = &self.messages[next];
        info!("Toggle: switching to message {}", next);
        self.handle.set_active_message(message.as_str());
        Some(message.as_str())
    }

    /// Feed a button edge; an accepted press advances the ring
    pub fn on_button_edge(&self, button: &TriggerButton, pressed: bool, now_ms: u32) -> Option<&str> {
        if button.on_edge(pressed, now_ms) {
            self.press()
        } else {
            None
        }
    }

    /// Ring entry equal to the active message, if any
    pub fn current(&self) -> Option<&str> {
        self.position().map(|index| self.messages[index].as_str())
    }

    fn position(&self) -> Option<usize> {
        let active = self.handle.active_message();
        self.messages.iter().position(|m| *m == active)
    }
}
