//! Stdin "button" and the telemetry reporter
//!
//! Both run on their own threads and talk to the transmission worker only
//! through a [`ControllerHandle`].

use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use beacon_core::{ControllerHandle, ControllerState, MessageToggle, TriggerButton};

/// What one line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Button press: next message in the ring
    Toggle,
    Stop,
    /// Send this text instead
    Send(String),
}

/// Empty line or `t` toggles, `q` stops, anything else is a new message
pub fn parse_command(line: &str) -> Command {
    match line.trim() {
        "" | "t" | "T" => Command::Toggle,
        "q" | "Q" => Command::Stop,
        text => Command::Send(text.to_string()),
    }
}

/// Read commands from `reader` until `q` or end of input
///
/// End of input and read errors both request stop.
pub fn spawn_button<R>(reader: R, handle: ControllerHandle, toggle: Arc<MessageToggle>) -> std::io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new().name("beacon-button".into()).spawn(move || {
        // Whole lines are clean edges, nothing to debounce
        let button = TriggerButton::new(0);
        let epoch = Instant::now();

        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Button: input error: {}", e);
                    break;
                }
            };

            match parse_command(&line) {
                Command::Toggle => {
                    // Millisecond clock; wraps like a hardware tick counter
                    let now_ms = epoch.elapsed().as_millis() as u32;
                    if let Some(message) = toggle.on_button_edge(&button, true, now_ms) {
                        log::info!("Button: next message {:?}", message);
                    }
                    button.on_edge(false, now_ms);
                }
                Command::Stop => break,
                Command::Send(text) => handle.set_active_message(text),
            }
        }
        handle.request_stop();
    })
}

/// Log the status line every `interval` until the controller stops
///
/// An interval too large for the clock disables the line; the thread still
/// exits once the controller stops.
pub fn spawn_telemetry(handle: ControllerHandle, interval: Duration) -> std::io::Result<JoinHandle<()>> {
    const POLL: Duration = Duration::from_millis(100);
    let nap = POLL.min(interval).max(Duration::from_millis(1));

    thread::Builder::new().name("beacon-telemetry".into()).spawn(move || {
        let mut next = Instant::now().checked_add(interval);
        if next.is_none() {
            log::warn!("Telemetry: interval {:?} out of range, reporting disabled", interval);
        }

        while handle.state() != ControllerState::Stopped {
            if let Some(due) = next {
                if Instant::now() >= due {
                    log::info!("Telemetry: {}", handle.status_report().to_line());
                    next = due.checked_add(interval);
                }
            }
            thread::sleep(nap);
        }
    })
}
