//! Host runner for the Morse beacon
//!
//! Wires the core controller to console stand-ins for the lamps and the
//! character display, a stdin button and a periodic telemetry line.

use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use beacon_core::hal::StdDelay;
use beacon_core::{MessageEncoder, MessageToggle, TransmissionController};

pub mod config;
pub mod console;
pub mod input;

pub use config::HostConfig;
pub use console::{lcd_frame, ConsoleDisplay, ConsoleLamps};
pub use input::{parse_command, Command};

/// Run the beacon until stdin asks it to stop
pub fn run(config: &HostConfig) -> Result<()> {
    let controller_config = config.controller_config()?;
    let first = config.initial_message();

    log::info!(
        "Beacon {}: {} message(s), first pass of {:?} takes {} ms",
        beacon_core::VERSION,
        config.messages.len(),
        first,
        MessageEncoder::pass_duration(first, &controller_config.timing).as_millis()
    );

    let mut controller = TransmissionController::new(
        controller_config,
        ConsoleLamps::new(),
        ConsoleDisplay::stdout(config.display.columns, config.display.rows),
        StdDelay,
        first,
    );
    let handle = controller.handle();
    let toggle = Arc::new(MessageToggle::new(handle.clone(), config.messages.clone()));

    controller.start()?;

    // Blocks on stdin; never joined
    input::spawn_button(BufReader::new(std::io::stdin()), handle.clone(), toggle)
        .context("failed to spawn button thread")?;

    let telemetry = match config.telemetry_interval_secs {
        0 => None,
        secs => Some(
            input::spawn_telemetry(handle, StdDuration::from_secs(secs))
                .context("failed to spawn telemetry thread")?,
        ),
    };

    controller.wait()?;

    if let Some(telemetry) = telemetry {
        if telemetry.join().is_err() {
            log::error!("Telemetry thread panicked");
        }
    }

    log::info!("Beacon stopped");
    Ok(())
}
