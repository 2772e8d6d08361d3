//! Host wiring: stdin button, telemetry, console sinks and config

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use beacon_core::test_utils::Journal;
use beacon_core::{ControllerConfig, ControllerState, MessageToggle, StopGranularity, StatusDisplay, TransmissionController};
use beacon_host::input::{spawn_button, spawn_telemetry};
use beacon_host::{ConsoleDisplay, HostConfig};

use crate::{fast_timing, wait_until};

const PATIENCE: StdDuration = StdDuration::from_secs(5);

fn unit_config() -> ControllerConfig {
    ControllerConfig {
        timing: fast_timing(),
        stop_granularity: StopGranularity::Unit,
    }
}

#[test]
fn test_button_script_toggles_sends_and_stops() {
    let journal = Journal::new();
    let mut ctrl = TransmissionController::new(
        unit_config(),
        journal.output(),
        journal.display(),
        journal.delay(),
        "SOS",
    );
    let handle = ctrl.handle();
    let toggle = Arc::new(MessageToggle::new(handle.clone(), vec!["SOS".into(), "OK".into()]));

    // Not started yet: the script runs entirely before the first pass
    let button = spawn_button(Cursor::new("t\nCQ TEST\nq\nignored\n"), handle.clone(), Arc::clone(&toggle)).unwrap();
    button.join().unwrap();

    // Typed text replaced the toggled "OK" and is not in the ring
    assert_eq!(toggle.current(), None);
    assert_eq!(handle.active_message(), "CQ TEST");
    assert!(handle.is_stop_requested());

    ctrl.start().unwrap();
    ctrl.wait().unwrap();
    assert_eq!(handle.state(), ControllerState::Stopped);
    assert_eq!(handle.passes(), 0);
}

#[test]
fn test_button_presses_step_from_active_message() {
    let journal = Journal::new();
    let ctrl = TransmissionController::new(unit_config(), journal.output(), journal.display(), journal.delay(), "SOS");
    let handle = ctrl.handle();
    let toggle = Arc::new(MessageToggle::new(handle.clone(), vec!["SOS".into(), "OK".into()]));

    // Back-to-back lines are separate presses
    spawn_button(Cursor::new("t\nt\nt\n"), handle.clone(), Arc::clone(&toggle)).unwrap().join().unwrap();
    assert_eq!(handle.active_message(), "OK");

    // A typed message is left by a press for the first ring entry
    spawn_button(Cursor::new("HELLO\nt\n"), handle.clone(), toggle).unwrap().join().unwrap();
    assert_eq!(handle.active_message(), "SOS");
}

#[test]
fn test_end_of_input_requests_stop() {
    let journal = Journal::new();
    let mut ctrl = TransmissionController::new(
        unit_config(),
        journal.output(),
        journal.display(),
        journal.sleeping_delay(),
        "E",
    );
    let handle = ctrl.handle();
    let toggle = Arc::new(MessageToggle::new(handle.clone(), vec!["E".into()]));

    ctrl.start().unwrap();
    assert!(wait_until(PATIENCE, || handle.passes() >= 1));

    spawn_button(Cursor::new(""), handle.clone(), toggle).unwrap().join().unwrap();
    ctrl.wait().unwrap();
    assert_eq!(handle.state(), ControllerState::Stopped);
}

#[test]
fn test_telemetry_exits_after_stop() {
    let journal = Journal::new();
    let mut ctrl = TransmissionController::new(
        unit_config(),
        journal.output(),
        journal.display(),
        journal.sleeping_delay(),
        "T",
    );

    let telemetry = spawn_telemetry(ctrl.handle(), StdDuration::from_millis(5)).unwrap();
    ctrl.start().unwrap();
    ctrl.stop().unwrap();

    assert!(wait_until(PATIENCE, || telemetry.is_finished()));
    telemetry.join().unwrap();
}

#[test]
fn test_telemetry_survives_interval_past_clock_range() {
    let journal = Journal::new();
    let mut ctrl = TransmissionController::new(
        unit_config(),
        journal.output(),
        journal.display(),
        journal.sleeping_delay(),
        "T",
    );

    let telemetry = spawn_telemetry(ctrl.handle(), StdDuration::from_secs(i64::MAX as u64)).unwrap();
    ctrl.start().unwrap();
    ctrl.stop().unwrap();

    assert!(wait_until(PATIENCE, || telemetry.is_finished()));
    assert!(telemetry.join().is_ok());
}

#[test]
fn test_console_display_clears_to_blank_frame() {
    let mut display = ConsoleDisplay::new(Vec::new(), 3, 1);
    display.render("Sending:\nSOS").unwrap();
    display.clear().unwrap();

    let text = String::from_utf8(display.into_inner()).unwrap();
    assert_eq!(text, "+---+\n|Sen|\n+---+\n+---+\n|   |\n+---+\n");
}

#[test]
fn test_config_file_round_trip_through_controller() {
    let config = HostConfig::from_toml_str(
        r#"
        messages = ["VVV"]
        telemetry_interval_secs = 0

        [timing]
        dot_ms = 2
        dash_ms = 6
        symbol_gap_ms = 1
        letter_gap_ms = 4
        word_gap_ms = 10
        "#,
    )
    .unwrap();

    let controller = config.controller_config().unwrap();
    assert_eq!(controller.timing, fast_timing());
    assert_eq!(controller.stop_granularity, StopGranularity::Pass);
    assert_eq!(config.initial_message(), "VVV");
}
