// Smoke run of the beacon pipeline against recording sinks

use beacon_core::test_utils::{symbols_of, Event, Journal};
use beacon_core::{
    default_config, ControllerConfig, ControllerState, MessageEncoder, SignalMachine, StopGranularity, Symbol,
    TimingPolicy, TransmissionController,
};
use beacon_tests::{fast_timing, notation, wait_until};
use std::time::Duration;

fn main() {
    println!("🧪 Beacon Smoke Run");

    // Test 1: Encoding
    test_encoding();

    // Test 2: One pass through the signal machine
    test_single_pass();

    // Test 3: Controller lifecycle
    test_controller_lifecycle();

    println!("✅ All smoke checks passed!");
    println!();
    println!("📝 Run the full suites with: cargo test -p beacon-tests");
}

fn test_encoding() {
    println!("📡 Testing Encoding...");

    for message in ["SOS", "OK", "CQ DE N0CALL"] {
        let units = notation(MessageEncoder::units(message));
        println!("  {:<14} {}", message, units);
    }
    assert_eq!(notation(MessageEncoder::units("SOS")), "... --- ...");

    println!("  ✅ Encoding working");
}

fn test_single_pass() {
    println!("🔧 Testing Single Pass...");

    let journal = Journal::new();
    let mut machine = SignalMachine::new(TimingPolicy::default());
    let report = MessageEncoder::transmit("SOS", &mut machine, &mut journal.output(), &mut journal.delay());

    let held: u64 = journal
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::Hold(ms) => Some(*ms as u64),
            _ => None,
        })
        .sum();

    assert!(report.completed);
    assert_eq!(report.units, 17);
    assert_eq!(held, MessageEncoder::pass_duration("SOS", machine.timing()).as_millis());
    println!("  {} units, {} symbols, {} ms on air", report.units, report.symbols, held);

    println!("  ✅ Signal machine working");
}

fn test_controller_lifecycle() {
    println!("⚙️ Testing Controller Lifecycle...");

    let journal = Journal::new();
    let config = ControllerConfig {
        timing: fast_timing(),
        stop_granularity: StopGranularity::Pass,
    };
    let mut ctrl = TransmissionController::new(config, journal.output(), journal.display(), journal.sleeping_delay(), "SOS");
    let handle = ctrl.handle();

    ctrl.start().expect("start");
    assert!(wait_until(Duration::from_secs(5), || handle.passes() >= 1));
    handle.set_active_message("OK");
    assert!(wait_until(Duration::from_secs(5), || handle.passes() >= 3));
    ctrl.stop().expect("stop");

    assert_eq!(handle.state(), ControllerState::Stopped);
    for (text, events) in journal.passes() {
        let symbols: String = symbols_of(&events)
            .iter()
            .map(|s| if *s == Symbol::Dot { '.' } else { '-' })
            .collect();
        println!("  {:<14} {}", text.replace('\n', " "), symbols);
    }
    println!("  status {}", handle.status_report().to_line());
    println!("  default stop granularity {:?}", default_config().stop_granularity);

    println!("  ✅ Controller lifecycle working");
}
