//! Property tests over arbitrary messages

use beacon_core::test_utils::{symbols_of, Event, Journal};
use beacon_core::{lookup, MessageEncoder, SignalMachine, TimingPolicy, Unit};
use proptest::prelude::*;

fn count(units: &[Unit], kind: Unit) -> usize {
    units.iter().filter(|u| **u == kind).count()
}

proptest! {
    #[test]
    fn keyed_units_match_pattern_lengths(message in "[A-Za-z0-9 @#?]{0,40}") {
        let units: Vec<Unit> = MessageEncoder::units(&message).collect();
        let keyed = units.iter().filter(|u| u.is_keyed()).count();
        prop_assert_eq!(keyed, MessageEncoder::symbol_count(&message));
    }

    #[test]
    fn gaps_are_placed_by_position(message in "[A-Za-z0-9 @#?]{0,40}") {
        let units: Vec<Unit> = MessageEncoder::units(&message).collect();
        let words: Vec<&str> = message.split_whitespace().collect();

        let word_gaps = words.len().saturating_sub(1);
        let letter_gaps: usize = words.iter().map(|w| w.chars().count() - 1).sum();
        let symbol_gaps: usize = message
            .chars()
            .map(|c| lookup(c).len().saturating_sub(1))
            .sum();

        prop_assert_eq!(count(&units, Unit::WordGap), word_gaps);
        prop_assert_eq!(count(&units, Unit::LetterGap), letter_gaps);
        prop_assert_eq!(count(&units, Unit::SymbolGap), symbol_gaps);
    }

    #[test]
    fn transmit_pairs_every_activate_with_deactivate(message in "[A-Z ]{0,20}") {
        let journal = Journal::new();
        let mut machine = SignalMachine::new(TimingPolicy::default());
        let mut output = journal.output();
        let mut delay = journal.delay();

        let report = MessageEncoder::transmit(&message, &mut machine, &mut output, &mut delay);
        let events = journal.events();

        prop_assert!(report.completed);
        prop_assert_eq!(report.symbols as usize, MessageEncoder::symbol_count(&message));
        prop_assert_eq!(symbols_of(&events).len(), report.symbols as usize);

        // Strict on/off alternation on the same channel
        let switches: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::Activate(_) | Event::Deactivate(_)))
            .collect();
        for pair in switches.chunks(2) {
            match (pair[0], pair[1]) {
                (Event::Activate(on), Event::Deactivate(off)) => prop_assert_eq!(on, off),
                other => prop_assert!(false, "unpaired switch {:?}", other),
            }
        }
    }

    #[test]
    fn holds_match_pass_duration(message in "[A-Za-z0-9 ]{0,30}", wpm in 5u32..=40) {
        let timing = TimingPolicy::from_wpm(wpm).unwrap();
        let journal = Journal::new();
        let mut machine = SignalMachine::new(timing);
        let mut output = journal.output();
        let mut delay = journal.delay();

        let report = MessageEncoder::transmit(&message, &mut machine, &mut output, &mut delay);

        let holds: Vec<u64> = journal
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Hold(ms) => Some(*ms as u64),
                _ => None,
            })
            .collect();

        prop_assert_eq!(holds.len(), report.units as usize);
        prop_assert_eq!(
            holds.iter().sum::<u64>(),
            MessageEncoder::pass_duration(&message, &timing).as_millis()
        );
    }
}
