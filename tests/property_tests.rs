//! Property-based tests for transitions and event dispatch.
//!
//! These tests use proptest to verify lifecycle properties hold across
//! many randomly generated transition sequences.

use parking_lot::Mutex;
use proptest::prelude::*;
use stance::{MachineConfig, State, StateMachine};
use std::sync::Arc;

#[derive(Default)]
struct Counters {
    entries: Vec<usize>,
    exits: Vec<usize>,
    payloads: Vec<Option<u32>>,
}

type Shared = Arc<Mutex<Counters>>;

fn build_states(fsm: &StateMachine<(), u32>, count: usize, counters: &Shared) -> Vec<State<(), u32>> {
    {
        let mut c = counters.lock();
        c.entries = vec![0; count];
        c.exits = vec![0; count];
    }
    (0..count)
        .map(|index| {
            let (on_entry, on_exit) = (counters.clone(), counters.clone());
            fsm.state_builder(format!("s{index}"))
                .on_entry(move |_, payload| {
                    let mut c = on_entry.lock();
                    c.entries[index] += 1;
                    c.payloads.push(payload);
                    Ok(())
                })
                .on_exit(move |_| {
                    on_exit.lock().exits[index] += 1;
                    Ok(())
                })
                .build()
                .unwrap()
        })
        .collect()
}

prop_compose! {
    fn arbitrary_walk()(steps in prop::collection::vec((0..4usize, any::<u32>()), 1..24)) -> Vec<(usize, u32)> {
        steps
    }
}

proptest! {
    #[test]
    fn start_enters_once_without_payload(index in 0..4usize) {
        let counters = Shared::default();
        let fsm = StateMachine::new();
        let states = build_states(&fsm, 4, &counters);

        fsm.start(&states[index]).unwrap();

        prop_assert_eq!(fsm.state(), Some(states[index].clone()));
        let c = counters.lock();
        prop_assert_eq!(c.entries.iter().sum::<usize>(), 1);
        prop_assert_eq!(c.entries[index], 1);
        prop_assert_eq!(c.payloads.clone(), vec![None]);
    }

    #[test]
    fn callbacks_fire_only_on_effective_transitions(walk in arbitrary_walk()) {
        let counters = Shared::default();
        let fsm = StateMachine::with_config(MachineConfig::default().with_history_limit(64));
        let states = build_states(&fsm, 4, &counters);

        fsm.start(&states[0]).unwrap();
        let mut current = 0;
        let mut changes = 0;

        for (target, payload) in &walk {
            fsm.transition_to_with(&states[*target], *payload).unwrap();
            if *target != current {
                changes += 1;
                current = *target;
            }
        }

        prop_assert_eq!(fsm.state(), Some(states[current].clone()));

        let c = counters.lock();
        prop_assert_eq!(c.entries.iter().sum::<usize>(), changes + 1);
        prop_assert_eq!(c.exits.iter().sum::<usize>(), changes);
        // Every state except the current one has been exited as often as entered.
        for index in 0..4 {
            let expected_exits = if index == current { c.entries[index] - 1 } else { c.entries[index] };
            prop_assert_eq!(c.exits[index], expected_exits);
        }
        prop_assert_eq!(fsm.history().len(), changes + 1);
    }

    #[test]
    fn payload_is_delivered_unchanged(walk in arbitrary_walk()) {
        let counters = Shared::default();
        let fsm = StateMachine::new();
        let states = build_states(&fsm, 4, &counters);

        fsm.start(&states[0]).unwrap();
        let mut current = 0;
        let mut expected = vec![None];

        for (target, payload) in &walk {
            fsm.transition_to_with(&states[*target], *payload).unwrap();
            if *target != current {
                expected.push(Some(*payload));
                current = *target;
            }
        }

        prop_assert_eq!(counters.lock().payloads.clone(), expected);
    }

    #[test]
    fn history_path_matches_walk(walk in arbitrary_walk()) {
        let counters = Shared::default();
        let fsm = StateMachine::new();
        let states = build_states(&fsm, 4, &counters);

        fsm.start(&states[0]).unwrap();
        let mut expected = vec!["s0".to_string()];

        for (target, _) in &walk {
            let before = fsm.state();
            fsm.transition_to(&states[*target]).unwrap();
            if before != Some(states[*target].clone()) {
                expected.push(format!("s{target}"));
            }
        }

        let history = fsm.history();
        let path: Vec<String> = history.path().into_iter().map(str::to_string).collect();
        prop_assert_eq!(path, expected);
    }
}
