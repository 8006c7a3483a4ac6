//! Property-based tests for the state machine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use switchyard::{Action, DotDiagram, State, StateFilter, StateHistory, StateMachine};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum TestState {
    Initial,
    Processing,
    Complete,
    Failed,
}

impl State for TestState {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum TestAction {
    Start,
    Finish,
    Fail,
    Reset,
}

impl Action for TestAction {}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> TestState {
        match variant {
            0 => TestState::Initial,
            1 => TestState::Processing,
            2 => TestState::Complete,
            _ => TestState::Failed,
        }
    }
}

prop_compose! {
    fn arbitrary_action()(variant in 0..4u8) -> TestAction {
        match variant {
            0 => TestAction::Start,
            1 => TestAction::Finish,
            2 => TestAction::Fail,
            _ => TestAction::Reset,
        }
    }
}

fn workflow(max_history_length: usize) -> StateMachine<TestState, TestAction> {
    let machine = StateMachine::with_max_history(TestState::Initial, max_history_length);
    machine.register_action(
        TestAction::Start,
        [TestState::Initial],
        [TestState::Processing],
        |_| TestState::Processing,
    );
    machine.register_action(
        TestAction::Finish,
        [TestState::Processing],
        [TestState::Complete],
        |_| TestState::Complete,
    );
    machine.register_action(
        TestAction::Fail,
        [TestState::Processing],
        [TestState::Failed],
        |_| TestState::Failed,
    );
    machine.register_action(
        TestAction::Reset,
        [TestState::Complete, TestState::Failed],
        [TestState::Initial],
        |_| TestState::Initial,
    );
    machine
}

proptest! {
    #[test]
    fn history_keeps_most_recent_states(
        states in prop::collection::vec(arbitrary_state(), 0..40),
        max_len in 1..10usize,
    ) {
        let mut history = StateHistory::new(max_len);
        for state in &states {
            history.record(*state);
        }

        let expected: Vec<_> = states
            .iter()
            .copied()
            .skip(states.len().saturating_sub(max_len))
            .collect();
        prop_assert_eq!(history.states(), expected);
        prop_assert!(history.len() <= max_len);
    }

    #[test]
    fn zero_length_history_stays_empty(states in prop::collection::vec(arbitrary_state(), 0..20)) {
        let mut history = StateHistory::new(0);
        for state in states {
            history.record(state);
        }

        prop_assert!(history.is_empty());
    }

    #[test]
    fn filters_match_their_members(
        members in prop::collection::vec(arbitrary_state(), 0..4),
        state in arbitrary_state(),
    ) {
        let filter = StateFilter::only(members.clone());

        prop_assert!(StateFilter::<TestState>::Any.matches(&state));
        prop_assert_eq!(filter.matches(&state), members.contains(&state));
    }

    #[test]
    fn rejected_actions_never_change_state(actions in prop::collection::vec(arbitrary_action(), 0..30)) {
        let machine = workflow(100);

        for action in actions {
            let before = machine.state();
            let history_before = machine.history();
            let allowed = machine.can_perform_action(&action);

            match machine.perform_action(action) {
                Some(next) => {
                    prop_assert!(allowed);
                    prop_assert_eq!(machine.state(), next);
                    prop_assert_eq!(machine.history().len(), history_before.len() + 1);
                }
                None => {
                    prop_assert!(!allowed);
                    prop_assert_eq!(machine.state(), before);
                    prop_assert_eq!(machine.history(), history_before);
                }
            }
        }
    }

    #[test]
    fn history_ends_with_current_state(
        actions in prop::collection::vec(arbitrary_action(), 0..30),
        max_len in 1..5usize,
    ) {
        let machine = workflow(max_len);

        for action in actions {
            machine.perform_action(action);
        }

        let history = machine.history();
        prop_assert!(history.len() <= max_len);
        prop_assert_eq!(history.last(), Some(&machine.state()));
    }

    #[test]
    fn diagram_is_deterministic(actions in prop::collection::vec(arbitrary_action(), 0..10)) {
        let first = workflow(10);
        let second = workflow(10);
        for action in actions {
            first.perform_action(action);
        }

        // The diagram depends on the table, not on the current state.
        prop_assert_eq!(
            DotDiagram::from_machine(&first).to_string(),
            DotDiagram::from_machine(&second).to_string()
        );
    }
}
