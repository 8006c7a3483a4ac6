//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::config::MachineConfig;
use crate::core::{Action, State};
use crate::machine::{ChangeObserver, StateFilter, StateMachine};
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// Transitions are checked together at [`build`](Self::build): every
/// problem across every transition is reported in one
/// [`BuildError::InvalidTransitions`].
pub struct StateMachineBuilder<S: State, A: Action> {
    initial: Option<S>,
    config: MachineConfig,
    transitions: Vec<TransitionBuilder<S, A>>,
    observers: Vec<ChangeObserver<S, A>>,
}

impl<S: State, A: Action> StateMachineBuilder<S, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            config: MachineConfig::default(),
            transitions: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_history_length(mut self, max_history_length: usize) -> Self {
        self.config = self.config.with_max_history_length(max_history_length);
        self
    }

    /// Add a transition. It is validated when the machine is built.
    pub fn transition(mut self, builder: TransitionBuilder<S, A>) -> Self {
        self.transitions.push(builder);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(
        mut self,
        builders: impl IntoIterator<Item = TransitionBuilder<S, A>>,
    ) -> Self {
        self.transitions.extend(builders);
        self
    }

    /// Add a change observer, kept in call order.
    pub fn on_change<F>(mut self, from: StateFilter<S>, to: StateFilter<S>, handler: F) -> Self
    where
        F: Fn(&StateMachine<S, A>, &S, &S) + Send + Sync + 'static,
    {
        self.observers.push(ChangeObserver::new(from, to, handler));
        self
    }

    /// Build the state machine.
    pub fn build(self) -> Result<StateMachine<S, A>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let checks: Vec<_> = self
            .transitions
            .iter()
            .map(TransitionBuilder::validate)
            .collect();

        if let Validation::Failure(errors) = Validation::all_vec(checks).map(|_| ()) {
            return Err(BuildError::InvalidTransitions(
                errors.iter().cloned().collect(),
            ));
        }

        let machine = StateMachine::with_config(initial, self.config);
        for builder in self.transitions {
            let (action, rule) = builder.build()?;
            machine.add_transition(action, rule);
        }
        for observer in self.observers {
            machine.add_observer(observer);
        }

        Ok(machine)
    }
}

impl<S: State, A: Action> Default for StateMachineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::error::RuleViolation;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    impl State for TestState {}

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestAction {
        Start,
        Finish,
    }

    impl Action for TestAction {}

    #[test]
    fn builder_creates_machine() {
        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Start)
                    .from(TestState::Initial)
                    .to(TestState::Processing)
                    .succeeds(),
            )
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Finish)
                    .from(TestState::Processing)
                    .to(TestState::Complete)
                    .succeeds(),
            )
            .build()
            .unwrap();

        assert_eq!(machine.state(), TestState::Initial);
        assert_eq!(machine.actions(), vec![TestAction::Start, TestAction::Finish]);
        assert_eq!(machine.perform_action(TestAction::Start), Some(TestState::Processing));
        assert_eq!(machine.perform_action(TestAction::Finish), Some(TestState::Complete));
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = StateMachineBuilder::<TestState, TestAction>::new().build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn machine_without_transitions_is_allowed() {
        let machine = StateMachineBuilder::<TestState, TestAction>::new()
            .initial(TestState::Initial)
            .build()
            .unwrap();

        assert!(machine.actions().is_empty());
        assert_eq!(machine.perform_action(TestAction::Start), None);
    }

    #[test]
    fn builder_accumulates_violations_across_transitions() {
        let result = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Start)
                    .to(TestState::Processing)
                    .succeeds(),
            )
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Finish)
                    .from(TestState::Processing),
            )
            .build();

        match result {
            Err(BuildError::InvalidTransitions(found)) => {
                assert_eq!(
                    found,
                    vec![
                        RuleViolation::EmptySourceStates {
                            action: "Start".to_string()
                        },
                        RuleViolation::EmptyResultStates {
                            action: "Finish".to_string()
                        },
                        RuleViolation::MissingHandler {
                            action: "Finish".to_string()
                        },
                    ]
                );
            }
            Err(other) => panic!("Expected invalid transitions, got {other}"),
            Ok(_) => panic!("Expected build to fail"),
        }
    }

    #[test]
    fn builder_applies_history_length() {
        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .max_history_length(2)
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Start)
                    .from(TestState::Initial)
                    .to(TestState::Processing)
                    .succeeds(),
            )
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Finish)
                    .from(TestState::Processing)
                    .to(TestState::Complete)
                    .succeeds(),
            )
            .build()
            .unwrap();

        machine.perform_action(TestAction::Start);
        machine.perform_action(TestAction::Finish);

        assert_eq!(machine.max_history_length(), 2);
        assert_eq!(machine.history(), vec![TestState::Processing, TestState::Complete]);
    }

    #[test]
    fn builder_registers_observers_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(
                TransitionBuilder::new()
                    .on(TestAction::Start)
                    .from(TestState::Initial)
                    .to(TestState::Processing)
                    .succeeds(),
            )
            .on_change(StateFilter::Any, StateFilter::Any, move |_, _, _| {
                assert_eq!(first.fetch_add(1, Ordering::SeqCst), 0);
            })
            .on_change(
                StateFilter::only([TestState::Initial]),
                StateFilter::Any,
                move |_, _, _| {
                    assert_eq!(second.fetch_add(1, Ordering::SeqCst), 1);
                },
            )
            .build()
            .unwrap();

        assert_eq!(machine.observer_count(), 2);
        machine.perform_action(TestAction::Start);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
