//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating state machines
//! with minimal boilerplate. Builders validate every transition before the
//! machine is created and report all problems at once.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::{BuildError, RuleViolation};
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Action, State};

/// Start a transition that always moves `from` to `to` when `action` fires.
///
/// # Example
///
/// ```
/// use switchyard::builder::{simple_transition, StateMachineBuilder};
/// use switchyard::{action_enum, state_enum};
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// action_enum! {
///     enum MyAction {
///         Finish,
///     }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .initial(MyState::Start)
///     .transition(simple_transition(MyAction::Finish, MyState::Start, MyState::End))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.perform_action(MyAction::Finish), Some(MyState::End));
/// ```
pub fn simple_transition<S: State, A: Action>(
    action: A,
    from: S,
    to: S,
) -> TransitionBuilder<S, A> {
    TransitionBuilder::new().on(action).from(from).to(to).succeeds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Start,
        Middle,
        End,
    }

    impl State for TestState {}

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestAction {
        Advance,
    }

    impl Action for TestAction {}

    #[test]
    fn simple_transition_builds() {
        let (action, rule) =
            simple_transition(TestAction::Advance, TestState::Start, TestState::Middle)
                .build()
                .unwrap();

        assert_eq!(action, TestAction::Advance);
        assert!(rule.can_execute(&TestState::Start));
        assert!(!rule.can_execute(&TestState::End));
        assert!(rule.allows_result(&TestState::Middle));
    }
}
