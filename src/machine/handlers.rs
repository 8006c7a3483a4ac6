//! Handler type aliases for machine callbacks.

use std::sync::Arc;

use super::engine::StateMachine;

/// Computes the result state of an action.
///
/// The handler receives the machine itself so it can inspect the current
/// state or history; it must not rely on performing further actions
/// synchronously, those are rejected while it runs.
pub type ActionHandler<S, A> = Arc<dyn Fn(&StateMachine<S, A>) -> S + Send + Sync>;

/// Reacts to a committed state change, invoked with `(machine, old, new)`.
pub type ChangeHandler<S, A> = Arc<dyn Fn(&StateMachine<S, A>, &S, &S) + Send + Sync>;
