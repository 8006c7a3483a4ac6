//! Build errors for state machine and transition builders.

use thiserror::Error;

/// A problem with a single transition definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("Transition action not specified. Call .on(action)")]
    MissingAction,

    #[error("Transition '{action}' has no handler. Call .handler(f) or .succeeds()")]
    MissingHandler { action: String },

    #[error("Transition '{action}' has no source states. Call .from(state)")]
    EmptySourceStates { action: String },

    #[error("Transition '{action}' has no result states. Call .to(state)")]
    EmptyResultStates { action: String },

    #[error("Transition '{action}' uses .succeeds() with {count} result states; exactly one is required")]
    AmbiguousTarget { action: String, count: usize },
}

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Invalid transitions: {}", join(.0))]
    InvalidTransitions(Vec<RuleViolation>),
}

fn join(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
