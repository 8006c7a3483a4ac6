//! Reasons an action can be rejected.

use thiserror::Error;

/// Errors returned when an action does not take effect.
///
/// None of these are fatal: the machine stays in its last committed state and
/// can keep serving actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No rule has been registered for the action.
    #[error("No rule registered for action '{action}'")]
    UnregisteredAction { action: String },

    /// The current state is not one of the rule's source states.
    #[error("Action '{action}' is not allowed from state '{state}'")]
    IllegalSourceState { action: String, state: String },

    /// The handler produced a state outside the rule's result states.
    #[error("Action '{action}' produced state '{state}', which is not an allowed result")]
    IllegalResultState { action: String, state: String },

    /// Another action handler is still running on this machine.
    #[error("Action '{action}' rejected while another action is running; schedule it with a delay instead")]
    ReentrantCall { action: String },

    /// A delayed action was requested outside of a tokio runtime.
    #[error("Cannot schedule action '{action}': no tokio runtime is available")]
    NoRuntime { action: String },
}
