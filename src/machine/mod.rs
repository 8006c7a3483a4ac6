//! The state machine engine.
//!
//! This module composes the leaf types from [`crate::core`] into the
//! engine that performs actions:
//!
//! - **Transitions**: one rule per action, with allowed source and result states
//! - **Observers**: ordered callbacks selected by source/result filters
//! - **Engine**: the guarded perform-action protocol, history and dispatch
//! - **Scheduling**: deferred actions on the tokio runtime

mod engine;
mod error;
mod handlers;
mod observer;
mod schedule;
mod transition;

pub use engine::StateMachine;
pub use error::ActionError;
pub use handlers::{ActionHandler, ChangeHandler};
pub use observer::{ChangeObserver, ObserverRegistry, StateFilter};
pub use transition::{TransitionRule, TransitionTable};
