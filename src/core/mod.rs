//! Leaf types of the state machine.
//!
//! This module contains the value-level building blocks the engine is
//! composed of:
//! - State and action definitions via the `State` and `Action` traits
//! - The bounded history buffer
//! - The reentrancy guard that serializes action execution

mod guard;
mod history;
mod state;

pub use guard::{GuardToken, ReentrancyGuard};
pub use history::{StateHistory, StateRecord};
pub use state::{Action, State};
