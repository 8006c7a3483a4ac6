//! Switchyard: an action-driven finite state machine
//!
//! A machine is a current state plus a table of actions. Each action names the
//! states it may fire from, the states it may produce, and a handler that
//! computes the next state. Performing an action is the only way the state
//! changes, and every change is checked against the table before it is
//! committed.
//!
//! # Core Concepts
//!
//! - **State / Action**: Caller-defined value types via the `State` and `Action` traits
//! - **Transitions**: One rule per action with allowed source and result states
//! - **Reentrancy guard**: One action at a time; nested calls are rejected
//! - **History**: A bounded record of the most recent states
//! - **Observers**: Ordered callbacks selected by source and result filters
//! - **Diagram**: Graphviz DOT export of the transition table
//!
//! # Example
//!
//! ```rust
//! use switchyard::{action_enum, state_enum, DotDiagram, StateFilter, StateMachine};
//!
//! state_enum! {
//!     enum Feed { Empty, Loading, Loaded }
//! }
//!
//! action_enum! {
//!     enum FeedAction { Load, Finish }
//! }
//!
//! let machine = StateMachine::new(Feed::Empty);
//! machine.register_action(
//!     FeedAction::Load,
//!     [Feed::Empty, Feed::Loaded],
//!     [Feed::Loading],
//!     |_| Feed::Loading,
//! );
//! machine.register_action(
//!     FeedAction::Finish,
//!     [Feed::Loading],
//!     [Feed::Loaded],
//!     |_| Feed::Loaded,
//! );
//! machine.on_change(StateFilter::Any, StateFilter::only([Feed::Loaded]), |_, old, new| {
//!     println!("{old:?} -> {new:?}");
//! });
//!
//! assert_eq!(machine.perform_action(FeedAction::Finish), None);
//! assert_eq!(machine.perform_action(FeedAction::Load), Some(Feed::Loading));
//! assert_eq!(machine.perform_action(FeedAction::Finish), Some(Feed::Loaded));
//! assert_eq!(machine.history(), vec![Feed::Empty, Feed::Loading, Feed::Loaded]);
//!
//! println!("{}", DotDiagram::from_machine(&machine));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod diagram;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, RuleViolation, StateMachineBuilder, TransitionBuilder};
pub use config::{MachineConfig, DEFAULT_MAX_HISTORY_LENGTH};
pub use crate::core::{Action, ReentrancyGuard, State, StateHistory, StateRecord};
pub use diagram::DotDiagram;
pub use machine::{ActionError, StateFilter, StateMachine, TransitionRule};
