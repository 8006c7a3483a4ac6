//! State and Action traits for state machine values.
//!
//! Both states and actions are plain values: the engine only needs to clone,
//! compare and hash them. Variants may carry payload data, in which case two
//! values are the same state only if their payloads are equal as well.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: States are copied into history and handed to observers
/// - `Eq` + `Hash`: States are members of source/result sets and filters
/// - `Debug`: States are labelled in diagnostics and diagrams
/// - `Send` + `Sync`: Machines can be shared with scheduled tasks
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum FeedState {
///     Empty,
///     Loading { more: bool },
///     Loaded { offset: u32, has_more: bool },
/// }
///
/// impl State for FeedState {}
///
/// let loaded = FeedState::Loaded { offset: 20, has_more: true };
/// assert_eq!(loaded.label(), "Loaded { offset: 20, has_more: true }");
/// assert_ne!(FeedState::Loading { more: false }, FeedState::Loading { more: true });
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Human readable label used in log fields, errors and diagrams.
    ///
    /// Defaults to the `Debug` rendering, which includes any payload.
    fn label(&self) -> String {
        format!("{self:?}")
    }
}

/// Trait for state machine actions.
///
/// Actions name the operations that may move the machine between states.
/// Like states they may carry payload and are identified by value.
pub trait Action: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Human readable label used in log fields, errors and diagrams.
    fn label(&self) -> String {
        format!("{self:?}")
    }
}
