//! Change observers and their registry.
//!
//! Observers are kept in registration order, which is also the order they
//! are notified in. Any number of observers may watch the same transition.

use crate::core::{Action, State};
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

use super::engine::StateMachine;
use super::handlers::ChangeHandler;

/// Which states one side of a transition must be in for an observer to fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateFilter<S: State> {
    /// Matches every state
    Any,
    /// Matches only the listed states
    OneOf(IndexSet<S>),
}

impl<S: State> StateFilter<S> {
    pub fn any() -> Self {
        Self::Any
    }

    pub fn only(states: impl IntoIterator<Item = S>) -> Self {
        Self::OneOf(states.into_iter().collect())
    }

    pub fn matches(&self, state: &S) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(states) => states.contains(state),
        }
    }
}

impl<S: State> Default for StateFilter<S> {
    fn default() -> Self {
        Self::Any
    }
}

impl<S: State> From<Vec<S>> for StateFilter<S> {
    fn from(states: Vec<S>) -> Self {
        Self::only(states)
    }
}

impl<S: State, const N: usize> From<[S; N]> for StateFilter<S> {
    fn from(states: [S; N]) -> Self {
        Self::only(states)
    }
}

/// `None` is a wildcard.
impl<S: State> From<Option<Vec<S>>> for StateFilter<S> {
    fn from(states: Option<Vec<S>>) -> Self {
        match states {
            Some(states) => Self::only(states),
            None => Self::Any,
        }
    }
}

/// A handler plus the source and result filters that select its transitions.
pub struct ChangeObserver<S: State, A: Action> {
    from: StateFilter<S>,
    to: StateFilter<S>,
    handler: ChangeHandler<S, A>,
}

impl<S: State, A: Action> ChangeObserver<S, A> {
    pub fn new<F>(from: StateFilter<S>, to: StateFilter<S>, handler: F) -> Self
    where
        F: Fn(&StateMachine<S, A>, &S, &S) + Send + Sync + 'static,
    {
        Self {
            from,
            to,
            handler: Arc::new(handler),
        }
    }

    /// True if the transition `old -> new` passes both filters.
    pub fn matches(&self, old: &S, new: &S) -> bool {
        self.from.matches(old) && self.to.matches(new)
    }

    pub fn from_filter(&self) -> &StateFilter<S> {
        &self.from
    }

    pub fn to_filter(&self) -> &StateFilter<S> {
        &self.to
    }

    pub(crate) fn notify(&self, machine: &StateMachine<S, A>, old: &S, new: &S) {
        (self.handler)(machine, old, new)
    }
}

impl<S: State, A: Action> fmt::Debug for ChangeObserver<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeObserver")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Ordered list of change observers.
pub struct ObserverRegistry<S: State, A: Action> {
    observers: Vec<Arc<ChangeObserver<S, A>>>,
}

impl<S: State, A: Action> ObserverRegistry<S, A> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Append an observer after all existing ones.
    pub fn push(&mut self, observer: ChangeObserver<S, A>) {
        self.observers.push(Arc::new(observer));
    }

    /// Observers matching `old -> new`, in registration order.
    pub fn matching(&self, old: &S, new: &S) -> Vec<Arc<ChangeObserver<S, A>>> {
        self.observers
            .iter()
            .filter(|o| o.matches(old, new))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<S: State, A: Action> Default for ObserverRegistry<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
