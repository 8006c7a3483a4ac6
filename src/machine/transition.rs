//! Transition rules and the per-action transition table.

use crate::core::{Action, State};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::sync::Arc;

use super::engine::StateMachine;
use super::handlers::ActionHandler;

/// The rule bound to one action: where it may fire from, what it may
/// produce, and the handler computing the result.
pub struct TransitionRule<S: State, A: Action> {
    from_states: IndexSet<S>,
    to_states: IndexSet<S>,
    handler: ActionHandler<S, A>,
}

impl<S: State, A: Action> TransitionRule<S, A> {
    pub fn new<F>(
        from_states: impl IntoIterator<Item = S>,
        to_states: impl IntoIterator<Item = S>,
        handler: F,
    ) -> Self
    where
        F: Fn(&StateMachine<S, A>) -> S + Send + Sync + 'static,
    {
        Self::from_handler(from_states, to_states, Arc::new(handler))
    }

    pub(crate) fn from_handler(
        from_states: impl IntoIterator<Item = S>,
        to_states: impl IntoIterator<Item = S>,
        handler: ActionHandler<S, A>,
    ) -> Self {
        Self {
            from_states: from_states.into_iter().collect(),
            to_states: to_states.into_iter().collect(),
            handler,
        }
    }

    /// States the action may fire from, in registration order.
    pub fn from_states(&self) -> &IndexSet<S> {
        &self.from_states
    }

    /// States the handler is allowed to produce, in registration order.
    pub fn to_states(&self) -> &IndexSet<S> {
        &self.to_states
    }

    /// Check if the rule applies to the current state (pure)
    pub fn can_execute(&self, current: &S) -> bool {
        self.from_states.contains(current)
    }

    /// Check if a handler result may be committed (pure)
    pub fn allows_result(&self, state: &S) -> bool {
        self.to_states.contains(state)
    }

    pub(crate) fn run(&self, machine: &StateMachine<S, A>) -> S {
        (self.handler)(machine)
    }
}

impl<S: State, A: Action> Clone for TransitionRule<S, A> {
    fn clone(&self) -> Self {
        Self {
            from_states: self.from_states.clone(),
            to_states: self.to_states.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S: State, A: Action> fmt::Debug for TransitionRule<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("from_states", &self.from_states)
            .field("to_states", &self.to_states)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered map from action to its rule.
///
/// There is at most one rule per action. Inserting a rule for an action that
/// already has one replaces it in place, keeping the action's original
/// position in iteration order.
pub struct TransitionTable<S: State, A: Action> {
    rules: IndexMap<A, Arc<TransitionRule<S, A>>>,
}

impl<S: State, A: Action> TransitionTable<S, A> {
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Install a rule, returning the one it replaced.
    pub fn insert(
        &mut self,
        action: A,
        rule: TransitionRule<S, A>,
    ) -> Option<Arc<TransitionRule<S, A>>> {
        self.rules.insert(action, Arc::new(rule))
    }

    pub fn get(&self, action: &A) -> Option<Arc<TransitionRule<S, A>>> {
        self.rules.get(action).map(Arc::clone)
    }

    pub fn contains(&self, action: &A) -> bool {
        self.rules.contains_key(action)
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&A, &Arc<TransitionRule<S, A>>)> {
        self.rules.iter()
    }

    pub fn actions(&self) -> Vec<A> {
        self.rules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: State, A: Action> Default for TransitionTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
