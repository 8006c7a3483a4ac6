//! Builder for constructing transition rules.

use crate::builder::error::{BuildError, RuleViolation};
use crate::core::{Action, State};
use crate::machine::{ActionHandler, StateMachine, TransitionRule};
use indexmap::IndexSet;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::TransitionBuilder;
/// use switchyard::{action_enum, state_enum};
///
/// state_enum! {
///     enum Door { Closed, Open, Locked }
/// }
///
/// action_enum! {
///     enum Key { Turn }
/// }
///
/// let (action, rule) = TransitionBuilder::new()
///     .on(Key::Turn)
///     .from(Door::Closed)
///     .from(Door::Locked)
///     .to_any([Door::Closed, Door::Locked])
///     .handler(|m| if m.state() == Door::Locked { Door::Closed } else { Door::Locked })
///     .build()
///     .unwrap();
///
/// assert_eq!(action, Key::Turn);
/// assert!(rule.can_execute(&Door::Locked));
/// assert!(!rule.can_execute(&Door::Open));
/// ```
pub struct TransitionBuilder<S: State, A: Action> {
    action: Option<A>,
    from: IndexSet<S>,
    to: IndexSet<S>,
    handler: Option<ActionHandler<S, A>>,
    succeeds: bool,
}

impl<S: State, A: Action> TransitionBuilder<S, A> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            action: None,
            from: IndexSet::new(),
            to: IndexSet::new(),
            handler: None,
            succeeds: false,
        }
    }

    /// Set the action that triggers the transition (required).
    pub fn on(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Add a source state (at least one required).
    pub fn from(mut self, state: S) -> Self {
        self.from.insert(state);
        self
    }

    /// Add several source states.
    pub fn from_any(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.from.extend(states);
        self
    }

    /// Add an allowed result state (at least one required).
    pub fn to(mut self, state: S) -> Self {
        self.to.insert(state);
        self
    }

    /// Add several allowed result states.
    pub fn to_any(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.to.extend(states);
        self
    }

    /// Set the handler computing the result state.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S, A>) -> S + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self.succeeds = false;
        self
    }

    /// Use a handler that always produces the single result state.
    pub fn succeeds(mut self) -> Self {
        self.handler = None;
        self.succeeds = true;
        self
    }

    /// Check the definition, collecting every problem rather than the first.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<RuleViolation>> {
        let action = self
            .action
            .as_ref()
            .map_or_else(|| "<unnamed>".to_string(), |a| a.label());

        let mut checks: Vec<Validation<(), NonEmptyVec<RuleViolation>>> = Vec::new();

        if self.action.is_none() {
            checks.push(Validation::fail(RuleViolation::MissingAction));
        }

        if self.from.is_empty() {
            checks.push(Validation::fail(RuleViolation::EmptySourceStates {
                action: action.clone(),
            }));
        }

        if self.to.is_empty() {
            checks.push(Validation::fail(RuleViolation::EmptyResultStates {
                action: action.clone(),
            }));
        } else if self.succeeds && self.to.len() != 1 {
            checks.push(Validation::fail(RuleViolation::AmbiguousTarget {
                action: action.clone(),
                count: self.to.len(),
            }));
        }

        if !self.succeeds && self.handler.is_none() {
            checks.push(Validation::fail(RuleViolation::MissingHandler { action }));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the transition.
    pub fn build(self) -> Result<(A, TransitionRule<S, A>), BuildError> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildError::InvalidTransitions(
                errors.iter().cloned().collect(),
            ));
        }

        let handler = self.resolved_handler();
        let action = self
            .action
            .ok_or(BuildError::InvalidTransitions(vec![RuleViolation::MissingAction]))?;
        let handler = handler.ok_or_else(|| {
            BuildError::InvalidTransitions(vec![RuleViolation::MissingHandler {
                action: action.label(),
            }])
        })?;

        Ok((action, TransitionRule::from_handler(self.from, self.to, handler)))
    }

    fn resolved_handler(&self) -> Option<ActionHandler<S, A>> {
        if !self.succeeds {
            return self.handler.clone();
        }

        if self.to.len() != 1 {
            return None;
        }

        let target = self.to.first().cloned()?;
        let handler: ActionHandler<S, A> =
            Arc::new(move |_: &StateMachine<S, A>| target.clone());
        Some(handler)
    }
}

impl<S: State, A: Action> Default for TransitionBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
