//! State machine that performs guarded actions.

use crate::config::MachineConfig;
use crate::core::{Action, ReentrancyGuard, State, StateHistory, StateRecord};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::error::ActionError;
use super::observer::{ChangeObserver, ObserverRegistry, StateFilter};
use super::transition::{TransitionRule, TransitionTable};

/// Current state and history, updated together on every commit.
struct Current<S: State> {
    state: S,
    history: StateHistory<S>,
}

/// Action-driven state machine.
///
/// The machine holds a current state that only changes when an action is
/// performed. Each action has one rule naming the states it may fire from,
/// the states it may produce, and a handler computing the new state. After a
/// change is committed it is recorded in the bounded history and every
/// matching change observer is notified, in registration order.
///
/// All operations take `&self`, so a machine can be shared behind an `Arc`.
/// Only one action runs at a time: a call made while another action's
/// handler or observers are running is rejected with
/// [`ActionError::ReentrantCall`]. Use
/// [`perform_action_after`](StateMachine::perform_action_after) to chain
/// actions from inside handlers.
///
/// # Example
///
/// ```rust
/// use switchyard::{Action, State, StateFilter, StateMachine};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Load { Start, Loading, Complete, Failed }
/// impl State for Load {}
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Op { Load, FinishLoading }
/// impl Action for Op {}
///
/// let machine = StateMachine::new(Load::Start);
/// machine.register_action(Op::Load, [Load::Start, Load::Failed], [Load::Loading], |_| Load::Loading);
/// machine.register_action(Op::FinishLoading, [Load::Loading], [Load::Complete, Load::Failed], |_| Load::Complete);
///
/// let loads = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&loads);
/// machine.on_change(StateFilter::Any, StateFilter::only([Load::Loading]), move |_, _, _| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert_eq!(machine.perform_action(Op::Load), Some(Load::Loading));
/// assert_eq!(machine.perform_action(Op::Load), None);
/// assert_eq!(machine.perform_action(Op::FinishLoading), Some(Load::Complete));
///
/// assert_eq!(loads.load(Ordering::SeqCst), 1);
/// assert_eq!(machine.history(), vec![Load::Start, Load::Loading, Load::Complete]);
/// ```
pub struct StateMachine<S: State, A: Action> {
    id: Uuid,
    initial_state: S,
    max_history_length: usize,
    current: Mutex<Current<S>>,
    transitions: RwLock<TransitionTable<S, A>>,
    observers: RwLock<ObserverRegistry<S, A>>,
    guard: ReentrancyGuard,
}

impl<S: State, A: Action> StateMachine<S, A> {
    /// Create a machine in `initial` that remembers the default number of states.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, MachineConfig::default())
    }

    /// Create a machine remembering at most `max_history_length` states.
    pub fn with_max_history(initial: S, max_history_length: usize) -> Self {
        Self::with_config(
            initial,
            MachineConfig::default().with_max_history_length(max_history_length),
        )
    }

    pub fn with_config(initial: S, config: MachineConfig) -> Self {
        let mut history = StateHistory::new(config.max_history_length);
        history.record(initial.clone());

        let id = Uuid::new_v4();
        debug!(
            machine_id = %id,
            initial = %initial.label(),
            max_history_length = config.max_history_length,
            "Created state machine"
        );

        Self {
            id,
            initial_state: initial.clone(),
            max_history_length: config.max_history_length,
            current: Mutex::new(Current {
                state: initial,
                history,
            }),
            transitions: RwLock::new(TransitionTable::new()),
            observers: RwLock::new(ObserverRegistry::new()),
            guard: ReentrancyGuard::new(),
        }
    }

    /// Register the rule for `action`.
    ///
    /// An action has at most one rule. Registering an action again replaces
    /// its rule and logs a warning.
    pub fn register_action<F>(
        &self,
        action: A,
        from_states: impl IntoIterator<Item = S>,
        to_states: impl IntoIterator<Item = S>,
        handler: F,
    ) where
        F: Fn(&Self) -> S + Send + Sync + 'static,
    {
        self.add_transition(action, TransitionRule::new(from_states, to_states, handler));
    }

    /// Register a pre-built rule for `action`, replacing any existing one.
    pub fn add_transition(&self, action: A, rule: TransitionRule<S, A>) {
        let label = action.label();
        let replaced = write(&self.transitions).insert(action, rule);

        if replaced.is_some() {
            warn!(machine_id = %self.id, action = %label, "Replaced existing rule for action");
        } else {
            debug!(machine_id = %self.id, action = %label, "Registered action");
        }
    }

    /// Add an observer fired for every committed change `old -> new` where
    /// `old` passes `from` and `new` passes `to`.
    ///
    /// Observers accumulate; they are never replaced.
    pub fn on_change<F>(&self, from: StateFilter<S>, to: StateFilter<S>, handler: F)
    where
        F: Fn(&Self, &S, &S) + Send + Sync + 'static,
    {
        self.add_observer(ChangeObserver::new(from, to, handler));
    }

    /// Add a pre-built observer after all existing ones.
    pub fn add_observer(&self, observer: ChangeObserver<S, A>) {
        write(&self.observers).push(observer);
        trace!(machine_id = %self.id, "Registered change observer");
    }

    /// Perform `action`, returning the new state or `None` if nothing changed.
    ///
    /// See [`try_perform_action`](Self::try_perform_action) for the reason a
    /// call was rejected.
    pub fn perform_action(&self, action: A) -> Option<S> {
        self.try_perform_action(action).ok()
    }

    /// Perform `action` synchronously.
    ///
    /// The handler and all matching observers have run by the time this
    /// returns. On any error the state and history are left untouched.
    pub fn try_perform_action(&self, action: A) -> Result<S, ActionError> {
        let Some(_running) = self.guard.try_enter() else {
            warn!(
                machine_id = %self.id,
                action = %action.label(),
                "Rejected action while another action is running"
            );
            return Err(ActionError::ReentrantCall {
                action: action.label(),
            });
        };

        let Some(rule) = read(&self.transitions).get(&action) else {
            debug!(machine_id = %self.id, action = %action.label(), "No rule for action");
            return Err(ActionError::UnregisteredAction {
                action: action.label(),
            });
        };

        let current = self.state();
        if !rule.can_execute(&current) {
            debug!(
                machine_id = %self.id,
                action = %action.label(),
                state = %current.label(),
                "Action not allowed from current state"
            );
            return Err(ActionError::IllegalSourceState {
                action: action.label(),
                state: current.label(),
            });
        }

        let next = rule.run(self);
        if !rule.allows_result(&next) {
            warn!(
                machine_id = %self.id,
                action = %action.label(),
                state = %next.label(),
                "Action handler returned a state outside its allowed results"
            );
            return Err(ActionError::IllegalResultState {
                action: action.label(),
                state: next.label(),
            });
        }

        self.commit(next.clone());
        Ok(next)
    }

    /// Check whether `action` would currently be attempted (pure)
    ///
    /// True if the action has a rule, the current state is one of its source
    /// states and no other action is running. The handler is not invoked, so
    /// the result state is not validated.
    pub fn can_perform_action(&self, action: &A) -> bool {
        if self.guard.is_held() {
            return false;
        }

        read(&self.transitions)
            .get(action)
            .is_some_and(|rule| rule.can_execute(&self.state()))
    }

    /// Record `new_state` as current, append it to history, then notify
    /// matching observers. Equal states are committed like any other.
    fn commit(&self, new_state: S) {
        let old_state = {
            let mut current = lock(&self.current);
            current.history.record(new_state.clone());
            std::mem::replace(&mut current.state, new_state.clone())
        };

        debug!(
            machine_id = %self.id,
            from = %old_state.label(),
            to = %new_state.label(),
            "State changed"
        );

        let observers = read(&self.observers).matching(&old_state, &new_state);
        trace!(machine_id = %self.id, observers = observers.len(), "Dispatching state change");

        for observer in observers {
            observer.notify(self, &old_state, &new_state);
        }
    }

    /// Get current state
    pub fn state(&self) -> S {
        lock(&self.current).state.clone()
    }

    /// Visited states, oldest first, including the initial state unless
    /// history is disabled.
    pub fn history(&self) -> Vec<S> {
        lock(&self.current).history.states()
    }

    /// Visited states with the time each was entered, oldest first.
    pub fn history_records(&self) -> Vec<StateRecord<S>> {
        lock(&self.current).history.records().cloned().collect()
    }

    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    pub fn max_history_length(&self) -> usize {
        self.max_history_length
    }

    /// Identifier attached to this machine's log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Registered actions in registration order.
    pub fn actions(&self) -> Vec<A> {
        read(&self.transitions).actions()
    }

    /// Registered rules in registration order.
    pub fn rules(&self) -> Vec<(A, Arc<TransitionRule<S, A>>)> {
        read(&self.transitions)
            .iter()
            .map(|(action, rule)| (action.clone(), Arc::clone(rule)))
            .collect()
    }

    pub fn observer_count(&self) -> usize {
        read(&self.observers).len()
    }

    /// Whether an action handler or its observers are currently running.
    pub fn is_action_running(&self) -> bool {
        self.guard.is_held()
    }
}

impl<S: State, A: Action> fmt::Debug for StateMachine<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("initial_state", &self.initial_state)
            .field("max_history_length", &self.max_history_length)
            .field("actions", &self.actions())
            .field("observers", &self.observer_count())
            .finish()
    }
}

// A poisoned lock only means a panic happened elsewhere while it was held;
// every write above leaves the guarded data consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
