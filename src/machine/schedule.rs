//! Deferred action execution on the tokio runtime.
//!
//! A deferred action is the way to chain actions: handlers and observers
//! cannot perform actions synchronously, but they can schedule one to run in
//! a later turn, once the current action has finished.

use crate::core::{Action, State};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::engine::StateMachine;
use super::error::ActionError;

impl<S: State, A: Action> StateMachine<S, A> {
    /// Perform `action` after `delay` on the current tokio runtime.
    ///
    /// Returns as soon as the action is scheduled; nothing is evaluated
    /// until it fires, so a zero delay still runs in a later turn. When it
    /// fires it goes through [`perform_action`](Self::perform_action) and may
    /// be rejected if the state has moved on or another action is running.
    ///
    /// The scheduled task only holds a weak reference: if the machine is
    /// dropped first, the action is discarded. There is no way to cancel a
    /// scheduled action.
    ///
    /// Handlers receive the machine by reference, so to chain from inside
    /// one, capture a [`Weak`](std::sync::Weak) to the shared machine:
    ///
    /// ```rust
    /// use switchyard::{Action, State, StateFilter, StateMachine};
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    /// enum Load { Start, Loading, Complete }
    /// impl State for Load {}
    ///
    /// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    /// enum Op { Load, Finish }
    /// impl Action for Op {}
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let machine = Arc::new(StateMachine::new(Load::Start));
    /// machine.register_action(Op::Load, [Load::Start], [Load::Loading], |_| Load::Loading);
    /// machine.register_action(Op::Finish, [Load::Loading], [Load::Complete], |_| Load::Complete);
    ///
    /// let weak = Arc::downgrade(&machine);
    /// machine.on_change(StateFilter::Any, StateFilter::only([Load::Loading]), move |_, _, _| {
    ///     if let Some(machine) = weak.upgrade() {
    ///         machine.perform_action_after(Op::Finish, Duration::ZERO).unwrap();
    ///     }
    /// });
    ///
    /// assert_eq!(machine.perform_action(Op::Load), Some(Load::Loading));
    /// tokio::time::sleep(Duration::from_millis(10)).await;
    /// assert_eq!(machine.state(), Load::Complete);
    /// # }
    /// ```
    pub fn perform_action_after(
        self: &Arc<Self>,
        action: A,
        delay: Duration,
    ) -> Result<(), ActionError> {
        let Ok(runtime) = Handle::try_current() else {
            warn!(
                machine_id = %self.id(),
                action = %action.label(),
                "No tokio runtime available to schedule action"
            );
            return Err(ActionError::NoRuntime {
                action: action.label(),
            });
        };

        debug!(
            machine_id = %self.id(),
            action = %action.label(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Scheduled action"
        );

        let machine = Arc::downgrade(self);
        let machine_id = self.id();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            match machine.upgrade() {
                Some(machine) => {
                    let _ = machine.perform_scheduled(action);
                }
                None => debug!(
                    machine_id = %machine_id,
                    action = %action.label(),
                    "Dropped scheduled action for released machine"
                ),
            }
        });

        Ok(())
    }

    /// Run a delayed action once it fires, logging why it was rejected.
    fn perform_scheduled(&self, action: A) -> Result<S, ActionError> {
        let label = action.label();
        let result = self.try_perform_action(action);

        if let Err(error) = &result {
            warn!(
                machine_id = %self.id(),
                action = %label,
                %error,
                "Scheduled action was rejected"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::StateFilter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum LoadState {
        Start,
        Loading,
        Complete,
    }

    impl State for LoadState {}

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum LoadAction {
        Load,
        FinishLoading,
    }

    impl Action for LoadAction {}

    fn load_machine() -> Arc<StateMachine<LoadState, LoadAction>> {
        let machine = Arc::new(StateMachine::new(LoadState::Start));
        machine.register_action(
            LoadAction::Load,
            [LoadState::Start],
            [LoadState::Loading],
            |_| LoadState::Loading,
        );
        machine.register_action(
            LoadAction::FinishLoading,
            [LoadState::Loading],
            [LoadState::Complete],
            |_| LoadState::Complete,
        );
        machine
    }

    #[tokio::test]
    async fn delayed_action_runs_later() {
        let machine = load_machine();

        machine
            .perform_action_after(LoadAction::Load, Duration::from_millis(10))
            .unwrap();
        assert_eq!(machine.state(), LoadState::Start);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(machine.state(), LoadState::Loading);
    }

    #[tokio::test]
    async fn zero_delay_defers_to_later_turn() {
        let machine = load_machine();

        machine
            .perform_action_after(LoadAction::Load, Duration::ZERO)
            .unwrap();
        assert_eq!(machine.state(), LoadState::Start);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(machine.state(), LoadState::Loading);
    }

    #[tokio::test]
    async fn observer_chains_action_through_delay() {
        let machine = load_machine();
        let weak = Arc::downgrade(&machine);
        machine.on_change(
            StateFilter::Any,
            StateFilter::only([LoadState::Loading]),
            move |_, _, _| {
                if let Some(machine) = weak.upgrade() {
                    machine
                        .perform_action_after(LoadAction::FinishLoading, Duration::ZERO)
                        .unwrap();
                }
            },
        );

        assert_eq!(machine.perform_action(LoadAction::Load), Some(LoadState::Loading));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(machine.state(), LoadState::Complete);
        assert_eq!(
            machine.history(),
            vec![LoadState::Start, LoadState::Loading, LoadState::Complete]
        );
    }

    #[tokio::test]
    async fn stale_delayed_action_is_rejected_when_it_fires() {
        let machine = load_machine();

        machine
            .perform_action_after(LoadAction::Load, Duration::from_millis(10))
            .unwrap();
        machine.perform_action(LoadAction::Load);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(machine.state(), LoadState::Loading);
        assert_eq!(machine.history(), vec![LoadState::Start, LoadState::Loading]);
    }

    #[test]
    fn scheduled_run_reports_rejection() {
        let machine = load_machine();
        machine.perform_action(LoadAction::Load);

        assert_eq!(
            machine.perform_scheduled(LoadAction::Load),
            Err(ActionError::IllegalSourceState {
                action: "Load".to_string(),
                state: "Loading".to_string()
            })
        );
        assert_eq!(
            machine.perform_scheduled(LoadAction::FinishLoading),
            Ok(LoadState::Complete)
        );
    }

    #[tokio::test]
    async fn longest_delay_is_accepted() {
        let machine = load_machine();

        machine
            .perform_action_after(LoadAction::Load, Duration::MAX)
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(machine.state(), LoadState::Start);
    }

    #[tokio::test]
    async fn dropped_machine_discards_scheduled_action() {
        let machine = load_machine();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        machine.on_change(StateFilter::Any, StateFilter::Any, move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        machine
            .perform_action_after(LoadAction::Load, Duration::from_millis(10))
            .unwrap();
        drop(machine);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn scheduling_without_runtime_fails() {
        let machine = load_machine();

        let result = machine.perform_action_after(LoadAction::Load, Duration::ZERO);

        assert_eq!(
            result,
            Err(ActionError::NoRuntime {
                action: "Load".to_string()
            })
        );
        assert_eq!(machine.state(), LoadState::Start);
    }
}
