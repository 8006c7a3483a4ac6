//! Load More Feed
//!
//! This example drives a paginated feed through its loading cycle.
//!
//! Key concepts:
//! - Actions guarded by source and result states
//! - Observers filtered by source and result state
//! - Chaining an action from an observer with a delay
//! - Bounded history and DOT diagram export
//!
//! Run with: cargo run --example load_more

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use switchyard::builder::{StateMachineBuilder, TransitionBuilder};
use switchyard::{action_enum, state_enum, DotDiagram, StateFilter};

state_enum! {
    enum FeedState {
        Empty,
        Loading,
        Loaded,
        Failed,
    }
}

action_enum! {
    enum FeedAction {
        Load,
        FinishLoading,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Load More Example ===\n");

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    // The first two loads succeed and the third fails
    let machine = StateMachineBuilder::new()
        .initial(FeedState::Empty)
        .max_history_length(5)
        .transition(
            TransitionBuilder::new()
                .on(FeedAction::Load)
                .from_any([FeedState::Empty, FeedState::Loaded, FeedState::Failed])
                .to(FeedState::Loading)
                .succeeds(),
        )
        .transition(
            TransitionBuilder::new()
                .on(FeedAction::FinishLoading)
                .from(FeedState::Loading)
                .to_any([FeedState::Loaded, FeedState::Failed])
                .handler(move |_| {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        FeedState::Loaded
                    } else {
                        FeedState::Failed
                    }
                }),
        )
        .on_change(StateFilter::Any, StateFilter::Any, |_, old, new| {
            println!("  {:?} -> {:?}", old, new);
        })
        .build()
        .unwrap();
    let machine = Arc::new(machine);

    // Simulate the network: each load finishes shortly after it starts
    let weak = Arc::downgrade(&machine);
    machine.on_change(
        StateFilter::Any,
        StateFilter::only([FeedState::Loading]),
        move |_, _, _| {
            if let Some(machine) = weak.upgrade() {
                machine
                    .perform_action_after(FeedAction::FinishLoading, Duration::from_millis(20))
                    .unwrap();
            }
        },
    );

    println!("Initial state: {:?}", machine.state());

    for round in 1..=3 {
        println!("\nRound {round}: load");
        machine.perform_action(FeedAction::Load);

        // A second tap while loading is ignored
        if machine.perform_action(FeedAction::Load).is_none() {
            println!("  (duplicate load ignored)");
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    println!("\nLoad attempts: {}", attempts.load(Ordering::SeqCst));
    println!("Final state: {:?}", machine.state());
    println!("Recent history: {:?}", machine.history());

    println!("\nDiagram:\n{}", DotDiagram::from_machine(&*machine));

    println!("=== Example Complete ===");
}
