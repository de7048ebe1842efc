//! Counter Store
//!
//! This example demonstrates a single-value store wrapped in middleware.
//!
//! Key concepts:
//! - Reducers that keep state identity for unknown actions
//! - Logger and thunk middleware in one pipeline
//! - Listeners reading state through a weak handle
//! - Typed results handed back from a thunk
//!
//! Run with: cargo run --example counter

use statecraft::middleware::{LoggerConfig, LoggerMiddleware, ThunkMiddleware};
use statecraft::{Action, Outcome, Reducer, Request, StoreBuilder};
use std::sync::Arc;

fn main() {
    println!("=== Counter Store ===\n");

    let counter = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
        match action.action_type().as_str() {
            "inc" => Arc::new(**state + 1),
            "dec" => Arc::new(**state - 1),
            "add" => Arc::new(**state + action.payload_as::<i64>().unwrap_or(0)),
            _ => Arc::clone(state),
        }
    });

    let logger = LoggerMiddleware::with_config(LoggerConfig {
        include_state: true,
        ..LoggerConfig::default()
    });

    let store = StoreBuilder::new(counter)
        .middleware(logger)
        .middleware(ThunkMiddleware)
        .build()
        .unwrap();

    println!("Initial state: {}\n", store.get_state().unwrap());

    let weak = store.downgrade();
    store.subscribe(move || {
        if let Ok(state) = weak.get_state() {
            println!("  listener sees {}", state);
        }
    });

    println!("Dispatching inc, inc, dec:");
    for kind in ["inc", "inc", "dec"] {
        store.dispatch(Action::new(kind)).unwrap();
    }

    println!("\nDispatching a thunk that adds 10 twice:");
    let outcome = store
        .dispatch(Request::<i64>::thunk(|api| {
            let before = *api.get_state()?;
            api.dispatch(Action::new("add").with_payload(10))?;
            api.dispatch(Action::new("add").with_payload(10))?;
            Ok(Outcome::other(*api.get_state()? - before))
        }))
        .unwrap();

    println!("  thunk reports a change of {:?}", outcome.downcast_ref::<i64>());
    println!("\nFinal state: {}", store.get_state().unwrap());

    println!("\nKey Characteristics:");
    println!("- The thunk never reaches the reducer");
    println!("- Every plain action is returned from dispatch unchanged");
    println!("- The listener does not keep the store alive");

    println!("\n=== Example Complete ===");
}
