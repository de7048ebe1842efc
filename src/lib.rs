//! Statecraft: a predictable state container.
//!
//! A store holds one state value that only changes when an action is
//! dispatched to it. The next state is computed by a pure reducer, then
//! every listener is told about the change. Middleware wraps `dispatch` to
//! add logging, deferred work and the like without the store knowing.
//!
//! # Core Concepts
//!
//! - **Action**: an immutable record with a `type` discriminator
//! - **Reducer**: a pure `(state, action) -> state` function
//! - **Store**: owner of the state, the reducer and the listeners
//! - **Middleware**: interceptors composed around `dispatch`
//! - **Enhancer**: a wrapper around store construction itself
//!
//! # Example
//!
//! ```rust
//! use statecraft::middleware::{LoggerMiddleware, ThunkMiddleware};
//! use statecraft::{Action, Reducer, StoreBuilder};
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! let counter = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
//!     match action.action_type().as_str() {
//!         "inc" => Arc::new(**state + 1),
//!         "dec" => Arc::new(**state - 1),
//!         _ => Arc::clone(state),
//!     }
//! });
//!
//! let store = StoreBuilder::new(counter)
//!     .middleware(LoggerMiddleware::new())
//!     .middleware(ThunkMiddleware)
//!     .build()
//!     .unwrap();
//!
//! let notified = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&notified);
//! store.subscribe(move || sink.set(sink.get() + 1));
//!
//! store.dispatch(Action::new("inc")).unwrap();
//! store.dispatch(Action::new("inc")).unwrap();
//! store.dispatch(Action::new("dec")).unwrap();
//!
//! assert_eq!(*store.get_state().unwrap(), 1);
//! assert_eq!(notified.get(), 3);
//! ```

pub mod bind;
pub mod builder;
pub mod combine;
pub mod compose;
pub mod core;
pub mod middleware;

// Re-export commonly used types
pub use builder::StoreBuilder;
pub use core::{
    create_store, Action, ActionType, ActionTypes, DispatchFn, DispatchPhase, DispatchResult,
    Enhancer, Observer, Outcome, Reducer, Request, StateStream, Store, StoreApi, StoreCreator,
    StoreError, Subscription, WeakStore,
};
