//! Store core types.
//!
//! This module contains the single-threaded heart of the crate:
//! - Actions and their discriminators
//! - Reducers, the pure transition functions
//! - The store with its dispatch state machine and listeners
//! - The observable interop view
//!
//! Everything here is synchronous. Asynchronous behaviour lives in
//! middleware layered on top of `dispatch`.

mod action;
mod error;
mod listener;
mod observable;
mod reducer;
mod request;
mod store;

use std::rc::Rc;

pub use action::{Action, ActionType, ActionTypes};
pub use error::StoreError;
pub use listener::Subscription;
pub use observable::{Observer, StateStream};
pub use reducer::Reducer;
pub use request::{DispatchResult, Outcome, Request, StoreApi, Thunk};
pub use store::{
    base_creator, create_store, DispatchPhase, Enhancer, Store, StoreCreator, WeakStore,
};

/// A dispatch link: one step of a pipeline, or the store core itself.
pub type DispatchFn<S> = Rc<dyn Fn(Request<S>) -> DispatchResult>;
