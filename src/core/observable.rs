//! Push-based interop view of a store's state.
//!
//! Stream libraries only need a `subscribe(observer)` entry point to wrap a
//! store; this module provides exactly that and nothing else.

use crate::core::listener::{Callback, Subscription};
use crate::core::store::StoreCore;
use std::rc::Rc;
use std::sync::Arc;

/// Receiver of state values.
///
/// `next` is optional: observers that leave it out are still subscribed
/// but receive nothing.
pub trait Observer<S> {
    fn next(&self, _state: Arc<S>) {}
}

impl<S, F> Observer<S> for F
where
    F: Fn(Arc<S>),
{
    fn next(&self, state: Arc<S>) {
        self(state)
    }
}

/// Minimal observable over a store's state.
pub struct StateStream<S> {
    core: Rc<StoreCore<S>>,
}

impl<S: 'static> StateStream<S> {
    pub(crate) fn new(core: Rc<StoreCore<S>>) -> Self {
        StateStream { core }
    }

    /// Push the current state to `observer` now, then after every dispatch.
    ///
    /// The returned handle removes the underlying store listener.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<S> + 'static,
    {
        let core = Rc::downgrade(&self.core);
        let observe: Callback = Rc::new(move || {
            if let Some(state) = core.upgrade().and_then(|core| core.peek_state()) {
                observer.next(state);
            }
        });

        observe();
        self.core.subscribe(observe)
    }
}

impl<S> Clone for StateStream<S> {
    fn clone(&self) -> Self {
        StateStream {
            core: Rc::clone(&self.core),
        }
    }
}
