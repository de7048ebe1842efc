//! What travels through a dispatch pipeline and what comes back out.

use crate::core::{Action, StoreError};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Result of dispatching a request through a store's live dispatch.
pub type DispatchResult = Result<Outcome, StoreError>;

/// What a deferred request may do with the store it runs against.
///
/// Implemented by [`MiddlewareApi`](crate::middleware::MiddlewareApi); the
/// `get_state`/`dispatch` conveniences live on `dyn StoreApi<S>`.
pub trait StoreApi<S> {
    fn state(&self) -> Result<Arc<S>, StoreError>;

    fn dispatch_request(&self, request: Request<S>) -> DispatchResult;
}

impl<'a, S: 'static> dyn StoreApi<S> + 'a {
    pub fn get_state(&self) -> Result<Arc<S>, StoreError> {
        self.state()
    }

    /// Dispatch from the top of the pipeline the request is running in.
    pub fn dispatch(&self, request: impl Into<Request<S>>) -> DispatchResult {
        self.dispatch_request(request.into())
    }
}

/// A deferred, function-shaped request.
///
/// Only an interceptor such as [`ThunkMiddleware`](crate::middleware::ThunkMiddleware)
/// knows how to run one; the store core rejects it.
pub type Thunk<S> = Box<dyn FnOnce(&dyn StoreApi<S>) -> DispatchResult>;

/// A request handed to `dispatch`.
pub enum Request<S> {
    /// A plain action, the only kind the store core accepts.
    Action(Action),
    /// A function to be run by an interceptor instead of the reducer.
    Thunk(Thunk<S>),
}

impl<S> Request<S> {
    /// Wrap a closure as a function-shaped request.
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce(&dyn StoreApi<S>) -> DispatchResult + 'static,
    {
        Request::Thunk(Box::new(f))
    }

    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Request::Action(action) => Some(action),
            Request::Thunk(_) => None,
        }
    }

    pub fn is_thunk(&self) -> bool {
        matches!(self, Request::Thunk(_))
    }
}

impl<S> From<Action> for Request<S> {
    fn from(action: Action) -> Self {
        Request::Action(action)
    }
}

impl<S> fmt::Debug for Request<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Request::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

/// What a dispatch produced.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The dispatched action, returned unchanged by the store core.
    Action(Action),
    /// A value substituted by an interceptor.
    Value(Value),
    /// Any other value an interceptor hands back, such as a handle or a
    /// pending computation. Read it with [`Outcome::downcast_ref`].
    Other(Rc<dyn Any>),
    /// An interceptor chose not to pass the request on.
    Skipped,
}

impl Outcome {
    /// Wrap an arbitrary value as [`Outcome::Other`].
    pub fn other<T: Any>(value: T) -> Self {
        Outcome::Other(Rc::new(value))
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            Outcome::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn into_action(self) -> Option<Action> {
        match self {
            Outcome::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The value of an [`Outcome::Other`], if it holds a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Outcome::Other(other) => other.downcast_ref::<T>(),
            _ => None,
        }
    }
}

/// `Other` values compare by identity.
impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Outcome::Action(a), Outcome::Action(b)) => a == b,
            (Outcome::Value(a), Outcome::Value(b)) => a == b,
            (Outcome::Other(a), Outcome::Other(b)) => Rc::ptr_eq(a, b),
            (Outcome::Skipped, Outcome::Skipped) => true,
            _ => false,
        }
    }
}
