//! Reducers: the pure transition functions a store is built around.
//!
//! A reducer maps `(current state or none, action)` to the next state. It
//! must be synchronous and total, and for any action it does not recognize
//! it must hand back the very same `Arc` it was given so that callers can
//! detect "no change" with [`Arc::ptr_eq`].

use crate::core::{Action, StoreError};
use std::rc::Rc;
use std::sync::Arc;

type ReduceFn<S> = dyn Fn(Option<&Arc<S>>, &Action) -> Result<Arc<S>, StoreError>;

/// Cheaply clonable handle to a transition function.
///
/// # Example
///
/// ```rust
/// use statecraft::{Action, Reducer};
/// use std::sync::Arc;
///
/// let counter = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
///     match action.action_type().as_str() {
///         "inc" => Arc::new(**state + 1),
///         "dec" => Arc::new(**state - 1),
///         _ => Arc::clone(state),
///     }
/// });
///
/// let initial = counter.reduce(None, &Action::new("noop")).unwrap();
/// assert_eq!(*initial, 0);
///
/// let next = counter.reduce(Some(&initial), &Action::new("inc")).unwrap();
/// assert_eq!(*next, 1);
///
/// let same = counter.reduce(Some(&next), &Action::new("noop")).unwrap();
/// assert!(Arc::ptr_eq(&next, &same));
/// ```
pub struct Reducer<S> {
    reduce: Rc<ReduceFn<S>>,
}

impl<S: 'static> Reducer<S> {
    /// Wrap a raw transition function.
    ///
    /// Returning `None` means the reducer produced no state; the store
    /// reports that as [`StoreError::UndefinedState`].
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Arc<S>>, &Action) -> Option<Arc<S>> + 'static,
    {
        Self::try_new(move |state, action| {
            f(state, action).ok_or_else(|| StoreError::UndefinedState {
                action_type: action.action_type().to_string(),
            })
        })
    }

    /// Wrap a transition function that can fail.
    ///
    /// Errors are handed to the `dispatch` caller unchanged.
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn(Option<&Arc<S>>, &Action) -> Result<Arc<S>, StoreError> + 'static,
    {
        Reducer {
            reduce: Rc::new(f),
        }
    }

    /// Build a total reducer from an initial value.
    ///
    /// When handed no state, `f` receives the initial value; the same `Arc`
    /// is reused every time so initialization is itself identity-preserving.
    pub fn with_initial<F>(initial: S, f: F) -> Self
    where
        F: Fn(&Arc<S>, &Action) -> Arc<S> + 'static,
    {
        let initial = Arc::new(initial);
        Self::try_new(move |state, action| Ok(f(state.unwrap_or(&initial), action)))
    }
}

impl<S> Reducer<S> {
    pub fn reduce(&self, state: Option<&Arc<S>>, action: &Action) -> Result<Arc<S>, StoreError> {
        (self.reduce)(state, action)
    }
}

impl<S> Clone for Reducer<S> {
    fn clone(&self) -> Self {
        Reducer {
            reduce: Rc::clone(&self.reduce),
        }
    }
}
