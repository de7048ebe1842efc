//! Combining slice reducers into one root reducer.
//!
//! Each slice reducer owns one key of a map-shaped root state. The combined
//! reducer hands every action to every slice and only builds a new root map
//! when at least one slice actually changed.

use crate::core::{Action, ActionTypes, Reducer, StoreError};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Root state produced by [`combine_reducers`]: one entry per slice key.
pub type SliceMap<S> = BTreeMap<String, Arc<S>>;

/// Options for [`combine_reducers_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombineOptions {
    /// Log a warning the first time state arrives carrying keys no slice owns.
    pub warn_unexpected_keys: bool,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            warn_unexpected_keys: true,
        }
    }
}

/// Combine slice reducers with default options.
///
/// # Example
///
/// ```rust
/// use statecraft::combine::combine_reducers;
/// use statecraft::{create_store, Action, Reducer};
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let counter = Reducer::with_initial(json!(0), |state: &Arc<Value>, action: &Action| {
///     if action.is("counter/inc") {
///         Arc::new(json!(state.as_i64().unwrap_or(0) + 1))
///     } else {
///         Arc::clone(state)
///     }
/// });
/// let todos = Reducer::with_initial(json!([]), |state: &Arc<Value>, _: &Action| Arc::clone(state));
///
/// let root = combine_reducers([("counter", counter), ("todos", todos)]).unwrap();
/// let store = create_store(root, None, None).unwrap();
/// store.dispatch(Action::new("counter/inc")).unwrap();
///
/// let state = store.get_state().unwrap();
/// assert_eq!(*state["counter"], json!(1));
/// assert_eq!(*state["todos"], json!([]));
/// ```
pub fn combine_reducers<S, K, I>(reducers: I) -> Result<Reducer<SliceMap<S>>, StoreError>
where
    S: 'static,
    K: Into<String>,
    I: IntoIterator<Item = (K, Reducer<S>)>,
{
    combine_reducers_with(reducers, CombineOptions::default())
}

/// Combine slice reducers into a root reducer over a [`SliceMap`].
///
/// Every slice is checked up front, once. A slice producing no initial
/// state fails with [`StoreError::UndefinedSliceState`] naming the init
/// type; one producing no state for a random unknown type fails with
/// [`StoreError::SliceShape`].
pub fn combine_reducers_with<S, K, I>(
    reducers: I,
    options: CombineOptions,
) -> Result<Reducer<SliceMap<S>>, StoreError>
where
    S: 'static,
    K: Into<String>,
    I: IntoIterator<Item = (K, Reducer<S>)>,
{
    let reducers: BTreeMap<String, Reducer<S>> = reducers
        .into_iter()
        .map(|(key, reducer)| (key.into(), reducer))
        .collect();

    if reducers.is_empty() {
        log::warn!("combine_reducers called without slice reducers; the root state stays empty");
    }

    for (key, reducer) in &reducers {
        assert_slice_shape(key, reducer)?;
    }

    let unexpected_seen = RefCell::new(BTreeSet::new());

    Ok(Reducer::try_new(
        move |state: Option<&Arc<SliceMap<S>>>, action: &Action| {
            if options.warn_unexpected_keys {
                if let Some(state) = state {
                    warn_unexpected_keys(state, &reducers, action, &unexpected_seen);
                }
            }

            let mut changed = false;
            let mut next = SliceMap::new();
            for (key, reducer) in &reducers {
                let previous = state.and_then(|s| s.get(key));
                let slice = reducer
                    .reduce(previous, action)
                    .map_err(|e| match e {
                        StoreError::UndefinedState { action_type } => {
                            StoreError::UndefinedSliceState {
                                key: key.clone(),
                                action_type,
                            }
                        }
                        other => other,
                    })?;
                changed |= previous.map_or(true, |p| !Arc::ptr_eq(p, &slice));
                next.insert(key.clone(), slice);
            }
            changed |= state.map_or(true, |s| s.len() != reducers.len());

            match state {
                Some(state) if !changed => Ok(Arc::clone(state)),
                _ => Ok(Arc::new(next)),
            }
        },
    ))
}

fn assert_slice_shape<S>(key: &str, reducer: &Reducer<S>) -> Result<(), StoreError> {
    reducer
        .reduce(None, &Action::new(ActionTypes::init()))
        .map_err(|e| match e {
            StoreError::UndefinedState { action_type } => StoreError::UndefinedSliceState {
                key: key.to_string(),
                action_type,
            },
            other => other,
        })?;

    reducer
        .reduce(None, &Action::new(ActionTypes::probe_unknown_action()))
        .map_err(|e| match e {
            StoreError::UndefinedState { .. } => StoreError::SliceShape {
                key: key.to_string(),
                reason: "returned no state for an unknown random action type; return the current state for unknown actions and do not handle @@statecraft/ types".to_string(),
            },
            other => other,
        })?;

    Ok(())
}

fn warn_unexpected_keys<S>(
    state: &SliceMap<S>,
    reducers: &BTreeMap<String, Reducer<S>>,
    action: &Action,
    seen: &RefCell<BTreeSet<String>>,
) {
    let mut seen = seen.borrow_mut();
    let unexpected: Vec<&str> = state
        .keys()
        .filter(|key| !reducers.contains_key(*key) && !seen.contains(*key))
        .map(String::as_str)
        .collect();
    if unexpected.is_empty() {
        return;
    }
    seen.extend(unexpected.iter().map(|key| key.to_string()));

    if action.action_type() == &ActionTypes::replace() {
        return;
    }

    let expected: Vec<&str> = reducers.keys().map(String::as_str).collect();
    log::warn!(
        "Unexpected keys {:?} found in state received by the combined reducer; expected one of {:?}. Unexpected keys will be ignored",
        unexpected,
        expected
    );
}
