//! Self-dispatching wrappers around action creators.

use crate::core::{DispatchFn, DispatchResult, Request, StoreError};
use std::collections::BTreeMap;

/// An action creator taking `A` (use a tuple for several arguments).
pub type ActionCreator<S, A> = Box<dyn Fn(A) -> Request<S>>;

/// An action creator that dispatches what it creates.
pub type BoundActionCreator<A> = Box<dyn Fn(A) -> DispatchResult>;

/// Input accepted by [`bind_action_creators`].
pub enum ActionCreators<S, A> {
    Single(ActionCreator<S, A>),
    Map(BTreeMap<String, ActionCreator<S, A>>),
}

/// Output of [`bind_action_creators`], mirroring the input's shape.
pub enum BoundActionCreators<A> {
    Single(BoundActionCreator<A>),
    Map(BTreeMap<String, BoundActionCreator<A>>),
}

impl<A> BoundActionCreators<A> {
    /// Look up a bound creator by name. `None` for the single form.
    pub fn get(&self, name: &str) -> Option<&BoundActionCreator<A>> {
        match self {
            BoundActionCreators::Single(_) => None,
            BoundActionCreators::Map(map) => map.get(name),
        }
    }

    /// The bound creator of the single form.
    pub fn single(&self) -> Option<&BoundActionCreator<A>> {
        match self {
            BoundActionCreators::Single(creator) => Some(creator),
            BoundActionCreators::Map(_) => None,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            BoundActionCreators::Single(_) => Vec::new(),
            BoundActionCreators::Map(map) => map.keys().map(String::as_str).collect(),
        }
    }
}

/// Wrap `creator` so that calling it dispatches the created request.
///
/// # Example
///
/// ```rust
/// use statecraft::bind::bind_action_creator;
/// use statecraft::{create_store, Action, Reducer};
/// use std::sync::Arc;
///
/// let reducer = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
///     if action.is("add") {
///         Arc::new(**state + action.payload_as::<i64>().unwrap_or(0))
///     } else {
///         Arc::clone(state)
///     }
/// });
/// let store = create_store(reducer, None, None).unwrap();
///
/// let add = bind_action_creator(|n: i64| Action::new("add").with_payload(n), store.dispatcher());
/// add(2).unwrap();
/// add(3).unwrap();
///
/// assert_eq!(*store.get_state().unwrap(), 5);
/// ```
pub fn bind_action_creator<S, A, R, F>(
    creator: F,
    dispatch: DispatchFn<S>,
) -> impl Fn(A) -> DispatchResult
where
    S: 'static,
    F: Fn(A) -> R,
    R: Into<Request<S>>,
{
    move |args| dispatch(creator(args).into())
}

/// Bind a single creator or a map of creators to `dispatch`.
///
/// A map must be non-empty and its names non-empty; anything else fails
/// with [`StoreError::InvalidBinding`].
pub fn bind_action_creators<S, A>(
    creators: ActionCreators<S, A>,
    dispatch: DispatchFn<S>,
) -> Result<BoundActionCreators<A>, StoreError>
where
    S: 'static,
    A: 'static,
{
    match creators {
        ActionCreators::Single(creator) => Ok(BoundActionCreators::Single(Box::new(
            bind_action_creator(creator, dispatch),
        ))),
        ActionCreators::Map(map) => {
            if map.is_empty() {
                return Err(StoreError::InvalidBinding(
                    "expected an action creator or a non-empty map of action creators".to_string(),
                ));
            }
            if map.keys().any(|name| name.is_empty()) {
                return Err(StoreError::InvalidBinding(
                    "action creator names may not be empty".to_string(),
                ));
            }

            let bound = map
                .into_iter()
                .map(|(name, creator)| {
                    let bound: BoundActionCreator<A> =
                        Box::new(bind_action_creator(creator, dispatch.clone()));
                    (name, bound)
                })
                .collect();
            Ok(BoundActionCreators::Map(bound))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{create_store, Action, Outcome, Reducer, Store};
    use crate::middleware::{apply_middleware, ThunkMiddleware};
    use std::sync::Arc;

    fn store() -> Store<i64> {
        let reducer = Reducer::with_initial(0, |state: &Arc<i64>, action: &Action| {
            match action.action_type().as_str() {
                "add" => Arc::new(**state + action.payload_as::<i64>().unwrap_or(0)),
                "reset" => Arc::new(0),
                _ => Arc::clone(state),
            }
        });
        let enhancer = apply_middleware::<i64>(vec![Box::new(ThunkMiddleware)]);
        create_store(reducer, None, Some(enhancer)).unwrap()
    }

    fn creators() -> BTreeMap<String, ActionCreator<i64, i64>> {
        let mut map: BTreeMap<String, ActionCreator<i64, i64>> = BTreeMap::new();
        map.insert(
            "add".to_string(),
            Box::new(|n| Action::new("add").with_payload(n).into()),
        );
        map.insert("reset".to_string(), Box::new(|_| Action::new("reset").into()));
        map
    }

    #[test]
    fn single_creator_returns_dispatch_result() {
        let store = store();
        let add = bind_action_creator(
            |(a, b): (i64, i64)| Action::new("add").with_payload(a + b),
            store.dispatcher(),
        );

        let outcome = add((2, 3)).unwrap();

        assert_eq!(outcome, Outcome::Action(Action::new("add").with_payload(5)));
        assert_eq!(*store.get_state().unwrap(), 5);
    }

    #[test]
    fn map_of_creators_binds_each_key() {
        let store = store();
        let bound =
            bind_action_creators(ActionCreators::Map(creators()), store.dispatcher()).unwrap();

        assert_eq!(bound.names(), vec!["add", "reset"]);
        bound.get("add").unwrap()(4).unwrap();
        assert_eq!(*store.get_state().unwrap(), 4);
        bound.get("reset").unwrap()(0).unwrap();
        assert_eq!(*store.get_state().unwrap(), 0);
        assert!(bound.get("missing").is_none());
    }

    #[test]
    fn bound_creators_go_through_middleware() {
        let store = store();
        let twice: ActionCreator<i64, i64> = Box::new(|n| {
            Request::<i64>::thunk(move |api| {
                api.dispatch(Action::new("add").with_payload(n))?;
                api.dispatch(Action::new("add").with_payload(n))
            })
        });

        let bound =
            bind_action_creators(ActionCreators::Single(twice), store.dispatcher()).unwrap();
        bound.single().unwrap()(3).unwrap();

        assert_eq!(*store.get_state().unwrap(), 6);
    }

    #[test]
    fn empty_map_is_rejected() {
        let store = store();
        let result = bind_action_creators::<i64, i64>(
            ActionCreators::Map(BTreeMap::new()),
            store.dispatcher(),
        );

        assert!(matches!(result, Err(StoreError::InvalidBinding(_))));
    }

    #[test]
    fn empty_names_are_rejected() {
        let store = store();
        let mut map = creators();
        map.insert(String::new(), Box::new(|_| Action::new("add").into()));

        let result = bind_action_creators(ActionCreators::Map(map), store.dispatcher());
        assert!(matches!(result, Err(StoreError::InvalidBinding(_))));
    }
}
