//! Whole-store scenarios exercised through the public API only.

use serde_json::{json, Value};
use statecraft::bind::{bind_action_creators, ActionCreator, ActionCreators};
use statecraft::combine::{combine_reducers, SliceMap};
use statecraft::middleware::{
    apply_middleware, from_handler, LoggerMiddleware, Middleware, MiddlewareApi, ThunkMiddleware,
};
use statecraft::{
    create_store, Action, DispatchFn, DispatchPhase, Outcome, Reducer, Request, Store,
    StoreBuilder, StoreError, Subscription,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

fn counter() -> Reducer<i64> {
    Reducer::with_initial(0, |state: &Arc<i64>, action: &Action| {
        match action.action_type().as_str() {
            "inc" => Arc::new(**state + 1),
            "dec" => Arc::new(**state - 1),
            _ => Arc::clone(state),
        }
    })
}

fn todos() -> Reducer<Value> {
    Reducer::with_initial(json!([]), |state: &Arc<Value>, action: &Action| {
        match (action.action_type().as_str(), state.as_array()) {
            ("todos/add", Some(items)) => {
                let mut items = items.clone();
                items.push(action.payload().cloned().unwrap_or(Value::Null));
                Arc::new(Value::Array(items))
            }
            _ => Arc::clone(state),
        }
    })
}

fn thunk_store() -> Store<i64> {
    StoreBuilder::new(counter())
        .middleware(LoggerMiddleware::new())
        .middleware(ThunkMiddleware)
        .build()
        .unwrap()
}

#[test]
fn counter_scenario() {
    let store = create_store(counter(), None, None).unwrap();
    let notified = Rc::new(Cell::new(0));
    let sink = Rc::clone(&notified);
    store.subscribe(move || sink.set(sink.get() + 1));

    for kind in ["inc", "inc", "dec"] {
        store.dispatch(Action::new(kind)).unwrap();
    }

    assert_eq!(*store.get_state().unwrap(), 1);
    assert_eq!(notified.get(), 3);
    assert_eq!(store.phase(), DispatchPhase::Idle);
}

#[test]
fn plain_actions_come_back_through_the_pipeline() {
    let store = thunk_store();
    let action = Action::new("inc").with_meta(json!({ "source": "test" }));

    let outcome = store.dispatch(action.clone()).unwrap();

    assert_eq!(outcome, Outcome::Action(action));
    assert_eq!(*store.get_state().unwrap(), 1);
}

#[test]
fn thunks_never_reach_the_reducer() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = Rc::clone(&seen);
    let reducer = Reducer::with_initial(0i64, move |state: &Arc<i64>, action: &Action| {
        record.borrow_mut().push(action.action_type().to_string());
        if action.is("inc") {
            Arc::new(**state + 1)
        } else {
            Arc::clone(state)
        }
    });
    let store = StoreBuilder::new(reducer)
        .middleware(LoggerMiddleware::new())
        .middleware(ThunkMiddleware)
        .build()
        .unwrap();
    seen.borrow_mut().clear();

    let outcome = store
        .dispatch(Request::<i64>::thunk(|api| {
            api.dispatch(Action::new("inc"))?;
            api.dispatch(Action::new("inc"))?;
            Ok(Outcome::Value(json!(*api.get_state()? * 10)))
        }))
        .unwrap();

    assert_eq!(outcome, Outcome::Value(json!(20)));
    assert_eq!(*seen.borrow(), vec!["inc".to_string(), "inc".to_string()]);
}

#[test]
fn thunks_without_thunk_middleware_are_rejected() {
    let store = create_store(counter(), None, None).unwrap();

    let result = store.dispatch(Request::<i64>::thunk(|_api| Ok(Outcome::Skipped)));

    assert!(matches!(result, Err(StoreError::InvalidAction(_))));
    assert_eq!(*store.get_state().unwrap(), 0);
}

#[test]
fn middleware_can_swallow_requests() {
    let pipeline: Vec<Box<dyn Middleware<i64>>> = vec![Box::new(from_handler(
        |_api: &MiddlewareApi<i64>, next: &DispatchFn<i64>, request: Request<i64>| {
            match request.as_action() {
                Some(action) if action.is("dec") => Ok(Outcome::Skipped),
                _ => next(request),
            }
        },
    ))];
    let store = create_store(counter(), None, Some(apply_middleware(pipeline))).unwrap();

    store.dispatch(Action::new("inc")).unwrap();
    assert_eq!(store.dispatch(Action::new("dec")).unwrap(), Outcome::Skipped);

    assert_eq!(*store.get_state().unwrap(), 1);
}

#[test]
fn combined_store_with_bound_creators() {
    let root = combine_reducers([
        ("todos", todos()),
        ("visible", Reducer::with_initial(json!("all"), |s: &Arc<Value>, a: &Action| {
            if a.is("filter/set") {
                Arc::new(a.payload().cloned().unwrap_or(Value::Null))
            } else {
                Arc::clone(s)
            }
        })),
    ])
    .unwrap();
    let store = create_store(root, None, None).unwrap();

    let mut creators: BTreeMap<String, ActionCreator<SliceMap<Value>, Value>> = BTreeMap::new();
    creators.insert(
        "add".to_string(),
        Box::new(|text: Value| Action::new("todos/add").with_payload(text).into()),
    );
    creators.insert(
        "filter".to_string(),
        Box::new(|filter: Value| Action::new("filter/set").with_payload(filter).into()),
    );
    let bound = bind_action_creators(ActionCreators::Map(creators), store.dispatcher()).unwrap();

    bound.get("add").unwrap()(json!("write docs")).unwrap();
    bound.get("add").unwrap()(json!("ship")).unwrap();
    bound.get("filter").unwrap()(json!("done")).unwrap();

    let state = store.get_state().unwrap();
    assert_eq!(*state["todos"], json!(["write docs", "ship"]));
    assert_eq!(*state["visible"], json!("done"));
}

#[test]
fn observable_sees_initial_and_later_states() {
    let store = create_store(counter(), Some(5), None).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let subscription = store
        .observable()
        .subscribe(move |state: Arc<i64>| sink.borrow_mut().push(*state));
    store.dispatch(Action::new("inc")).unwrap();
    subscription.unsubscribe();
    store.dispatch(Action::new("inc")).unwrap();

    assert_eq!(*seen.borrow(), vec![5, 6]);
}

#[test]
fn replace_reducer_keeps_state_and_listeners() {
    let store = thunk_store();
    store.dispatch(Action::new("inc")).unwrap();
    let notified = Rc::new(Cell::new(0));
    let sink = Rc::clone(&notified);
    store.subscribe(move || sink.set(sink.get() + 1));

    let doubling = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
        if action.is("inc") {
            Arc::new(**state + 2)
        } else {
            Arc::clone(state)
        }
    });
    store.replace_reducer(doubling).unwrap();
    store.dispatch(Action::new("inc")).unwrap();

    assert_eq!(*store.get_state().unwrap(), 3);
    assert_eq!(notified.get(), 2);
}

#[test]
fn actions_parsed_from_json_are_dispatchable() {
    let store = thunk_store();
    let action = Action::from_value(json!({ "type": "inc", "meta": { "origin": "wire" } })).unwrap();

    store.dispatch(action).unwrap();

    assert_eq!(*store.get_state().unwrap(), 1);
    assert!(Action::from_value(json!({ "payload": 1 })).is_err());
}

#[test]
fn listener_unsubscribing_itself_does_not_stop_later_listeners() {
    let store = create_store(counter(), None, None).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let a = Rc::clone(&order);
    store.subscribe(move || a.borrow_mut().push("a"));
    let b = Rc::clone(&order);
    let handle = Rc::clone(&own);
    let sub = store.subscribe(move || {
        b.borrow_mut().push("b");
        if let Some(sub) = handle.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    *own.borrow_mut() = Some(sub);
    let c = Rc::clone(&order);
    store.subscribe(move || c.borrow_mut().push("c"));

    store.dispatch(Action::new("inc")).unwrap();
    store.dispatch(Action::new("inc")).unwrap();

    assert_eq!(*order.borrow(), vec!["a", "b", "c", "a", "c"]);
    assert_eq!(store.listener_count(), 2);
}

#[test]
fn thunks_can_hand_back_typed_results() {
    let store = thunk_store();

    let outcome = store
        .dispatch(Request::<i64>::thunk(|api| {
            let handle = api.dispatch(Action::new("inc"))?;
            Ok(Outcome::other(handle.into_action()))
        }))
        .unwrap();

    assert_eq!(
        outcome.downcast_ref::<Option<Action>>(),
        Some(&Some(Action::new("inc")))
    );
    assert_eq!(*store.get_state().unwrap(), 1);
}

#[test]
fn dropping_the_store_frees_listeners_holding_weak_handles() {
    let store = thunk_store();
    let weak = store.downgrade();
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let weak = weak.clone();
        let seen = Rc::clone(&seen);
        store.subscribe(move || {
            if let Ok(state) = weak.get_state() {
                seen.borrow_mut().push(*state);
            }
        });
    }

    weak.dispatch(Action::new("inc")).unwrap();
    store.dispatch(Action::new("inc")).unwrap();
    drop(store);

    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(weak.upgrade().is_none());
    assert_eq!(weak.get_state(), Err(StoreError::StoreDropped));
}
