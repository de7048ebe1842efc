//! Combined Todo Store
//!
//! This example demonstrates a store built from independent slices.
//!
//! Key concepts:
//! - combine_reducers over named slices
//! - Untouched slices keep their identity
//! - Action creators bound to the store's dispatch
//! - Observing state as a stream
//!
//! Run with: cargo run --example todos

use serde_json::{json, Value};
use statecraft::bind::{bind_action_creators, ActionCreator, ActionCreators};
use statecraft::combine::{combine_reducers, SliceMap};
use statecraft::{create_store, Action, Reducer};
use std::collections::BTreeMap;
use std::sync::Arc;

fn todos() -> Reducer<Value> {
    Reducer::with_initial(json!([]), |state: &Arc<Value>, action: &Action| {
        match (action.action_type().as_str(), state.as_array()) {
            ("todos/add", Some(items)) => {
                let mut items = items.clone();
                items.push(json!({ "text": action.payload().cloned(), "done": false }));
                Arc::new(Value::Array(items))
            }
            ("todos/toggle", Some(items)) => {
                let index = action.payload_as::<usize>();
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let mut item = item.clone();
                        if Some(i) == index {
                            let done = item["done"].as_bool().unwrap_or(false);
                            item["done"] = json!(!done);
                        }
                        item
                    })
                    .collect();
                Arc::new(Value::Array(items))
            }
            _ => Arc::clone(state),
        }
    })
}

fn filter() -> Reducer<Value> {
    Reducer::with_initial(json!("all"), |state: &Arc<Value>, action: &Action| {
        if action.is("filter/set") {
            Arc::new(action.payload().cloned().unwrap_or(Value::Null))
        } else {
            Arc::clone(state)
        }
    })
}

fn main() {
    println!("=== Combined Todo Store ===\n");

    let root = combine_reducers([("todos", todos()), ("filter", filter())]).unwrap();
    let store = create_store(root, None, None).unwrap();

    let subscription = store.observable().subscribe(|state: Arc<SliceMap<Value>>| {
        println!("  todos={} filter={}", state["todos"], state["filter"]);
    });

    let mut creators: BTreeMap<String, ActionCreator<SliceMap<Value>, Value>> = BTreeMap::new();
    creators.insert(
        "add".to_string(),
        Box::new(|text: Value| Action::new("todos/add").with_payload(text).into()),
    );
    creators.insert(
        "toggle".to_string(),
        Box::new(|index: Value| Action::new("todos/toggle").with_payload(index).into()),
    );
    creators.insert(
        "filter".to_string(),
        Box::new(|filter: Value| Action::new("filter/set").with_payload(filter).into()),
    );
    let actions = bind_action_creators(ActionCreators::Map(creators), store.dispatcher()).unwrap();
    println!("Bound creators: {:?}\n", actions.names());

    let before = store.get_state().unwrap();
    if let Some(add) = actions.get("add") {
        add(json!("write docs")).unwrap();
        add(json!("ship it")).unwrap();
    }
    if let Some(toggle) = actions.get("toggle") {
        toggle(json!(0)).unwrap();
    }
    let after = store.get_state().unwrap();

    println!(
        "\nFilter slice unchanged by todo actions: {}",
        Arc::ptr_eq(&before["filter"], &after["filter"])
    );

    if let Some(set_filter) = actions.get("filter") {
        set_filter(json!("done")).unwrap();
    }

    subscription.unsubscribe();
    println!("\nObserver unsubscribed; listeners left: {}", store.listener_count());

    println!("\n=== Example Complete ===");
}
