//! Actions: the immutable change requests dispatched to a store.
//!
//! An action is a plain record with a required `type` discriminator and an
//! optional payload, following the flux-standard-action convention
//! (`payload`, `meta`, `error`). The discriminator is a string so that it
//! survives serialization unchanged, which is what replay and persistence
//! tooling key on.

use crate::core::StoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

const INTERNAL_PREFIX: &str = "@@statecraft/";

/// Discriminator identifying the kind of an [`Action`].
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionType(String);

impl ActionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this type is reserved for the store's own bookkeeping actions.
    pub fn is_internal(&self) -> bool {
        self.0.starts_with(INTERNAL_PREFIX)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionType {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ActionType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for ActionType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActionType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Action types the store dispatches on its own.
///
/// Every reducer must treat these as unrecognized and return the state it
/// was given (or its initial state when given none).
pub struct ActionTypes;

impl ActionTypes {
    /// Type used for the initialization dispatch. Randomized on every call.
    pub fn init() -> ActionType {
        ActionType(format!("{INTERNAL_PREFIX}INIT.{}", random_fragment()))
    }

    /// Type dispatched by `replace_reducer`.
    pub fn replace() -> ActionType {
        ActionType(format!("{INTERNAL_PREFIX}REPLACE"))
    }

    /// Type the slice combinator sends to check reducers against an unknown action.
    pub fn probe_unknown_action() -> ActionType {
        ActionType(format!(
            "{INTERNAL_PREFIX}PROBE_UNKNOWN_ACTION.{}",
            random_fragment()
        ))
    }
}

fn random_fragment() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}.{}", &id[..6], &id[6..12])
}

/// A change request.
///
/// Actions are never mutated once built; the builder-style methods consume
/// and return the value.
///
/// # Example
///
/// ```rust
/// use statecraft::Action;
/// use serde_json::json;
///
/// let action = Action::new("todos/add").with_payload(json!({ "text": "write docs" }));
///
/// assert_eq!(action.action_type(), "todos/add");
/// assert_eq!(action.payload(), Some(&json!({ "text": "write docs" })));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    error: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Action {
    pub fn new(kind: impl Into<ActionType>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            meta: None,
            error: false,
            extra: Map::new(),
        }
    }

    /// Build an action from an arbitrary JSON record.
    ///
    /// The value must be an object carrying a non-empty string `type`.
    /// Fields other than `type`, `payload`, `meta` and `error` are kept and
    /// readable through [`Action::field`].
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let Value::Object(record) = &value else {
            return Err(StoreError::InvalidAction(format!(
                "actions must be plain records, got {}",
                json_kind(&value)
            )));
        };

        match record.get("type") {
            None => {
                return Err(StoreError::InvalidAction(
                    "actions may not have an undefined \"type\" field".to_string(),
                ))
            }
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(StoreError::InvalidAction(format!(
                    "action \"type\" must be a string, got {}",
                    json_kind(other)
                )))
            }
        }

        let action: Action = serde_json::from_value(value)
            .map_err(|e| StoreError::InvalidAction(e.to_string()))?;
        action.validate()?;
        Ok(action)
    }

    /// Serialize this action back into a JSON record.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Attach any serializable value as the payload.
    pub fn try_with_payload<T: Serialize>(mut self, payload: &T) -> Result<Self, StoreError> {
        let value =
            serde_json::to_value(payload).map_err(|e| StoreError::InvalidAction(e.to_string()))?;
        self.payload = Some(value);
        Ok(self)
    }

    pub fn with_meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Mark the action as representing an error; the payload is then
    /// conventionally the error value.
    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn action_type(&self) -> &ActionType {
        &self.kind
    }

    /// Shorthand for checking the discriminator.
    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_str() == kind
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Deserialize the payload into `T`. `None` if absent or of another shape.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.payload
            .as_ref()
            .and_then(|p| serde_json::from_value(p.clone()).ok())
    }

    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Check the discriminator is usable.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.kind.as_str().is_empty() {
            return Err(StoreError::InvalidAction(
                "action \"type\" may not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl TryFrom<Value> for Action {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Action::from_value(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
