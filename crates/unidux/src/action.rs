//! Actions and their validation
//!
//! Every action carries a `type` discriminator. Applications normally model
//! their actions as an enum and map each variant to a constant string, but a
//! dynamically shaped [`RawAction`] is available for tooling that works with
//! serialized actions.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Action type used when a reducer is asked for its default state
pub const INIT_ACTION_TYPE: &str = "@@INIT";

/// Prefix reserved for store-internal action types
pub const RESERVED_PREFIX: &str = "@@";

/// A record describing an intended state change
pub trait Action: Debug {
    /// The discriminator of this action, e.g. `"INCREMENT"`
    fn action_type(&self) -> &str;
}

/// Check that an action can be dispatched
///
/// The type must be non-empty and must not use the reserved `@@` prefix,
/// so application actions can never collide with [`INIT_ACTION_TYPE`].
pub fn validate<A: Action + ?Sized>(action: &A) -> Result<(), StoreError> {
    let action_type = action.action_type();

    if action_type.is_empty() {
        return Err(StoreError::InvalidAction(
            "action type must not be empty".to_string(),
        ));
    }

    if action_type.starts_with(RESERVED_PREFIX) {
        return Err(StoreError::InvalidAction(format!(
            "action type \"{}\" uses the reserved prefix \"{}\"",
            action_type, RESERVED_PREFIX
        )));
    }

    Ok(())
}

/// Dynamically shaped action: a `type` plus arbitrary payload fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RawAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Look up a payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

impl Action for RawAction {
    fn action_type(&self) -> &str {
        &self.action_type
    }
}

impl TryFrom<Value> for RawAction {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(StoreError::InvalidAction(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )));
            }
        };

        match fields.remove("type") {
            Some(Value::String(action_type)) => Ok(Self {
                action_type,
                payload: fields,
            }),
            Some(other) => Err(StoreError::InvalidAction(format!(
                "`type` must be a string, got {}",
                json_kind(&other)
            ))),
            None => Err(StoreError::InvalidAction(
                "missing `type` field".to_string(),
            )),
        }
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
