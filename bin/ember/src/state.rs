use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of a device owned by the host automation platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LocalId(pub u64);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Integer(value)
    }
}

impl From<u32> for StateValue {
    fn from(value: u32) -> Self {
        StateValue::Integer(value.into())
    }
}

impl From<u64> for StateValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => StateValue::Integer(value),
            Err(_) => StateValue::Text(value.to_string()),
        }
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Number(value)
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Bool(value)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Text(value) => write!(f, "{value}"),
            StateValue::Integer(value) => write!(f, "{value}"),
            StateValue::Number(value) => write!(f, "{value}"),
            StateValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// A single key/value write against a host device, optionally carrying the
/// string the host should show and the number of decimals to keep.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateUpdate {
    pub key: &'static str,
    pub value: StateValue,
    pub display: Option<String>,
    pub precision: Option<u8>,
}

impl StateUpdate {
    pub fn new(key: &'static str, value: impl Into<StateValue>) -> Self {
        Self {
            key,
            value: value.into(),
            display: None,
            precision: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }
}

impl fmt::Display for StateUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display {
            Some(display) => write!(f, "{} = {} ({display})", self.key, self.value),
            None => write!(f, "{} = {}", self.key, self.value),
        }
    }
}

pub trait Host {
    fn update_states(&mut self, id: LocalId, states: Vec<StateUpdate>);
}
