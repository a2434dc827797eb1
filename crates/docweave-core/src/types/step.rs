//! Step type definitions
//!
//! A Step is one planned tool invocation plus its (possibly templated)
//! input. Inputs are modeled as a tagged value tree so that the
//! previous-result placeholder is a variant of its own rather than a magic
//! string scattered through untyped JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire form of the previous-result placeholder.
pub const USE_PREVIOUS_RESULT: &str = "use_previous_result";

/// Templated input tree for a step.
///
/// Mirrors the JSON value space with one addition: `UsePrevious`, the
/// placeholder meaning "substitute the previous step's output, transformed
/// per the consuming tool's rules". On the wire it is the string
/// `"use_previous_result"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StepInput {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Substitute the previous step's result here.
    UsePrevious,
    Array(Vec<StepInput>),
    Object(BTreeMap<String, StepInput>),
}

impl StepInput {
    /// True if this node is the placeholder itself.
    pub fn is_use_previous(&self) -> bool {
        matches!(self, Self::UsePrevious)
    }

    /// True if the placeholder occurs anywhere in the tree.
    pub fn contains_use_previous(&self) -> bool {
        match self {
            Self::UsePrevious => true,
            Self::Array(items) => items.iter().any(Self::contains_use_previous),
            Self::Object(map) => map.values().any(Self::contains_use_previous),
            _ => false,
        }
    }

    /// Look up a key when this node is an object.
    pub fn get(&self, key: &str) -> Option<&StepInput> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// String content of this node, if it is a plain string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for StepInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) if s == USE_PREVIOUS_RESULT => Self::UsePrevious,
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<StepInput> for Value {
    fn from(input: StepInput) -> Self {
        match input {
            StepInput::Null => Value::Null,
            StepInput::Bool(b) => Value::Bool(b),
            StepInput::Number(n) => Value::Number(n),
            StepInput::String(s) => Value::String(s),
            StepInput::UsePrevious => Value::String(USE_PREVIOUS_RESULT.to_string()),
            StepInput::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            StepInput::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Default for StepInput {
    fn default() -> Self {
        Self::Null
    }
}

/// A single step in an execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Name of the tool to invoke
    pub tool: String,
    /// Input template for the tool
    #[serde(default)]
    pub input: StepInput,
}

impl Step {
    /// Create a step with an input template.
    pub fn new(tool: impl Into<String>, input: impl Into<StepInput>) -> Self {
        Self {
            tool: tool.into(),
            input: input.into(),
        }
    }
}
