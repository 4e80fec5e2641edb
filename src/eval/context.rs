use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::{EvalError, EvalResult};

/// Variable bindings for one top-level evaluation.
///
/// Built by the caller before evaluation starts; evaluation only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvalContext {
    variables: HashMap<String, JsonValue>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: serde_json::Map<String, JsonValue>) -> Self {
        map.into_iter().collect()
    }

    pub fn with_variable<S: Into<String>, V: Into<JsonValue>>(mut self, name: S, value: V) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Resolves a variable name.
    ///
    /// A name bound verbatim wins. Otherwise the name is read as a dotted path:
    /// the first segment names a variable, later segments step into object
    /// fields or array indices (`orders.0.total`).
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        if let Some(value) = self.variables.get(name) {
            return Some(value);
        }
        let mut segments = name.split('.');
        let root = self.variables.get(segments.next()?)?;
        segments.try_fold(root, |current, segment| match current {
            JsonValue::Object(map) => map.get(segment),
            JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    pub fn lookup(&self, name: &str) -> EvalResult<&JsonValue> {
        self.get(name)
            .ok_or_else(|| EvalError::VariableNotFound(name.to_string()))
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for EvalContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
