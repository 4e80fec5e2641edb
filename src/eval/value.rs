use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::{EvalError, EvalResult};

/// The four scalar types an operator can be evaluated at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ScalarType {
    Int64,
    Float,
    String,
    Bool,
}

// 値の型システム
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    String(String),
    Bool(bool),
}

impl Value {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Value::Int64(_) => ScalarType::Int64,
            Value::Float64(_) => ScalarType::Float,
            Value::String(_) => ScalarType::String,
            Value::Bool(_) => ScalarType::Bool,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Maps dynamic data onto the scalar model without any coercion.
    ///
    /// Integers that fit in `i64` stay integers, every other number becomes a
    /// float. `null`, arrays and objects have no scalar form.
    pub fn from_json(value: &JsonValue) -> EvalResult<Self> {
        match value {
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int64(i)),
                None => n
                    .as_f64()
                    .map(Value::Float64)
                    .ok_or_else(|| EvalError::coercion(n, ScalarType::Float, "not representable")),
            },
            other => Err(EvalError::NoScalarForm(other.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int64(i) => write!(f, "{}", i),
            Value::Float64(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

// JSON has no encoding for NaN or infinities; they become null.
impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Int64(i) => JsonValue::from(i),
            Value::Float64(x) => serde_json::Number::from_f64(x)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s),
            Value::Bool(b) => JsonValue::Bool(b),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
