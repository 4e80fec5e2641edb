//! Type coercion from dynamic runtime data to scalar values.

use std::fmt;

use serde_json::Value as JsonValue;
use tracing::trace;

use super::error::{EvalError, EvalResult};
use super::value::{ScalarType, Value};

/// Converts an arbitrary runtime value into one of the four scalar types.
///
/// Implementations must be free of side effects. On success the returned
/// value should carry the `target` representation; the operator evaluators
/// check this again and report a type assertion failure otherwise.
pub trait TypeCaster: Send + Sync {
    fn cast(&self, value: &JsonValue, target: ScalarType) -> EvalResult<Value>;

    /// Casts an already evaluated value.
    ///
    /// A value of the target type passes through untouched, so NaN and the
    /// infinities survive. Other values go through [`TypeCaster::cast`];
    /// non-finite floats have no JSON form and only convert to strings.
    fn cast_value(&self, value: &Value, target: ScalarType) -> EvalResult<Value> {
        match value {
            v if v.scalar_type() == target => Ok(v.clone()),
            Value::Float64(f) if !f.is_finite() => match target {
                ScalarType::String => Ok(Value::String(f.to_string())),
                _ => Err(EvalError::coercion(f, target, "not a finite number")),
            },
            v => self.cast(&JsonValue::from(v.clone()), target),
        }
    }
}

/// Anything the operator evaluators accept as an operand: raw dynamic data
/// or a value produced by evaluating a subexpression.
pub trait Operand: fmt::Display {
    fn cast_with(&self, caster: &dyn TypeCaster, target: ScalarType) -> EvalResult<Value>;
}

impl Operand for JsonValue {
    fn cast_with(&self, caster: &dyn TypeCaster, target: ScalarType) -> EvalResult<Value> {
        caster.cast(self, target)
    }
}

impl Operand for Value {
    fn cast_with(&self, caster: &dyn TypeCaster, target: ScalarType) -> EvalResult<Value> {
        caster.cast_value(self, target)
    }
}

/// Default caster over JSON data.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCaster;

impl JsonCaster {
    pub fn new() -> Self {
        Self
    }

    fn to_int(value: &JsonValue) -> EvalResult<i64> {
        match value {
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(i);
                }
                if n.is_u64() {
                    return Err(EvalError::coercion(n, ScalarType::Int64, "out of range"));
                }
                match n.as_f64() {
                    // i64::MAX as f64 rounds up to 2^63, hence the strict bound.
                    Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(f.trunc() as i64)
                    }
                    _ => Err(EvalError::coercion(n, ScalarType::Int64, "out of range")),
                }
            }
            JsonValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| EvalError::coercion(value, ScalarType::Int64, e.to_string())),
            other => Err(unsupported_source(other, ScalarType::Int64)),
        }
    }

    fn to_float(value: &JsonValue) -> EvalResult<f64> {
        match value {
            JsonValue::Number(n) => n
                .as_f64()
                .ok_or_else(|| EvalError::coercion(n, ScalarType::Float, "not representable")),
            JsonValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| EvalError::coercion(value, ScalarType::Float, e.to_string())),
            other => Err(unsupported_source(other, ScalarType::Float)),
        }
    }

    fn to_string(value: &JsonValue) -> EvalResult<String> {
        match value {
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::Bool(b) => Ok(b.to_string()),
            other => Err(unsupported_source(other, ScalarType::String)),
        }
    }

    fn to_bool(value: &JsonValue) -> EvalResult<bool> {
        match value {
            JsonValue::Bool(b) => Ok(*b),
            JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(EvalError::coercion(
                    value,
                    ScalarType::Bool,
                    "expected true, false, 1 or 0",
                )),
            },
            JsonValue::Number(n) => match n.as_i64() {
                Some(1) => Ok(true),
                Some(0) => Ok(false),
                _ => Err(EvalError::coercion(n, ScalarType::Bool, "expected 1 or 0")),
            },
            other => Err(unsupported_source(other, ScalarType::Bool)),
        }
    }
}

fn unsupported_source(value: &JsonValue, target: ScalarType) -> EvalError {
    let kind = match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    };
    EvalError::coercion(value, target, format!("unsupported source type {}", kind))
}

impl TypeCaster for JsonCaster {
    fn cast(&self, value: &JsonValue, target: ScalarType) -> EvalResult<Value> {
        trace!(%value, %target, "cast");
        match target {
            ScalarType::Int64 => Self::to_int(value).map(Value::Int64),
            ScalarType::Float => Self::to_float(value).map(Value::Float64),
            ScalarType::String => Self::to_string(value).map(Value::String),
            ScalarType::Bool => Self::to_bool(value).map(Value::Bool),
        }
    }
}
