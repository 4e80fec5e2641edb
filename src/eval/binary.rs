//! Typed operator evaluators.
//!
//! One evaluator per scalar type. Each coerces both operands through the
//! configured [`TypeCaster`] and applies the operator if that type family
//! supports it:
//!
//! | Type    | == != | > < >= <= | + - * | /   | && \|\| |
//! |---------|-------|-----------|-------|-----|---------|
//! | Int64   | yes   | yes       | yes   | yes | no      |
//! | Float   | yes   | yes       | yes   | yes | no      |
//! | String  | yes   | no        | no    | no  | no      |
//! | Bool    | yes   | no        | no    | no  | yes     |

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::cast::{JsonCaster, Operand, TypeCaster};
use super::error::{EvalError, EvalResult};
use super::value::{ScalarType, Value};
use crate::ast::BinaryOperator;
use crate::config::DivisionByZeroPolicy;

#[derive(Clone)]
pub struct BinaryEvaluator {
    caster: Arc<dyn TypeCaster>,
    division_by_zero: DivisionByZeroPolicy,
}

impl Default for BinaryEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(JsonCaster::new()), DivisionByZeroPolicy::default())
    }
}

impl fmt::Debug for BinaryEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryEvaluator")
            .field("division_by_zero", &self.division_by_zero)
            .finish_non_exhaustive()
    }
}

impl BinaryEvaluator {
    pub fn new(caster: Arc<dyn TypeCaster>, division_by_zero: DivisionByZeroPolicy) -> Self {
        Self {
            caster,
            division_by_zero,
        }
    }

    pub fn caster(&self) -> &dyn TypeCaster {
        self.caster.as_ref()
    }

    pub fn division_by_zero(&self) -> DivisionByZeroPolicy {
        self.division_by_zero
    }

    /// Evaluates `x op y` with the evaluator for `kind`.
    pub fn eval<T: Operand>(
        &self,
        kind: ScalarType,
        x: &T,
        y: &T,
        op: BinaryOperator,
    ) -> EvalResult<Value> {
        trace!(%kind, %x, %op, %y, "binary");
        match kind {
            ScalarType::Int64 => self.eval_int(x, y, op),
            ScalarType::Float => self.eval_float(x, y, op),
            ScalarType::String => self.eval_string(x, y, op),
            ScalarType::Bool => self.eval_bool(x, y, op),
        }
    }

    pub fn eval_int<T: Operand>(&self, x: &T, y: &T, op: BinaryOperator) -> EvalResult<Value> {
        let (a, b) = match self.coerce(x, y, ScalarType::Int64)? {
            (Value::Int64(a), Value::Int64(b)) => (a, b),
            _ => return Err(type_assertion(x, op, y)),
        };

        use BinaryOperator::*;
        Ok(match op {
            Equal => Value::Bool(a == b),
            NotEqual => Value::Bool(a != b),
            GreaterThan => Value::Bool(a > b),
            LessThan => Value::Bool(a < b),
            GreaterThanEqual => Value::Bool(a >= b),
            LessThanEqual => Value::Bool(a <= b),
            Add => Value::Int64(a.wrapping_add(b)),
            Subtract => Value::Int64(a.wrapping_sub(b)),
            Multiply => Value::Int64(a.wrapping_mul(b)),
            Divide => {
                if b == 0 {
                    return self.divided_by_zero(Value::Int64(0));
                }
                Value::Int64(a.wrapping_div(b))
            }
            And | Or => return Err(EvalError::UnsupportedOperator(op)),
        })
    }

    pub fn eval_float<T: Operand>(
        &self,
        x: &T,
        y: &T,
        op: BinaryOperator,
    ) -> EvalResult<Value> {
        let (a, b) = match self.coerce(x, y, ScalarType::Float)? {
            (Value::Float64(a), Value::Float64(b)) => (a, b),
            _ => return Err(type_assertion(x, op, y)),
        };

        use BinaryOperator::*;
        Ok(match op {
            Equal => Value::Bool(a == b),
            NotEqual => Value::Bool(a != b),
            GreaterThan => Value::Bool(a > b),
            LessThan => Value::Bool(a < b),
            GreaterThanEqual => Value::Bool(a >= b),
            LessThanEqual => Value::Bool(a <= b),
            Add => Value::Float64(a + b),
            Subtract => Value::Float64(a - b),
            Multiply => Value::Float64(a * b),
            Divide => {
                // -0.0 == 0.0 as well
                if b == 0.0 {
                    return self.divided_by_zero(Value::Float64(0.0));
                }
                Value::Float64(a / b)
            }
            And | Or => return Err(EvalError::UnsupportedOperator(op)),
        })
    }

    pub fn eval_string<T: Operand>(
        &self,
        x: &T,
        y: &T,
        op: BinaryOperator,
    ) -> EvalResult<Value> {
        let (a, b) = match self.coerce(x, y, ScalarType::String)? {
            (Value::String(a), Value::String(b)) => (a, b),
            _ => return Err(type_assertion(x, op, y)),
        };

        match op {
            BinaryOperator::Equal => Ok(Value::Bool(a == b)),
            BinaryOperator::NotEqual => Ok(Value::Bool(a != b)),
            _ => Err(EvalError::UnsupportedOperator(op)),
        }
    }

    pub fn eval_bool<T: Operand>(&self, x: &T, y: &T, op: BinaryOperator) -> EvalResult<Value> {
        let (a, b) = match self.coerce(x, y, ScalarType::Bool)? {
            (Value::Bool(a), Value::Bool(b)) => (a, b),
            _ => return Err(type_assertion(x, op, y)),
        };

        match op {
            BinaryOperator::And => Ok(Value::Bool(a && b)),
            BinaryOperator::Or => Ok(Value::Bool(a || b)),
            BinaryOperator::Equal => Ok(Value::Bool(a == b)),
            BinaryOperator::NotEqual => Ok(Value::Bool(a != b)),
            _ => Err(EvalError::UnsupportedOperator(op)),
        }
    }

    // The left operand is coerced first; a failure there skips the right one.
    fn coerce<T: Operand>(&self, x: &T, y: &T, target: ScalarType) -> EvalResult<(Value, Value)> {
        let x = x.cast_with(self.caster.as_ref(), target)?;
        let y = y.cast_with(self.caster.as_ref(), target)?;
        Ok((x, y))
    }

    fn divided_by_zero(&self, zero: Value) -> EvalResult<Value> {
        match self.division_by_zero {
            DivisionByZeroPolicy::Zero => {
                debug!("division by zero, substituting {}", zero);
                Ok(zero)
            }
            DivisionByZeroPolicy::Error => Err(EvalError::DivisionByZero),
        }
    }
}

fn type_assertion<T: Operand>(x: &T, op: BinaryOperator, y: &T) -> EvalError {
    EvalError::TypeAssertion {
        left: x.to_string(),
        op,
        right: y.to_string(),
    }
}
