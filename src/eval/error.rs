use thiserror::Error;

use super::value::{ScalarType, Value};
use crate::ast::BinaryOperator;

/// Errors produced while evaluating an expression.
///
/// Every failure travels through the `Err` arm of [`EvalResult`]; nothing is
/// recovered locally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// An operand could not be converted to the type the operator requires.
    #[error("cannot cast {value} to {target}: {reason}")]
    Coercion {
        value: String,
        target: ScalarType,
        reason: String,
    },
    /// The caster reported success but returned the wrong representation.
    #[error("{left} {op} {right} eval failed")]
    TypeAssertion {
        left: String,
        op: BinaryOperator,
        right: String,
    },
    /// Dynamic data such as `null`, an array or an object has no scalar value.
    #[error("value has no scalar form: {0}")]
    NoScalarForm(String),
    #[error("unsupported binary operator: {0}")]
    UnsupportedOperator(BinaryOperator),
    #[error("{0} func not support")]
    UnknownFunction(String),
    #[error("variable not found: {0}")]
    VariableNotFound(String),
    #[error("invalid arguments for {function}: {message}")]
    InvalidArguments { function: String, message: String },
    #[error("division by zero")]
    DivisionByZero,
}

pub type EvalResult<T = Value> = Result<T, EvalError>;

impl EvalError {
    pub fn coercion<V: ToString, R: Into<String>>(value: V, target: ScalarType, reason: R) -> Self {
        EvalError::Coercion {
            value: value.to_string(),
            target,
            reason: reason.into(),
        }
    }

    pub fn invalid_arguments<F: Into<String>, M: Into<String>>(function: F, message: M) -> Self {
        EvalError::InvalidArguments {
            function: function.into(),
            message: message.into(),
        }
    }
}
