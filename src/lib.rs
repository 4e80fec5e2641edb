//! # rulecalc: typed expression evaluation for rules and filters
//!
//! Evaluates parsed condition expressions such as
//! `age >= 18 && status == "active"` against dynamic data.
//!
//! ```text
//! Expression tree + EvalContext → ExpressionEvaluator → Value | EvalError
//! ```
//!
//! - [`ast`]: expression nodes and operators
//! - [`eval`]: typed operator evaluators, function dispatch, type coercion
//! - [`config`]: evaluator settings
//! - [`error`]: crate level errors
//!
//! Parsing source text is not part of this crate; callers build [`Expression`]
//! trees themselves.

pub mod ast;
pub mod config;
pub mod error;
pub mod eval;

// Re-exports
pub use ast::*;
pub use config::{DivisionByZeroPolicy, EvalConfig};
pub use error::*;
pub use eval::*;

use lazy_static::lazy_static;

lazy_static! {
    static ref DEFAULT_EVALUATOR: ExpressionEvaluator = ExpressionEvaluator::default();
}

/// Evaluates `expr` with the default configuration and built-in functions.
pub fn evaluate(expr: &Expression, context: &EvalContext) -> EvalResult<Value> {
    DEFAULT_EVALUATOR.eval_expression(expr, context)
}

/// Evaluates `expr` against variables given as a JSON object.
pub fn evaluate_json(expr: &Expression, data: &str) -> InternalResult<Value> {
    let context: EvalContext = serde_json::from_str(data)
        .map_err(|e| Error::Context(format!("Failed to parse context: {}", e)))?;
    Ok(evaluate(expr, &context)?)
}
