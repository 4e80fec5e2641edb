//! Evaluation System
//!
//! Turns parsed expression trees into typed scalar results.
//!
//! # Core Components
//!
//! ## Binary Evaluator
//! One evaluator per scalar type (int64, float, string, bool). Each coerces
//! both operands to its type and applies the operator, or reports that the
//! operator is not defined for that type.
//!
//! ## Function Registry
//! Maps function names to handlers. Handlers get their arguments unevaluated
//! and evaluate them on demand, which is what lets `and`/`or` short-circuit.
//!
//! ## Expression Evaluator
//! Walks the tree: resolves variables from the [`context::EvalContext`],
//! picks the typed evaluator for binary nodes and dispatches calls.
//!
//! ## Type Caster
//! Converts dynamic JSON data into scalar values.

pub mod binary;
pub mod builtins;
pub mod cast;
pub mod context;
pub mod error;
pub mod expression;
pub mod function;
pub mod value;

pub use binary::BinaryEvaluator;
pub use cast::{JsonCaster, Operand, TypeCaster};
pub use context::EvalContext;
pub use error::{EvalError, EvalResult};
pub use expression::ExpressionEvaluator;
pub use function::{Function, FunctionRegistry, FunctionRegistryBuilder};
pub use value::{ScalarType, Value};
