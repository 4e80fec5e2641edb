use std::sync::Arc;

use tracing::{debug, instrument};

use super::binary::BinaryEvaluator;
use super::cast::{JsonCaster, TypeCaster};
use super::context::EvalContext;
use super::error::{EvalError, EvalResult};
use super::function::FunctionRegistry;
use super::value::{ScalarType, Value};
use crate::ast::{BinaryOperator, Expression, Literal};
use crate::config::EvalConfig;

/// Walks an expression tree against an [`EvalContext`].
///
/// Binary nodes are routed to the typed evaluator matching their operands,
/// call nodes to the function registry.
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    binary: BinaryEvaluator,
    registry: Arc<FunctionRegistry>,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::from_config(&EvalConfig::default())
    }
}

impl ExpressionEvaluator {
    pub fn new(binary: BinaryEvaluator, registry: Arc<FunctionRegistry>) -> Self {
        Self { binary, registry }
    }

    pub fn from_config(config: &EvalConfig) -> Self {
        Self::from_config_with_caster(config, Arc::new(JsonCaster::new()))
    }

    pub fn from_config_with_caster(config: &EvalConfig, caster: Arc<dyn TypeCaster>) -> Self {
        let registry = if config.builtins {
            FunctionRegistry::with_builtins()
        } else {
            FunctionRegistry::default()
        };
        Self::new(
            BinaryEvaluator::new(caster, config.division_by_zero),
            Arc::new(registry),
        )
    }

    pub fn binary(&self) -> &BinaryEvaluator {
        &self.binary
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn eval_expression(&self, expr: &Expression, context: &EvalContext) -> EvalResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(Self::eval_literal(lit)),
            Expression::Variable(name) => self.eval_variable(name, context),
            Expression::BinaryOp { op, left, right } => {
                self.eval_binary_op(*op, left, right, context)
            }
            Expression::FunctionCall {
                function,
                arguments,
            } => self.eval_function_call(function, arguments, context),
        }
    }

    /// Evaluates `expr` and coerces the result to `target`.
    pub fn eval_as(
        &self,
        expr: &Expression,
        context: &EvalContext,
        target: ScalarType,
    ) -> EvalResult<Value> {
        let value = self.eval_expression(expr, context)?;
        if value.scalar_type() == target {
            return Ok(value);
        }
        let cast = self.binary.caster().cast_value(&value, target)?;
        if cast.scalar_type() != target {
            return Err(EvalError::coercion(
                value,
                target,
                format!("caster returned {}", cast.scalar_type()),
            ));
        }
        Ok(cast)
    }

    pub fn eval_bool(&self, expr: &Expression, context: &EvalContext) -> EvalResult<bool> {
        match self.eval_as(expr, context, ScalarType::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::coercion(other, ScalarType::Bool, "not a bool")),
        }
    }

    pub fn eval_string(&self, expr: &Expression, context: &EvalContext) -> EvalResult<String> {
        match self.eval_as(expr, context, ScalarType::String)? {
            Value::String(s) => Ok(s),
            other => Err(EvalError::coercion(other, ScalarType::String, "not a string")),
        }
    }

    fn eval_literal(lit: &Literal) -> Value {
        match lit {
            Literal::Integer(i) => Value::Int64(*i),
            Literal::Float(f) => Value::Float64(*f),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Bool(*b),
        }
    }

    fn eval_variable(&self, name: &str, context: &EvalContext) -> EvalResult<Value> {
        Value::from_json(context.lookup(name)?)
    }

    // 二項演算の評価
    // Both sides are evaluated before the operator is applied; an error on
    // either side ends the evaluation.
    fn eval_binary_op(
        &self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
        context: &EvalContext,
    ) -> EvalResult<Value> {
        let left_val = self.eval_expression(left, context)?;
        let right_val = self.eval_expression(right, context)?;
        let kind = infer_operand_type(op, &left_val, &right_val);
        debug!(%op, %kind, "eval binary op");
        self.binary.eval(kind, &left_val, &right_val, op)
    }

    #[instrument(level = "debug", skip(self, arguments, context))]
    fn eval_function_call(
        &self,
        function: &str,
        arguments: &[Expression],
        context: &EvalContext,
    ) -> EvalResult<Value> {
        self.registry.call(function, arguments, self, context)
    }
}

/// Picks the evaluator for a binary node from its operand values.
///
/// Logical operators always run at `Bool`. Otherwise the widest operand type
/// wins: String over Float over Int64 over Bool.
pub fn infer_operand_type(op: BinaryOperator, left: &Value, right: &Value) -> ScalarType {
    if op.is_logical() {
        return ScalarType::Bool;
    }
    let types = [left.scalar_type(), right.scalar_type()];
    [
        ScalarType::String,
        ScalarType::Float,
        ScalarType::Int64,
    ]
    .into_iter()
    .find(|t| types.contains(t))
    .unwrap_or(ScalarType::Bool)
}
