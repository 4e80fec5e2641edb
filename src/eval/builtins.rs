// 組み込み関数

use super::context::EvalContext;
use super::error::{EvalError, EvalResult};
use super::expression::ExpressionEvaluator;
use super::function::FunctionRegistryBuilder;
use super::value::Value;
use crate::ast::Expression;

pub fn register(builder: FunctionRegistryBuilder) -> FunctionRegistryBuilder {
    builder
        .register("and", eval_and_function)
        .register("or", eval_or_function)
        .register("not", eval_not_function)
        .register("if", eval_if_function)
        .register("len", eval_len_function)
        .register("contains", eval_contains_function)
}

fn expect_arity(function: &str, args: &[Expression], expected: usize) -> EvalResult<()> {
    if args.len() != expected {
        return Err(EvalError::invalid_arguments(
            function,
            format!("expected {} argument(s), got {}", expected, args.len()),
        ));
    }
    Ok(())
}

fn expect_some(function: &str, args: &[Expression]) -> EvalResult<()> {
    if args.is_empty() {
        return Err(EvalError::invalid_arguments(
            function,
            "expected at least one argument",
        ));
    }
    Ok(())
}

/// `and(a, b, ...)` stops at the first false argument.
fn eval_and_function(
    evaluator: &ExpressionEvaluator,
    args: &[Expression],
    context: &EvalContext,
) -> EvalResult<Value> {
    expect_some("and", args)?;
    for arg in args {
        if !evaluator.eval_bool(arg, context)? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// `or(a, b, ...)` stops at the first true argument.
fn eval_or_function(
    evaluator: &ExpressionEvaluator,
    args: &[Expression],
    context: &EvalContext,
) -> EvalResult<Value> {
    expect_some("or", args)?;
    for arg in args {
        if evaluator.eval_bool(arg, context)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn eval_not_function(
    evaluator: &ExpressionEvaluator,
    args: &[Expression],
    context: &EvalContext,
) -> EvalResult<Value> {
    expect_arity("not", args, 1)?;
    Ok(Value::Bool(!evaluator.eval_bool(&args[0], context)?))
}

/// `if(cond, then, else)` evaluates only the selected branch.
fn eval_if_function(
    evaluator: &ExpressionEvaluator,
    args: &[Expression],
    context: &EvalContext,
) -> EvalResult<Value> {
    expect_arity("if", args, 3)?;
    let branch = if evaluator.eval_bool(&args[0], context)? {
        &args[1]
    } else {
        &args[2]
    };
    evaluator.eval_expression(branch, context)
}

fn eval_len_function(
    evaluator: &ExpressionEvaluator,
    args: &[Expression],
    context: &EvalContext,
) -> EvalResult<Value> {
    expect_arity("len", args, 1)?;
    let s = evaluator.eval_string(&args[0], context)?;
    Ok(Value::Int64(s.chars().count() as i64))
}

fn eval_contains_function(
    evaluator: &ExpressionEvaluator,
    args: &[Expression],
    context: &EvalContext,
) -> EvalResult<Value> {
    expect_arity("contains", args, 2)?;
    let haystack = evaluator.eval_string(&args[0], context)?;
    let needle = evaluator.eval_string(&args[1], context)?;
    Ok(Value::Bool(haystack.contains(needle.as_str())))
}
