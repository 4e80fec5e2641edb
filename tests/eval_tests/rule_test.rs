use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use rulecalc::{
    evaluate, evaluate_json, BinaryOperator, DivisionByZeroPolicy, Error, EvalConfig,
    EvalContext, EvalError, EvalResult, Expression, ExpressionEvaluator, FunctionRegistry,
    ScalarType, Value,
};
use serde_json::json;

use BinaryOperator::*;

fn adult_and_active() -> Expression {
    Expression::binary(
        And,
        Expression::binary(GreaterThanEqual, Expression::var("age"), Expression::int(18)),
        Expression::binary(Equal, Expression::var("status"), Expression::string("active")),
    )
}

#[test]
fn test_evaluate_rule_against_json() {
    let result = evaluate_json(&adult_and_active(), r#"{"age": 21, "status": "active"}"#);
    assert_eq!(result.unwrap(), Value::Bool(true));

    let result = evaluate_json(&adult_and_active(), r#"{"age": "17", "status": "active"}"#);
    // "17" is a string, so the comparison runs at string type and fails
    assert!(matches!(
        result,
        Err(Error::Eval(EvalError::UnsupportedOperator(GreaterThanEqual)))
    ));

    let result = evaluate_json(&adult_and_active(), "[1, 2]");
    assert!(matches!(result, Err(Error::Context(_))));
}

#[test]
fn test_missing_variable_stops_evaluation() {
    let context = EvalContext::new().with_variable("age", 40);
    assert_eq!(
        evaluate(&adult_and_active(), &context),
        Err(EvalError::VariableNotFound("status".to_string()))
    );
}

#[test]
fn test_nested_data_paths() {
    let context: EvalContext = serde_json::from_value(json!({
        "order": {"total": 120.5, "items": [{"sku": "A-1"}, {"sku": "B-2"}]},
        "limit": 100
    }))
    .unwrap();
    let expr = Expression::binary(
        And,
        Expression::binary(GreaterThan, Expression::var("order.total"), Expression::var("limit")),
        Expression::binary(
            Equal,
            Expression::var("order.items.1.sku"),
            Expression::string("B-2"),
        ),
    );
    assert_eq!(evaluate(&expr, &context), Ok(Value::Bool(true)));
}

#[test]
fn test_custom_function_sees_context() {
    let registry = FunctionRegistry::builder()
        .register_builtins()
        .register(
            "coalesce",
            |evaluator: &ExpressionEvaluator, args: &[Expression], context: &EvalContext| {
                for arg in args {
                    match evaluator.eval_expression(arg, context) {
                        Err(EvalError::VariableNotFound(_)) => continue,
                        other => return other,
                    }
                }
                Err(EvalError::invalid_arguments("coalesce", "no value found"))
            },
        )
        .build();
    let evaluator = ExpressionEvaluator::new(Default::default(), Arc::new(registry));
    let context = EvalContext::new().with_variable("nickname", "Al");

    let expr = Expression::call(
        "coalesce",
        vec![Expression::var("display_name"), Expression::var("nickname")],
    );
    assert_eq!(
        evaluator.eval_expression(&expr, &context),
        Ok(Value::String("Al".to_string()))
    );

    let expr = Expression::call("foo", vec![Expression::int(1)]);
    assert_eq!(
        evaluator.eval_expression(&expr, &context),
        Err(EvalError::UnknownFunction("foo".to_string()))
    );
}

#[test]
fn test_strict_division_config() {
    let config: EvalConfig = rulecalc::config::from_str(r#"{"division_by_zero": "error"}"#).unwrap();
    assert_eq!(config.division_by_zero, DivisionByZeroPolicy::Error);
    let evaluator = ExpressionEvaluator::from_config(&config);
    let expr = Expression::binary(Divide, Expression::float(1.0), Expression::float(0.0));
    assert_eq!(
        evaluator.eval_expression(&expr, &EvalContext::new()),
        Err(EvalError::DivisionByZero)
    );
    assert_eq!(
        evaluate(&expr, &EvalContext::new()),
        Ok(Value::Float64(0.0))
    );
}

#[test]
fn test_shared_evaluator_across_threads() {
    let evaluator = Arc::new(ExpressionEvaluator::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let evaluator = evaluator.clone();
            thread::spawn(move || -> EvalResult<Value> {
                let context = EvalContext::new()
                    .with_variable("age", 10 + i * 2)
                    .with_variable("status", "active");
                evaluator.eval_expression(&adult_and_active(), &context)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let expected: Vec<EvalResult<Value>> = (0..8)
        .map(|i| Ok(Value::Bool(10 + i * 2 >= 18)))
        .collect();
    assert_eq!(results, expected);
}

#[test]
fn test_result_tag_matches_expression_type() {
    let context = EvalContext::new();
    let cases = [
        (Expression::binary(Add, Expression::int(1), Expression::int(2)), ScalarType::Int64),
        (Expression::binary(Add, Expression::int(1), Expression::float(2.0)), ScalarType::Float),
        (Expression::binary(Equal, Expression::string("a"), Expression::int(2)), ScalarType::Bool),
        (Expression::call("len", vec![Expression::string("abc")]), ScalarType::Int64),
    ];
    for (expr, expected) in cases {
        assert_eq!(evaluate(&expr, &context).unwrap().scalar_type(), expected);
    }
}

#[test]
fn test_overflowed_float_feeds_comparison() {
    let context = EvalContext::new().with_variable("scale", 10.0);
    let product = Expression::binary(Multiply, Expression::float(1e308), Expression::var("scale"));
    assert_eq!(
        evaluate(
            &Expression::binary(GreaterThan, product, Expression::float(1.0)),
            &context
        ),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        evaluate(
            &Expression::binary(
                NotEqual,
                Expression::float(f64::NAN),
                Expression::float(f64::NAN)
            ),
            &context
        ),
        Ok(Value::Bool(true))
    );
}
