use proptest::prelude::*;
use rulecalc::{BinaryEvaluator, BinaryOperator, EvalError, ScalarType, Value};
use serde_json::json;

const ALL_TYPES: [ScalarType; 4] = [
    ScalarType::Int64,
    ScalarType::Float,
    ScalarType::String,
    ScalarType::Bool,
];

fn evaluator() -> BinaryEvaluator {
    BinaryEvaluator::default()
}

fn arithmetic_op() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![
        Just(BinaryOperator::Add),
        Just(BinaryOperator::Subtract),
        Just(BinaryOperator::Multiply),
    ]
}

fn any_op() -> impl Strategy<Value = BinaryOperator> {
    use BinaryOperator::*;
    prop::sample::select(vec![
        Equal,
        NotEqual,
        GreaterThan,
        LessThan,
        GreaterThanEqual,
        LessThanEqual,
        Add,
        Subtract,
        Multiply,
        Divide,
        And,
        Or,
    ])
}

proptest! {
    #[test]
    fn int_arithmetic_matches_native(x in any::<i64>(), y in any::<i64>(), op in arithmetic_op()) {
        let expected = match op {
            BinaryOperator::Add => x.wrapping_add(y),
            BinaryOperator::Subtract => x.wrapping_sub(y),
            _ => x.wrapping_mul(y),
        };
        prop_assert_eq!(
            evaluator().eval_int(&json!(x), &json!(y), op),
            Ok(Value::Int64(expected))
        );
    }

    #[test]
    fn int_comparisons_match_native(x in any::<i64>(), y in any::<i64>()) {
        let e = evaluator();
        prop_assert_eq!(
            e.eval_int(&json!(x), &json!(y), BinaryOperator::LessThan),
            Ok(Value::Bool(x < y))
        );
        prop_assert_eq!(
            e.eval_int(&json!(x), &json!(y), BinaryOperator::GreaterThanEqual),
            Ok(Value::Bool(x >= y))
        );
        prop_assert_eq!(
            e.eval_int(&json!(x), &json!(y), BinaryOperator::NotEqual),
            Ok(Value::Bool(x != y))
        );
    }

    #[test]
    fn int_division_by_zero_is_zero(x in any::<i64>()) {
        prop_assert_eq!(
            evaluator().eval_int(&json!(x), &json!(0), BinaryOperator::Divide),
            Ok(Value::Int64(0))
        );
    }

    #[test]
    fn float_division_by_zero_is_zero(x in -1.0e12f64..1.0e12) {
        prop_assert_eq!(
            evaluator().eval_float(&json!(x), &json!(0.0), BinaryOperator::Divide),
            Ok(Value::Float64(0.0))
        );
    }

    #[test]
    fn float_arithmetic_matches_native(x in -1.0e12f64..1.0e12, y in -1.0e12f64..1.0e12) {
        let e = evaluator();
        prop_assert_eq!(
            e.eval_float(&json!(x), &json!(y), BinaryOperator::Add),
            Ok(Value::Float64(x + y))
        );
        prop_assert_eq!(
            e.eval_float(&json!(x), &json!(y), BinaryOperator::Multiply),
            Ok(Value::Float64(x * y))
        );
        prop_assert_eq!(
            e.eval_float(&json!(x), &json!(y), BinaryOperator::LessThanEqual),
            Ok(Value::Bool(x <= y))
        );
    }

    #[test]
    fn string_equality_is_exact(a in ".*", b in ".*") {
        let e = evaluator();
        prop_assert_eq!(
            e.eval_string(&json!(a.as_str()), &json!(b.as_str()), BinaryOperator::Equal),
            Ok(Value::Bool(a == b))
        );
        prop_assert_eq!(
            e.eval_string(&json!(a.as_str()), &json!(a.as_str()), BinaryOperator::Equal),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn results_carry_the_evaluator_tag(x in any::<i64>(), y in any::<i64>(), op in any_op()) {
        let e = evaluator();
        for kind in ALL_TYPES {
            if let Ok(value) = e.eval(kind, &json!(x), &json!(y), op) {
                let expected = if op.is_comparison() || op.is_logical() {
                    ScalarType::Bool
                } else {
                    kind
                };
                prop_assert_eq!(value.scalar_type(), expected);
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent(x in any::<i64>(), y in any::<i64>(), op in any_op()) {
        let e = evaluator();
        for kind in ALL_TYPES {
            prop_assert_eq!(
                e.eval(kind, &json!(x), &json!(y), op),
                e.eval(kind, &json!(x), &json!(y), op)
            );
        }
    }
}

#[test]
fn test_string_rejects_everything_but_equality() {
    let e = evaluator();
    assert_eq!(
        e.eval_string(&json!("a"), &json!("b"), BinaryOperator::Add),
        Err(EvalError::UnsupportedOperator(BinaryOperator::Add))
    );
}

#[test]
fn test_bool_truth_table() {
    let e = evaluator();
    assert_eq!(
        e.eval_bool(&json!(true), &json!(false), BinaryOperator::And),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        e.eval_bool(&json!(true), &json!(false), BinaryOperator::Or),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        e.eval_bool(&json!(true), &json!(false), BinaryOperator::GreaterThan),
        Err(EvalError::UnsupportedOperator(BinaryOperator::GreaterThan))
    );
}

#[test]
fn test_mismatched_int_operand() {
    let result = evaluator().eval_int(&json!(3), &json!("x"), BinaryOperator::Equal);
    assert!(matches!(
        result,
        Err(EvalError::Coercion { .. }) | Err(EvalError::TypeAssertion { .. })
    ));
}
