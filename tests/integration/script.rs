//! Evaluator integration tests
//!
//! Exercises the command language through the public evaluator API, plus
//! property tests for the completeness predicate.

use proptest::prelude::*;

use sofash::repl::EvalResult;
use sofash::script::{is_complete, Evaluator, Value};

fn value(
    evaluator: &mut Evaluator,
    code: &str,
) -> Value {
    match evaluator.evaluate(code) {
        EvalResult::Value(v) => v,
        other => panic!("expected value for {:?}, got {:?}", code, other),
    }
}

#[test]
fn test_session_example() {
    let mut evaluator = Evaluator::new();
    assert_eq!(value(&mut evaluator, "1 + 1"), Value::Number(2.0));
    assert!(matches!(evaluator.evaluate("var x = 5"), EvalResult::Ok));
    assert_eq!(value(&mut evaluator, "x * 2"), Value::Number(10.0));
}

#[test]
fn test_json_round_trip_through_builtins() {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate(r#"var doc = parse("{\"a\": [1, 2], \"b\": null}")"#);
    assert_eq!(value(&mut evaluator, "doc.a[1]"), Value::Number(2.0));
    assert_eq!(
        value(&mut evaluator, "stringify(doc.a)"),
        Value::Str("[1,2]".to_string())
    );
    assert!(matches!(evaluator.evaluate("doc.b"), EvalResult::Ok));
}

#[test]
fn test_map_and_list_literals() {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate(r#"var req = {db: "test_suite_db", revs: ["1-abc"]}"#);
    assert_eq!(
        value(&mut evaluator, "req.db"),
        Value::Str("test_suite_db".to_string())
    );
    assert_eq!(value(&mut evaluator, "len(req.revs)"), Value::Number(1.0));
    assert_eq!(
        value(&mut evaluator, "keys(req)"),
        Value::List(vec![
            Value::Str("db".to_string()),
            Value::Str("revs".to_string()),
        ])
    );
}

#[test]
fn test_comparisons_and_logic() {
    let mut evaluator = Evaluator::new();
    assert_eq!(value(&mut evaluator, "1 < 2 && \"a\" < \"b\""), Value::Bool(true));
    assert_eq!(value(&mut evaluator, "[1] == [1]"), Value::Bool(true));
    assert_eq!(value(&mut evaluator, "null == null"), Value::Bool(true));
}

#[test]
fn test_reported_errors_keep_state() {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate("var n = 1");
    for bad in ["n +", "unknown()", "1 + true", "n = ", "\"open"] {
        match evaluator.evaluate(bad) {
            EvalResult::Error(msg) => assert!(!msg.is_empty(), "no message for {:?}", bad),
            other => panic!("expected error for {:?}, got {:?}", bad, other),
        }
    }
    assert_eq!(value(&mut evaluator, "n"), Value::Number(1.0));
}

#[test]
fn test_typeof_builtin() {
    let mut evaluator = Evaluator::new();
    assert_eq!(
        value(&mut evaluator, "typeof(null) + \"/\" + typeof(1) + \"/\" + typeof([])"),
        Value::Str("null/number/list".to_string())
    );
}

proptest! {
    /// Text with no delimiters, quotes, or escapes is always one
    /// complete unit
    #[test]
    fn prop_plain_text_is_complete(text in "[a-z0-9 .,;+*=-]{0,64}") {
        prop_assert!(is_complete(&text));
    }

    /// Wrapping plain text in a group keeps it complete; leaving the
    /// group open keeps it incomplete
    #[test]
    fn prop_group_must_close(text in "[a-z0-9 ,+]{0,32}") {
        let closed = format!("({})", text);
        let open_paren = format!("({}", text);
        let open_bracket = format!("[{}", text);
        let open_brace = format!("{{{}", text);
        prop_assert!(is_complete(&closed));
        prop_assert!(!is_complete(&open_paren));
        prop_assert!(!is_complete(&open_bracket));
        prop_assert!(!is_complete(&open_brace));
    }

    /// An unterminated string never reads as complete, however much
    /// plain text follows the quote
    #[test]
    fn prop_open_string_is_incomplete(text in "[a-z0-9 ]{0,32}") {
        let open_string = format!("\"{}", text);
        prop_assert!(!is_complete(&open_string));
    }
}
