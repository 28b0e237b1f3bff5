//! Loop behavior tests
//!
//! Drives the plain REPL over in-memory streams and checks the
//! buffering/evaluation contract end to end.

use std::io::Cursor;

use sofash::repl::{REPLConfig, REPL};
use sofash::script::Evaluator;

/// Run a whole session over the given input, returning everything the
/// loop wrote
fn session(input: &str) -> String {
    let mut repl = REPL::new(
        Evaluator::new(),
        REPLConfig::default(),
        Cursor::new(input.to_string()),
        Vec::new(),
    );
    repl.run().expect("session should not fail on in-memory streams");
    String::from_utf8(repl.into_writer()).expect("output should be utf-8")
}

#[test]
fn test_complete_expression_evaluates_and_prints() {
    let output = session("1 + 1\n\n");
    assert!(output.contains(">> 2\n"), "output was: {:?}", output);
}

#[test]
fn test_var_prints_nothing_then_value_prints() {
    let output = session("var x = 5\nx * 2\n\n");
    assert!(!output.contains("5\n"), "output was: {:?}", output);
    assert!(output.contains(">> 10\n"), "output was: {:?}", output);
}

#[test]
fn test_multiline_input_waits_for_completion() {
    // "function(" is incomplete: a continuation prompt, no evaluation.
    // The closing ")" completes the unit, which then fails as a call to
    // an unknown function.
    let output = session("function(\n)\n\n");
    let continuation_prompts = output.matches(".. ").count();
    assert_eq!(continuation_prompts, 1, "output was: {:?}", output);
    assert_eq!(
        output.matches("ERROR:").count(),
        1,
        "output was: {:?}",
        output
    );
}

#[test]
fn test_multiline_list_evaluates_once_closed() {
    let output = session("[1,\n2,\n3]\n\n");
    assert!(output.contains("[1, 2, 3]\n"), "output was: {:?}", output);
}

#[test]
fn test_empty_line_with_empty_buffer_exits() {
    let output = session("\n");
    // Farewell and no further prompts
    assert_eq!(output, ">> exiting\n");
}

#[test]
fn test_empty_line_inside_continuation_does_not_exit() {
    let output = session("[1,\n\n2]\n\n");
    assert!(output.contains("[1, 2]\n"), "output was: {:?}", output);
}

#[test]
fn test_error_prints_once_and_session_survives() {
    let output = session("nope\n1 + 1\n\n");
    assert_eq!(
        output.matches("ERROR:").count(),
        1,
        "output was: {:?}",
        output
    );
    assert!(output.contains("2\n"), "output was: {:?}", output);
}

#[test]
fn test_environment_survives_errors() {
    let output = session("var x = 3\n1 + true\nx\n\n");
    assert!(output.contains("ERROR:"), "output was: {:?}", output);
    assert!(output.contains(">> 3\n"), "output was: {:?}", output);
}

#[test]
fn test_falsy_results_still_print() {
    let output = session("0\n\"\"\nfalse\nnull\n\n");
    assert!(output.contains(">> 0\n"), "output was: {:?}", output);
    assert!(output.contains(">> \"\"\n"), "output was: {:?}", output);
    assert!(output.contains(">> false\n"), "output was: {:?}", output);
    // null prints nothing: after it only the prompt and farewell remain
    assert!(!output.contains("null"), "output was: {:?}", output);
}

#[test]
fn test_last_value_follows_prints() {
    let output = session("6 * 7\n_ + 1\n\n");
    assert!(output.contains(">> 42\n"), "output was: {:?}", output);
    assert!(output.contains(">> 43\n"), "output was: {:?}", output);
}

#[test]
fn test_statement_separators_in_one_line() {
    let output = session("var x = 2; x + 2\n\n");
    assert!(output.contains(">> 4\n"), "output was: {:?}", output);
}

#[test]
fn test_clear_command_resets_environment() {
    let output = session("var x = 1\n:clear\nx\n\n");
    assert!(output.contains("environment cleared"), "output was: {:?}", output);
    assert!(output.contains("ERROR: undefined variable: x"), "output was: {:?}", output);
}

#[test]
fn test_help_command_lists_quit() {
    let output = session(":help\n\n");
    assert!(output.contains(":quit"), "output was: {:?}", output);
}

#[test]
fn test_colon_line_inside_continuation_is_input() {
    // Inside an open list the colon line is data, not a command
    let output = session("[\n\":quit\"]\n\n");
    assert!(output.contains("[\":quit\"]\n"), "output was: {:?}", output);
}
