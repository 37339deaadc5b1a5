mod common;
use common::{run_err, run_int};

#[test]
fn division_by_zero() {
    let msg = run_err("fun main(): int { var d = 0; return 1 / d }");
    assert!(msg.contains("division/modulo by zero"), "got: {msg}");
}

#[test]
fn modulo_by_zero() {
    let msg = run_err("fun main(): int { var d = 0; return 1 % d }");
    assert!(msg.contains("division/modulo by zero"), "got: {msg}");
}

#[test]
fn division_by_a_nonzero_value_is_fine() {
    assert_eq!(run_int("fun main(): int { var d = 2; return 7 / d }"), 3);
}

#[test]
fn index_out_of_bounds_carries_the_statement_position() {
    let src = "var a = [1, 2, 3]\nprint(a[5])";
    let msg = run_err(src);
    assert!(msg.contains("array index out of bounds: 5"), "got: {msg}");
    assert!(msg.contains("line 2"), "got: {msg}");
}

#[test]
fn runtime_errors_are_formatted_with_stage_and_position() {
    let msg = run_err("fun main(): int {\n    var a = [1]\n    return a[9]\n}");
    assert!(msg.starts_with("Runtime error at line 3"), "got: {msg}");
}

#[test]
fn bad_conversion_is_a_runtime_error() {
    let msg = run_err("fun main(): int { return toInt(\"not a number\") }");
    assert!(msg.contains("cannot convert"), "got: {msg}");
}

#[test]
fn invalid_date_construction_is_a_runtime_error() {
    let msg = run_err("fun main() { Date.createDate(2023, 2, 29) }");
    assert!(msg.contains("day out of range"), "got: {msg}");
}

#[test]
fn dynamic_type_misuse_surfaces_at_runtime() {
    // `any` defeats the static check; the evaluator still refuses
    let msg = run_err("fun main(): int { var v = HTTP.parseJSON(\"\\\"s\\\"\"); return v % 2 }");
    assert!(msg.contains("invalid operand types for '%'"), "got: {msg}");
}

#[test]
fn error_in_a_called_function_propagates_to_the_caller() {
    let src = "fun boom(): int { var z = 0; return 1 / z }\n\
               fun main(): int { return boom() }";
    let msg = run_err(src);
    assert!(msg.contains("division/modulo by zero"), "got: {msg}");
}

#[test]
fn environment_is_restored_after_a_failed_call() {
    // the failed call must not leave callee bindings behind; a fresh
    // run on the same source keeps working
    let src = "fun boom(): int { var z = 0; return 1 / z }\n\
               fun main(): int { return boom() }";
    let _ = run_err(src);
    assert_eq!(run_int("fun main(): int { return 5 }"), 5);
}
