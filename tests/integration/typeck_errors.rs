mod common;
use common::{check_err, check_ok};

#[test]
fn missing_return_on_one_path() {
    let msg = check_err("fun f(x: int): int { if x > 0 { return 1 } }");
    assert!(msg.contains("missing return"), "got: {msg}");
}

#[test]
fn missing_return_entirely() {
    let msg = check_err("fun f(): int { var x = 1 }");
    assert!(msg.contains("missing return"), "got: {msg}");
}

#[test]
fn return_coverage_accepts_exhaustive_ifs() {
    check_ok("fun sign(n: int): int { if n < 0 { return -1 } else { if n > 0 { return 1 } else { return 0 } } }");
}

#[test]
fn int_plus_float_is_float() {
    check_ok("fun f(): float { return 1 + 2.5 }");
    // and the reverse direction must not narrow back to int
    let msg = check_err("fun f(): int { return 1 + 2.5 }");
    assert!(msg.contains("expected int, got float"), "got: {msg}");
}

#[test]
fn string_plus_int_rejected() {
    let msg = check_err("var x = \"a\" + 1");
    assert!(msg.contains("invalid operand types for '+'"), "got: {msg}");
}

#[test]
fn logical_operators_require_bools() {
    let msg = check_err("var x = 1 && true");
    assert!(msg.contains("requires bool operands"), "got: {msg}");
}

#[test]
fn comparing_incompatible_types_rejected() {
    let msg = check_err("var x = \"a\" == 1");
    assert!(msg.contains("cannot compare"), "got: {msg}");
}

#[test]
fn condition_must_be_bool() {
    let msg = check_err("fun f() { if 1 { } }");
    assert!(msg.contains("condition must be bool"), "got: {msg}");
    let msg = check_err("fun f() { while \"yes\" { } }");
    assert!(msg.contains("condition must be bool"), "got: {msg}");
}

#[test]
fn unknown_variable() {
    let msg = check_err("fun f(): int { return nope }");
    assert!(msg.contains("unknown variable 'nope'"), "got: {msg}");
}

#[test]
fn unknown_function() {
    let msg = check_err("fun f() { nope() }");
    assert!(msg.contains("unknown function 'nope'"), "got: {msg}");
}

#[test]
fn unknown_type_annotation() {
    let msg = check_err("var x: Widget = 1");
    assert!(msg.contains("unknown type 'Widget'"), "got: {msg}");
}

#[test]
fn declared_type_must_match_initializer() {
    let msg = check_err("var x: int = \"one\"");
    assert!(msg.contains("type mismatch"), "got: {msg}");
}

#[test]
fn const_requires_initializer() {
    let msg = check_err("const k: int");
    assert!(msg.contains("requires an initializer"), "got: {msg}");
}

#[test]
fn const_cannot_be_reassigned() {
    let msg = check_err("const k = 1; k = 2");
    assert!(msg.contains("cannot assign to constant"), "got: {msg}");
}

#[test]
fn void_function_result_cannot_be_bound() {
    let msg = check_err("fun f() { }\nvar x = f()");
    assert!(msg.contains("cannot assign void"), "got: {msg}");
}

#[test]
fn void_function_cannot_return_a_value() {
    let msg = check_err("fun f() { return 1 }");
    assert!(msg.contains("void function cannot return a value"), "got: {msg}");
}

#[test]
fn bare_return_in_typed_function_rejected() {
    let msg = check_err("fun f(): int { return }");
    assert!(msg.contains("must return a value"), "got: {msg}");
}

#[test]
fn return_outside_function_rejected() {
    let msg = check_err("return 1");
    assert!(msg.contains("return outside"), "got: {msg}");
}

#[test]
fn assignment_changes_no_types() {
    let msg = check_err("fun f() { var x = 1; x = \"two\" }");
    assert!(msg.contains("cannot assign string"), "got: {msg}");
}

#[test]
fn errors_carry_positions() {
    let msg = check_err("fun f(): int {\n    return nope\n}");
    assert!(msg.starts_with("Type error at line 2"), "got: {msg}");
}

#[test]
fn builtin_arity_checked_statically() {
    let msg = check_err("fun f() { print() }");
    assert!(msg.contains("expects 1 argument"), "got: {msg}");
    let msg = check_err("fun f(): bool { return Date.isLeapYear(2000, 1) }");
    assert!(msg.contains("expects 1 argument"), "got: {msg}");
}

#[test]
fn builtin_argument_types_checked_statically() {
    let msg = check_err("fun f(): int { return Date.daysInMonth(\"2024\", 2) }");
    assert!(msg.contains("expects int, got string"), "got: {msg}");
}
