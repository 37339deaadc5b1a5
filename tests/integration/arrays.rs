mod common;
use common::{check_err, run_bool, run_err, run_int, run_str};

#[test]
fn literal_and_indexing() {
    assert_eq!(run_int("fun main(): int { var a = [10, 20, 30]; return a[1] }"), 20);
}

#[test]
fn index_with_expression() {
    let src = "fun main(): int { var a = [1, 2, 3, 4]; var i = 1; return a[i + 2] }";
    assert_eq!(run_int(src), 4);
}

#[test]
fn element_type_flows_from_the_literal() {
    let src = "fun main(): string { var names = [\"ada\", \"grace\"]; return names[0] }";
    assert_eq!(run_str(src), "ada");
}

#[test]
fn arrays_of_structs() {
    let src = "type Point { x: int, y: int }\n\
               fun main(): int {\n\
                   var ps = [Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]\n\
                   return ps[1].x\n\
               }";
    assert_eq!(run_int(src), 3);
}

#[test]
fn len_of_arrays() {
    assert_eq!(run_int("fun main(): int { return len([5, 6, 7]) }"), 3);
}

#[test]
fn arrays_compare_by_reference() {
    let src = "fun main(): bool { var a = [1, 2]; var b = a; return a == b }";
    assert!(run_bool(src));
    let src = "fun main(): bool { var a = [1, 2]; var b = [1, 2]; return a == b }";
    assert!(!run_bool(src));
}

#[test]
fn out_of_bounds_reports_index_and_position() {
    let src = "fun main(): int {\n\
                   var a = [1, 2, 3]\n\
                   return a[5]\n\
               }";
    let msg = run_err(src);
    assert!(msg.contains("array index out of bounds: 5"), "got: {msg}");
    assert!(msg.contains("line 3"), "got: {msg}");
}

#[test]
fn negative_index_is_out_of_bounds() {
    let msg = run_err("fun main(): int { var a = [1]; return a[0 - 1] }");
    assert!(msg.contains("array index out of bounds: -1"), "got: {msg}");
}

#[test]
fn mixed_element_types_rejected() {
    let msg = check_err("var a = [1, \"two\"]");
    assert!(msg.contains("share a type"), "got: {msg}");
}

#[test]
fn non_int_index_rejected() {
    let msg = check_err("fun main(): int { var a = [1]; return a[\"zero\"] }");
    assert!(msg.contains("index must be int"), "got: {msg}");
}

#[test]
fn indexing_a_non_array_rejected() {
    let msg = check_err("fun main(): int { var n = 5; return n[0] }");
    assert!(msg.contains("cannot index"), "got: {msg}");
}
