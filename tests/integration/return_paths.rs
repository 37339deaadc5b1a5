mod common;
use common::{check_err, check_ok, run_int};

#[test]
fn direct_return_covers() {
    check_ok("fun f(): int { return 1 }");
}

#[test]
fn both_if_branches_cover() {
    check_ok("fun f(b: bool): int { if b { return 1 } else { return 2 } }");
}

#[test]
fn if_without_else_does_not_cover() {
    let msg = check_err("fun f(b: bool): int { if b { return 1 } }");
    assert!(msg.contains("missing return"), "got: {msg}");
}

#[test]
fn return_after_partial_if_covers() {
    check_ok("fun f(b: bool): int { if b { return 1 } return 2 }");
}

#[test]
fn nested_blocks_cover() {
    check_ok("fun f(): int { { { return 3 } } }");
}

#[test]
fn loops_do_not_count_as_coverage() {
    let msg = check_err("fun f(): int { while true { return 1 } }");
    assert!(msg.contains("missing return"), "got: {msg}");
    let msg = check_err("fun f(): int { for (;;) { return 1 } }");
    assert!(msg.contains("missing return"), "got: {msg}");
}

#[test]
fn void_functions_need_no_return() {
    check_ok("fun f() { print(1) }");
    check_ok("fun f() { return }");
}

#[test]
fn every_return_site_is_type_checked() {
    let msg = check_err("fun f(b: bool): int { if b { return \"one\" } return 2 }");
    assert!(msg.contains("expected int, got string"), "got: {msg}");
}

#[test]
fn returned_value_wins_over_later_statements() {
    let src = "fun f(): int { return 1; }\nfun main(): int { return f() }";
    assert_eq!(run_int(src), 1);
}

#[test]
fn early_return_skips_the_rest_of_the_block() {
    let src = "fun f(): int {\n\
                   var x = 1\n\
                   if x == 1 { return 10 }\n\
                   x = 99\n\
                   return x\n\
               }\n\
               fun main(): int { return f() }";
    assert_eq!(run_int(src), 10);
}

#[test]
fn returns_propagate_through_nested_control_flow() {
    let src = "fun scan(): int {\n\
                   for (var i = 0; i < 5; i = i + 1) {\n\
                       var j = 0\n\
                       while j < 5 {\n\
                           if i * j == 6 { return i * 10 + j }\n\
                           j = j + 1\n\
                       }\n\
                   }\n\
                   return -1\n\
               }\n\
               fun main(): int { return scan() }";
    assert_eq!(run_int(src), 23);
}

#[test]
fn callee_returns_never_escape_into_the_caller() {
    let src = "fun inner(): int { return 5 }\n\
               fun outer(): int { inner(); return 7 }\n\
               fun main(): int { return outer() }";
    assert_eq!(run_int(src), 7);
}
