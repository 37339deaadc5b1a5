mod common;
use common::{run_bool, run_int};

use burnlang::parser::ast::{BinOp, Decl, Expr, VarDecl};

#[test]
fn multiplication_binds_tighter_than_addition() {
    let program = burnlang::parse_source("var x = 1 + 2 * 3;").unwrap();
    let Decl::Var(VarDecl { init: Some(init), .. }) = &program.decls[0].node else {
        panic!("expected a var declaration");
    };
    let Expr::Binary { op: BinOp::Add, lhs, rhs } = &init.node else {
        panic!("expected addition at the root, got {:?}", init.node);
    };
    assert!(matches!(lhs.node, Expr::Int(1)));
    assert!(matches!(rhs.node, Expr::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn evaluation_respects_precedence() {
    assert_eq!(run_int("fun main(): int { return 2 + 3 * 4 }"), 14);
    assert_eq!(run_int("fun main(): int { return (2 + 3) * 4 }"), 20);
    assert_eq!(run_int("fun main(): int { return 10 - 4 - 3 }"), 3);
    assert_eq!(run_int("fun main(): int { return 20 / 2 / 5 }"), 2);
}

#[test]
fn unary_binds_tighter_than_multiplication() {
    assert_eq!(run_int("fun main(): int { return -2 * 3 }"), -6);
    assert_eq!(run_int("fun main(): int { return -(2 * 3) }"), -6);
}

#[test]
fn comparison_binds_tighter_than_equality() {
    // (1 < 2) == true
    assert!(run_bool("fun main(): bool { return 1 < 2 == true }"));
}

#[test]
fn and_binds_tighter_than_or() {
    // true || (false && false)
    assert!(run_bool("fun main(): bool { return true || false && false }"));
    // (false && false) || true
    assert!(run_bool("fun main(): bool { return false && false || true }"));
}

#[test]
fn not_applies_to_the_nearest_operand() {
    assert!(run_bool("fun main(): bool { return !false && true }"));
}

#[test]
fn assignment_is_right_associative() {
    let src = "fun main(): int { var a = 0; var b = 0; a = b = 5; return a * 10 + b }";
    assert_eq!(run_int(src), 55);
}

#[test]
fn postfix_chain_on_call_results() {
    let src = "type Pair { first: array, second: int }\n\
               fun make(): Pair { return { first: [10, 20, 30], second: 0 } }\n\
               fun main(): int { return make().first[1] }";
    assert_eq!(run_int(src), 20);
}
