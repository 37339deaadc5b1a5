mod common;
use common::{check_err, run_int, run_str};

#[test]
fn static_method_call() {
    let src = "class Math {\n\
                   static fun square(n: int): int { return n * n }\n\
               }\n\
               fun main(): int { return Math.square(9) }";
    assert_eq!(run_int(src), 81);
}

#[test]
fn instance_method_on_a_constructed_instance() {
    let src = "class Greeter {\n\
                   fun greet(name: string): string { return \"hi \" + name }\n\
               }\n\
               fun main(): string { var g = Greeter {}; return g.greet(\"there\") }";
    assert_eq!(run_str(src), "hi there");
}

#[test]
fn static_factory_returning_an_instance() {
    let src = "class Counter {\n\
                   static fun fresh(): Counter { return Counter {} }\n\
                   fun bumped(n: int): int { return n + 1 }\n\
               }\n\
               fun main(): int { var c = Counter.fresh(); return c.bumped(41) }";
    assert_eq!(run_int(src), 42);
}

#[test]
fn methods_read_receiver_state_through_this() {
    let src = "class Box {\n\
                   static fun of(v: int): Box { var b = Box {}; b.value = v; return b }\n\
                   fun get(): int { return this.value }\n\
               }\n\
               fun main(): int { var b = Box.of(7); return b.get() }";
    assert_eq!(run_int(src), 7);
}

#[test]
fn methods_can_mutate_receiver_state() {
    let src = "class Box {\n\
                   static fun of(v: int): Box { var b = Box {}; b.value = v; return b }\n\
                   fun bump(): int { this.value = this.value + 1; return this.value }\n\
               }\n\
               fun main(): int { var b = Box.of(10); b.bump(); return b.bump() }";
    assert_eq!(run_int(src), 12);
}

#[test]
fn two_classes_do_not_share_method_tables() {
    let src = "class A { static fun tag(): int { return 1 } }\n\
               class B { static fun tag(): int { return 2 } }\n\
               fun main(): int { return A.tag() * 10 + B.tag() }";
    assert_eq!(run_int(src), 12);
}

#[test]
fn calling_a_static_method_on_an_instance_is_rejected() {
    let src = "class Math { static fun two(): int { return 2 } }\n\
               fun main(): int { var m = Math {}; return m.two() }";
    let msg = check_err(src);
    assert!(msg.contains("is static"), "got: {msg}");
}

#[test]
fn calling_an_instance_method_on_the_class_is_rejected() {
    let src = "class Greeter { fun hello(): string { return \"hi\" } }\n\
               fun main(): string { return Greeter.hello() }";
    let msg = check_err(src);
    assert!(msg.contains("not static"), "got: {msg}");
}

#[test]
fn unknown_method_rejected() {
    let src = "class Empty { }\n\
               fun main(): int { return Empty.nope() }";
    let msg = check_err(src);
    assert!(msg.contains("unknown method 'nope'"), "got: {msg}");
}

#[test]
fn class_methods_calling_other_statics() {
    let src = "class Fib {\n\
                   static fun at(n: int): int {\n\
                       if (n <= 1) { return n }\n\
                       return Fib.at(n - 1) + Fib.at(n - 2)\n\
                   }\n\
               }\n\
               fun main(): int { return Fib.at(10) }";
    assert_eq!(run_int(src), 55);
}
