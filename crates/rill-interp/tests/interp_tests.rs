//! Behavioural tests for the Rill interpreter.
//!
//! Each test runs a source snippet through the full lex -> parse ->
//! check -> interpret pipeline and asserts on captured stdout (or on the
//! runtime diagnostic).

use rill_common::diagnostic::Diagnostic;

/// Run a snippet end to end, returning captured output.
fn run(source: &str) -> String {
    let lexed = rill_lexer::tokenize(source);
    assert!(lexed.ok(), "lex errors: {:?}", lexed.diagnostics);
    let parse = rill_parser::parse(lexed.tokens);
    assert!(parse.ok(), "parse errors: {:?}", parse.diagnostics);
    let checked = rill_typeck::check(&parse.program);
    assert!(checked.ok(), "type errors: {:?}", checked.diagnostics);

    let mut out = Vec::new();
    rill_interp::interpret(&parse.program, &mut out).expect("runtime error");
    String::from_utf8(out).expect("valid utf-8 output")
}

/// Run a snippet that is expected to die at runtime (the checker must
/// still pass it), returning the fault.
fn run_expect_fault(source: &str) -> Diagnostic {
    let parse = rill_parser::parse_source(source);
    assert!(parse.ok(), "parse errors: {:?}", parse.diagnostics);
    let checked = rill_typeck::check(&parse.program);
    assert!(checked.ok(), "type errors: {:?}", checked.diagnostics);

    let mut out = Vec::new();
    rill_interp::interpret(&parse.program, &mut out).expect_err("expected a runtime fault")
}

// ── Arithmetic and assignment ──────────────────────────────────────────

#[test]
fn int_arithmetic_stays_int() {
    assert_eq!(run("let a = 2 + 3; println(a);"), "5\n");
}

#[test]
fn mixed_arithmetic_widens_to_float() {
    assert_eq!(run("let a = 2 + 3.5; println(a);"), "5.5\n");
}

#[test]
fn precedence_follows_the_ladder() {
    assert_eq!(run("let x = 1 + 2 * 3; println(x);"), "7\n");
}

#[test]
fn compound_assignment_accumulates() {
    assert_eq!(run("let mut a = 0; a += 10; println(a);"), "10\n");
}

#[test]
fn postfix_increment_writes_back() {
    assert_eq!(run("let mut i = 41; i++; println(i);"), "42\n");
}

#[test]
fn string_concatenation_converts_ints() {
    assert_eq!(
        run("let mut s = \"n=\"; s = s + 5; println(s);"),
        "n=5\n"
    );
}

#[test]
fn unary_minus_lowers_through_the_op_table() {
    assert_eq!(run("let x = -3; println(x + 1);"), "-2\n");
    assert_eq!(run("let y = -2.5; println(y);"), "-2.5\n");
}

// ── Control flow ───────────────────────────────────────────────────────

#[test]
fn if_else_takes_the_right_branch() {
    assert_eq!(
        run("let x = 1; if (x > 0) { println(x); } else { println(0); }"),
        "1\n"
    );
    assert_eq!(
        run("let x = -1; if (x > 0) { println(x); } else { println(0); }"),
        "0\n"
    );
}

#[test]
fn while_loop_with_break_and_continue() {
    assert_eq!(
        run(
            "let mut i = 0; \
             while (true) { \
               i += 1; \
               if (i == 2) { continue; } \
               if (i > 4) { break; } \
               println(i); \
             }"
        ),
        "1\n3\n4\n"
    );
}

#[test]
fn for_loop_counts() {
    assert_eq!(
        run("for (let mut i = 0; i < 3; i++) { println(i); }"),
        "0\n1\n2\n"
    );
}

#[test]
fn return_unwinds_nested_blocks_to_the_function_boundary() {
    assert_eq!(
        run(
            "fn find() -> int { \
               while (true) { \
                 if (true) { return 7; } \
               } \
               return 0; \
             } \
             println(find());"
        ),
        "7\n"
    );
}

// ── Functions and closures ─────────────────────────────────────────────

#[test]
fn recursion_computes_fibonacci() {
    assert_eq!(
        run(
            "fn fib(n: int) -> int { \
               if (n < 2) { return n; } \
               return fib(n - 1) + fib(n - 2); \
             } \
             println(fib(10));"
        ),
        "55\n"
    );
}

#[test]
fn named_arguments_bind_by_name() {
    assert_eq!(
        run(
            "fn sub(a: int, b: int) -> int { return a - b; } \
             println(sub(b: 1, a: 3));"
        ),
        "2\n"
    );
}

#[test]
fn closures_capture_their_defining_scope() {
    assert_eq!(
        run(
            "fn make() -> (x: int) -> int { \
               let base = 10; \
               return fn(x: int) -> int { return base + x; }; \
             } \
             let add10 = make(); \
             println(add10(5));"
        ),
        "15\n"
    );
}

#[test]
fn invocation_scope_is_the_captured_env_not_the_call_site() {
    // A `base` binding local to the call site must not leak into the
    // callee; `base` resolves in the closure's defining scope.
    assert_eq!(
        run(
            "let base = 1; \
             fn get() -> int { return base; } \
             fn caller() -> int { let shadow = 99; return get() + shadow - shadow; } \
             println(caller());"
        ),
        "1\n"
    );
}

// ── References ─────────────────────────────────────────────────────────

#[test]
fn mutable_reference_mutates_the_caller_binding() {
    assert_eq!(
        run(
            "fn inc(mut *x: int) { x += 1; } \
             let mut a = 0; \
             inc(...a); \
             inc(...a); \
             println(a);"
        ),
        "2\n"
    );
}

#[test]
fn by_value_argument_copies() {
    assert_eq!(
        run(
            "fn bump(mut x: int) -> int { x += 1; return x; } \
             let mut a = 10; \
             println(bump(a)); \
             println(a);"
        ),
        "11\n10\n"
    );
}

#[test]
fn deref_reads_through_the_alias() {
    assert_eq!(
        run(
            "fn show(*x: int) { println(*x); } \
             let a = 5; \
             show(...a);"
        ),
        "5\n"
    );
}

// ── Structs, enums, arrays ─────────────────────────────────────────────

#[test]
fn struct_fields_add_up() {
    assert_eq!(
        run(
            "struct P { x: int; y: int; } \
             let p = P{ x: 3, y: 4 }; \
             println(p.x + p.y);"
        ),
        "7\n"
    );
}

#[test]
fn struct_field_assignment_updates_the_binding() {
    assert_eq!(
        run(
            "struct P { x: int; y: int; } \
             let mut p = P{ x: 1, y: 2 }; \
             p.x = 10; \
             println(p.x + p.y);"
        ),
        "12\n"
    );
}

#[test]
fn enum_members_evaluate_to_ordinals() {
    assert_eq!(
        run("enum Color { Red, Green, Blue } println(Color.Blue);"),
        "2\n"
    );
}

#[test]
fn array_indexing_in_a_for_loop() {
    assert_eq!(
        run(
            "let mut a = [1, 2, 3]; \
             for (let mut i = 0; i < 3; i++) { println(a[i]); }"
        ),
        "1\n2\n3\n"
    );
}

#[test]
fn array_element_assignment_writes_back() {
    assert_eq!(
        run("let mut a = [1, 2]; a[0] = 9; println(a[0] + a[1]);"),
        "11\n"
    );
}

#[test]
fn is_expression_checks_the_runtime_shape() {
    assert_eq!(run("let x = 1; println(x is int);"), "true\n");
    assert_eq!(run("let y = 1.5; println(y is int);"), "false\n");
}

#[test]
fn print_joins_arguments_without_newline() {
    assert_eq!(run("print(1, 2); print(3);"), "1 23");
}

// ── Runtime faults ─────────────────────────────────────────────────────

#[test]
fn division_by_zero_is_fatal() {
    let fault = run_expect_fault("let mut d = 0; let x = 1 / d; println(x);");
    assert_eq!(fault.message, "division by zero");
}

#[test]
fn out_of_bounds_index_is_fatal() {
    let fault = run_expect_fault("let a = [1]; let mut i = 5; println(a[i]);");
    assert!(fault.message.contains("out of bounds"));
}

#[test]
fn fault_stops_further_output() {
    let parse = rill_parser::parse_source(
        "println(1); let mut d = 0; println(1 / d); println(2);",
    );
    assert!(parse.ok());
    let mut out = Vec::new();
    let result = rill_interp::interpret(&parse.program, &mut out);
    assert!(result.is_err());
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
}
