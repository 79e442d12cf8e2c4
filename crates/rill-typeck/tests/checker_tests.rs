//! Integration tests for the Rill type checker.
//!
//! Each test parses a source snippet and asserts on the diagnostics the
//! checker produces (or doesn't).

use rill_typeck::TypeckResult;

fn check_source(source: &str) -> TypeckResult {
    let parse = rill_parser::parse_source(source);
    assert!(
        parse.ok(),
        "parse errors in test input: {:?}",
        parse.diagnostics
    );
    rill_typeck::check(&parse.program)
}

fn assert_clean(source: &str) {
    let result = check_source(source);
    assert!(
        result.ok(),
        "expected no diagnostics for {source:?}, got: {:?}",
        result.diagnostics
    );
}

fn assert_one_error(source: &str, fragment: &str) {
    let result = check_source(source);
    assert_eq!(
        result.diagnostics.len(),
        1,
        "expected exactly one diagnostic for {source:?}, got: {:?}",
        result.diagnostics
    );
    assert!(
        result.diagnostics[0].message.contains(fragment),
        "expected message containing {fragment:?}, got: {:?}",
        result.diagnostics[0].message
    );
}

// ── Declarations and mutability ────────────────────────────────────────

#[test]
fn well_typed_declarations_pass() {
    assert_clean("let x: int = 1 + 2; let y: float = 1.5; let s: string = \"hi\";");
}

#[test]
fn declared_type_mismatch_is_reported() {
    assert_one_error("let x: int = \"text\";", "doesn't match");
}

#[test]
fn reassigning_immutable_binding_is_one_diagnostic() {
    assert_one_error("let x = 1; x = 2;", "x is not mutable");
}

#[test]
fn mutable_binding_accepts_reassignment() {
    assert_clean("let mut x = 1; x = 2; x += 3; x++;");
}

#[test]
fn compound_assignment_respects_the_operator_table() {
    assert_one_error("let mut s = \"a\"; s -= 1;", "no operation for");
}

#[test]
fn redeclaration_in_same_scope_is_reported() {
    assert_one_error("let x = 1; let x = 2;", "already exists in scope");
}

#[test]
fn shadowing_in_inner_block_is_fine() {
    assert_clean("let x = 1; if (true) { let x = 2.5; }");
}

#[test]
fn undefined_symbol_is_reported() {
    assert_one_error("let x = y;", "y doesn't exist");
}

// ── Operators ──────────────────────────────────────────────────────────

#[test]
fn mixed_arithmetic_widens() {
    assert_clean("let x: float = 2 + 3.0;");
}

#[test]
fn string_int_concatenation_is_allowed() {
    assert_clean("let mut s = \"n=\"; s = s + 5;");
}

#[test]
fn unknown_operand_pair_is_reported() {
    assert_one_error("let x = true + 1;", "no operation for bool and int");
}

#[test]
fn condition_must_be_bool() {
    assert_one_error("if (1) { }", "condition must be bool");
}

// ── Structs, interfaces, enums ─────────────────────────────────────────

#[test]
fn struct_instantiation_checks_properties() {
    assert_clean("struct Point { x: int; y: int; } let p = Point{ x: 1, y: 2 }; let s = p.x + p.y;");
}

#[test]
fn missing_struct_property_is_reported() {
    assert_one_error(
        "struct Point { x: int; y: int; } let p = Point{ x: 1 };",
        "property y missing on struct",
    );
}

#[test]
fn wrong_property_type_is_reported() {
    assert_one_error(
        "struct Point { x: int; } let p = Point{ x: \"no\" };",
        "property x expected int",
    );
}

#[test]
fn unknown_property_is_reported() {
    assert_one_error(
        "struct Point { x: int; } let p = Point{ x: 1, z: 2 };",
        "unknown property z",
    );
}

#[test]
fn duplicate_type_registration_is_reported() {
    assert_one_error(
        "struct P { x: int; } struct P { y: int; }",
        "type P already exists",
    );
}

#[test]
fn interface_union_accepts_both_members() {
    assert_clean("interface Numeric = int is float; let a: Numeric = 1; let b: Numeric = 2.5;");
}

#[test]
fn interface_union_rejects_other_types() {
    assert_one_error(
        "interface Numeric = int is float; let a: Numeric = \"no\";",
        "doesn't match",
    );
}

#[test]
fn interface_dict_subsumes_structs() {
    assert_clean(
        "interface HasX { x: int; } struct Point { x: int; y: int; } \
         let p: HasX = Point{ x: 1, y: 2 };",
    );
}

#[test]
fn interface_dict_requires_all_properties() {
    assert_one_error(
        "interface Pair { x: int; y: int; } struct Single { x: int; } \
         let p: Pair = Single{ x: 1 };",
        "doesn't match",
    );
}

#[test]
fn enum_members_are_ints() {
    assert_clean("enum Color { Red, Green, Blue } let c: int = Color.Green;");
}

#[test]
fn unknown_enum_member_is_reported() {
    assert_one_error(
        "enum Color { Red } let c = Color.Purple;",
        "no member Purple on enum Color",
    );
}

// ── Functions and calls ────────────────────────────────────────────────

#[test]
fn function_return_type_is_checked() {
    assert_clean("fn add(a: int, b: int) -> int { return a + b; } let s: int = add(1, 2);");
}

#[test]
fn return_type_mismatch_is_reported() {
    assert_one_error(
        "fn bad(a: int) -> string { return a; }",
        "doesn't match",
    );
}

#[test]
fn recursion_typechecks_against_the_signature() {
    assert_clean(
        "fn fib(n: int) -> int { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); }",
    );
}

#[test]
fn calling_a_non_function_is_reported() {
    assert_one_error("let x = 1; x(2);", "x is not a function");
}

#[test]
fn arity_is_checked_both_ways() {
    assert_one_error(
        "fn one(a: int) -> int { return a; } one(1, 2);",
        "too many arguments. expected 1, got 2",
    );
    assert_one_error(
        "fn two(a: int, b: int) -> int { return a; } two(1);",
        "missing arguments. expected 2, got 1",
    );
}

#[test]
fn argument_types_are_checked_positionally() {
    assert_one_error(
        "fn f(a: int) -> int { return a; } f(\"no\");",
        "mismatched argument 0",
    );
}

#[test]
fn named_arguments_bind_by_name() {
    assert_clean(
        "fn sub(a: int, b: int) -> int { return a - b; } let d = sub(b: 1, a: 3);",
    );
}

#[test]
fn unknown_named_argument_is_reported() {
    assert_one_error(
        "fn f(a: int) -> int { return a; } f(b: 1);",
        "unknown named argument b",
    );
}

#[test]
fn generic_parameters_erase() {
    assert_clean("fn id<T>(a: T) -> T { return a; } let x = id(1); let s = id(\"text\");");
}

// ── References ─────────────────────────────────────────────────────────

#[test]
fn mutable_reference_parameter_accepts_mutable_binding() {
    assert_clean("fn inc(mut *x: int) { x += 1; } let mut a = 0; inc(...a);");
}

#[test]
fn reference_parameter_requires_reference_argument() {
    assert_one_error(
        "fn inc(mut *x: int) { x += 1; } let mut a = 0; inc(a);",
        "must be passed by reference",
    );
}

#[test]
fn mutable_reference_rejects_immutable_binding() {
    assert_one_error(
        "fn inc(mut *x: int) { x += 1; } let a = 0; inc(...a);",
        "mutable reference x requires a mutable binding",
    );
}

#[test]
fn by_value_parameter_rejects_reference_argument() {
    assert_one_error(
        "fn f(a: int) -> int { return a; } let x = 1; f(...x);",
        "cannot pass a reference to by-value argument a",
    );
}

#[test]
fn assigning_through_immutable_reference_is_reported() {
    assert_one_error(
        "fn f(*x: int) { x = 1; } let a = 0; f(...a);",
        "x is a reference to an immutable value",
    );
}

// ── Arrays and indexing ────────────────────────────────────────────────

#[test]
fn array_element_types_deduplicate() {
    assert_clean("let a: array<int> = [1, 2, 3];");
    assert_clean("let b: array<int, float> = [1, 2.5];");
}

#[test]
fn indexing_requires_an_int() {
    assert_one_error(
        "let a = [1, 2]; let x = a[\"zero\"];",
        "index must be int",
    );
}

#[test]
fn indexing_a_non_array_is_reported() {
    assert_one_error("let x = 1; let y = x[0];", "cannot index int");
}

#[test]
fn index_of_homogeneous_array_is_the_element_type() {
    assert_clean("let a = [1, 2, 3]; let x: int = a[0];");
}

// ── If statements ──────────────────────────────────────────────────────

#[test]
fn if_branches_union_for_inference() {
    // Body types union across branches; declared return accepts the
    // common int from both arms.
    assert_clean(
        "fn pick(flag: bool) -> int { if (flag) { return 1; } else { return 2; } }",
    );
}

#[test]
fn is_expression_yields_bool() {
    assert_clean("let x = 1; let b: bool = x is int;");
}
