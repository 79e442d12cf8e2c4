//! AST shape tests for the Rill parser.
//!
//! Expressions are rendered into a compact s-expression form so
//! precedence and associativity show up directly in the snapshot.

use rill_common::token::TokenKind;
use rill_parser::ast::*;
use rill_parser::{parse_source, parse_type_source};

// ── Render helpers ─────────────────────────────────────────────────────

fn op_text(op: TokenKind) -> &'static str {
    match op {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Equals => "==",
        TokenKind::NotEquals => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEquals => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEquals => ">=",
        TokenKind::And => "&&",
        TokenKind::Or => "||",
        TokenKind::Assign => "=",
        TokenKind::PlusAssign => "+=",
        TokenKind::MinusAssign => "-=",
        TokenKind::PlusPlus => "++",
        TokenKind::MinusMinus => "--",
        TokenKind::Not => "!",
        other => other.describe(),
    }
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Int(n) => n.value.to_string(),
        Expr::Float(n) => format!("{:?}", n.value),
        Expr::Bool(n) => n.value.to_string(),
        Expr::Str(n) => format!("{:?}", n.value),
        Expr::Symbol(s) => {
            if s.reference {
                format!("...{}", s.name)
            } else {
                s.name.clone()
            }
        }
        Expr::Binary(b) => format!(
            "({} {} {})",
            op_text(b.op),
            render_expr(&b.left),
            render_expr(&b.right)
        ),
        Expr::Prefix(p) => format!("({} {})", op_text(p.op), render_expr(&p.rhs)),
        Expr::Assignment(a) => format!(
            "(assign {} {} {})",
            op_text(a.op),
            render_expr(&a.target),
            render_expr(&a.rhs)
        ),
        Expr::Member(m) => format!("(member {} {})", render_expr(&m.target), m.property),
        Expr::Index(i) => format!(
            "(index {} {})",
            render_expr(&i.target),
            render_expr(&i.index)
        ),
        Expr::StructLiteral(s) => {
            let fields: Vec<String> = s
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.name, render_expr(&f.value)))
                .collect();
            format!("(struct {} {{{}}})", s.name, fields.join(", "))
        }
        Expr::Array(a) => {
            let elements: Vec<String> = a.elements.iter().map(render_expr).collect();
            format!("[{}]", elements.join(", "))
        }
        Expr::Call(c) => {
            let args: Vec<String> = c
                .args
                .iter()
                .map(|arg| match &arg.name {
                    Some(name) => format!("{}: {}", name, render_expr(&arg.value)),
                    None => render_expr(&arg.value),
                })
                .collect();
            format!("(call {} [{}])", render_expr(&c.callee), args.join(", "))
        }
        Expr::Function(f) => {
            let params: Vec<String> = f
                .params
                .iter()
                .map(|p| {
                    let mut s = String::new();
                    if p.mutable {
                        s.push_str("mut ");
                    }
                    if p.reference {
                        s.push('*');
                    }
                    s.push_str(&p.name);
                    s.push_str(": ");
                    s.push_str(&p.ty.to_string());
                    s
                })
                .collect();
            format!("(fn [{}] -> {})", params.join(", "), f.return_type)
        }
        Expr::Is(i) => format!("(is {} {})", render_expr(&i.value), i.ty),
        Expr::Deref(d) => format!("(deref {})", render_expr(&d.value)),
        Expr::Error(_) => "<error>".to_string(),
    }
}

/// Parse a single expression statement and render it.
fn expr(source: &str) -> String {
    let parse = parse_source(source);
    assert!(parse.ok(), "unexpected diagnostics: {:?}", parse.diagnostics);
    match parse.program.as_slice() {
        [Stmt::Expression(stmt)] => render_expr(&stmt.expr),
        other => panic!("expected one expression statement, got {other:?}"),
    }
}

// ── Precedence and associativity ───────────────────────────────────────

#[test]
fn multiplication_binds_tighter_than_addition() {
    insta::assert_snapshot!(expr("1 + 2 * 3;"), @"(+ 1 (* 2 3))");
    insta::assert_snapshot!(expr("1 * 2 + 3;"), @"(+ (* 1 2) 3)");
}

#[test]
fn same_power_operators_fold_left() {
    insta::assert_snapshot!(expr("1 - 2 - 3;"), @"(- (- 1 2) 3)");
    insta::assert_snapshot!(expr("8 / 4 / 2;"), @"(/ (/ 8 4) 2)");
}

#[test]
fn assignment_folds_right() {
    insta::assert_snapshot!(expr("a = b = c;"), @"(assign = a (assign = b c))");
}

#[test]
fn comparison_sits_between_logic_and_arithmetic() {
    insta::assert_snapshot!(
        expr("a + 1 < b && c;"),
        @"(&& (< (+ a 1) b) c)"
    );
}

#[test]
fn grouping_overrides_precedence() {
    insta::assert_snapshot!(expr("(1 + 2) * 3;"), @"(* (+ 1 2) 3)");
}

#[test]
fn prefix_minus_binds_tighter_than_binary() {
    insta::assert_snapshot!(expr("-a + b;"), @"(+ (- a) b)");
}

#[test]
fn member_call_and_index_chain() {
    insta::assert_snapshot!(expr("p.x + p.y;"), @"(+ (member p x) (member p y))");
    insta::assert_snapshot!(expr("f(1)(2);"), @"(call (call f [1]) [2])");
    insta::assert_snapshot!(expr("a[0][1];"), @"(index (index a 0) 1)");
}

#[test]
fn postfix_increment_lowers_to_assignment() {
    insta::assert_snapshot!(expr("i++;"), @"(assign ++ i 1)");
    insta::assert_snapshot!(expr("i--;"), @"(assign -- i 1)");
}

#[test]
fn is_expression_at_relational_power() {
    insta::assert_snapshot!(expr("x is int == y;"), @"(== (is x int) y)");
}

// ── Literals ───────────────────────────────────────────────────────────

#[test]
fn number_literals_split_int_and_float() {
    let parse = parse_source("1; 2.5;");
    assert!(parse.ok());
    match parse.program.as_slice() {
        [Stmt::Expression(a), Stmt::Expression(b)] => {
            assert!(matches!(&a.expr, Expr::Int(n) if n.value == 1));
            assert!(matches!(&b.expr, Expr::Float(n) if n.value == 2.5));
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn string_literals_are_unescaped() {
    insta::assert_snapshot!(expr(r#""a\n\"b\"";"#), @r#""a\n\"b\"""#);
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn declaration_shape() {
    let parse = parse_source("let x = 1;");
    assert!(parse.ok());
    match parse.program.as_slice() {
        [Stmt::Declaration(decl)] => {
            assert_eq!(decl.name, "x");
            assert!(!decl.mutable);
            assert!(decl.ty.is_unset());
            assert!(matches!(&decl.value, Expr::Int(n) if n.value == 1));
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn mutable_declaration_with_type() {
    let parse = parse_source("let mut a: array<int> = [1, 2, 3];");
    assert!(parse.ok());
    match parse.program.as_slice() {
        [Stmt::Declaration(decl)] => {
            assert!(decl.mutable);
            assert_eq!(decl.ty, Type::wrap("array", Type::base("int")));
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn fn_statement_lowers_to_declaration() {
    let parse = parse_source("fn add<T>(a: T, mut *b: T) -> T { return a; }");
    assert!(parse.ok(), "diagnostics: {:?}", parse.diagnostics);
    match parse.program.as_slice() {
        [Stmt::Declaration(decl)] => {
            assert_eq!(decl.name, "add");
            assert!(!decl.mutable);
            let Expr::Function(f) = &decl.value else {
                panic!("expected function value");
            };
            assert_eq!(f.type_param.as_deref(), Some("T"));
            assert_eq!(f.params.len(), 2);
            assert_eq!(f.params[0].index, 0);
            assert!(!f.params[0].mutable && !f.params[0].reference);
            assert_eq!(f.params[1].index, 1);
            assert!(f.params[1].mutable && f.params[1].reference);
            assert_eq!(f.return_type, Type::base("T"));
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn for_loop_shape() {
    let parse = parse_source("for (let mut i = 0; i < 3; i++) { println(i); }");
    assert!(parse.ok(), "diagnostics: {:?}", parse.diagnostics);
    match parse.program.as_slice() {
        [Stmt::For(stmt)] => {
            assert!(matches!(&stmt.init, Stmt::Declaration(d) if d.name == "i" && d.mutable));
            assert!(matches!(&stmt.cond, Expr::Binary(_)));
            assert!(matches!(&stmt.step, Expr::Assignment(_)));
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn import_with_item_list() {
    let parse = parse_source(r#"import "std/io" -> { print, println };"#);
    assert!(parse.ok());
    match parse.program.as_slice() {
        [Stmt::Import(import)] => {
            assert_eq!(import.path, "std/io");
            assert_eq!(import.alias, None);
            assert_eq!(
                import.items.as_deref(),
                Some(&["print".to_string(), "println".to_string()][..])
            );
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn interface_single_type_folds_is_into_union() {
    let parse = parse_source("interface Numeric = int is float;");
    assert!(parse.ok());
    match parse.program.as_slice() {
        [Stmt::Interface(interface)] => {
            let InterfaceBody::Single(ty) = &interface.body else {
                panic!("expected single-type body");
            };
            assert_eq!(
                *ty,
                Type::with_args("union", vec![Type::base("int"), Type::base("float")])
            );
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn enum_members_get_ordinals() {
    let parse = parse_source("enum Color { Red, Green, Blue }");
    assert!(parse.ok());
    match parse.program.as_slice() {
        [Stmt::Enum(e)] => {
            assert_eq!(
                e.members,
                vec![
                    ("Red".to_string(), 0),
                    ("Green".to_string(), 1),
                    ("Blue".to_string(), 2)
                ]
            );
        }
        other => panic!("unexpected program {other:?}"),
    }
}

// ── Type expressions ───────────────────────────────────────────────────

#[test]
fn parse_type_generic_arguments() {
    let (ty, diagnostics) = parse_type_source("array<int, float>");
    assert!(diagnostics.is_empty());
    assert_eq!(
        ty,
        Type::with_args("array", vec![Type::base("int"), Type::base("float")])
    );
}

#[test]
fn parse_type_reference_wrapper() {
    let (ty, diagnostics) = parse_type_source("*mutable<int>");
    assert!(diagnostics.is_empty());
    assert_eq!(ty.to_string(), "reference<mutable<int>>");
}

#[test]
fn parse_type_function_shape() {
    let (ty, diagnostics) = parse_type_source("(a: int, b: string) -> bool");
    assert!(diagnostics.is_empty());
    assert_eq!(
        ty.to_string(),
        "function<function_arg<a<int>, b<string>>, function_return<bool>>"
    );
}

#[test]
fn parse_type_nested_generics() {
    let (ty, diagnostics) = parse_type_source("array<array<int>>");
    assert!(diagnostics.is_empty());
    assert_eq!(
        ty,
        Type::wrap("array", Type::wrap("array", Type::base("int")))
    );
}

// ── Error cases ────────────────────────────────────────────────────────

#[test]
fn positional_after_named_argument_is_rejected() {
    let parse = parse_source("f(a: 1, 2);");
    assert_eq!(parse.diagnostics.len(), 1);
    assert!(parse.diagnostics[0]
        .message
        .contains("positional argument after named argument"));
}

#[test]
fn postfix_result_is_not_assignable() {
    let parse = parse_source("a++ = 5;");
    assert!(parse
        .diagnostics
        .iter()
        .any(|d| d.message == "invalid assignment target"));
}

#[test]
fn missing_handler_produces_error_sentinel() {
    let parse = parse_source("let x = ];");
    assert!(!parse.ok());
    match parse.program.as_slice() {
        [Stmt::Declaration(decl)] => {
            assert!(matches!(decl.value, Expr::Error(_)));
        }
        other => panic!("unexpected program {other:?}"),
    }
}

#[test]
fn missing_semicolon_is_one_diagnostic() {
    let parse = parse_source("let x = 1");
    assert_eq!(parse.diagnostics.len(), 1);
    assert!(parse.diagnostics[0].message.contains("expected semicolon"));
}
