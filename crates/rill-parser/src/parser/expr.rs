//! Expression parsing: the Pratt loop and the nud/led handlers.

use rill_common::token::TokenKind;

use crate::ast::*;
use crate::parser::lookups::BindingPower;
use crate::parser::{stmt, types, unescape_string, Parser};

/// The precedence-climbing loop.
///
/// Dispatch the prefix handler for the current token to get `left`, then
/// keep folding infix handlers in while their binding power strictly
/// exceeds `min_bp`.
pub(crate) fn parse_expr(p: &mut Parser, min_bp: BindingPower) -> Expr {
    let kind = p.current_kind();
    let Some(nud) = p.lookups.nud.get(&kind).copied() else {
        let span = p.current_span();
        p.panic_here(format!("expected an expression, found {}", kind.describe()));
        p.advance();
        return Expr::Error(span);
    };

    let mut left = nud(p);

    loop {
        let kind = p.current_kind();
        let bp = match p.lookups.bp.get(&kind) {
            Some(&bp) if bp > min_bp => bp,
            _ => break,
        };
        let Some(led) = p.lookups.led.get(&kind).copied() else {
            break;
        };
        left = led(p, left, bp);
    }

    left
}

// ── Prefix handlers ────────────────────────────────────────────────────

pub(crate) fn parse_number_expr(p: &mut Parser) -> Expr {
    let token = p.advance();
    if token.literal.contains('.') {
        match token.literal.parse::<f64>() {
            Ok(value) => Expr::Float(FloatLit {
                value,
                span: token.span,
            }),
            Err(_) => {
                p.error_at(
                    format!("invalid float literal `{}`", token.literal),
                    token.span,
                    Some(token.literal),
                );
                Expr::Error(token.span)
            }
        }
    } else {
        match token.literal.parse::<i64>() {
            Ok(value) => Expr::Int(IntLit {
                value,
                span: token.span,
            }),
            Err(_) => {
                p.error_at(
                    format!("integer literal `{}` out of range", token.literal),
                    token.span,
                    Some(token.literal),
                );
                Expr::Error(token.span)
            }
        }
    }
}

pub(crate) fn parse_string_expr(p: &mut Parser) -> Expr {
    let token = p.advance();
    Expr::Str(StrLit {
        value: unescape_string(&token.literal),
        span: token.span,
    })
}

pub(crate) fn parse_symbol_expr(p: &mut Parser) -> Expr {
    let token = p.advance();
    Expr::Symbol(Symbol {
        name: token.literal,
        reference: false,
        span: token.span,
    })
}

pub(crate) fn parse_bool_expr(p: &mut Parser) -> Expr {
    let token = p.advance();
    Expr::Bool(BoolLit {
        value: token.kind == TokenKind::True,
        span: token.span,
    })
}

/// `-x` and `!x`.
pub(crate) fn parse_prefix_expr(p: &mut Parser) -> Expr {
    let op = p.advance();
    let rhs = parse_expr(p, BindingPower::Unary);
    let span = op.span.cover(rhs.span());
    Expr::Prefix(Box::new(PrefixExpr {
        op: op.kind,
        rhs,
        span,
    }))
}

/// `...name` -- marks a symbol as a reference argument.
pub(crate) fn parse_reference_expr(p: &mut Parser) -> Expr {
    let spread = p.advance();
    let operand = parse_expr(p, BindingPower::Unary);
    match operand {
        Expr::Symbol(mut sym) => {
            sym.reference = true;
            sym.span = spread.span.cover(sym.span);
            Expr::Symbol(sym)
        }
        other => {
            p.error_at(
                "a reference argument must name a variable".to_string(),
                spread.span.cover(other.span()),
                None,
            );
            other
        }
    }
}

/// `*x` -- explicit dereference.
pub(crate) fn parse_deref_expr(p: &mut Parser) -> Expr {
    let star = p.advance();
    let value = parse_expr(p, BindingPower::Unary);
    let span = star.span.cover(value.span());
    Expr::Deref(Box::new(DerefExpr { value, span }))
}

pub(crate) fn parse_grouping_expr(p: &mut Parser) -> Expr {
    p.advance();
    let inner = parse_expr(p, BindingPower::Default);
    p.expect(TokenKind::CloseParen);
    inner
}

pub(crate) fn parse_array_expr(p: &mut Parser) -> Expr {
    let open = p.advance();
    let mut elements = Vec::new();

    while p.has_tokens() && p.current_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(p, BindingPower::Default));
        if p.current_kind() != TokenKind::CloseBracket {
            p.expect(TokenKind::Comma);
        }
    }

    let close = p.expect(TokenKind::CloseBracket);
    Expr::Array(ArrayLiteral {
        elements,
        span: open.span.cover(close.span),
    })
}

/// Anonymous function: `fn [<T>] (params) [-> ty] { body }`, or the
/// type-parameter-first form starting at `<`.
pub(crate) fn parse_fn_expr(p: &mut Parser) -> Expr {
    let start = p.current_span();

    let mut type_param = None;
    if p.current_kind() == TokenKind::Less {
        p.advance();
        type_param = Some(p.expect(TokenKind::Identifier).literal);
        p.expect(TokenKind::Greater);
    }
    p.expect(TokenKind::Fn);

    parse_fn_rest(p, type_param, start)
}

/// Shared tail of named and anonymous functions: everything after `fn`
/// (and after the name, for the statement form).
pub(crate) fn parse_fn_rest(
    p: &mut Parser,
    mut type_param: Option<String>,
    start: rill_common::span::Span,
) -> Expr {
    if type_param.is_none() && p.eat(TokenKind::Less).is_some() {
        type_param = Some(p.expect(TokenKind::Identifier).literal);
        p.expect(TokenKind::Greater);
    }

    p.expect(TokenKind::OpenParen);
    let mut params: Vec<Param> = Vec::new();
    while p.has_tokens() && p.current_kind() != TokenKind::CloseParen {
        let param_start = p.current_span();
        let mutable = p.eat(TokenKind::Mut).is_some();
        let reference = p.eat(TokenKind::Star).is_some();
        let name_tok = p.expect(TokenKind::Identifier);
        let ty = if p.eat(TokenKind::Colon).is_some() {
            types::parse_type(p, BindingPower::Default)
        } else {
            Type::unset()
        };

        if params.iter().any(|existing| existing.name == name_tok.literal) {
            p.error_at(
                format!("duplicate parameter {}", name_tok.literal),
                name_tok.span,
                Some(name_tok.literal.clone()),
            );
        }

        params.push(Param {
            index: params.len(),
            name: name_tok.literal,
            mutable,
            reference,
            ty,
            span: param_start.cover(name_tok.span),
        });

        if p.current_kind() != TokenKind::CloseParen {
            p.expect(TokenKind::Comma);
        }
    }
    p.expect(TokenKind::CloseParen);

    let return_type = if p.eat(TokenKind::ArrowRight).is_some() {
        types::parse_type(p, BindingPower::Default)
    } else {
        Type::unset()
    };

    let (body, body_span) = stmt::parse_braced_body(p);

    Expr::Function(Box::new(FnExpr {
        type_param,
        params,
        return_type,
        body,
        span: start.cover(body_span),
    }))
}

// ── Infix handlers ─────────────────────────────────────────────────────

/// Left-associative binary operator: the right operand binds at the
/// operator's own power, so equal-power neighbours fold leftward.
pub(crate) fn parse_binary_expr(p: &mut Parser, left: Expr, bp: BindingPower) -> Expr {
    let op = p.advance();
    let right = parse_expr(p, bp);
    let span = left.span().cover(right.span());
    Expr::Binary(Box::new(BinaryExpr {
        left,
        op: op.kind,
        right,
        span,
    }))
}

/// `value is type` at relational power.
pub(crate) fn parse_is_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    p.advance();
    let ty = types::parse_type(p, BindingPower::Default);
    let span = left.span().cover(p.current_span());
    Expr::Is(Box::new(IsExpr {
        value: left,
        ty,
        span,
    }))
}

fn check_assignment_target(p: &mut Parser, target: &Expr) {
    if !matches!(
        target,
        Expr::Symbol(_) | Expr::Member(_) | Expr::Index(_) | Expr::Deref(_)
    ) {
        p.error_at(
            "invalid assignment target".to_string(),
            target.span(),
            None,
        );
    }
}

/// `=`, `+=`, `-=`. The right operand re-enters at the weakest power so
/// `a = b = c` associates to the right.
pub(crate) fn parse_assignment_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    check_assignment_target(p, &left);
    let op = p.advance();
    let rhs = parse_expr(p, BindingPower::Default);
    let span = left.span().cover(rhs.span());
    Expr::Assignment(Box::new(AssignmentExpr {
        target: left,
        op: op.kind,
        rhs,
        span,
    }))
}

/// Postfix `++`/`--`, lowered to `target op= 1`.
pub(crate) fn parse_postfix_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    check_assignment_target(p, &left);
    let op = p.advance();
    let span = left.span().cover(op.span);
    Expr::Assignment(Box::new(AssignmentExpr {
        target: left,
        op: op.kind,
        rhs: Expr::Int(IntLit {
            value: 1,
            span: op.span,
        }),
        span,
    }))
}

/// `target.property`.
pub(crate) fn parse_member_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    p.advance();
    let property = p.expect(TokenKind::Identifier);
    let span = left.span().cover(property.span);
    Expr::Member(Box::new(MemberExpr {
        target: left,
        property: property.literal,
        span,
    }))
}

/// `target[index]`.
pub(crate) fn parse_index_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    p.advance();
    let index = parse_expr(p, BindingPower::Default);
    let close = p.expect(TokenKind::CloseBracket);
    let span = left.span().cover(close.span);
    Expr::Index(Box::new(IndexExpr {
        target: left,
        index,
        span,
    }))
}

/// Call argument list. Arguments are positional or `name: value`; once a
/// named argument appears, positional ones may not follow.
pub(crate) fn parse_call_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    p.advance();
    let mut args: Vec<Arg> = Vec::new();
    let mut seen_named = false;

    while p.has_tokens() && p.current_kind() != TokenKind::CloseParen {
        let arg_start = p.current_span();
        let name = if p.current_kind() == TokenKind::Identifier
            && p.peek_next().kind == TokenKind::Colon
        {
            let name_tok = p.advance();
            p.advance(); // colon
            Some(name_tok.literal)
        } else {
            None
        };

        match &name {
            Some(_) => seen_named = true,
            None if seen_named => p.error_at(
                "positional argument after named argument".to_string(),
                arg_start,
                None,
            ),
            None => {}
        }

        let value = parse_expr(p, BindingPower::Default);
        let span = arg_start.cover(value.span());
        args.push(Arg { name, value, span });

        if p.current_kind() != TokenKind::CloseParen {
            p.expect(TokenKind::Comma);
        }
    }

    let close = p.expect(TokenKind::CloseParen);
    let span = left.span().cover(close.span);
    Expr::Call(Box::new(CallExpr {
        callee: left,
        args,
        span,
    }))
}

/// `Name { field: value, ... }` -- only valid after a bare symbol.
pub(crate) fn parse_struct_literal_expr(p: &mut Parser, left: Expr, _bp: BindingPower) -> Expr {
    let name = match &left {
        Expr::Symbol(sym) if !sym.reference => sym.name.clone(),
        _ => {
            p.error_at(
                "struct literal requires a struct name".to_string(),
                left.span(),
                None,
            );
            String::new()
        }
    };

    p.advance(); // {
    let mut fields: Vec<FieldInit> = Vec::new();

    while p.has_tokens() && p.current_kind() != TokenKind::CloseCurly {
        let field_name = p.expect(TokenKind::Identifier);
        p.expect(TokenKind::Colon);
        let value = parse_expr(p, BindingPower::Default);
        let span = field_name.span.cover(value.span());

        if fields.iter().any(|f| f.name == field_name.literal) {
            p.error_at(
                format!("duplicate field {}", field_name.literal),
                field_name.span,
                Some(field_name.literal.clone()),
            );
        }

        fields.push(FieldInit {
            name: field_name.literal,
            value,
            span,
        });

        if p.current_kind() != TokenKind::CloseCurly {
            p.expect(TokenKind::Comma);
        }
    }

    let close = p.expect(TokenKind::CloseCurly);
    Expr::StructLiteral(StructLiteral {
        name,
        fields,
        span: left.span().cover(close.span),
    })
}
