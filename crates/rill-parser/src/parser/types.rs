//! Type-expression parsing: the same Pratt engine over its own tables.

use rill_common::token::TokenKind;

use crate::ast::ty::{self, Type};
use crate::parser::lookups::BindingPower;
use crate::parser::Parser;

/// The type-level precedence-climbing loop, symmetric to `parse_expr`.
pub(crate) fn parse_type(p: &mut Parser, min_bp: BindingPower) -> Type {
    let kind = p.current_kind();
    let Some(nud) = p.lookups.type_nud.get(&kind).copied() else {
        p.error_here(format!("expected a type, found {}", kind.describe()));
        return Type::unset();
    };

    let mut left = nud(p);

    loop {
        let kind = p.current_kind();
        let bp = match p.lookups.type_bp.get(&kind) {
            Some(&bp) if bp > min_bp => bp,
            _ => break,
        };
        let Some(led) = p.lookups.type_led.get(&kind).copied() else {
            break;
        };
        left = led(p, left, bp);
    }

    left
}

/// `name` or `name<T1, T2, ...>`.
pub(crate) fn parse_symbol_type(p: &mut Parser) -> Type {
    let ident = p.expect(TokenKind::Identifier);
    let mut args = Vec::new();

    if p.eat(TokenKind::Less).is_some() {
        while p.has_tokens() && p.current_kind() != TokenKind::Greater {
            args.push(parse_type(p, BindingPower::Logical));
            if p.current_kind() != TokenKind::Greater {
                p.expect(TokenKind::Comma);
            }
        }
        p.expect(TokenKind::Greater);
    }

    Type::with_args(ident.literal, args)
}

/// `*T` wraps as `reference<T>`.
pub(crate) fn parse_reference_type(p: &mut Parser) -> Type {
    p.advance();
    parse_type(p, BindingPower::Logical).reference()
}

/// `(a: T, b: U) -> R` builds
/// `function<function_arg<a<T>, b<U>>, function_return<R>>`.
pub(crate) fn parse_fn_type(p: &mut Parser) -> Type {
    p.advance();
    let mut args = Vec::new();

    while p.has_tokens() && p.current_kind() != TokenKind::CloseParen {
        let name = p.expect(TokenKind::Identifier);
        p.expect(TokenKind::Colon);
        let ty = parse_type(p, BindingPower::Default);
        args.push(Type::wrap(name.literal, ty));

        if p.current_kind() != TokenKind::CloseParen {
            p.expect(TokenKind::Comma);
        }
    }
    p.expect(TokenKind::CloseParen);

    let ret = if p.eat(TokenKind::ArrowRight).is_some() {
        parse_type(p, BindingPower::Default)
    } else {
        Type::unset()
    };

    Type::with_args(
        ty::FUNCTION,
        vec![
            Type::with_args(ty::FUNCTION_ARG, args),
            Type::wrap(ty::FUNCTION_RETURN, ret),
        ],
    )
}

/// Infix `<...>`: applies a type-argument list to a bare name, for left
/// sides that did not come through the identifier nud.
pub(crate) fn parse_generic_type(p: &mut Parser, left: Type, _bp: BindingPower) -> Type {
    p.advance();
    let mut args = Vec::new();

    while p.has_tokens() && p.current_kind() != TokenKind::Greater {
        args.push(parse_type(p, BindingPower::Logical));
        if p.current_kind() != TokenKind::Greater {
            p.expect(TokenKind::Comma);
        }
    }
    p.expect(TokenKind::Greater);

    Type::with_args(left.name, args)
}

/// Type-level `is` folds both sides into a flattened `union<...>`.
pub(crate) fn parse_union_type(p: &mut Parser, left: Type, _bp: BindingPower) -> Type {
    p.advance();
    let right = parse_type(p, BindingPower::Logical);

    let mut members = Vec::new();
    for side in [left, right] {
        if side.is(ty::UNION) {
            members.extend(side.args);
        } else {
            members.push(side);
        }
    }

    Type::with_args(ty::UNION, members)
}
