//! Statement parsing.
//!
//! Statements with a registered handler dispatch through the statement
//! table; everything else is an expression statement and must end with a
//! semicolon (except the `for` step slot, which parses its expression
//! bare).

use rill_common::span::Span;
use rill_common::token::TokenKind;

use crate::ast::*;
use crate::parser::expr::{parse_expr, parse_fn_rest};
use crate::parser::lookups::BindingPower;
use crate::parser::types::parse_type;
use crate::parser::{unescape_string, Parser};

pub(crate) fn parse_stmt(p: &mut Parser) -> Stmt {
    if let Some(handler) = p.lookups.stmt.get(&p.current_kind()).copied() {
        return handler(p);
    }

    let expr = parse_expr(p, BindingPower::Default);
    let end = p.expect(TokenKind::Semicolon).span;
    Stmt::Expression(ExprStmt {
        span: expr.span().cover(end),
        expr,
    })
}

/// `{ stmt* }` as a block statement.
pub(crate) fn parse_block_stmt(p: &mut Parser) -> Stmt {
    let (body, span) = parse_braced_body(p);
    Stmt::Block(BlockStmt { body, span })
}

/// `{ stmt* }`, returning the raw body for callers that keep their own
/// node (function bodies).
pub(crate) fn parse_braced_body(p: &mut Parser) -> (Vec<Stmt>, Span) {
    let open = p.expect(TokenKind::OpenCurly);
    let mut body = Vec::new();

    while p.has_tokens() && p.current_kind() != TokenKind::CloseCurly && !p.panicked() {
        body.push(parse_stmt(p));
    }

    let close = p.expect(TokenKind::CloseCurly);
    (body, open.span.cover(close.span))
}

/// `let [mut] name [: ty] = value;`
pub(crate) fn parse_declaration_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let mutable = p.eat(TokenKind::Mut).is_some();
    let name = p.expect(TokenKind::Identifier);

    let ty = if p.eat(TokenKind::Colon).is_some() {
        parse_type(p, BindingPower::Default)
    } else {
        Type::unset()
    };

    p.expect(TokenKind::Assign);
    let value = parse_expr(p, BindingPower::Assignment);
    let end = p.expect(TokenKind::Semicolon).span;

    Stmt::Declaration(Box::new(DeclarationStmt {
        name: name.literal,
        mutable,
        value,
        ty,
        span: keyword.span.cover(end),
    }))
}

/// `fn name [<T>] (params) [-> ty] { body }` lowers to an immutable
/// declaration holding the function expression.
pub(crate) fn parse_fn_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let name = p.expect(TokenKind::Identifier);
    let value = parse_fn_rest(p, None, keyword.span);
    let span = keyword.span.cover(value.span());

    Stmt::Declaration(Box::new(DeclarationStmt {
        name: name.literal,
        mutable: false,
        value,
        ty: Type::unset(),
        span,
    }))
}

/// Shared `name [<T>]` header of struct and interface statements.
fn parse_type_header(p: &mut Parser) -> (String, Option<String>) {
    let name = p.expect(TokenKind::Identifier).literal;
    let mut type_param = None;
    if p.eat(TokenKind::Less).is_some() {
        type_param = Some(p.expect(TokenKind::Identifier).literal);
        p.expect(TokenKind::Greater);
    }
    (name, type_param)
}

/// Semicolon-terminated `name: type;` entries up to the closing curly.
fn parse_property_block(p: &mut Parser) -> (Vec<Property>, Span) {
    let open = p.expect(TokenKind::OpenCurly);
    let mut properties: Vec<Property> = Vec::new();

    while p.has_tokens() && p.current_kind() != TokenKind::CloseCurly {
        let name = p.expect(TokenKind::Identifier);
        p.expect(TokenKind::Colon);
        let ty = parse_type(p, BindingPower::Default);
        let end = p.expect(TokenKind::Semicolon).span;

        if properties.iter().any(|prop| prop.name == name.literal) {
            p.error_at(
                format!("duplicate property {}", name.literal),
                name.span,
                Some(name.literal.clone()),
            );
        }

        properties.push(Property {
            name: name.literal,
            ty,
            span: name.span.cover(end),
        });
    }

    let close = p.expect(TokenKind::CloseCurly);
    (properties, open.span.cover(close.span))
}

pub(crate) fn parse_struct_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let (name, type_param) = parse_type_header(p);
    let (properties, body_span) = parse_property_block(p);

    Stmt::Struct(StructStmt {
        name,
        type_param,
        properties,
        span: keyword.span.cover(body_span),
    })
}

/// `interface N = type;` or `interface N { name: type; ... }`
pub(crate) fn parse_interface_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let (name, type_param) = parse_type_header(p);

    if p.eat(TokenKind::Assign).is_some() {
        let ty = parse_type(p, BindingPower::Default);
        let end = p.expect(TokenKind::Semicolon).span;
        return Stmt::Interface(InterfaceStmt {
            name,
            type_param,
            body: InterfaceBody::Single(ty),
            span: keyword.span.cover(end),
        });
    }

    let (properties, body_span) = parse_property_block(p);
    Stmt::Interface(InterfaceStmt {
        name,
        type_param,
        body: InterfaceBody::Properties(properties),
        span: keyword.span.cover(body_span),
    })
}

/// `enum Name { A, B, C }` -- ordinals follow declaration order.
pub(crate) fn parse_enum_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let name = p.expect(TokenKind::Identifier).literal;
    p.expect(TokenKind::OpenCurly);

    let mut members: Vec<(String, i64)> = Vec::new();
    while p.has_tokens() && p.current_kind() != TokenKind::CloseCurly {
        let member = p.expect(TokenKind::Identifier);
        if members.iter().any(|(existing, _)| *existing == member.literal) {
            p.error_at(
                format!("duplicate enum member {}", member.literal),
                member.span,
                Some(member.literal.clone()),
            );
        }
        let ordinal = members.len() as i64;
        members.push((member.literal, ordinal));

        if p.current_kind() != TokenKind::CloseCurly {
            p.expect(TokenKind::Comma);
        }
    }

    let close = p.expect(TokenKind::CloseCurly);
    Stmt::Enum(EnumStmt {
        name,
        members,
        span: keyword.span.cover(close.span),
    })
}

pub(crate) fn parse_if_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    p.expect(TokenKind::OpenParen);
    let cond = parse_expr(p, BindingPower::Default);
    p.expect(TokenKind::CloseParen);

    let then_block = parse_block_stmt(p);

    let else_block = if p.eat(TokenKind::Else).is_some() {
        if p.current_kind() == TokenKind::If {
            Some(parse_if_stmt(p))
        } else {
            Some(parse_block_stmt(p))
        }
    } else {
        None
    };

    let end = else_block
        .as_ref()
        .map(|stmt| stmt.span())
        .unwrap_or(then_block.span());

    Stmt::If(Box::new(IfStmt {
        cond,
        then_block,
        else_block,
        span: keyword.span.cover(end),
    }))
}

pub(crate) fn parse_while_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    p.expect(TokenKind::OpenParen);
    let cond = parse_expr(p, BindingPower::Default);
    p.expect(TokenKind::CloseParen);
    let body = parse_block_stmt(p);
    let span = keyword.span.cover(body.span());

    Stmt::While(Box::new(WhileStmt { cond, body, span }))
}

/// `for (init; cond; step) { body }`. The init slot is a full statement
/// (usually a declaration) and consumes its own semicolon; the step slot
/// is the one bare expression in the grammar.
pub(crate) fn parse_for_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    p.expect(TokenKind::OpenParen);

    let init = parse_stmt(p);
    let cond = parse_expr(p, BindingPower::Default);
    p.expect(TokenKind::Semicolon);
    let step = parse_expr(p, BindingPower::Default);

    p.expect(TokenKind::CloseParen);
    let body = parse_block_stmt(p);
    let span = keyword.span.cover(body.span());

    Stmt::For(Box::new(ForStmt {
        init,
        cond,
        step,
        body,
        span,
    }))
}

pub(crate) fn parse_return_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let value = if p.current_kind() != TokenKind::Semicolon {
        Some(parse_expr(p, BindingPower::Default))
    } else {
        None
    };
    let end = p.expect(TokenKind::Semicolon).span;

    Stmt::Return(ReturnStmt {
        value,
        span: keyword.span.cover(end),
    })
}

pub(crate) fn parse_continue_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let end = p.expect(TokenKind::Semicolon).span;
    Stmt::Continue(keyword.span.cover(end))
}

pub(crate) fn parse_break_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let end = p.expect(TokenKind::Semicolon).span;
    Stmt::Break(keyword.span.cover(end))
}

/// `import "path" [-> name | -> { a, b }];`
pub(crate) fn parse_import_stmt(p: &mut Parser) -> Stmt {
    let keyword = p.advance();
    let path_tok = p.expect(TokenKind::Str);
    let path = unescape_string(&path_tok.literal);

    let mut alias = None;
    let mut items = None;

    if p.eat(TokenKind::ArrowRight).is_some() {
        if p.eat(TokenKind::OpenCurly).is_some() {
            let mut names = Vec::new();
            while p.has_tokens() && p.current_kind() != TokenKind::CloseCurly {
                names.push(p.expect(TokenKind::Identifier).literal);
                if p.current_kind() != TokenKind::CloseCurly {
                    p.expect(TokenKind::Comma);
                }
            }
            p.expect(TokenKind::CloseCurly);
            items = Some(names);
        } else {
            alias = Some(p.expect(TokenKind::Identifier).literal);
        }
    }

    let end = p.expect(TokenKind::Semicolon).span;
    Stmt::Import(ImportStmt {
        path,
        alias,
        items,
        span: keyword.span.cover(end),
    })
}
