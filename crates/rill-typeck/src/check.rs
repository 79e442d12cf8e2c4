//! The checking pass: one handler per node kind, dispatched by match.

use rill_common::diagnostic::Diagnostic;
use rill_common::span::Span;
use rill_common::token::{assignment_base_op, TokenKind};
use rill_parser::ast::ty::{self, BUILTIN};
use rill_parser::ast::*;

use crate::env::{self, child_env, root_env, EnvRef, TypeDecl};
use crate::matching::MatchTable;
use crate::ops::OpTable;
use crate::TypeckResult;

pub(crate) struct Checker {
    diagnostics: Vec<Diagnostic>,
    ops: OpTable,
    matcher: MatchTable,
    /// Type parameter of the function currently being checked, erased to
    /// unset wherever it appears.
    type_param: Option<String>,
}

impl Checker {
    pub(crate) fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            ops: OpTable::new(),
            matcher: MatchTable::new(),
            type_param: None,
        }
    }

    pub(crate) fn run(mut self, program: &[Stmt]) -> TypeckResult {
        let root = root_env();
        for builtin in ["print", "println"] {
            let _ = env::declare(
                &root,
                TypeDecl {
                    name: builtin.to_string(),
                    mutable: false,
                    reference: false,
                    ty: Type::base(BUILTIN),
                },
            );
        }

        let scope = child_env(&root);
        for stmt in program {
            self.check_stmt(stmt, &scope);
        }

        TypeckResult {
            diagnostics: self.diagnostics,
        }
    }

    fn error(&mut self, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::new(message, span));
    }

    fn matches(&self, expected: &Type, input: &Type) -> bool {
        self.matcher.matches(expected, input)
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn check_stmt(&mut self, stmt: &Stmt, scope: &EnvRef) -> Type {
        match stmt {
            Stmt::Block(block) => {
                let inner = child_env(scope);
                self.check_block_body(&block.body, &inner)
            }
            Stmt::Expression(stmt) => self.check_expr(&stmt.expr, scope),
            Stmt::Declaration(decl) => self.check_declaration(decl, scope),
            Stmt::Struct(stmt) => self.check_struct_stmt(stmt, scope),
            Stmt::Interface(stmt) => self.check_interface_stmt(stmt, scope),
            Stmt::Enum(stmt) => self.check_enum_stmt(stmt, scope),
            Stmt::If(stmt) => self.check_if_stmt(stmt, scope),
            Stmt::While(stmt) => {
                self.check_condition(&stmt.cond, scope);
                self.check_stmt(&stmt.body, scope);
                Type::unset()
            }
            Stmt::For(stmt) => {
                let header = child_env(scope);
                self.check_stmt(&stmt.init, &header);
                self.check_condition(&stmt.cond, &header);
                self.check_expr(&stmt.step, &header);
                self.check_stmt(&stmt.body, &header);
                Type::unset()
            }
            Stmt::Return(stmt) => match &stmt.value {
                Some(value) => self.check_expr(value, scope),
                None => Type::unset(),
            },
            Stmt::Continue(_) | Stmt::Break(_) => Type::unset(),
            // Module resolution is out of scope; the statement only has
            // to parse.
            Stmt::Import(_) => Type::unset(),
        }
    }

    /// Shared body walk for blocks and function bodies: the resulting
    /// type is the last `return` or `if` statement encountered.
    fn check_block_body(&mut self, body: &[Stmt], scope: &EnvRef) -> Type {
        let mut result = Type::unset();
        for stmt in body {
            let computed = self.check_stmt(stmt, scope);
            if matches!(stmt, Stmt::Return(_) | Stmt::If(_)) {
                result = computed;
            }
        }
        result
    }

    fn check_condition(&mut self, cond: &Expr, scope: &EnvRef) {
        let computed = self.check_expr(cond, scope);
        if !self.matches(&Type::base(ty::BOOL), &computed) {
            self.error(
                format!("condition must be bool, got {computed}"),
                cond.span(),
            );
        }
    }

    fn check_declaration(&mut self, decl: &DeclarationStmt, scope: &EnvRef) -> Type {
        let declared = if decl.ty.is_unset() {
            None
        } else {
            Some(self.resolve_type(&decl.ty, scope, decl.span))
        };

        // Function values are pre-declared from their signature so the
        // body can call itself.
        let (computed, predeclared) = if let Expr::Function(f) = &decl.value {
            let mut signature = self.function_signature(f, scope);
            if decl.mutable {
                signature = signature.mutable();
            }
            let cell = env::declare(
                scope,
                TypeDecl {
                    name: decl.name.clone(),
                    mutable: decl.mutable,
                    reference: false,
                    ty: signature,
                },
            );
            if cell.is_err() {
                self.error(
                    format!("{} already exists in scope", decl.name),
                    decl.span,
                );
            }
            (self.check_expr(&decl.value, scope), cell.ok())
        } else {
            (self.check_expr(&decl.value, scope), None)
        };

        if let Some(declared) = &declared {
            if !self.matches(declared, &computed) {
                self.error(
                    format!("type {computed} doesn't match {declared}"),
                    decl.span,
                );
                return Type::unset();
            }
        }

        let mut assigned = declared.unwrap_or(computed);
        if decl.mutable {
            assigned = assigned.mutable();
        }

        match predeclared {
            Some(cell) => cell.borrow_mut().ty = assigned,
            None => {
                if env::declare(
                    scope,
                    TypeDecl {
                        name: decl.name.clone(),
                        mutable: decl.mutable,
                        reference: false,
                        ty: assigned,
                    },
                )
                .is_err()
                {
                    self.error(
                        format!("{} already exists in scope", decl.name),
                        decl.span,
                    );
                }
            }
        }

        Type::unset()
    }

    fn check_struct_stmt(&mut self, stmt: &StructStmt, scope: &EnvRef) -> Type {
        let properties = stmt
            .properties
            .iter()
            .map(|prop| Type::wrap(prop.name.clone(), self.resolve_type(&prop.ty, scope, prop.span)))
            .collect();

        if env::register_type(scope, &stmt.name, Type::with_args(ty::STRUCT, properties)).is_err() {
            self.error(format!("type {} already exists", stmt.name), stmt.span);
        }
        Type::unset()
    }

    fn check_interface_stmt(&mut self, stmt: &InterfaceStmt, scope: &EnvRef) -> Type {
        let registered = match &stmt.body {
            InterfaceBody::Single(ty) => self.resolve_type(ty, scope, stmt.span),
            InterfaceBody::Properties(props) => {
                let properties = props
                    .iter()
                    .map(|prop| {
                        Type::wrap(prop.name.clone(), self.resolve_type(&prop.ty, scope, prop.span))
                    })
                    .collect();
                Type::with_args(ty::DICT, properties)
            }
        };

        if env::register_type(scope, &stmt.name, registered).is_err() {
            self.error(format!("type {} already exists", stmt.name), stmt.span);
        }
        Type::unset()
    }

    fn check_enum_stmt(&mut self, stmt: &EnumStmt, scope: &EnvRef) -> Type {
        let members = stmt
            .members
            .iter()
            .map(|(name, _)| Type::wrap(name.clone(), Type::base(ty::INT)))
            .collect();

        if env::register_type(scope, &stmt.name, Type::with_args(ty::ENUM, members)).is_err() {
            self.error(format!("type {} already exists", stmt.name), stmt.span);
        }
        Type::unset()
    }

    /// `if` is checked as an expression-shaped statement: its type is
    /// the union of both branch types, which feeds return inference.
    fn check_if_stmt(&mut self, stmt: &IfStmt, scope: &EnvRef) -> Type {
        self.check_condition(&stmt.cond, scope);
        let then_ty = self.check_stmt(&stmt.then_block, scope);
        let else_ty = match &stmt.else_block {
            Some(block) => self.check_stmt(block, scope),
            None => Type::unset(),
        };
        Type::with_args(ty::UNION, vec![then_ty, else_ty])
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn check_expr(&mut self, expr: &Expr, scope: &EnvRef) -> Type {
        match expr {
            Expr::Int(_) => Type::base(ty::INT),
            Expr::Float(_) => Type::base(ty::FLOAT),
            Expr::Bool(_) => Type::base(ty::BOOL),
            Expr::Str(_) => Type::base(ty::STRING),
            Expr::Symbol(sym) => self.check_symbol(sym, scope),
            Expr::Binary(binary) => self.check_binary(binary, scope),
            Expr::Prefix(prefix) => self.check_prefix(prefix, scope),
            Expr::Assignment(assign) => self.check_assignment(assign, scope),
            Expr::Member(member) => self.check_member(member, scope),
            Expr::Index(index) => self.check_index(index, scope),
            Expr::StructLiteral(literal) => self.check_struct_literal(literal, scope),
            Expr::Array(array) => self.check_array(array, scope),
            Expr::Call(call) => self.check_call(call, scope),
            Expr::Function(f) => self.check_function(f, scope),
            Expr::Is(is) => {
                self.check_expr(&is.value, scope);
                Type::base(ty::BOOL)
            }
            Expr::Deref(deref) => self.check_deref(deref, scope),
            Expr::Error(_) => Type::unset(),
        }
    }

    fn check_symbol(&mut self, sym: &Symbol, scope: &EnvRef) -> Type {
        let Some(decl) = env::get(scope, &sym.name) else {
            self.error(format!("variable {} doesn't exist", sym.name), sym.span);
            return Type::unset();
        };

        let decl_ty = decl.borrow().ty.clone();
        if sym.reference {
            decl_ty.reference()
        } else {
            decl_ty.payload().clone()
        }
    }

    fn check_binary(&mut self, binary: &BinaryExpr, scope: &EnvRef) -> Type {
        let left = self.check_expr(&binary.left, scope);
        let right = self.check_expr(&binary.right, scope);
        let left = left.payload();
        let right = right.payload();

        if left.is_unset() || right.is_unset() {
            return Type::unset();
        }

        match self.ops.get(binary.op, &left.name, &right.name) {
            Some(result) => result.clone(),
            None => {
                self.error(
                    format!("no operation for {} and {}", left, right),
                    binary.span,
                );
                Type::unset()
            }
        }
    }

    fn check_prefix(&mut self, prefix: &PrefixExpr, scope: &EnvRef) -> Type {
        let rhs = self.check_expr(&prefix.rhs, scope);
        let rhs = rhs.payload();
        if rhs.is_unset() {
            return Type::unset();
        }

        match prefix.op {
            // `-x` runs through the multiplication row, mirroring the
            // interpreter's (-1) * x lowering.
            TokenKind::Minus => match self.ops.get(TokenKind::Star, ty::INT, &rhs.name) {
                Some(result) => result.clone(),
                None => {
                    self.error(format!("cannot negate {rhs}"), prefix.span);
                    Type::unset()
                }
            },
            TokenKind::Not => {
                if !self.matches(&Type::base(ty::BOOL), rhs) {
                    self.error(format!("cannot negate {rhs}"), prefix.span);
                }
                Type::base(ty::BOOL)
            }
            other => {
                self.error(
                    format!("unknown prefix operator {}", other.describe()),
                    prefix.span,
                );
                Type::unset()
            }
        }
    }

    /// The assignable payload behind an assignment target, with the
    /// mutability rule enforced at the target's root binding.
    fn check_assign_target(&mut self, target: &Expr, scope: &EnvRef) -> Type {
        match target {
            Expr::Symbol(sym) => {
                let Some(decl) = env::get(scope, &sym.name) else {
                    self.error(format!("variable {} doesn't exist", sym.name), sym.span);
                    return Type::unset();
                };
                let decl_ty = decl.borrow().ty.clone();
                let stripped = decl_ty.strip(ty::REFERENCE);
                if !stripped.is(ty::MUTABLE) {
                    if decl_ty.is(ty::REFERENCE) {
                        self.error(
                            format!("{} is a reference to an immutable value", sym.name),
                            sym.span,
                        );
                    } else {
                        self.error(format!("{} is not mutable", sym.name), sym.span);
                    }
                    return Type::unset();
                }
                stripped.strip(ty::MUTABLE).clone()
            }
            Expr::Deref(deref) => match &deref.value {
                Expr::Symbol(_) => self.check_assign_target(&deref.value, scope),
                _ => {
                    self.error("invalid assignment target".to_string(), deref.span);
                    Type::unset()
                }
            },
            Expr::Member(member) => {
                // Field mutability follows the root binding.
                self.require_mutable_root(&member.target, scope);
                self.check_member(member, scope)
            }
            Expr::Index(index) => {
                self.require_mutable_root(&index.target, scope);
                self.check_index(index, scope)
            }
            other => {
                self.error("invalid assignment target".to_string(), other.span());
                Type::unset()
            }
        }
    }

    /// Walk member/index chains down to the root symbol and require it
    /// to be a mutable binding.
    fn require_mutable_root(&mut self, expr: &Expr, scope: &EnvRef) {
        match expr {
            Expr::Symbol(sym) => {
                if let Some(decl) = env::get(scope, &sym.name) {
                    let decl_ty = decl.borrow().ty.clone();
                    if !decl_ty.strip(ty::REFERENCE).is(ty::MUTABLE) {
                        self.error(format!("{} is not mutable", sym.name), sym.span);
                    }
                }
            }
            Expr::Member(member) => self.require_mutable_root(&member.target, scope),
            Expr::Index(index) => self.require_mutable_root(&index.target, scope),
            _ => {}
        }
    }

    fn check_assignment(&mut self, assign: &AssignmentExpr, scope: &EnvRef) -> Type {
        let payload = self.check_assign_target(&assign.target, scope);
        let right = self.check_expr(&assign.rhs, scope);
        let right = right.payload().clone();

        if payload.is_unset() || right.is_unset() {
            return Type::unset();
        }

        let result = match assignment_base_op(assign.op) {
            Some(op) => match self.ops.get(op, &payload.name, &right.name) {
                Some(result) => result.clone(),
                None => {
                    self.error(
                        format!("no operation for {} and {}", payload, right),
                        assign.span,
                    );
                    return Type::unset();
                }
            },
            None => right,
        };

        if !self.matches(&payload, &result) {
            self.error(
                format!("type {result} is not assignable to variable of type {payload}"),
                assign.span,
            );
        }

        Type::unset()
    }

    fn check_member(&mut self, member: &MemberExpr, scope: &EnvRef) -> Type {
        // `Enum.Member` resolves through the type registry when the
        // target names a registered enum rather than a binding.
        if let Expr::Symbol(sym) = &member.target {
            if env::get(scope, &sym.name).is_none() {
                if let Some(registered) = env::lookup_type(scope, &sym.name) {
                    if registered.is(ty::ENUM) {
                        if registered.args.iter().any(|m| m.name == member.property) {
                            return Type::base(ty::INT);
                        }
                        self.error(
                            format!("no member {} on enum {}", member.property, sym.name),
                            member.span,
                        );
                        return Type::unset();
                    }
                }
            }
        }

        let target = self.check_expr(&member.target, scope);
        let target = target.payload();
        if target.is_unset() {
            return Type::unset();
        }

        if target.is(ty::STRUCT) || target.is(ty::DICT) {
            match target.args.iter().find(|prop| prop.name == member.property) {
                Some(prop) if prop.args.len() == 1 => return prop.args[0].clone(),
                _ => {
                    self.error(
                        format!("no property {} on {}", member.property, target),
                        member.span,
                    );
                    return Type::unset();
                }
            }
        }

        self.error(
            format!("{} has no properties to access", target),
            member.span,
        );
        Type::unset()
    }

    fn check_index(&mut self, index: &IndexExpr, scope: &EnvRef) -> Type {
        let target = self.check_expr(&index.target, scope);
        let target = target.payload();
        let idx = self.check_expr(&index.index, scope);

        if !self.matches(&Type::base(ty::INT), idx.payload()) {
            self.error(format!("index must be int, got {idx}"), index.index.span());
        }

        if target.is_unset() {
            return Type::unset();
        }
        if !target.is(ty::ARRAY) {
            self.error(format!("cannot index {target}"), index.span);
            return Type::unset();
        }

        match target.args.len() {
            0 => Type::unset(),
            1 => target.args[0].clone(),
            _ => Type::with_args(ty::UNION, target.args.clone()),
        }
    }

    fn check_struct_literal(&mut self, literal: &StructLiteral, scope: &EnvRef) -> Type {
        let Some(struct_ty) = env::lookup_type(scope, &literal.name) else {
            self.error(format!("type {} doesn't exist", literal.name), literal.span);
            return Type::unset();
        };
        if !struct_ty.is(ty::STRUCT) {
            self.error(format!("{} is not a struct", literal.name), literal.span);
            return Type::unset();
        }

        for prop in &struct_ty.args {
            let Some(field) = literal.fields.iter().find(|f| f.name == prop.name) else {
                self.error(
                    format!("property {} missing on struct", prop.name),
                    literal.span,
                );
                continue;
            };
            let computed = self.check_expr(&field.value, scope);
            let expected = &prop.args[0];
            if !self.matches(expected, computed.payload()) {
                self.error(
                    format!(
                        "property {} expected {} but got {}",
                        prop.name,
                        expected,
                        computed.payload()
                    ),
                    field.span,
                );
            }
        }

        for field in &literal.fields {
            if !struct_ty.args.iter().any(|prop| prop.name == field.name) {
                self.error(
                    format!("unknown property {} on {}", field.name, literal.name),
                    field.span,
                );
            }
        }

        struct_ty
    }

    fn check_array(&mut self, array: &ArrayLiteral, scope: &EnvRef) -> Type {
        let mut elements: Vec<Type> = Vec::new();
        for element in &array.elements {
            let computed = self.check_expr(element, scope);
            let computed = computed.payload().clone();
            if !elements.contains(&computed) {
                elements.push(computed);
            }
        }
        Type::with_args(ty::ARRAY, elements)
    }

    fn check_call(&mut self, call: &CallExpr, scope: &EnvRef) -> Type {
        let callee = self.check_expr(&call.callee, scope);
        let callee = callee.payload();

        if callee.is_unset() {
            return Type::unset();
        }

        // Variadic builtins take anything; arguments are still checked
        // for their own errors.
        if callee.is(BUILTIN) {
            for arg in &call.args {
                self.check_expr(&arg.value, scope);
            }
            return Type::unset();
        }

        if !callee.is(ty::FUNCTION) {
            self.error(
                format!("{} is not a function", describe_callee(&call.callee)),
                call.span,
            );
            return Type::unset();
        }

        let mut params: &[Type] = &[];
        let mut return_type = Type::unset();
        for part in &callee.args {
            if part.is(ty::FUNCTION_ARG) {
                params = &part.args;
            } else if part.is(ty::FUNCTION_RETURN) && part.args.len() == 1 {
                return_type = part.args[0].clone();
            }
        }

        let bound = self.bind_args(call, params);
        if call.args.len() > params.len() {
            self.error(
                format!(
                    "too many arguments. expected {}, got {}",
                    params.len(),
                    call.args.len()
                ),
                call.span,
            );
        } else if call.args.len() < params.len() {
            self.error(
                format!(
                    "missing arguments. expected {}, got {}",
                    params.len(),
                    call.args.len()
                ),
                call.span,
            );
        }

        for (index, (param, arg)) in bound.iter().enumerate() {
            let Some(arg) = arg else { continue };
            self.check_call_arg(index, param, arg, scope);
        }

        return_type
    }

    /// Pair up parameters and arguments: positional by index, named by
    /// parameter wrapper name.
    fn bind_args<'c>(
        &mut self,
        call: &'c CallExpr,
        params: &[Type],
    ) -> Vec<(Type, Option<&'c Arg>)> {
        let mut slots: Vec<(Type, Option<&Arg>)> =
            params.iter().map(|p| (p.clone(), None)).collect();
        let mut next_positional = 0usize;

        for arg in &call.args {
            match &arg.name {
                Some(name) => match slots.iter_mut().find(|(param, _)| param.name == *name) {
                    Some(slot) => slot.1 = Some(arg),
                    None => {
                        self.error(format!("unknown named argument {name}"), arg.span);
                    }
                },
                None => {
                    if let Some(slot) = slots.get_mut(next_positional) {
                        slot.1 = Some(arg);
                    }
                    next_positional += 1;
                }
            }
        }

        slots
    }

    fn check_call_arg(&mut self, index: usize, param: &Type, arg: &Arg, scope: &EnvRef) {
        // A parameter wrapper always carries exactly one inner type;
        // hand-written function type annotations may not.
        let [expected] = param.args.as_slice() else {
            self.check_expr(&arg.value, scope);
            return;
        };
        let computed = self.check_expr(&arg.value, scope);

        if expected.is(ty::REFERENCE) {
            let is_reference_arg = matches!(&arg.value, Expr::Symbol(sym) if sym.reference);
            if !is_reference_arg {
                self.error(
                    format!("argument {} must be passed by reference", param.name),
                    arg.span,
                );
                return;
            }
            if expected.strip(ty::REFERENCE).is(ty::MUTABLE)
                && !computed.strip(ty::REFERENCE).is(ty::MUTABLE)
            {
                self.error(
                    format!(
                        "mutable reference {} requires a mutable binding",
                        param.name
                    ),
                    arg.span,
                );
                return;
            }
        } else if matches!(&arg.value, Expr::Symbol(sym) if sym.reference) {
            self.error(
                format!("cannot pass a reference to by-value argument {}", param.name),
                arg.span,
            );
            return;
        }

        if !self.matches(expected.payload(), computed.payload()) {
            self.error(
                format!(
                    "mismatched argument {}. expected {}, got {}",
                    index,
                    expected.payload(),
                    computed.payload()
                ),
                arg.span,
            );
        }
    }

    /// The function type derivable from the declaration alone, before
    /// the body is checked. Used to pre-declare named functions for
    /// recursion and as the shape the checked body must agree with.
    fn function_signature(&mut self, f: &FnExpr, scope: &EnvRef) -> Type {
        let outer = self.type_param.take();
        self.type_param = f.type_param.clone();

        let args = f
            .params
            .iter()
            .map(|param| Type::wrap(param.name.clone(), self.param_type(param, scope)))
            .collect();
        let ret = self.resolve_type(&f.return_type, scope, f.span);

        self.type_param = outer;

        Type::with_args(
            ty::FUNCTION,
            vec![
                Type::with_args(ty::FUNCTION_ARG, args),
                Type::wrap(ty::FUNCTION_RETURN, ret),
            ],
        )
    }

    /// A parameter's declared type with its modifier wrappers applied:
    /// `mutable` innermost, `reference` on top.
    fn param_type(&mut self, param: &Param, scope: &EnvRef) -> Type {
        let mut resolved = self.resolve_type(&param.ty, scope, param.span);
        if param.mutable {
            resolved = resolved.mutable();
        }
        if param.reference {
            resolved = resolved.reference();
        }
        resolved
    }

    fn check_function(&mut self, f: &FnExpr, scope: &EnvRef) -> Type {
        let outer = self.type_param.take();
        self.type_param = f.type_param.clone();

        let fn_scope = child_env(scope);
        let mut args = Vec::new();
        for param in &f.params {
            let param_ty = self.param_type(param, &fn_scope);
            args.push(Type::wrap(param.name.clone(), param_ty.clone()));
            if env::declare(
                &fn_scope,
                TypeDecl {
                    name: param.name.clone(),
                    mutable: param.mutable,
                    reference: param.reference,
                    ty: param_ty,
                },
            )
            .is_err()
            {
                self.error(
                    format!("{} already exists in scope", param.name),
                    param.span,
                );
            }
        }

        let body_scope = child_env(&fn_scope);
        let inferred = self.check_block_body(&f.body, &body_scope);

        let declared = self.resolve_type(&f.return_type, &fn_scope, f.span);
        let return_type = if declared.is_unset() {
            inferred
        } else {
            if !self.matches(&declared, &inferred) {
                self.error(
                    format!("type {inferred} doesn't match {declared}"),
                    f.span,
                );
            }
            declared
        };

        self.type_param = outer;

        Type::with_args(
            ty::FUNCTION,
            vec![
                Type::with_args(ty::FUNCTION_ARG, args),
                Type::wrap(ty::FUNCTION_RETURN, return_type),
            ],
        )
    }

    fn check_deref(&mut self, deref: &DerefExpr, scope: &EnvRef) -> Type {
        // Symbol reads already strip modifiers, so re-derive the full
        // declaration type for the reference check.
        let inner = match &deref.value {
            Expr::Symbol(sym) => match env::get(scope, &sym.name) {
                Some(decl) => decl.borrow().ty.clone(),
                None => {
                    self.error(format!("variable {} doesn't exist", sym.name), sym.span);
                    return Type::unset();
                }
            },
            other => self.check_expr(other, scope),
        };

        if inner.is_unset() {
            return Type::unset();
        }
        if !inner.is(ty::REFERENCE) {
            self.error(
                format!("can't dereference a value that's not a reference ({inner})"),
                deref.span,
            );
            return Type::unset();
        }

        inner.payload().clone()
    }

    /// Resolve a parsed type expression: well-known names pass through
    /// with resolved arguments, the active generic parameter erases to
    /// unset, and anything else goes through the registry.
    fn resolve_type(&mut self, parsed: &Type, scope: &EnvRef, span: Span) -> Type {
        if parsed.is_unset() {
            return Type::unset();
        }

        if let Some(param) = &self.type_param {
            if parsed.name == *param {
                return Type::unset();
            }
        }

        const WELL_KNOWN: &[&str] = &[
            ty::INT,
            ty::FLOAT,
            ty::BOOL,
            ty::STRING,
            ty::ARRAY,
            ty::STRUCT,
            ty::DICT,
            ty::UNION,
            ty::ENUM,
            ty::FUNCTION,
            ty::FUNCTION_ARG,
            ty::FUNCTION_RETURN,
            ty::REFERENCE,
            ty::MUTABLE,
        ];

        // Property carriers hold `name<T>` wrappers whose names are
        // property names, not types; only the inner types resolve.
        if parsed.name == ty::FUNCTION_ARG || parsed.name == ty::STRUCT || parsed.name == ty::DICT
        {
            let args = parsed
                .args
                .iter()
                .map(|prop| {
                    let inner = prop
                        .args
                        .first()
                        .map(|inner| self.resolve_type(inner, scope, span))
                        .unwrap_or_else(Type::unset);
                    Type::wrap(prop.name.clone(), inner)
                })
                .collect();
            return Type::with_args(parsed.name.clone(), args);
        }

        if WELL_KNOWN.contains(&parsed.name.as_str()) {
            let args = parsed
                .args
                .iter()
                .map(|arg| self.resolve_type(arg, scope, span))
                .collect();
            return Type::with_args(parsed.name.clone(), args);
        }

        match env::lookup_type(scope, &parsed.name) {
            Some(registered) => registered,
            None => {
                self.error(format!("type {} doesn't exist", parsed.name), span);
                Type::unset()
            }
        }
    }
}

fn describe_callee(callee: &Expr) -> String {
    match callee {
        Expr::Symbol(sym) => sym.name.clone(),
        other => format!("expression at offset {}", other.span().start),
    }
}
