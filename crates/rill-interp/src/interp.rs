//! The evaluator: statement and expression walkers.

use std::io::Write;
use std::rc::Rc;

use rill_common::diagnostic::Diagnostic;
use rill_common::span::Span;
use rill_common::token::{assignment_base_op, TokenKind};
use rill_parser::ast::*;

use crate::env::{self, child_env, DeclRef, Declaration, EnvRef};
use crate::ops::OpTable;
use crate::value::{Builtin, Closure, EnumValue, StructValue, Value};

/// A fatal evaluation fault.
#[derive(Debug)]
struct RuntimeError {
    message: String,
    span: Span,
}

impl RuntimeError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(err: RuntimeError) -> Self {
        Diagnostic::new(err.message, err.span)
    }
}

/// Control signal carried alongside every statement result.
#[derive(Debug)]
enum Signal {
    None,
    Return(Value),
    Break(Span),
    Continue(Span),
}

/// What a statement evaluates to: a value (for expression statements)
/// plus the control signal unwinding through enclosing constructs.
#[derive(Debug)]
struct Flow {
    value: Value,
    signal: Signal,
}

impl Flow {
    fn none() -> Self {
        Flow {
            value: Value::Unit,
            signal: Signal::None,
        }
    }

    fn value(value: Value) -> Self {
        Flow {
            value,
            signal: Signal::None,
        }
    }

    fn signal(signal: Signal) -> Self {
        Flow {
            value: Value::Unit,
            signal,
        }
    }
}

/// Run a checked program, writing `print`/`println` output to `out`.
///
/// Returns the first runtime fault as a diagnostic; the interpreter does
/// not attempt recovery.
pub fn interpret(program: &[Stmt], out: &mut dyn Write) -> Result<(), Diagnostic> {
    let mut interp = Interpreter {
        out,
        ops: OpTable::new(),
    };

    let root = env::root_env();
    for (name, builtin) in [("print", Builtin::Print), ("println", Builtin::Println)] {
        let _ = env::declare(
            &root,
            Declaration {
                name: name.to_string(),
                mutable: false,
                value: Value::Builtin(builtin),
            },
        );
    }

    let scope = child_env(&root);
    for stmt in program {
        let flow = interp.eval_stmt(stmt, &scope)?;
        match flow.signal {
            Signal::None => {}
            // A top-level return simply ends the program.
            Signal::Return(_) => break,
            Signal::Break(span) | Signal::Continue(span) => {
                return Err(Diagnostic::new("break or continue outside of a loop", span));
            }
        }
    }

    Ok(())
}

struct Interpreter<'out> {
    out: &'out mut dyn Write,
    ops: OpTable,
}

impl Interpreter<'_> {
    // ── Statements ─────────────────────────────────────────────────────

    fn eval_stmt(&mut self, stmt: &Stmt, scope: &EnvRef) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Block(block) => {
                let inner = child_env(scope);
                self.eval_block_body(&block.body, &inner)
            }
            Stmt::Expression(stmt) => Ok(Flow::value(self.eval_expr(&stmt.expr, scope)?)),
            Stmt::Declaration(decl) => self.eval_declaration(decl, scope),
            // Nominal types live in the checker; structs and interfaces
            // leave no runtime artifact.
            Stmt::Struct(_) | Stmt::Interface(_) | Stmt::Import(_) => Ok(Flow::none()),
            Stmt::Enum(stmt) => self.eval_enum(stmt, scope),
            Stmt::If(stmt) => self.eval_if(stmt, scope),
            Stmt::While(stmt) => self.eval_while(stmt, scope),
            Stmt::For(stmt) => self.eval_for(stmt, scope),
            Stmt::Return(stmt) => {
                let value = match &stmt.value {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::Unit,
                };
                Ok(Flow::signal(Signal::Return(value)))
            }
            Stmt::Continue(span) => Ok(Flow::signal(Signal::Continue(*span))),
            Stmt::Break(span) => Ok(Flow::signal(Signal::Break(*span))),
        }
    }

    /// Evaluate statements in order, stopping at the first control
    /// signal so it can unwind to whoever intercepts it. The value half
    /// of the result is the last statement's value.
    fn eval_block_body(&mut self, body: &[Stmt], scope: &EnvRef) -> Result<Flow, RuntimeError> {
        let mut last = Value::Unit;
        for stmt in body {
            let flow = self.eval_stmt(stmt, scope)?;
            if !matches!(flow.signal, Signal::None) {
                return Ok(flow);
            }
            last = flow.value;
        }
        Ok(Flow::value(last))
    }

    fn eval_declaration(
        &mut self,
        decl: &DeclarationStmt,
        scope: &EnvRef,
    ) -> Result<Flow, RuntimeError> {
        let value = self.eval_expr(&decl.value, scope)?;
        if env::declare(
            scope,
            Declaration {
                name: decl.name.clone(),
                mutable: decl.mutable,
                value,
            },
        )
        .is_err()
        {
            return Err(RuntimeError::new(
                format!("{} already exists in scope", decl.name),
                decl.span,
            ));
        }
        Ok(Flow::none())
    }

    fn eval_enum(&mut self, stmt: &EnumStmt, scope: &EnvRef) -> Result<Flow, RuntimeError> {
        let value = Value::EnumType(Rc::new(EnumValue {
            name: stmt.name.clone(),
            members: stmt.members.clone(),
        }));
        if env::declare(
            scope,
            Declaration {
                name: stmt.name.clone(),
                mutable: false,
                value,
            },
        )
        .is_err()
        {
            return Err(RuntimeError::new(
                format!("{} already exists in scope", stmt.name),
                stmt.span,
            ));
        }
        Ok(Flow::none())
    }

    fn eval_condition(&mut self, cond: &Expr, scope: &EnvRef) -> Result<bool, RuntimeError> {
        match self.eval_expr(cond, scope)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::new(
                format!("condition must be bool, got {}", other.type_name()),
                cond.span(),
            )),
        }
    }

    fn eval_if(&mut self, stmt: &IfStmt, scope: &EnvRef) -> Result<Flow, RuntimeError> {
        if self.eval_condition(&stmt.cond, scope)? {
            self.eval_stmt(&stmt.then_block, scope)
        } else if let Some(else_block) = &stmt.else_block {
            self.eval_stmt(else_block, scope)
        } else {
            Ok(Flow::none())
        }
    }

    fn eval_while(&mut self, stmt: &WhileStmt, scope: &EnvRef) -> Result<Flow, RuntimeError> {
        loop {
            if !self.eval_condition(&stmt.cond, scope)? {
                break;
            }
            let flow = self.eval_stmt(&stmt.body, scope)?;
            match flow.signal {
                Signal::Break(_) => break,
                Signal::Continue(_) | Signal::None => {}
                Signal::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::none())
    }

    fn eval_for(&mut self, stmt: &ForStmt, scope: &EnvRef) -> Result<Flow, RuntimeError> {
        let header = child_env(scope);
        self.eval_stmt(&stmt.init, &header)?;

        loop {
            if !self.eval_condition(&stmt.cond, &header)? {
                break;
            }
            let flow = self.eval_stmt(&stmt.body, &header)?;
            match flow.signal {
                Signal::Break(_) => break,
                // Continue still runs the step expression.
                Signal::Continue(_) | Signal::None => {}
                Signal::Return(_) => return Ok(flow),
            }
            self.eval_expr(&stmt.step, &header)?;
        }
        Ok(Flow::none())
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn eval_expr(&mut self, expr: &Expr, scope: &EnvRef) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(n.value)),
            Expr::Float(n) => Ok(Value::Float(n.value)),
            Expr::Bool(n) => Ok(Value::Bool(n.value)),
            Expr::Str(n) => Ok(Value::Str(n.value.clone())),
            Expr::Symbol(sym) => self.eval_symbol(sym, scope),
            Expr::Binary(binary) => {
                let left = self.eval_expr(&binary.left, scope)?;
                let right = self.eval_expr(&binary.right, scope)?;
                self.ops
                    .execute(binary.op, &left, &right)
                    .map_err(|message| RuntimeError::new(message, binary.span))
            }
            Expr::Prefix(prefix) => self.eval_prefix(prefix, scope),
            Expr::Assignment(assign) => self.eval_assignment(assign, scope),
            Expr::Member(member) => self.eval_member(member, scope),
            Expr::Index(index) => self.eval_index(index, scope),
            Expr::StructLiteral(literal) => {
                let mut fields = Vec::with_capacity(literal.fields.len());
                for field in &literal.fields {
                    let value = self.eval_expr(&field.value, scope)?;
                    fields.push((field.name.clone(), value));
                }
                Ok(Value::Struct(StructValue {
                    name: literal.name.clone(),
                    fields,
                }))
            }
            Expr::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(self.eval_expr(element, scope)?);
                }
                Ok(Value::Array(elements))
            }
            Expr::Call(call) => self.eval_call(call, scope),
            Expr::Function(f) => Ok(Value::Function(Rc::new(Closure {
                decl: (**f).clone(),
                env: Rc::clone(scope),
            }))),
            Expr::Is(is) => {
                let value = self.eval_expr(&is.value, scope)?;
                Ok(Value::Bool(value.is_type(&is.ty)))
            }
            Expr::Deref(deref) => self.eval_deref(deref, scope),
            Expr::Error(span) => Err(RuntimeError::new(
                "cannot evaluate an invalid expression",
                *span,
            )),
        }
    }

    /// Read a binding; reference handles are transparent.
    fn eval_symbol(&mut self, sym: &Symbol, scope: &EnvRef) -> Result<Value, RuntimeError> {
        let decl = self.lookup(sym, scope)?;
        let value = decl.borrow().value.clone();
        match value {
            Value::Ref(cell) => Ok(resolve_ref(&cell).borrow().value.clone()),
            other => Ok(other),
        }
    }

    fn lookup(&self, sym: &Symbol, scope: &EnvRef) -> Result<DeclRef, RuntimeError> {
        env::get(scope, &sym.name).ok_or_else(|| {
            RuntimeError::new(format!("variable {} doesn't exist", sym.name), sym.span)
        })
    }

    fn eval_prefix(&mut self, prefix: &PrefixExpr, scope: &EnvRef) -> Result<Value, RuntimeError> {
        let rhs = self.eval_expr(&prefix.rhs, scope)?;
        match prefix.op {
            // `-x` lowers to `(-1) * x`, forcing a multiplication the
            // operand type must already support.
            TokenKind::Minus => self
                .ops
                .execute(TokenKind::Star, &Value::Int(-1), &rhs)
                .map_err(|message| RuntimeError::new(message, prefix.span)),
            TokenKind::Not => match rhs {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(RuntimeError::new(
                    format!("cannot negate {}", other.type_name()),
                    prefix.span,
                )),
            },
            other => Err(RuntimeError::new(
                format!("unknown prefix operator {}", other.describe()),
                prefix.span,
            )),
        }
    }

    fn eval_member(&mut self, member: &MemberExpr, scope: &EnvRef) -> Result<Value, RuntimeError> {
        let target = self.eval_expr(&member.target, scope)?;
        match target {
            Value::Struct(s) => s.field(&member.property).cloned().ok_or_else(|| {
                RuntimeError::new(
                    format!("no property {} on {}", member.property, s.name),
                    member.span,
                )
            }),
            Value::EnumType(e) => e
                .members
                .iter()
                .find(|(name, _)| *name == member.property)
                .map(|(_, ordinal)| Value::Int(*ordinal))
                .ok_or_else(|| {
                    RuntimeError::new(
                        format!("no member {} on enum {}", member.property, e.name),
                        member.span,
                    )
                }),
            other => Err(RuntimeError::new(
                format!("{} has no properties to access", other.type_name()),
                member.span,
            )),
        }
    }

    fn eval_index(&mut self, index: &IndexExpr, scope: &EnvRef) -> Result<Value, RuntimeError> {
        let target = self.eval_expr(&index.target, scope)?;
        let idx = self.index_value(&index.index, scope)?;
        match target {
            Value::Array(elements) => {
                if idx < 0 || idx as usize >= elements.len() {
                    return Err(RuntimeError::new(
                        format!("index {} out of bounds (len {})", idx, elements.len()),
                        index.span,
                    ));
                }
                Ok(elements[idx as usize].clone())
            }
            other => Err(RuntimeError::new(
                format!("cannot index {}", other.type_name()),
                index.span,
            )),
        }
    }

    fn index_value(&mut self, expr: &Expr, scope: &EnvRef) -> Result<i64, RuntimeError> {
        match self.eval_expr(expr, scope)? {
            Value::Int(n) => Ok(n),
            other => Err(RuntimeError::new(
                format!("index must be int, got {}", other.type_name()),
                expr.span(),
            )),
        }
    }

    fn eval_deref(&mut self, deref: &DerefExpr, scope: &EnvRef) -> Result<Value, RuntimeError> {
        let Expr::Symbol(sym) = &deref.value else {
            return Err(RuntimeError::new(
                "can't dereference a value that's not a reference",
                deref.span,
            ));
        };
        let decl = self.lookup(sym, scope)?;
        let value = decl.borrow().value.clone();
        match value {
            Value::Ref(cell) => Ok(resolve_ref(&cell).borrow().value.clone()),
            _ => Err(RuntimeError::new(
                "can't dereference a value that's not a reference",
                deref.span,
            )),
        }
    }

    // ── Assignment ─────────────────────────────────────────────────────

    fn eval_assignment(
        &mut self,
        assign: &AssignmentExpr,
        scope: &EnvRef,
    ) -> Result<Value, RuntimeError> {
        let rhs = self.eval_expr(&assign.rhs, scope)?;

        let new_value = match assignment_base_op(assign.op) {
            Some(op) => {
                let current = self.eval_expr(&assign.target, scope)?;
                self.ops
                    .execute(op, &current, &rhs)
                    .map_err(|message| RuntimeError::new(message, assign.span))?
            }
            None => rhs,
        };

        self.write_back(&assign.target, new_value, scope)?;
        Ok(Value::Unit)
    }

    /// Store a value into an assignment target. Aggregate targets
    /// (members, indexes) read the base, modify the copy, and write the
    /// copy back down to the root binding.
    fn write_back(
        &mut self,
        target: &Expr,
        value: Value,
        scope: &EnvRef,
    ) -> Result<(), RuntimeError> {
        match target {
            Expr::Symbol(sym) => {
                let decl = self.lookup(sym, scope)?;
                let handle = match &decl.borrow().value {
                    Value::Ref(cell) => Some(Rc::clone(cell)),
                    _ => None,
                };
                match handle {
                    Some(cell) => {
                        let cell = resolve_ref(&cell);
                        if !decl.borrow().mutable || !cell.borrow().mutable {
                            return Err(RuntimeError::new(
                                format!("{} is not mutable", sym.name),
                                sym.span,
                            ));
                        }
                        cell.borrow_mut().value = value;
                    }
                    None => {
                        if !decl.borrow().mutable {
                            return Err(RuntimeError::new(
                                format!("{} is not mutable", sym.name),
                                sym.span,
                            ));
                        }
                        decl.borrow_mut().value = value;
                    }
                }
                Ok(())
            }
            Expr::Deref(deref) => {
                let Expr::Symbol(sym) = &deref.value else {
                    return Err(RuntimeError::new("invalid assignment target", deref.span));
                };
                let decl = self.lookup(sym, scope)?;
                let is_ref = matches!(decl.borrow().value, Value::Ref(_));
                if !is_ref {
                    return Err(RuntimeError::new(
                        "can't dereference a value that's not a reference",
                        deref.span,
                    ));
                }
                self.write_back(&deref.value, value, scope)
            }
            Expr::Member(member) => {
                let mut base = self.eval_expr(&member.target, scope)?;
                match &mut base {
                    Value::Struct(s) => {
                        let Some(slot) = s
                            .fields
                            .iter_mut()
                            .find(|(name, _)| *name == member.property)
                        else {
                            return Err(RuntimeError::new(
                                format!("no property {} on {}", member.property, s.name),
                                member.span,
                            ));
                        };
                        slot.1 = value;
                    }
                    other => {
                        return Err(RuntimeError::new(
                            format!("{} has no properties to access", other.type_name()),
                            member.span,
                        ));
                    }
                }
                self.write_back(&member.target, base, scope)
            }
            Expr::Index(index) => {
                let idx = self.index_value(&index.index, scope)?;
                let mut base = self.eval_expr(&index.target, scope)?;
                match &mut base {
                    Value::Array(elements) => {
                        if idx < 0 || idx as usize >= elements.len() {
                            return Err(RuntimeError::new(
                                format!("index {} out of bounds (len {})", idx, elements.len()),
                                index.span,
                            ));
                        }
                        elements[idx as usize] = value;
                    }
                    other => {
                        return Err(RuntimeError::new(
                            format!("cannot index {}", other.type_name()),
                            index.span,
                        ));
                    }
                }
                self.write_back(&index.target, base, scope)
            }
            other => Err(RuntimeError::new(
                "invalid assignment target",
                other.span(),
            )),
        }
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn eval_call(&mut self, call: &CallExpr, scope: &EnvRef) -> Result<Value, RuntimeError> {
        let callee = self.eval_expr(&call.callee, scope)?;
        match callee {
            Value::Builtin(builtin) => self.call_builtin(builtin, call, scope),
            Value::Function(closure) => self.call_function(&closure, call, scope),
            other => Err(RuntimeError::new(
                format!("{} is not a function", other.type_name()),
                call.span,
            )),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: Builtin,
        call: &CallExpr,
        scope: &EnvRef,
    ) -> Result<Value, RuntimeError> {
        let mut rendered = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            rendered.push(self.eval_expr(&arg.value, scope)?.to_string());
        }
        let joined = rendered.join(" ");

        let result = match builtin {
            Builtin::Print => write!(self.out, "{joined}"),
            Builtin::Println => writeln!(self.out, "{joined}"),
        };
        result
            .map_err(|err| RuntimeError::new(format!("failed to write output: {err}"), call.span))?;

        Ok(Value::Unit)
    }

    fn call_function(
        &mut self,
        closure: &Closure,
        call: &CallExpr,
        caller: &EnvRef,
    ) -> Result<Value, RuntimeError> {
        let params = &closure.decl.params;

        // Pair arguments with parameters: positional by index, named by
        // parameter name.
        let mut slots: Vec<Option<&Arg>> = vec![None; params.len()];
        let mut next_positional = 0usize;
        for arg in &call.args {
            match &arg.name {
                Some(name) => match closure.decl.param(name) {
                    Some(param) => slots[param.index] = Some(arg),
                    None => {
                        return Err(RuntimeError::new(
                            format!("unknown named argument {name}"),
                            arg.span,
                        ));
                    }
                },
                None => {
                    if next_positional >= params.len() {
                        return Err(RuntimeError::new(
                            format!(
                                "too many arguments. expected {}, got {}",
                                params.len(),
                                call.args.len()
                            ),
                            call.span,
                        ));
                    }
                    slots[next_positional] = Some(arg);
                    next_positional += 1;
                }
            }
        }

        // The invocation scope is a child of the closure's captured
        // environment, not of the call site.
        let scope = child_env(&closure.env);

        for (param, slot) in params.iter().zip(&slots) {
            let Some(arg) = slot else {
                return Err(RuntimeError::new(
                    format!("missing argument {}", param.name),
                    call.span,
                ));
            };
            self.bind_param(param, arg, &scope, caller)?;
        }

        let body_scope = child_env(&scope);
        let flow = self.eval_block_body(&closure.decl.body, &body_scope)?;
        match flow.signal {
            Signal::Return(value) => Ok(value),
            // No return fired: the body's last value is the result.
            Signal::None => Ok(flow.value),
            Signal::Break(span) | Signal::Continue(span) => Err(RuntimeError::new(
                "break or continue outside of a loop",
                span,
            )),
        }
    }

    fn bind_param(
        &mut self,
        param: &Param,
        arg: &Arg,
        scope: &EnvRef,
        caller: &EnvRef,
    ) -> Result<(), RuntimeError> {
        let declaration = if param.reference {
            let cell = match &arg.value {
                Expr::Symbol(sym) if sym.reference => resolve_ref(&self.lookup(sym, caller)?),
                other => {
                    return Err(RuntimeError::new(
                        format!("argument {} must be passed by reference", param.name),
                        other.span(),
                    ));
                }
            };
            if param.mutable && !cell.borrow().mutable {
                return Err(RuntimeError::new(
                    format!("mutable reference {} requires a mutable binding", param.name),
                    arg.span,
                ));
            }
            Declaration {
                name: param.name.clone(),
                mutable: param.mutable,
                value: Value::Ref(cell),
            }
        } else {
            if matches!(&arg.value, Expr::Symbol(sym) if sym.reference) {
                return Err(RuntimeError::new(
                    format!("cannot pass a reference to by-value argument {}", param.name),
                    arg.span,
                ));
            }
            Declaration {
                name: param.name.clone(),
                mutable: param.mutable,
                value: self.eval_expr(&arg.value, caller)?,
            }
        };

        env::declare(scope, declaration).map_err(|_| {
            RuntimeError::new(
                format!("{} already exists in scope", param.name),
                param.span,
            )
        })?;
        Ok(())
    }
}

/// Follow a chain of reference handles down to the storage cell.
fn resolve_ref(cell: &DeclRef) -> DeclRef {
    let inner = match &cell.borrow().value {
        Value::Ref(next) => Some(Rc::clone(next)),
        _ => None,
    };
    match inner {
        Some(next) => resolve_ref(&next),
        None => Rc::clone(cell),
    }
}
