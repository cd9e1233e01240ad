//! Pass 2: statements, expression types and compatibility checks.

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::stack::ensure_sufficient_stack;
use litset_ir::{BinaryOp, ExprId, ExprKind, Function, Name, ParamKind, Stmt, StmtKind, UnaryOp};
use litset_sets::{evaluate_literal, render_values, NotLiteral};
use litset_types::{ContextClassifier, Idx, Pool, Site, TypeData};

use super::{well_known, ModuleChecker};

/// Where a value meets a declared type.
enum Expectation<'n> {
    Argument { position: usize, function: &'n str },
    Default { param: &'n str },
    Assignment,
    Return,
}

impl ModuleChecker<'_> {
    pub(super) fn check_body(&mut self, body: &[Stmt], top_level: bool) {
        for (index, stmt) in body.iter().enumerate() {
            if top_level && self.registered.contains(&index) {
                continue;
            }
            self.check_stmt(stmt, top_level);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, top_level: bool) {
        match &stmt.kind {
            StmtKind::Class(class) => {
                if top_level && self.is_set_class(&stmt.kind) {
                    return;
                }
                for &decorator in &class.decorators {
                    self.expression(decorator);
                }
                self.scopes.push(Default::default());
                self.nested.push(Default::default());
                self.check_body(&class.body, false);
                self.nested.pop();
                self.scopes.pop();
            }
            StmtKind::Function(function) => {
                if !top_level {
                    self.register_nested(function);
                }
                self.check_function(function);
            }
            StmtKind::Assign { targets, value } => {
                self.expression(*value);
                let ty = self.type_of(*value);
                for &target in targets {
                    self.assign(target, *value, ty);
                }
            }
            StmtKind::AnnAssign {
                target,
                annotation,
                value,
            } => {
                if let (ExprKind::Name(name), Some(value), true) = (
                    self.arena.kind(*target),
                    value,
                    self.is_alias_annotation(*annotation),
                ) {
                    self.register_alias(name, *value);
                    return;
                }
                let declared = self.annotation(*annotation, Site::Variable);
                if let Some(value) = value {
                    self.expression(*value);
                    self.check_compatible(*value, declared, &Expectation::Assignment);
                }
                match self.arena.kind(*target) {
                    ExprKind::Name(name) => self.bind(name, declared, true),
                    _ => self.expression(*target),
                }
            }
            StmtKind::TypeAlias { name, value, .. } => self.register_alias(*name, *value),
            StmtKind::Expr(expr) => self.expression(*expr),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.expression(*value);
                    if let Some(expected) = self.return_type {
                        self.check_compatible(*value, expected, &Expectation::Return);
                    }
                }
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.expression(*cond);
                self.check_body(then_body, false);
                self.check_body(else_body, false);
            }
            StmtKind::For { target, iter, body } => {
                self.expression(*iter);
                let iterable = self.type_of(*iter);
                let element = self.element_type(iterable);
                if let ExprKind::Name(name) = self.arena.kind(*target) {
                    self.bind(name, element, false);
                }
                self.check_body(body, false);
            }
            StmtKind::While { cond, body } => {
                self.expression(*cond);
                self.check_body(body, false);
            }
            StmtKind::Import(_) | StmtKind::Pass | StmtKind::Error => {}
        }
    }

    fn check_function(&mut self, function: &Function) {
        for &decorator in &function.decorators {
            self.expression(decorator);
        }
        let signature = self.signature_for(function);

        self.scopes.push(Default::default());
        for (param, declared) in function.params.iter().zip(&signature.params) {
            let ty = match param.kind {
                ParamKind::Regular => declared.ty,
                ParamKind::VarArgs => self.pool.generic("tuple", &[declared.ty]),
                ParamKind::KwArgs => self.pool.generic("dict", &[Idx::STR, declared.ty]),
            };
            self.bind(param.name, ty, true);
            if let Some(default) = param.default {
                self.expression(default);
                let expectation = Expectation::Default {
                    param: self.name(param.name),
                };
                self.check_compatible(default, declared.ty, &expectation);
            }
        }

        let saved = std::mem::replace(&mut self.return_type, signature.returns);
        self.nested.push(Default::default());
        self.check_body(&function.body, false);
        self.nested.pop();
        self.return_type = saved;
        self.scopes.pop();
    }

    fn assign(&mut self, target: ExprId, value: ExprId, ty: Idx) {
        match self.arena.kind(target) {
            ExprKind::Name(name) => match self.lookup_local(name) {
                Some(local) if local.declared => {
                    self.check_compatible(value, local.ty, &Expectation::Assignment);
                }
                _ => self.bind(name, ty, false),
            },
            _ => self.expression(target),
        }
    }

    /// Visit a runtime expression: resolve its set occurrences, then check
    /// the calls it makes to module functions.
    pub(super) fn expression(&mut self, expr: ExprId) {
        let classified = ContextClassifier::new(&self.arena, self.interner).expression(expr);
        self.process(classified);
        self.check_calls(expr);
    }

    fn check_calls(&mut self, expr: ExprId) {
        ensure_sufficient_stack(|| self.check_calls_inner(expr));
    }

    fn check_calls_inner(&mut self, expr: ExprId) {
        match self.arena.kind(expr) {
            ExprKind::Call { func, args } => {
                self.check_calls(func);
                let args = self.arena.args(args).to_vec();
                for arg in &args {
                    self.check_calls(arg.value);
                }
                if let ExprKind::Name(callee) = self.arena.kind(func) {
                    self.check_arguments(callee, &args);
                }
            }
            ExprKind::Attribute { receiver, .. } => self.check_calls(receiver),
            ExprKind::Subscript { value, index } => {
                self.check_calls(value);
                self.check_calls(index);
            }
            ExprKind::Unary { operand, .. } => self.check_calls(operand),
            ExprKind::Binary { left, right, .. } => {
                self.check_calls(left);
                self.check_calls(right);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                for e in [cond, then_expr, else_expr] {
                    self.check_calls(e);
                }
            }
            ExprKind::List(range)
            | ExprKind::Tuple(range)
            | ExprKind::Set(range)
            | ExprKind::Dict(range) => {
                let items = self.arena.list(range).to_vec();
                for item in items {
                    self.check_calls(item);
                }
            }
            ExprKind::Lambda { body } => self.check_calls(body),
            _ => {}
        }
    }

    fn check_arguments(&mut self, callee: Name, args: &[litset_ir::CallArg]) {
        let Some(signature) = self.callee_signature(callee).cloned() else {
            return;
        };
        let function = self.name(callee);
        let mut positional = 0;
        for (index, arg) in args.iter().enumerate() {
            let param = match arg.name {
                Some(keyword) => signature.keyword(keyword),
                None => {
                    positional += 1;
                    signature.positional(positional - 1)
                }
            };
            if let Some(param) = param {
                let expectation = Expectation::Argument {
                    position: index + 1,
                    function,
                };
                self.check_compatible(arg.value, param.ty, &expectation);
            }
        }
    }

    /// Report E3007 when `expr` cannot be assigned to `expected`. Only
    /// types that involve literals are checked.
    fn check_compatible(&mut self, expr: ExprId, expected: Idx, expectation: &Expectation<'_>) {
        if !mentions_literal(&self.pool, expected) {
            return;
        }
        let actual = self.type_of(expr);
        if self.pool.is_assignable(actual, expected) {
            return;
        }
        let found = self.pool.format_type(actual);
        let wanted = self.pool.format_type(expected);
        let message = match expectation {
            Expectation::Argument { position, function } => format!(
                "Argument {position} to \"{function}\" has incompatible type {found}; expected {wanted}"
            ),
            Expectation::Default { param } => format!(
                "Incompatible default for argument \"{param}\" \
                 (default has type {found}, argument has type {wanted})"
            ),
            Expectation::Assignment => format!(
                "Incompatible types in assignment (expression has type {found}, variable has type {wanted})"
            ),
            Expectation::Return => {
                format!("Incompatible return value type (got {found}, expected {wanted})")
            }
        };
        let mut diagnostic = Diagnostic::error(ErrorCode::E3007)
            .with_message(message)
            .with_label(self.arena.span(expr), format!("has type {found}"));
        if let Some(values) = self.pool.singleton_values(expected) {
            diagnostic = diagnostic.with_note(format!("allowed values: {}", render_values(values)));
        }
        self.report(diagnostic);
    }

    /// Static type of a runtime expression.
    pub(super) fn type_of(&mut self, expr: ExprId) -> Idx {
        if let Some(&ty) = self.expr_types.get(&expr) {
            return ty;
        }
        let ty = ensure_sufficient_stack(|| self.infer(expr));
        self.expr_types.insert(expr, ty);
        ty
    }

    fn infer(&mut self, expr: ExprId) -> Idx {
        match evaluate_literal(&self.arena, self.interner, expr) {
            Ok(value) => return self.pool.literal(value),
            Err(NotLiteral::Float(_)) => return self.pool.instance("float"),
            Err(NotLiteral::OutOfRange) => return Idx::INT,
            Err(NotLiteral::Computed) => {}
        }
        match self.arena.kind(expr) {
            ExprKind::Name(name) => self.lookup_local(name).map_or(Idx::UNKNOWN, |l| l.ty),
            ExprKind::FString => Idx::STR,
            ExprKind::Call { func, .. } => match self.arena.kind(func) {
                ExprKind::Name(name) => self
                    .callee_signature(name)
                    .and_then(|s| s.returns)
                    .or_else(|| well_known::builtin_call(self.name(name)))
                    .unwrap_or(Idx::UNKNOWN),
                _ => Idx::UNKNOWN,
            },
            ExprKind::Conditional {
                then_expr,
                else_expr,
                ..
            } => {
                let then_ty = self.type_of(then_expr);
                let else_ty = self.type_of(else_expr);
                self.pool.union([then_ty, else_ty])
            }
            ExprKind::Binary {
                op: BinaryOp::And | BinaryOp::Or,
                left,
                right,
            } => {
                let left = self.type_of(left);
                let right = self.type_of(right);
                self.pool.union([left, right])
            }
            ExprKind::Binary {
                op:
                    BinaryOp::Eq
                    | BinaryOp::NotEq
                    | BinaryOp::Lt
                    | BinaryOp::LtEq
                    | BinaryOp::Gt
                    | BinaryOp::GtEq
                    | BinaryOp::In
                    | BinaryOp::NotIn
                    | BinaryOp::Is
                    | BinaryOp::IsNot,
                ..
            }
            | ExprKind::Unary {
                op: UnaryOp::Not, ..
            } => Idx::BOOL,
            ExprKind::List(range) | ExprKind::Set(range) => {
                let items = self.arena.list(range).to_vec();
                let element = self.union_of(&items);
                let name = if matches!(self.arena.kind(expr), ExprKind::List(_)) {
                    "list"
                } else {
                    "set"
                };
                self.pool.generic(name, &[element])
            }
            ExprKind::Tuple(range) => {
                let items = self.arena.list(range).to_vec();
                let elements: Vec<Idx> = items.iter().map(|&item| self.type_of(item)).collect();
                self.pool.generic("tuple", &elements)
            }
            _ => Idx::UNKNOWN,
        }
    }

    fn union_of(&mut self, items: &[ExprId]) -> Idx {
        if items.is_empty() {
            return Idx::UNKNOWN;
        }
        let types: Vec<Idx> = items.iter().map(|&item| self.type_of(item)).collect();
        self.pool.union(types)
    }

    /// What iterating a value of type `iterable` yields.
    fn element_type(&self, iterable: Idx) -> Idx {
        if let Some(&elements) = self.set_elements.get(&iterable) {
            return elements;
        }
        match self.pool.data(iterable) {
            TypeData::Generic { name, args } if matches!(&**name, "list" | "set" | "frozenset") => {
                args.first().copied().unwrap_or(Idx::UNKNOWN)
            }
            TypeData::Str => Idx::STR,
            _ => Idx::UNKNOWN,
        }
    }
}

/// Whether `ty` names a literal anywhere.
fn mentions_literal(pool: &Pool, ty: Idx) -> bool {
    match pool.data(ty) {
        TypeData::Literal(_) => true,
        TypeData::Union(members) => members.iter().any(|&m| mentions_literal(pool, m)),
        TypeData::Generic { args, .. } => args.iter().any(|&a| mentions_literal(pool, a)),
        TypeData::ClassOf(inner) => mentions_literal(pool, *inner),
        _ => false,
    }
}
