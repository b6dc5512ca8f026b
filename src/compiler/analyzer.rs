//! # Semantic Elaborator
//!
//! Builds the scope tree for every module, resolves
//! every name lexically (invariant 1), checks arithmetic/comparison/logical
//! operand types, validates call arity, rejects duplicate decimal precision,
//! validates switch label typing, and enforces the variadic-return ordering
//! rule. Runs after parsing and before code generation; the first violation
//! aborts elaboration with a single [`CompileError`].

use crate::ast::nodes::*;
use crate::ast::types::{TypeId, TypeInterner, TypeKind};
use crate::compiler::error::CompileError;
use crate::compiler::library::LibraryRegistry;
use crate::compiler::scope::{Declaration, ScopeId, ScopeTree, StorageClass};
use std::collections::HashSet;

/// Output of semantic elaboration, carried into code generation so it never
/// has to re-resolve names or re-run type inference.
pub struct AnalysisResult {
    pub interner: TypeInterner,
    pub scopes: ScopeTree,
}

pub fn analyze(program: &SourceProgram) -> Result<AnalysisResult, CompileError> {
    let mut a = Analyzer::new();
    for module in &program.modules {
        a.collect_named_types(module);
    }
    for module in &program.modules {
        a.analyze_module(module, None)?;
    }
    Ok(AnalysisResult { interner: a.interner, scopes: a.scopes })
}

struct Analyzer {
    interner: TypeInterner,
    scopes: ScopeTree,
    registry: LibraryRegistry,
    /// Struct/enum names gathered from the whole program before elaboration,
    /// so a bare type name like `Counter` in a field or parameter type can be
    /// classified as `Struct("Counter")` vs. `Enum("Counter")` without a
    /// forward-declaration pass per module.
    known_structs: HashSet<String>,
    known_enums: HashSet<String>,
    loop_depth: usize,
}

impl Analyzer {
    fn new() -> Self {
        Self {
            interner: TypeInterner::new(),
            scopes: ScopeTree::new(),
            registry: LibraryRegistry::standard(),
            known_structs: HashSet::new(),
            known_enums: HashSet::new(),
            loop_depth: 0,
        }
    }

    fn collect_named_types(&mut self, module: &ModuleDecl) {
        for s in &module.structs {
            self.known_structs.insert(s.name.clone());
        }
        for e in &module.enums {
            self.known_enums.insert(e.name.clone());
        }
        for sub in &module.sub_modules {
            self.collect_named_types(sub);
        }
    }

    fn resolve_type(&mut self, ty: &TypeExpr) -> Result<TypeId, CompileError> {
        let kind = match ty.name.as_str() {
            "unknown" => TypeKind::Unknown,
            "none" | "void" => TypeKind::None,
            "number" => TypeKind::Number,
            "bool" | "boolean" => TypeKind::Bool,
            "string" => TypeKind::String,
            "timestamp" => TypeKind::Timestamp,
            "address" => TypeKind::Address,
            "hash" => TypeKind::Hash,
            "bytes" => TypeKind::Bytes,
            "any" => TypeKind::Any,
            "decimal" => {
                let places = ty
                    .args
                    .first()
                    .and_then(|a| a.name.parse::<u8>().ok())
                    .ok_or_else(|| {
                        CompileError::type_check(ty.line, "decimal<N> requires an integer precision argument")
                    })?;
                TypeKind::Decimal(places)
            }
            "array" => {
                let elem = ty.args.first().ok_or_else(|| {
                    CompileError::type_check(ty.line, "array<T> requires an element type argument")
                })?;
                TypeKind::Array(self.resolve_type(elem)?)
            }
            "map" => {
                let k = ty.args.first().ok_or_else(|| {
                    CompileError::type_check(ty.line, "map<K, V> requires a key type argument")
                })?;
                let v = ty.args.get(1).ok_or_else(|| {
                    CompileError::type_check(ty.line, "map<K, V> requires a value type argument")
                })?;
                TypeKind::Map(self.resolve_type(k)?, self.resolve_type(v)?)
            }
            "storagelist" => {
                let elem = ty.args.first().ok_or_else(|| {
                    CompileError::type_check(ty.line, "storagelist<T> requires an element type argument")
                })?;
                TypeKind::StorageList(self.resolve_type(elem)?)
            }
            "storagemap" => {
                let k = ty.args.first().ok_or_else(|| {
                    CompileError::type_check(ty.line, "storagemap<K, V> requires a key type argument")
                })?;
                let v = ty.args.get(1).ok_or_else(|| {
                    CompileError::type_check(ty.line, "storagemap<K, V> requires a value type argument")
                })?;
                TypeKind::StorageMap(self.resolve_type(k)?, self.resolve_type(v)?)
            }
            name if self.known_enums.contains(name) => TypeKind::Enum(name.to_string()),
            name => TypeKind::Struct(name.to_string()),
        };
        Ok(self.interner.intern(kind))
    }

    fn analyze_module(&mut self, module: &ModuleDecl, parent: Option<ScopeId>) -> Result<(), CompileError> {
        let scope = match parent {
            Some(p) => self.scopes.child_of(p),
            None => self.scopes.root(),
        };

        for lib in &module.imports {
            self.scopes.declare(scope, Declaration::Library { name: lib.library.clone() });
        }
        for s in &module.structs {
            let ty = self.interner.intern(TypeKind::Struct(s.name.clone()));
            self.scopes.declare(scope, Declaration::Struct { name: s.name.clone(), ty });
        }
        for e in &module.enums {
            let ty = self.interner.intern(TypeKind::Enum(e.name.clone()));
            self.scopes.declare(scope, Declaration::Enum { name: e.name.clone(), ty });
        }
        for g in &module.globals {
            let ty = self.resolve_type(&g.ty)?;
            self.scopes.declare(
                scope,
                Declaration::Var { name: g.name.clone(), ty, storage: StorageClass::Global, register: None },
            );
        }
        for m in module.methods.iter().chain(module.triggers.iter()) {
            let sig = self.method_signature(m)?;
            let ty = self.interner.intern(TypeKind::Method(sig));
            self.scopes.declare(scope, Declaration::Method { name: m.name.clone(), ty });
        }

        for p in &module.properties {
            self.analyze_property(module, scope, p)?;
        }
        if let Some(ctor) = &module.constructor {
            self.analyze_method(module, scope, ctor)?;
        }
        for m in &module.methods {
            self.analyze_method(module, scope, m)?;
        }
        for t in &module.triggers {
            self.analyze_method(module, scope, t)?;
        }
        for sub in &module.sub_modules {
            self.analyze_module(sub, Some(scope))?;
        }

        Ok(())
    }

    fn method_signature(&mut self, m: &MethodDecl) -> Result<crate::ast::types::MethodSignature, CompileError> {
        let mut params = Vec::with_capacity(m.params.len());
        for p in &m.params {
            params.push(self.resolve_type(&p.ty)?);
        }
        let return_type = match &m.return_type {
            Some(t) => self.resolve_type(t)?,
            None => self.interner.none(),
        };
        Ok(crate::ast::types::MethodSignature { params, return_type, variadic: m.variadic })
    }

    fn analyze_property(&mut self, module: &ModuleDecl, module_scope: ScopeId, prop: &PropertyDecl) -> Result<(), CompileError> {
        let scope = self.scopes.child_of(module_scope);
        match &prop.body {
            PropertyBody::Expr(e) => {
                self.infer_expr(module, scope, e)?;
            }
            PropertyBody::Block(stmts) => {
                self.check_block(module, scope, stmts, false, None)?;
            }
        }
        Ok(())
    }

    fn analyze_method(&mut self, module: &ModuleDecl, module_scope: ScopeId, method: &MethodDecl) -> Result<(), CompileError> {
        let scope = self.scopes.child_of(module_scope);
        for param in &method.params {
            let ty = self.resolve_type(&param.ty)?;
            self.scopes.declare(
                scope,
                Declaration::Var { name: param.name.clone(), ty, storage: StorageClass::Argument, register: None },
            );
        }
        let return_type = match &method.return_type {
            Some(t) => Some(self.resolve_type(t)?),
            None => None,
        };
        self.check_block(module, scope, &method.body, method.variadic, return_type)?;
        Ok(())
    }

    /// Walks one statement body, tracking loop depth for `break`/`continue`
    /// validity and whether a bare `return;` has already been seen: no
    /// `return expr;` may follow a bare `return;` in the same method.
    fn check_block(
        &mut self,
        module: &ModuleDecl,
        scope: ScopeId,
        body: &[Statement],
        variadic: bool,
        return_type: Option<TypeId>,
    ) -> Result<(), CompileError> {
        let mut seen_bare_return = false;
        self.check_statements(module, scope, body, variadic, return_type, &mut seen_bare_return)
    }

    fn check_statements(
        &mut self,
        module: &ModuleDecl,
        scope: ScopeId,
        body: &[Statement],
        variadic: bool,
        return_type: Option<TypeId>,
        seen_bare_return: &mut bool,
    ) -> Result<(), CompileError> {
        for stmt in body {
            self.check_statement(module, scope, stmt, variadic, return_type, seen_bare_return)?;
        }
        Ok(())
    }

    fn check_statement(
        &mut self,
        module: &ModuleDecl,
        scope: ScopeId,
        stmt: &Statement,
        variadic: bool,
        return_type: Option<TypeId>,
        seen_bare_return: &mut bool,
    ) -> Result<(), CompileError> {
        match stmt {
            Statement::Local { name, ty, value, line } => {
                let declared = match ty {
                    Some(t) => Some(self.resolve_type(t)?),
                    None => None,
                };
                let inferred = match value {
                    Some(v) => Some(self.infer_expr(module, scope, v)?),
                    None => None,
                };
                if let (Some(d), Some(v)) = (declared, value.as_ref()) {
                    self.check_decimal_precision(d, v)?;
                }
                let final_ty = declared.or(inferred).unwrap_or_else(|| self.interner.unknown());
                self.scopes.declare(
                    scope,
                    Declaration::Var { name: name.clone(), ty: final_ty, storage: StorageClass::Local, register: None },
                );
                let _ = line;
            }
            Statement::Assign { target, value, line, .. } => {
                let target_ty = self.infer_expr(module, scope, target)?;
                self.check_decimal_precision(target_ty, value)?;
                let value_ty = self.infer_expr(module, scope, value)?;
                if !self.interner.is_assignable(value_ty, target_ty) && !self.interner.arithmetic_compatible(value_ty, target_ty) {
                    return Err(CompileError::type_mismatch(
                        *line,
                        self.interner.get(target_ty),
                        self.interner.get(value_ty),
                    ));
                }
            }
            Statement::Expr(e, _) => {
                self.infer_expr(module, scope, e)?;
            }
            Statement::If { condition, then_branch, else_branch, line: _ } => {
                let cond_ty = self.infer_expr(module, scope, condition)?;
                self.require_bool(cond_ty, condition.line())?;
                let then_scope = self.scopes.child_of(scope);
                self.check_statements(module, then_scope, then_branch, variadic, return_type, seen_bare_return)?;
                if let Some(else_body) = else_branch {
                    let else_scope = self.scopes.child_of(scope);
                    self.check_statements(module, else_scope, else_body, variadic, return_type, seen_bare_return)?;
                }
            }
            Statement::While { condition, body, line: _ } => {
                let cond_ty = self.infer_expr(module, scope, condition)?;
                self.require_bool(cond_ty, condition.line())?;
                self.loop_depth += 1;
                let loop_scope = self.scopes.child_of(scope);
                let res = self.check_statements(module, loop_scope, body, variadic, return_type, seen_bare_return);
                self.loop_depth -= 1;
                res?;
            }
            Statement::DoWhile { body, condition, line: _ } => {
                self.loop_depth += 1;
                let loop_scope = self.scopes.child_of(scope);
                let res = self.check_statements(module, loop_scope, body, variadic, return_type, seen_bare_return);
                self.loop_depth -= 1;
                res?;
                let cond_ty = self.infer_expr(module, scope, condition)?;
                self.require_bool(cond_ty, condition.line())?;
            }
            Statement::For { init, condition, post, body, line: _ } => {
                let for_scope = self.scopes.child_of(scope);
                if let Some(init) = init {
                    self.check_statement(module, for_scope, init, variadic, return_type, seen_bare_return)?;
                }
                if let Some(cond) = condition {
                    let cond_ty = self.infer_expr(module, for_scope, cond)?;
                    self.require_bool(cond_ty, cond.line())?;
                }
                self.loop_depth += 1;
                let body_scope = self.scopes.child_of(for_scope);
                let res = self.check_statements(module, body_scope, body, variadic, return_type, seen_bare_return);
                self.loop_depth -= 1;
                res?;
                if let Some(post) = post {
                    self.check_statement(module, for_scope, post, variadic, return_type, seen_bare_return)?;
                }
            }
            Statement::Switch { subject, cases, default, line } => {
                let subject_ty = self.infer_expr(module, scope, subject)?;
                self.require_ordinal(subject_ty, *line)?;
                let mut kind: Option<&'static str> = None;
                for case in cases {
                    for label in &case.labels {
                        let label_kind = match label {
                            Literal::Number(_) => "number",
                            Literal::Str(_) => "string",
                            other => {
                                return Err(CompileError::type_check(
                                    *line,
                                    format!("switch case label must be Number, String, or Enum, found {:?}", other),
                                ))
                            }
                        };
                        match kind {
                            None => kind = Some(label_kind),
                            Some(k) if k == label_kind => {}
                            Some(k) => {
                                return Err(CompileError::type_check(
                                    *line,
                                    format!("switch case labels mix {} and {} types", k, label_kind),
                                ))
                            }
                        }
                    }
                    self.loop_depth += 1;
                    let case_scope = self.scopes.child_of(scope);
                    let res = self.check_statements(module, case_scope, &case.body, variadic, return_type, seen_bare_return);
                    self.loop_depth -= 1;
                    res?;
                }
                if let Some(default_body) = default {
                    let default_scope = self.scopes.child_of(scope);
                    self.check_statements(module, default_scope, default_body, variadic, return_type, seen_bare_return)?;
                }
            }
            Statement::Break(line) => {
                if self.loop_depth == 0 {
                    return Err(CompileError::resolve(*line, "'break' used outside of a loop or switch"));
                }
            }
            Statement::Continue(line) => {
                if self.loop_depth == 0 {
                    return Err(CompileError::resolve(*line, "'continue' used outside of a loop"));
                }
            }
            Statement::Return(value, line) => {
                match value {
                    None => {
                        *seen_bare_return = true;
                    }
                    Some(expr) => {
                        if *seen_bare_return {
                            return Err(CompileError::type_check(
                                *line,
                                "a 'return expr;' cannot follow a bare 'return;' in this method",
                            ));
                        }
                        let value_ty = self.infer_expr(module, scope, expr)?;
                        if let Some(rt) = return_type {
                            if !self.interner.is_assignable(value_ty, rt) {
                                return Err(CompileError::type_mismatch(*line, self.interner.get(rt), self.interner.get(value_ty)));
                            }
                        }
                    }
                }
            }
            Statement::Throw(expr, _) => {
                self.infer_expr(module, scope, expr)?;
            }
            Statement::Block(stmts, _) => {
                let block_scope = self.scopes.child_of(scope);
                self.check_statements(module, block_scope, stmts, variadic, return_type, seen_bare_return)?;
            }
        }
        Ok(())
    }

    fn require_bool(&self, ty: TypeId, line: usize) -> Result<(), CompileError> {
        match self.interner.get(ty) {
            TypeKind::Bool | TypeKind::Unknown | TypeKind::Any => Ok(()),
            other => Err(CompileError::type_mismatch(line, "bool", other)),
        }
    }

    fn require_ordinal(&self, ty: TypeId, line: usize) -> Result<(), CompileError> {
        match self.interner.get(ty) {
            TypeKind::Number | TypeKind::String | TypeKind::Enum(_) | TypeKind::Unknown | TypeKind::Any => Ok(()),
            other => Err(CompileError::type_check(line, format!("switch subject must be Number, String, or Enum, found {}", other))),
        }
    }

    /// A `Decimal(n)` literal with more than `n` fractional digits is
    /// rejected at compile time.
    fn check_decimal_precision(&self, target_ty: TypeId, value: &Expression) -> Result<(), CompileError> {
        if let TypeKind::Decimal(n) = self.interner.get(target_ty) {
            if let Expression::Literal(Literal::Decimal { fractional_digits, .. }, line) = unwrap_grouping(value) {
                if *fractional_digits > *n {
                    return Err(CompileError::precision_overflow(*line, *fractional_digits, *n));
                }
            }
        }
        Ok(())
    }

    fn infer_expr(&mut self, module: &ModuleDecl, scope: ScopeId, expr: &Expression) -> Result<TypeId, CompileError> {
        match expr {
            Expression::Literal(lit, _) => Ok(self.literal_type(lit)),
            Expression::Identifier(name, line) => match self.scopes.resolve(scope, name) {
                Some(Declaration::Var { ty, .. }) => Ok(*ty),
                Some(Declaration::Const { ty, .. }) => Ok(*ty),
                Some(Declaration::Struct { ty, .. }) => Ok(*ty),
                Some(Declaration::Enum { ty, .. }) => Ok(*ty),
                Some(Declaration::Method { ty, .. }) => Ok(*ty),
                Some(Declaration::Module { ty, .. }) => Ok(*ty),
                Some(Declaration::Library { .. }) => Ok(self.interner.any()),
                None => Err(CompileError::undefined(*line, name)),
            },
            Expression::This(_) => Ok(self.interner.intern(TypeKind::Module(module.name.clone()))),
            Expression::Unary { op, operand, line } => {
                let ty = self.infer_expr(module, scope, operand)?;
                match op {
                    UnaryOp::Not => {
                        self.require_bool(ty, *line)?;
                        Ok(self.interner.bool_())
                    }
                    UnaryOp::Neg => Ok(ty),
                }
            }
            Expression::Binary { left, op, right, line } => self.infer_binary(module, scope, left, *op, right, *line),
            Expression::Logical { left, right, line, .. } => {
                let lt = self.infer_expr(module, scope, left)?;
                let rt = self.infer_expr(module, scope, right)?;
                self.require_bool(lt, *line)?;
                self.require_bool(rt, *line)?;
                Ok(self.interner.bool_())
            }
            Expression::Assign { target, value, line } => {
                let target_ty = self.infer_expr(module, scope, target)?;
                self.check_decimal_precision(target_ty, value)?;
                let value_ty = self.infer_expr(module, scope, value)?;
                if !self.interner.is_assignable(value_ty, target_ty) {
                    return Err(CompileError::type_mismatch(*line, self.interner.get(target_ty), self.interner.get(value_ty)));
                }
                Ok(target_ty)
            }
            Expression::Call { callee, args, line, .. } => self.infer_call(module, scope, callee, args, *line),
            Expression::Index { target, index, line: _ } => {
                let target_ty = self.infer_expr(module, scope, target)?;
                self.infer_expr(module, scope, index)?;
                let elem = match self.interner.get(target_ty) {
                    TypeKind::Array(elem) | TypeKind::StorageList(elem) => *elem,
                    TypeKind::Map(_, v) | TypeKind::StorageMap(_, v) => *v,
                    _ => self.interner.any(),
                };
                Ok(elem)
            }
            Expression::Field { target, name, line: _ } => {
                let target_ty = self.infer_expr(module, scope, target)?;
                if let TypeKind::Struct(struct_name) = self.interner.get(target_ty).clone() {
                    if let Some(field_ty) = self.lookup_struct_field(module, &struct_name, name) {
                        return Ok(field_ty);
                    }
                }
                Ok(self.interner.any())
            }
            Expression::Constructor { ty, args, line } => self.infer_constructor(module, scope, ty, args, *line),
            Expression::ArrayLiteral { elements, line: _ } => {
                let mut elem_ty = self.interner.unknown();
                for e in elements {
                    elem_ty = self.infer_expr(module, scope, e)?;
                }
                Ok(self.interner.intern(TypeKind::Array(elem_ty)))
            }
            Expression::Macro { name, .. } => match name.as_str() {
                "THIS_ADDRESS" => Ok(self.interner.address()),
                "THIS_SYMBOL" => Ok(self.interner.string()),
                "TYPE_OF" => Ok(self.interner.number()),
                _ => Ok(self.interner.any()),
            },
            Expression::Grouping(inner, _) => self.infer_expr(module, scope, inner),
        }
    }

    fn infer_binary(
        &mut self,
        module: &ModuleDecl,
        scope: ScopeId,
        left: &Expression,
        op: BinaryOp,
        right: &Expression,
        line: usize,
    ) -> Result<TypeId, CompileError> {
        let lt = self.infer_expr(module, scope, left)?;
        let rt = self.infer_expr(module, scope, right)?;

        match op {
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => Ok(self.interner.bool_()),
            BinaryOp::Add => {
                let l = self.interner.get(lt).clone();
                let r = self.interner.get(rt).clone();
                if matches!(l, TypeKind::String) || matches!(r, TypeKind::String) {
                    Ok(self.interner.string())
                } else if self.interner.arithmetic_compatible(lt, rt) {
                    Ok(lt)
                } else {
                    Err(CompileError::type_mismatch(line, l, r))
                }
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                if self.interner.arithmetic_compatible(lt, rt) {
                    Ok(lt)
                } else {
                    Err(CompileError::type_mismatch(line, self.interner.get(lt), self.interner.get(rt)))
                }
            }
            BinaryOp::Shl | BinaryOp::Shr => {
                if matches!(self.interner.get(lt), TypeKind::Number) && matches!(self.interner.get(rt), TypeKind::Number) {
                    Ok(self.interner.number())
                } else {
                    Err(CompileError::type_mismatch(line, "number", self.interner.get(lt)))
                }
            }
        }
    }

    fn infer_call(
        &mut self,
        module: &ModuleDecl,
        scope: ScopeId,
        callee: &Expression,
        args: &[Expression],
        line: usize,
    ) -> Result<TypeId, CompileError> {
        for a in args {
            self.infer_expr(module, scope, a)?;
        }

        if let Expression::Field { target, name, .. } = callee {
            match target.as_ref() {
                Expression::This(_) => {
                    if let Some(Declaration::Method { ty, .. }) = self.scopes.resolve(scope, name).cloned() {
                        if let TypeKind::Method(sig) = self.interner.get(ty).clone() {
                            if sig.params.len() != args.len() {
                                return Err(CompileError::arity_mismatch(line, name, sig.params.len(), args.len()));
                            }
                            return Ok(sig.return_type);
                        }
                    }
                    return Ok(self.interner.any());
                }
                Expression::Identifier(lib_name, _) => {
                    if matches!(self.scopes.resolve(scope, lib_name), Some(Declaration::Library { .. })) {
                        if let Some(method) = self.registry.find_method(lib_name, name).cloned() {
                            LibraryRegistry::check_implemented(lib_name, &method, line)?;
                            if method.params.len() != args.len() {
                                return Err(CompileError::arity_mismatch(line, name, method.params.len(), args.len()));
                            }
                            return Ok(self.builtin_return_type(method.return_type));
                        }
                    }
                }
                _ => {}
            }
        }

        self.infer_expr(module, scope, callee)
    }

    fn builtin_return_type(&mut self, name: Option<&'static str>) -> TypeId {
        match name {
            None => self.interner.none(),
            Some(n) => {
                let ty = TypeExpr { name: n.to_string(), args: Vec::new(), line: 0 };
                self.resolve_type(&ty).unwrap_or_else(|_| self.interner.any())
            }
        }
    }

    fn infer_constructor(
        &mut self,
        module: &ModuleDecl,
        scope: ScopeId,
        ty: &TypeExpr,
        args: &[Expression],
        line: usize,
    ) -> Result<TypeId, CompileError> {
        for a in args {
            self.infer_expr(module, scope, a)?;
        }
        if let Some(fields) = self.find_struct_fields(module, &ty.name) {
            if fields.len() != args.len() {
                return Err(CompileError::arity_mismatch(line, &ty.name, fields.len(), args.len()));
            }
        }
        self.resolve_type(ty)
    }

    fn find_struct_fields<'a>(&self, module: &'a ModuleDecl, name: &str) -> Option<&'a [FieldDecl]> {
        module.structs.iter().find(|s| s.name == name).map(|s| s.fields.as_slice())
    }

    fn lookup_struct_field(&mut self, module: &ModuleDecl, struct_name: &str, field_name: &str) -> Option<TypeId> {
        let field_ty = module
            .structs
            .iter()
            .find(|s| s.name == struct_name)
            .and_then(|s| s.fields.iter().find(|f| f.name == field_name))
            .map(|f| f.ty.clone())?;
        self.resolve_type(&field_ty).ok()
    }

    fn literal_type(&mut self, lit: &Literal) -> TypeId {
        match lit {
            Literal::Number(_) => self.interner.number(),
            Literal::Decimal { fractional_digits, .. } => self.interner.intern(TypeKind::Decimal(*fractional_digits)),
            Literal::Bool(_) => self.interner.bool_(),
            Literal::Str(_) => self.interner.string(),
            Literal::Char(_) => self.interner.number(),
            Literal::Address(_) => self.interner.address(),
            Literal::Hash(_) => self.interner.intern(TypeKind::Hash),
            Literal::Bytes(_) => self.interner.intern(TypeKind::Bytes),
            Literal::None => self.interner.none(),
        }
    }
}

fn unwrap_grouping(expr: &Expression) -> &Expression {
    match expr {
        Expression::Grouping(inner, _) => unwrap_grouping(inner),
        other => other,
    }
}
