//! # Expression Code Generator
//!
//! Lowers [`Expression`] nodes to structured [`AsmLine`]s against the
//! register VM: every expression evaluates into exactly one register,
//! reported back to the caller as a [`Value`] so call sites know whether
//! that register is a fresh temporary they must release, or a named
//! local/argument they must leave alone.

use super::asm::{AsmLine, ImmValue, Instruction, Opcode, Operand};
use super::common::{CodeGenContext, VarEnv};
use crate::ast::nodes::{BinaryOp, Expression, Literal, LogicalOp, ModuleDecl, UnaryOp};
use crate::compiler::error::CompileError;
use crate::compiler::library::LoweringStrategy;
use crate::compiler::register::RegId;

/// The register holding an expression's result, tagged with whether the
/// caller owns it (a temporary to free after use) or merely borrows it (a
/// named local/argument/param register that outlives this expression).
#[derive(Debug, Clone, Copy)]
pub enum Value {
    Owned(RegId),
    Borrowed(RegId),
}

impl Value {
    pub fn reg(self) -> RegId {
        match self {
            Value::Owned(r) | Value::Borrowed(r) => r,
        }
    }

    /// Releases the register back to the allocator if this value owns it.
    pub fn release(self, ctx: &mut CodeGenContext) {
        if let Value::Owned(r) = self {
            ctx.registers.dealloc(r);
        }
    }
}

pub fn generate(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    expr: &Expression,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    match expr {
        Expression::Literal(lit, line) => {
            let reg = ctx.registers.alloc("lit", *line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Load,
                vec![Operand::Reg(reg), Operand::Imm(literal_imm(lit))],
                *line,
            )));
            Ok(Value::Owned(reg))
        }
        Expression::Identifier(name, line) => {
            if let Some(reg) = env.lookup(name) {
                Ok(Value::Borrowed(reg))
            } else if env.is_global(name) {
                let reg = ctx.registers.alloc(name, *line)?;
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::LoadGlobal,
                    vec![Operand::Reg(reg), Operand::Global(global_key(module, name))],
                    *line,
                )));
                Ok(Value::Owned(reg))
            } else {
                Err(CompileError::undefined(*line, name))
            }
        }
        Expression::This(line) => Err(CompileError::codegen(
            *line,
            "'this' has no value outside of a field access or method call",
        )),
        Expression::Grouping(inner, _) => generate(ctx, module, env, inner, out),
        Expression::Unary { op, operand, line } => {
            let v = generate(ctx, module, env, operand, out)?;
            let dst = ctx.registers.alloc("unary", *line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Move,
                vec![Operand::Reg(dst), Operand::Reg(v.reg())],
                *line,
            )));
            let op = match op {
                UnaryOp::Neg => Opcode::Neg,
                UnaryOp::Not => Opcode::Not,
            };
            out.push(AsmLine::Instr(Instruction::new(op, vec![Operand::Reg(dst)], *line)));
            v.release(ctx);
            Ok(Value::Owned(dst))
        }
        Expression::Binary { left, op, right, line } => {
            let lv = generate(ctx, module, env, left, out)?;
            let rv = generate(ctx, module, env, right, out)?;
            let dst = ctx.registers.alloc("bin", *line)?;
            out.push(AsmLine::Instr(Instruction::new(
                binary_opcode(*op),
                vec![Operand::Reg(dst), Operand::Reg(lv.reg()), Operand::Reg(rv.reg())],
                *line,
            )));
            lv.release(ctx);
            rv.release(ctx);
            Ok(Value::Owned(dst))
        }
        Expression::Logical { left, op, right, line } => {
            let dst = ctx.registers.alloc("logic", *line)?;
            let lv = generate(ctx, module, env, left, out)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Move,
                vec![Operand::Reg(dst), Operand::Reg(lv.reg())],
                *line,
            )));
            lv.release(ctx);
            let end = ctx.next_label("shortcircuit");
            let skip_op = match op {
                LogicalOp::And => Opcode::Jz,
                LogicalOp::Or => Opcode::Jnz,
            };
            out.push(AsmLine::Instr(Instruction::new(
                skip_op,
                vec![Operand::Reg(dst), Operand::Label(end.clone())],
                *line,
            )));
            let rv = generate(ctx, module, env, right, out)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Move,
                vec![Operand::Reg(dst), Operand::Reg(rv.reg())],
                *line,
            )));
            rv.release(ctx);
            out.push(AsmLine::Label(end));
            Ok(Value::Owned(dst))
        }
        Expression::Assign { target, value, line } => {
            let v = generate(ctx, module, env, value, out)?;
            store_into(ctx, module, env, target, v.reg(), out)?;
            Ok(v)
        }
        Expression::Index { target, index, line } => {
            let tv = generate(ctx, module, env, target, out)?;
            let iv = generate(ctx, module, env, index, out)?;
            let dst = ctx.registers.alloc("idx", *line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::IndexGet,
                vec![Operand::Reg(dst), Operand::Reg(tv.reg()), Operand::Reg(iv.reg())],
                *line,
            )));
            tv.release(ctx);
            iv.release(ctx);
            Ok(Value::Owned(dst))
        }
        Expression::Field { target, name, line } => generate_field(ctx, module, env, target, name, *line, out),
        Expression::Constructor { ty, args, line } => {
            let dst = ctx.registers.alloc("ctor", *line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::NewStruct,
                vec![Operand::Reg(dst), Operand::Imm(ImmValue::Str(ty.name.clone()))],
                *line,
            )));
            let fields = struct_field_names(module, &ty.name);
            for (i, arg) in args.iter().enumerate() {
                let av = generate(ctx, module, env, arg, out)?;
                let field_name = fields.get(i).cloned().unwrap_or_else(|| format!("_{}", i));
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::SetField,
                    vec![Operand::Reg(dst), Operand::Imm(ImmValue::Str(field_name)), Operand::Reg(av.reg())],
                    *line,
                )));
                av.release(ctx);
            }
            Ok(Value::Owned(dst))
        }
        Expression::ArrayLiteral { elements, line } => {
            let dst = ctx.registers.alloc("arr", *line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::NewArray,
                vec![Operand::Reg(dst), Operand::Imm(ImmValue::Number(elements.len().into()))],
                *line,
            )));
            for (i, elem) in elements.iter().enumerate() {
                let ev = generate(ctx, module, env, elem, out)?;
                let idx = ctx.registers.alloc("arr_idx", *line)?;
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::Load,
                    vec![Operand::Reg(idx), Operand::Imm(ImmValue::Number(i.into()))],
                    *line,
                )));
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::IndexSet,
                    vec![Operand::Reg(dst), Operand::Reg(idx), Operand::Reg(ev.reg())],
                    *line,
                )));
                ctx.registers.dealloc(idx);
                ev.release(ctx);
            }
            Ok(Value::Owned(dst))
        }
        Expression::Macro { name, type_arg, line } => generate_macro(ctx, name, type_arg.as_ref(), *line, out),
        Expression::Call { callee, type_args: _, args, line } => {
            generate_call(ctx, module, env, callee, args, *line, out)
        }
    }
}

/// Writes `src` into the storage an lvalue expression denotes: a local's
/// register, a global's storage slot, an index element, or a struct field.
pub(crate) fn store_into(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    target: &Expression,
    src: RegId,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    match target {
        Expression::Identifier(name, line) => {
            if let Some(reg) = env.lookup(name) {
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::Move,
                    vec![Operand::Reg(reg), Operand::Reg(src)],
                    *line,
                )));
                Ok(())
            } else if env.is_global(name) {
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::StoreGlobal,
                    vec![Operand::Global(global_key(module, name)), Operand::Reg(src)],
                    *line,
                )));
                Ok(())
            } else {
                Err(CompileError::undefined(*line, name))
            }
        }
        Expression::Field { target, name, line } if matches!(**target, Expression::This(_)) => {
            if env.is_global(name) {
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::StoreGlobal,
                    vec![Operand::Global(global_key(module, name)), Operand::Reg(src)],
                    *line,
                )));
                Ok(())
            } else {
                Err(CompileError::codegen(*line, format!("'{}' is not an assignable global", name)))
            }
        }
        Expression::Field { target, name, line } => {
            let tv = generate(ctx, module, env, target, out)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::SetField,
                vec![Operand::Reg(tv.reg()), Operand::Imm(ImmValue::Str(name.clone())), Operand::Reg(src)],
                *line,
            )));
            tv.release(ctx);
            Ok(())
        }
        Expression::Index { target, index, line } => {
            let tv = generate(ctx, module, env, target, out)?;
            let iv = generate(ctx, module, env, index, out)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::IndexSet,
                vec![Operand::Reg(tv.reg()), Operand::Reg(iv.reg()), Operand::Reg(src)],
                *line,
            )));
            tv.release(ctx);
            iv.release(ctx);
            Ok(())
        }
        other => Err(CompileError::codegen(other.line(), "invalid assignment target")),
    }
}

fn generate_field(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    target: &Expression,
    name: &str,
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    if matches!(target, Expression::This(_)) {
        if env.is_global(name) {
            let reg = ctx.registers.alloc(name, line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::LoadGlobal,
                vec![Operand::Reg(reg), Operand::Global(global_key(module, name))],
                line,
            )));
            return Ok(Value::Owned(reg));
        }
        // A `this.<property>` read lowers to a call to the property's
        // synthesized getter entry point (see `module_generator::property_entry_label`).
        let dst = ctx.registers.alloc("prop", line)?;
        out.push(AsmLine::Instr(Instruction::new(
            Opcode::Call,
            vec![Operand::Reg(dst), Operand::Label(super::module_generator::property_entry_label(name))],
            line,
        )));
        return Ok(Value::Owned(dst));
    }
    let tv = generate(ctx, module, env, target, out)?;
    let dst = ctx.registers.alloc("field", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::GetField,
        vec![Operand::Reg(dst), Operand::Reg(tv.reg()), Operand::Imm(ImmValue::Str(name.to_string()))],
        line,
    )));
    tv.release(ctx);
    Ok(Value::Owned(dst))
}

fn generate_macro(
    ctx: &mut CodeGenContext,
    name: &str,
    type_arg: Option<&crate::ast::nodes::TypeExpr>,
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    match name {
        "THIS_ADDRESS" => {
            let dst = ctx.registers.alloc("macro", line)?;
            let name_reg = ctx.registers.alloc("macro_name", line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Load,
                vec![Operand::Reg(name_reg), Operand::Imm(ImmValue::Str("Runtime.selfAddress".into()))],
                line,
            )));
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::ExtCall,
                vec![Operand::Reg(dst), Operand::Reg(name_reg)],
                line,
            )));
            ctx.registers.dealloc(name_reg);
            Ok(Value::Owned(dst))
        }
        "THIS_SYMBOL" => {
            let dst = ctx.registers.alloc("macro", line)?;
            let name_reg = ctx.registers.alloc("macro_name", line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Load,
                vec![Operand::Reg(name_reg), Operand::Imm(ImmValue::Str("Runtime.selfSymbol".into()))],
                line,
            )));
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::ExtCall,
                vec![Operand::Reg(dst), Operand::Reg(name_reg)],
                line,
            )));
            ctx.registers.dealloc(name_reg);
            Ok(Value::Owned(dst))
        }
        "TYPE_OF" => {
            let tag = type_arg.map(|t| type_name_tag(&t.name)).unwrap_or(0);
            let dst = ctx.registers.alloc("macro", line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Load,
                vec![Operand::Reg(dst), Operand::Imm(ImmValue::Number(tag.into()))],
                line,
            )));
            Ok(Value::Owned(dst))
        }
        other => Err(CompileError::codegen(line, format!("unknown macro '${}'", other))),
    }
}

/// A stable, arbitrary numbering of the primitive type names: `$TYPE_OF` has
/// no VM-defined tag space to read from, so this crate fixes one and
/// documents it in DESIGN.md.
fn type_name_tag(name: &str) -> i64 {
    match name {
        "unknown" => 0,
        "none" | "void" => 1,
        "number" => 2,
        "bool" | "boolean" => 3,
        "string" => 4,
        "timestamp" => 5,
        "address" => 6,
        "hash" => 7,
        "bytes" => 8,
        "decimal" => 9,
        "array" => 10,
        "map" => 11,
        "storagelist" => 12,
        "storagemap" => 13,
        "any" => 17,
        _ => 18, // struct / enum / module names share one "user type" tag
    }
}

/// Namespaces a global's storage slot by its enclosing module, so two
/// contracts declaring a same-named global never collide in storage.
fn global_key(module: &ModuleDecl, name: &str) -> String {
    format!("{}::{}", module.name, name)
}

fn struct_field_names(module: &ModuleDecl, name: &str) -> Vec<String> {
    module
        .structs
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.fields.iter().map(|f| f.name.clone()).collect())
        .unwrap_or_default()
}

pub(crate) fn binary_opcode(op: BinaryOp) -> Opcode {
    match op {
        BinaryOp::Add => Opcode::Add,
        BinaryOp::Sub => Opcode::Sub,
        BinaryOp::Mul => Opcode::Mul,
        BinaryOp::Div => Opcode::Div,
        BinaryOp::Mod => Opcode::Mod,
        BinaryOp::Shl => Opcode::Shl,
        BinaryOp::Shr => Opcode::Shr,
        BinaryOp::Eq => Opcode::Eq,
        BinaryOp::Ne => Opcode::Ne,
        BinaryOp::Lt => Opcode::Lt,
        BinaryOp::Le => Opcode::Le,
        BinaryOp::Gt => Opcode::Gt,
        BinaryOp::Ge => Opcode::Ge,
    }
}

pub(crate) fn literal_imm(lit: &Literal) -> ImmValue {
    match lit {
        Literal::Number(n) => ImmValue::Number(n.clone()),
        Literal::Decimal { mantissa, .. } => ImmValue::Number(mantissa.clone()),
        Literal::Bool(b) => ImmValue::Bool(*b),
        Literal::Str(s) => ImmValue::Str(s.clone()),
        Literal::Char(c) => ImmValue::Number((*c as u32).into()),
        Literal::Address(a) => ImmValue::Address(a.clone()),
        Literal::Hash(h) => ImmValue::Hash(h.clone()),
        Literal::Bytes(b) => ImmValue::Bytes(b.clone()),
        Literal::None => ImmValue::None,
    }
}

/// Classifies `target(args)`/`target.method(args)` into its VM lowering:
/// local (same-module method), library (ext/contract/custom call), or a
/// method invoked on an ordinary value of a container type that forwards to
/// its owning library with the receiver as an implicit first argument. The
/// grammar alone cannot distinguish these — see the doc comment on
/// `Expression::Call`.
fn generate_call(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    callee: &Expression,
    args: &[Expression],
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    let (target, method_name) = match callee {
        Expression::Field { target, name, .. } => (target.as_ref(), name.as_str()),
        other => return Err(CompileError::codegen(other.line(), "call target must be a method reference")),
    };

    if matches!(target, Expression::This(_)) {
        if module.methods.iter().any(|m| m.name == method_name) {
            return generate_local_call(ctx, module, env, method_name, args, line, out);
        }
        return generate_contract_call(ctx, module, env, &module.name, method_name, args, line, out);
    }

    if let Expression::Identifier(name, _) = target {
        if ctx.registry.find(name).is_some() {
            return generate_library_call(ctx, module, env, name, method_name, args, line, out);
        }
    }

    // `value.method(args)` on an ordinary local/expression: dispatch to the
    // library matching the receiver's runtime container kind, passing the
    // receiver itself as the library method's implicit first argument.
    let receiver_ty = receiver_type_name(env, target);
    let library = container_library_for_method(method_name, receiver_ty.as_deref());
    let mut full_args = Vec::with_capacity(args.len() + 1);
    full_args.push(target.clone());
    full_args.extend_from_slice(args);
    generate_library_call(ctx, module, env, library, method_name, &full_args, line, out)
}

/// The declared source type name of a call receiver, when it can be told
/// without running the analyzer: a bound identifier's recorded type, or the
/// shape of a literal/array expression written directly as the receiver.
fn receiver_type_name(env: &VarEnv, target: &Expression) -> Option<String> {
    match target {
        Expression::Identifier(name, _) => env.type_of(name).map(str::to_string),
        Expression::Literal(Literal::Str(_), _) => Some("string".to_string()),
        Expression::ArrayLiteral { .. } => Some("array".to_string()),
        _ => None,
    }
}

/// Picks the library that owns `method` for a container-method call whose
/// grammar alone doesn't name a library: when the receiver's declared type
/// is known and disambiguates (e.g. `string` vs `array` for `length`), that
/// wins; otherwise falls back to a method-name guess for the handful of
/// names the standard library reuses across container kinds.
fn container_library_for_method(method: &str, receiver_type: Option<&str>) -> &'static str {
    if let Some(ty) = receiver_type {
        let by_type = match (ty, method) {
            ("string", "length" | "concat" | "substring") => Some("String"),
            ("array", "length" | "slice" | "join") => Some("Array"),
            ("storagelist", "push" | "pop" | "length") => Some("List"),
            ("map" | "storagemap", "get" | "set" | "has" | "remove") => Some("Map"),
            _ => None,
        };
        if let Some(lib) = by_type {
            return lib;
        }
    }
    match method {
        "push" | "pop" => "List",
        "get" | "set" | "has" | "remove" => "Map",
        "slice" | "join" => "Array",
        "length" => "Array",
        "substring" | "concat" => "String",
        _ => "Array",
    }
}

fn generate_local_call(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    method_name: &str,
    args: &[Expression],
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    let mut arg_regs = Vec::with_capacity(args.len());
    for a in args.iter().rev() {
        let v = generate(ctx, module, env, a, out)?;
        out.push(AsmLine::Instr(Instruction::new(Opcode::Push, vec![Operand::Reg(v.reg())], line)));
        arg_regs.push(v);
    }
    let dst = ctx.registers.alloc("call", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Call,
        vec![Operand::Reg(dst), Operand::Label(super::module_generator::method_entry_label(method_name))],
        line,
    )));
    for v in arg_regs {
        v.release(ctx);
    }
    Ok(Value::Owned(dst))
}

fn generate_contract_call(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    contract_name: &str,
    method_name: &str,
    args: &[Expression],
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    let method_reg = ctx.registers.alloc("ctx_method", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Load,
        vec![Operand::Reg(method_reg), Operand::Imm(ImmValue::Str(method_name.to_string()))],
        line,
    )));
    out.push(AsmLine::Instr(Instruction::new(Opcode::Push, vec![Operand::Reg(method_reg)], line)));

    let mut arg_values = Vec::with_capacity(args.len());
    for a in args {
        let v = generate(ctx, module, env, a, out)?;
        out.push(AsmLine::Instr(Instruction::new(Opcode::Push, vec![Operand::Reg(v.reg())], line)));
        arg_values.push(v);
    }

    let contract_reg = ctx.registers.alloc("ctx_contract", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Load,
        vec![Operand::Reg(contract_reg), Operand::Imm(ImmValue::Str(contract_name.to_string()))],
        line,
    )));
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Ctx,
        vec![Operand::Reg(contract_reg), Operand::Reg(contract_reg)],
        line,
    )));
    let dst = ctx.registers.alloc("call", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Switch,
        vec![Operand::Reg(dst), Operand::Reg(contract_reg)],
        line,
    )));

    ctx.registers.dealloc(method_reg);
    ctx.registers.dealloc(contract_reg);
    for v in arg_values {
        v.release(ctx);
    }
    Ok(Value::Owned(dst))
}

fn generate_library_call(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    library: &str,
    method_name: &str,
    args: &[Expression],
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    let method = ctx
        .registry
        .find_method(library, method_name)
        .cloned()
        .ok_or_else(|| CompileError::undefined(line, &format!("{}.{}", library, method_name)))?;
    crate::compiler::library::LibraryRegistry::check_implemented(library, &method, line)?;

    match &method.strategy {
        LoweringStrategy::ExtCall { qualified_name } => {
            generate_ext_call(ctx, module, env, qualified_name, args, line, out)
        }
        LoweringStrategy::ContractCall => generate_contract_call(ctx, module, env, library, method_name, args, line, out),
        LoweringStrategy::LocalCall => generate_local_call(ctx, module, env, method_name, args, line, out),
        LoweringStrategy::BuiltinInline { snippet } => {
            let is_first = ctx.mark_builtin_emitted(snippet);
            if is_first {
                out.push(AsmLine::Comment(format!("builtin '{}' body emitted once below", snippet)));
            }
            generate_local_call(ctx, module, env, &format!("__builtin_{}", snippet), args, line, out)
        }
        LoweringStrategy::CustomCall { interop } => {
            let qualified = if *interop { "Call.interop" } else { "Call.method" };
            generate_ext_call(ctx, module, env, qualified, args, line, out)
        }
        LoweringStrategy::Unimplemented => unreachable!("checked above"),
    }
}

fn generate_ext_call(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &VarEnv,
    qualified_name: &str,
    args: &[Expression],
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<Value, CompileError> {
    let name_reg = ctx.registers.alloc("extcall_name", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Load,
        vec![Operand::Reg(name_reg), Operand::Imm(ImmValue::Str(qualified_name.to_string()))],
        line,
    )));
    let mut arg_values = Vec::with_capacity(args.len());
    for a in args {
        let v = generate(ctx, module, env, a, out)?;
        arg_values.push(v);
    }
    let dst = ctx.registers.alloc("call", line)?;
    let mut operands = vec![Operand::Reg(dst), Operand::Reg(name_reg)];
    operands.extend(arg_values.iter().map(|v| Operand::Reg(v.reg())));
    out.push(AsmLine::Instr(Instruction::new(Opcode::ExtCall, operands, line)));
    ctx.registers.dealloc(name_reg);
    for v in arg_values {
        v.release(ctx);
    }
    Ok(Value::Owned(dst))
}
