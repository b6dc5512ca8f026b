//! # Module Code Generator
//!
//! The per-module driver that ties `statement_generator`/`expression_generator`
//! together: binds a method's parameters to fresh registers, generates its
//! body, asserts the register bank is fully released on exit, and collects
//! the ABI metadata `abi.rs` later serializes.
//!
//! Each module compiles to a constructor, properties, methods, and triggers,
//! plus recursively generated `nft` sub-modules.

use super::asm::{AsmLine, ImmValue, Instruction, Opcode, Operand};
use super::common::CodeGenContext;
use super::common::VarEnv;
use super::{expression_generator, statement_generator};
use crate::ast::nodes::{MethodDecl, MethodKind, ModuleDecl, ModuleKind, PropertyBody, PropertyDecl};
use crate::compiler::error::CompileError;
use crate::compiler::register::RegId;

/// The label a `CALL` targets to invoke a module-local method by name.
pub fn method_entry_label(name: &str) -> String {
    format!("entry_{}", name)
}

/// The label a `this.<property>` read calls into (see
/// `expression_generator::generate_field`).
pub fn property_entry_label(name: &str) -> String {
    format!("entry_prop_{}", name)
}

/// One method's entry in the ABI table.
#[derive(Debug, Clone)]
pub struct MethodAbi {
    pub name: String,
    pub param_count: u8,
    pub has_return: bool,
    pub variadic: bool,
    pub is_trigger: bool,
}

/// The generated assembly and ABI metadata for one module, mirroring the
/// `sub_modules` nesting of `CompiledModule`.
#[derive(Debug, Clone)]
pub struct ModuleArtifact {
    pub name: String,
    pub kind: ModuleKind,
    pub asm: Vec<AsmLine>,
    pub abi_methods: Vec<MethodAbi>,
    pub sub_modules: Vec<ModuleArtifact>,
}

pub fn generate_module(ctx: &mut CodeGenContext, module: &ModuleDecl) -> Result<ModuleArtifact, CompileError> {
    let mut out = Vec::new();
    let mut abi_methods = Vec::new();
    let globals: Vec<(String, String)> = module.globals.iter().map(|g| (g.name.clone(), g.ty.name.clone())).collect();

    if let Some(ctor) = &module.constructor {
        generate_method(ctx, module, ctor, &globals, &mut out)?;
        abi_methods.push(method_abi(ctor));
    }
    for prop in &module.properties {
        generate_property(ctx, module, prop, &globals, &mut out)?;
        abi_methods.push(MethodAbi {
            name: prop.name.clone(),
            param_count: 0,
            has_return: true,
            variadic: false,
            is_trigger: false,
        });
    }
    for method in &module.methods {
        generate_method(ctx, module, method, &globals, &mut out)?;
        abi_methods.push(method_abi(method));
    }
    // Triggers are appended after every declaration-order method (
    // "declaration-then-trigger ordering").
    for trigger in &module.triggers {
        generate_method(ctx, module, trigger, &globals, &mut out)?;
        let mut abi = method_abi(trigger);
        abi.is_trigger = true;
        abi_methods.push(abi);
    }

    for snippet in ctx.drain_pending_builtins() {
        emit_builtin_body(ctx, snippet, &mut out)?;
    }

    let sub_modules = module
        .sub_modules
        .iter()
        .map(|m| generate_module(ctx, m))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ModuleArtifact {
        name: module.name.clone(),
        kind: module.kind,
        asm: out,
        abi_methods,
        sub_modules,
    })
}

fn method_abi(method: &MethodDecl) -> MethodAbi {
    MethodAbi {
        name: method.name.clone(),
        param_count: method.params.len() as u8,
        has_return: method.return_type.is_some(),
        variadic: method.variadic,
        is_trigger: matches!(method.kind, MethodKind::Trigger),
    }
}

fn generate_method(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    method: &MethodDecl,
    globals: &[(String, String)],
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    out.push(AsmLine::Label(method_entry_label(&method.name)));
    let mut env = VarEnv::new(globals.iter().cloned());
    // Arguments arrive pushed right-to-left by the call site (see
    // `expression_generator::generate_local_call`), so popping them in
    // declared order recovers them left-to-right.
    for param in &method.params {
        let reg = ctx.registers.alloc(&param.name, method.line)?;
        out.push(AsmLine::Instr(Instruction::new(Opcode::Pop, vec![Operand::Reg(reg)], method.line)));
        env.bind_typed(param.name.clone(), reg, Some(param.ty.name.clone()));
    }
    statement_generator::generate_method_body(ctx, module, &mut env, &method.body, out)?;
    out.push(AsmLine::Instr(Instruction::new(Opcode::Ret, vec![], method.line)));
    for reg in env.pop_scope() {
        ctx.registers.dealloc(reg);
    }
    assert!(
        ctx.registers.all_free(),
        "register leak in method '{}': leaked registers {:?}",
        method.name,
        ctx.registers.leaked()
    );
    Ok(())
}

fn generate_property(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    prop: &PropertyDecl,
    globals: &[(String, String)],
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    out.push(AsmLine::Label(property_entry_label(&prop.name)));
    let mut env = VarEnv::new(globals.iter().cloned());
    match &prop.body {
        PropertyBody::Expr(expr) => {
            let v = expression_generator::generate(ctx, module, &env, expr, out)?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Ret, vec![Operand::Reg(v.reg())], prop.line)));
            v.release(ctx);
        }
        PropertyBody::Block(stmts) => {
            statement_generator::generate_method_body(ctx, module, &mut env, stmts, out)?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Ret, vec![], prop.line)));
        }
    }
    for reg in env.pop_scope() {
        ctx.registers.dealloc(reg);
    }
    assert!(
        ctx.registers.all_free(),
        "register leak in property '{}': leaked registers {:?}",
        prop.name,
        ctx.registers.leaked()
    );
    Ok(())
}

fn emit_builtin_body(ctx: &mut CodeGenContext, snippet: &'static str, out: &mut Vec<AsmLine>) -> Result<(), CompileError> {
    match snippet {
        "array_join" => emit_array_join_builtin(ctx, out),
        other => unreachable!("no canned body registered for builtin snippet '{}'", other),
    }
}

/// `Array.join(arr, sep) -> string`, synthesized because the register VM has
/// no join intrinsic: a manual index loop over `Array.length`/`IDXGET`,
/// concatenating through `String.concat`. Uses source line `0` throughout
/// since this code has no TombLang source line of its own.
fn emit_array_join_builtin(ctx: &mut CodeGenContext, out: &mut Vec<AsmLine>) -> Result<(), CompileError> {
    const LINE: usize = 0;
    out.push(AsmLine::Comment("synthesized Array.join(arr, sep) -> string".into()));
    out.push(AsmLine::Label(method_entry_label("__builtin_array_join")));

    let arr = ctx.registers.alloc("join_arr", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(Opcode::Pop, vec![Operand::Reg(arr)], LINE)));
    let sep = ctx.registers.alloc("join_sep", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(Opcode::Pop, vec![Operand::Reg(sep)], LINE)));

    let result = ctx.registers.alloc("join_result", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Load,
        vec![Operand::Reg(result), Operand::Imm(ImmValue::Str(String::new()))],
        LINE,
    )));
    let idx = ctx.registers.alloc("join_idx", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Load,
        vec![Operand::Reg(idx), Operand::Imm(ImmValue::Number(0.into()))],
        LINE,
    )));
    let len = ext_call(ctx, out, "Array.length", &[arr], LINE)?;

    let start = ctx.next_label("join_loop");
    let end = ctx.next_label("join_end");
    out.push(AsmLine::Label(start.clone()));
    let cond = ctx.registers.alloc("join_cond", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Lt,
        vec![Operand::Reg(cond), Operand::Reg(idx), Operand::Reg(len)],
        LINE,
    )));
    out.push(AsmLine::Instr(Instruction::new(Opcode::Jz, vec![Operand::Reg(cond), Operand::Label(end.clone())], LINE)));
    ctx.registers.dealloc(cond);

    let elem = ctx.registers.alloc("join_elem", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::IndexGet,
        vec![Operand::Reg(elem), Operand::Reg(arr), Operand::Reg(idx)],
        LINE,
    )));

    let is_first = ctx.registers.alloc("join_first", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Eq,
        vec![Operand::Reg(is_first), Operand::Reg(idx), Operand::Imm(ImmValue::Number(0.into()))],
        LINE,
    )));
    let skip_sep = ctx.next_label("join_skip_sep");
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Jnz,
        vec![Operand::Reg(is_first), Operand::Label(skip_sep.clone())],
        LINE,
    )));
    ctx.registers.dealloc(is_first);
    let with_sep = ext_call(ctx, out, "String.concat", &[result, sep], LINE)?;
    out.push(AsmLine::Instr(Instruction::new(Opcode::Move, vec![Operand::Reg(result), Operand::Reg(with_sep)], LINE)));
    ctx.registers.dealloc(with_sep);
    out.push(AsmLine::Label(skip_sep));

    let with_elem = ext_call(ctx, out, "String.concat", &[result, elem], LINE)?;
    out.push(AsmLine::Instr(Instruction::new(Opcode::Move, vec![Operand::Reg(result), Operand::Reg(with_elem)], LINE)));
    ctx.registers.dealloc(with_elem);
    ctx.registers.dealloc(elem);

    let next_idx = ctx.registers.alloc("join_next_idx", LINE)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Add,
        vec![Operand::Reg(next_idx), Operand::Reg(idx), Operand::Imm(ImmValue::Number(1.into()))],
        LINE,
    )));
    out.push(AsmLine::Instr(Instruction::new(Opcode::Move, vec![Operand::Reg(idx), Operand::Reg(next_idx)], LINE)));
    ctx.registers.dealloc(next_idx);
    out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(start)], LINE)));

    out.push(AsmLine::Label(end));
    ctx.registers.dealloc(len);
    out.push(AsmLine::Instr(Instruction::new(Opcode::Ret, vec![Operand::Reg(result)], LINE)));
    ctx.registers.dealloc(result);
    ctx.registers.dealloc(arr);
    ctx.registers.dealloc(sep);
    ctx.registers.dealloc(idx);

    assert!(
        ctx.registers.all_free(),
        "register leak in builtin 'array_join': leaked registers {:?}",
        ctx.registers.leaked()
    );
    Ok(())
}

fn ext_call(
    ctx: &mut CodeGenContext,
    out: &mut Vec<AsmLine>,
    qualified_name: &str,
    arg_regs: &[RegId],
    line: usize,
) -> Result<RegId, CompileError> {
    let name_reg = ctx.registers.alloc("ext_name", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        Opcode::Load,
        vec![Operand::Reg(name_reg), Operand::Imm(ImmValue::Str(qualified_name.to_string()))],
        line,
    )));
    let dst = ctx.registers.alloc("ext_dst", line)?;
    let mut operands = vec![Operand::Reg(dst), Operand::Reg(name_reg)];
    operands.extend(arg_regs.iter().map(|r| Operand::Reg(*r)));
    out.push(AsmLine::Instr(Instruction::new(Opcode::ExtCall, operands, line)));
    ctx.registers.dealloc(name_reg);
    Ok(dst)
}
