//! # Statement Code Generator
//!
//! Lowers [`Statement`] nodes to structured [`AsmLine`]s, generalizing the
//! teacher's label-driven control-flow lowering (`if`/loop → compare, jump,
//! label) from x86 flags to the register VM's `JZ`/`JNZ` family.
//!
//! `break`/`continue` targets are tracked on two independent stacks rather
//! than one paired stack: a `switch` body pushes a break target without a
//! matching continue target, since `continue` inside a `switch` nested in a
//! loop must still reach the *loop*, not fall out of the switch.

use super::asm::{AsmLine, ImmValue, Instruction, Opcode, Operand};
use super::common::{CodeGenContext, VarEnv};
use super::expression_generator::{self, Value};
use crate::ast::nodes::*;
use crate::ast::types::scale_decimal;
use crate::compiler::error::CompileError;

#[derive(Default)]
struct LoopLabels {
    break_targets: Vec<String>,
    continue_targets: Vec<String>,
}

pub fn generate_method_body(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    body: &[Statement],
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    let mut loops = LoopLabels::default();
    generate_statements(ctx, module, env, body, &mut loops, out)
}

fn generate_block(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    stmts: &[Statement],
    loops: &mut LoopLabels,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    env.push_scope();
    let result = generate_statements(ctx, module, env, stmts, loops, out);
    for reg in env.pop_scope() {
        ctx.registers.dealloc(reg);
    }
    result
}

fn generate_statements(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    stmts: &[Statement],
    loops: &mut LoopLabels,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    for stmt in stmts {
        generate_statement(ctx, module, env, stmt, loops, out)?;
    }
    Ok(())
}

fn generate_statement(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    stmt: &Statement,
    loops: &mut LoopLabels,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    match stmt {
        Statement::Local { name, ty, value, line } => generate_local(ctx, module, env, name, ty.as_ref(), value.as_ref(), *line, out),
        Statement::Assign { target, op, value, line } => generate_assign(ctx, module, env, target, *op, value, *line, out),
        Statement::Expr(expr, _) => {
            let v = expression_generator::generate(ctx, module, env, expr, out)?;
            v.release(ctx);
            Ok(())
        }
        Statement::If { condition, then_branch, else_branch, line } => {
            let cv = expression_generator::generate(ctx, module, env, condition, out)?;
            let else_label = ctx.next_label("if_else");
            let end_label = ctx.next_label("if_end");
            let target = if else_branch.is_some() { else_label.clone() } else { end_label.clone() };
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jz, vec![Operand::Reg(cv.reg()), Operand::Label(target)], *line)));
            cv.release(ctx);
            generate_block(ctx, module, env, then_branch, loops, out)?;
            if let Some(else_branch) = else_branch {
                out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(end_label.clone())], *line)));
                out.push(AsmLine::Label(else_label));
                generate_block(ctx, module, env, else_branch, loops, out)?;
            }
            out.push(AsmLine::Label(end_label));
            Ok(())
        }
        Statement::While { condition, body, line } => {
            let start_label = ctx.next_label("while_start");
            let end_label = ctx.next_label("while_end");
            out.push(AsmLine::Label(start_label.clone()));
            let cv = expression_generator::generate(ctx, module, env, condition, out)?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jz, vec![Operand::Reg(cv.reg()), Operand::Label(end_label.clone())], *line)));
            cv.release(ctx);
            loops.break_targets.push(end_label.clone());
            loops.continue_targets.push(start_label.clone());
            generate_block(ctx, module, env, body, loops, out)?;
            loops.break_targets.pop();
            loops.continue_targets.pop();
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(start_label)], *line)));
            out.push(AsmLine::Label(end_label));
            Ok(())
        }
        Statement::DoWhile { body, condition, line } => {
            let start_label = ctx.next_label("do_start");
            let cond_label = ctx.next_label("do_cond");
            let end_label = ctx.next_label("do_end");
            out.push(AsmLine::Label(start_label.clone()));
            loops.break_targets.push(end_label.clone());
            loops.continue_targets.push(cond_label.clone());
            generate_block(ctx, module, env, body, loops, out)?;
            loops.break_targets.pop();
            loops.continue_targets.pop();
            out.push(AsmLine::Label(cond_label));
            let cv = expression_generator::generate(ctx, module, env, condition, out)?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jnz, vec![Operand::Reg(cv.reg()), Operand::Label(start_label)], *line)));
            cv.release(ctx);
            out.push(AsmLine::Label(end_label));
            Ok(())
        }
        Statement::For { init, condition, post, body, line } => {
            env.push_scope();
            if let Some(init) = init {
                generate_statement(ctx, module, env, init, loops, out)?;
            }
            let start_label = ctx.next_label("for_start");
            let continue_label = ctx.next_label("for_continue");
            let end_label = ctx.next_label("for_end");
            out.push(AsmLine::Label(start_label.clone()));
            if let Some(cond) = condition {
                let cv = expression_generator::generate(ctx, module, env, cond, out)?;
                out.push(AsmLine::Instr(Instruction::new(Opcode::Jz, vec![Operand::Reg(cv.reg()), Operand::Label(end_label.clone())], *line)));
                cv.release(ctx);
            }
            loops.break_targets.push(end_label.clone());
            loops.continue_targets.push(continue_label.clone());
            generate_block(ctx, module, env, body, loops, out)?;
            loops.break_targets.pop();
            loops.continue_targets.pop();
            out.push(AsmLine::Label(continue_label));
            if let Some(post) = post {
                generate_statement(ctx, module, env, post, loops, out)?;
            }
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(start_label)], *line)));
            out.push(AsmLine::Label(end_label));
            for reg in env.pop_scope() {
                ctx.registers.dealloc(reg);
            }
            Ok(())
        }
        Statement::Switch { subject, cases, default, line } => {
            generate_switch(ctx, module, env, subject, cases, default.as_deref(), *line, loops, out)
        }
        Statement::Break(line) => {
            let target = loops.break_targets.last().cloned().ok_or_else(|| CompileError::codegen(*line, "'break' outside a loop or switch"))?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(target)], *line)));
            Ok(())
        }
        Statement::Continue(line) => {
            let target = loops.continue_targets.last().cloned().ok_or_else(|| CompileError::codegen(*line, "'continue' outside a loop"))?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(target)], *line)));
            Ok(())
        }
        Statement::Return(value, line) => {
            match value {
                Some(expr) => {
                    let v = expression_generator::generate(ctx, module, env, expr, out)?;
                    out.push(AsmLine::Instr(Instruction::new(Opcode::Ret, vec![Operand::Reg(v.reg())], *line)));
                    v.release(ctx);
                }
                None => out.push(AsmLine::Instr(Instruction::new(Opcode::Ret, vec![], *line))),
            }
            Ok(())
        }
        Statement::Throw(expr, line) => {
            let v = expression_generator::generate(ctx, module, env, expr, out)?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Throw, vec![Operand::Reg(v.reg())], *line)));
            v.release(ctx);
            Ok(())
        }
        Statement::Block(stmts, _) => generate_block(ctx, module, env, stmts, loops, out),
    }
}

fn generate_local(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    name: &str,
    ty: Option<&TypeExpr>,
    value: Option<&Expression>,
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    // A decimal-typed local initialized from a decimal literal is rescaled
    // to the declared precision here; every other initializer lowers
    // through the generic expression path.
    if let (Some(ty), Some(Expression::Literal(Literal::Decimal { mantissa, fractional_digits }, lit_line))) =
        (ty, value.map(unwrap_grouping))
    {
        if ty.name == "decimal" {
            if let Some(n) = ty.args.first().and_then(|a| a.name.parse::<u8>().ok()) {
                let scaled = scale_decimal(mantissa, *fractional_digits, n);
                let reg = ctx.registers.alloc(name, line)?;
                out.push(AsmLine::Instr(Instruction::new(
                    Opcode::Load,
                    vec![Operand::Reg(reg), Operand::Imm(ImmValue::Number(scaled))],
                    *lit_line,
                )));
                env.bind_typed(name.to_string(), reg, Some(ty.name.clone()));
                return Ok(());
            }
        }
    }

    let type_name = ty.map(|t| t.name.clone());
    match value {
        Some(expr) => {
            let v = expression_generator::generate(ctx, module, env, expr, out)?;
            let reg = match v {
                Value::Owned(r) => r,
                Value::Borrowed(r) => {
                    let fresh = ctx.registers.alloc(name, line)?;
                    out.push(AsmLine::Instr(Instruction::new(Opcode::Move, vec![Operand::Reg(fresh), Operand::Reg(r)], line)));
                    fresh
                }
            };
            env.bind_typed(name.to_string(), reg, type_name);
        }
        None => {
            let reg = ctx.registers.alloc(name, line)?;
            out.push(AsmLine::Instr(Instruction::new(Opcode::Load, vec![Operand::Reg(reg), Operand::Imm(ImmValue::None)], line)));
            env.bind_typed(name.to_string(), reg, type_name);
        }
    }
    Ok(())
}

fn unwrap_grouping(expr: &Expression) -> &Expression {
    match expr {
        Expression::Grouping(inner, _) => unwrap_grouping(inner),
        other => other,
    }
}

fn generate_assign(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    target: &Expression,
    op: AssignOp,
    value: &Expression,
    line: usize,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    if matches!(op, AssignOp::LegacyWalrus) {
        return Err(CompileError::deprecated_walrus(line));
    }

    if matches!(op, AssignOp::Assign) {
        let v = expression_generator::generate(ctx, module, env, value, out)?;
        expression_generator::store_into(ctx, module, env, target, v.reg(), out)?;
        v.release(ctx);
        return Ok(());
    }

    let binop = match op {
        AssignOp::AddAssign => crate::ast::nodes::BinaryOp::Add,
        AssignOp::SubAssign => crate::ast::nodes::BinaryOp::Sub,
        AssignOp::MulAssign => crate::ast::nodes::BinaryOp::Mul,
        AssignOp::DivAssign => crate::ast::nodes::BinaryOp::Div,
        AssignOp::ModAssign => crate::ast::nodes::BinaryOp::Mod,
        AssignOp::Assign | AssignOp::LegacyWalrus => unreachable!("handled above"),
    };

    let cur = expression_generator::generate(ctx, module, env, target, out)?;
    let rhs = expression_generator::generate(ctx, module, env, value, out)?;
    let dst = ctx.registers.alloc("compound_assign", line)?;
    out.push(AsmLine::Instr(Instruction::new(
        expression_generator::binary_opcode(binop),
        vec![Operand::Reg(dst), Operand::Reg(cur.reg()), Operand::Reg(rhs.reg())],
        line,
    )));
    cur.release(ctx);
    rhs.release(ctx);
    expression_generator::store_into(ctx, module, env, target, dst, out)?;
    ctx.registers.dealloc(dst);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_switch(
    ctx: &mut CodeGenContext,
    module: &ModuleDecl,
    env: &mut VarEnv,
    subject: &Expression,
    cases: &[SwitchCase],
    default: Option<&[Statement]>,
    line: usize,
    loops: &mut LoopLabels,
    out: &mut Vec<AsmLine>,
) -> Result<(), CompileError> {
    let sv = expression_generator::generate(ctx, module, env, subject, out)?;
    let end_label = ctx.next_label("switch_end");
    let default_label = if default.is_some() { ctx.next_label("switch_default") } else { end_label.clone() };
    let case_labels: Vec<String> = cases.iter().map(|_| ctx.next_label("switch_case")).collect();

    for (case, case_label) in cases.iter().zip(&case_labels) {
        for label in &case.labels {
            let lit_reg = ctx.registers.alloc("case_lit", line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Load,
                vec![Operand::Reg(lit_reg), Operand::Imm(expression_generator::literal_imm(label))],
                line,
            )));
            let eq_reg = ctx.registers.alloc("case_eq", line)?;
            out.push(AsmLine::Instr(Instruction::new(
                Opcode::Eq,
                vec![Operand::Reg(eq_reg), Operand::Reg(sv.reg()), Operand::Reg(lit_reg)],
                line,
            )));
            out.push(AsmLine::Instr(Instruction::new(Opcode::Jnz, vec![Operand::Reg(eq_reg), Operand::Label(case_label.clone())], line)));
            ctx.registers.dealloc(lit_reg);
            ctx.registers.dealloc(eq_reg);
        }
    }
    sv.release(ctx);
    out.push(AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label(default_label.clone())], line)));

    loops.break_targets.push(end_label.clone());
    for (case, case_label) in cases.iter().zip(&case_labels) {
        out.push(AsmLine::Label(case_label.clone()));
        generate_block(ctx, module, env, &case.body, loops, out)?;
    }
    if let Some(default_body) = default {
        out.push(AsmLine::Label(default_label));
        generate_block(ctx, module, env, default_body, loops, out)?;
    }
    loops.break_targets.pop();

    out.push(AsmLine::Label(end_label));
    Ok(())
}
