//! # Two-Pass Assembler
//!
//! Encodes a [`crate::codegen::asm::AsmLine`] stream into the bytecode
//! `CompiledModule::script` carries. Genuinely two-pass, over the
//! structured IR rather than text: the first pass walks every line to record
//! each label's byte offset, and the second emits each instruction, resolving
//! `Operand::Label`s against the offsets the first pass recorded. A textual
//! re-parse is never needed since codegen and the assembler share this
//! crate's `AsmLine` type directly.
//!
//! Binary instruction layout: one opcode byte, then one encoded operand per
//! slot the instruction declared, in order. Operand encodings:
//! - `Reg(r)` → one byte, `r.0`.
//! - `Label(name)` → four bytes, the label's byte offset (little-endian
//!   `u32`), resolved by this pass.
//! - `Global(name)`/`Imm(Str|Address|Hash)` → a `u32` length prefix followed
//!   by the UTF-8 bytes.
//! - `Imm(Number)` → a `u32` length prefix followed by the two's-complement
//!   big-endian bytes of the `BigInt` (`to_signed_bytes_be`).
//! - `Imm(Bool)` → one byte, `0` or `1`.
//! - `Imm(Bytes(b))` → a `u32` length prefix followed by `b`.
//! - `Imm(None)` → no bytes.

use crate::codegen::asm::{AsmLine, ImmValue, Operand};
use crate::compiler::error::CompileError;
use std::collections::HashMap;

pub fn assemble(lines: &[AsmLine]) -> Result<Vec<u8>, CompileError> {
    let offsets = resolve_label_offsets(lines)?;

    let mut out = Vec::new();
    for line in lines {
        if let AsmLine::Instr(instr) = line {
            out.push(instr.op as u8);
            for operand in &instr.operands {
                encode_operand(operand, &offsets, instr.source_line.unwrap_or(0), &mut out)?;
            }
        }
    }
    Ok(out)
}

/// First pass: walks the stream computing each instruction's encoded length
/// so label offsets point at the instruction that follows them, without
/// encoding anything yet (labels may be forward references).
fn resolve_label_offsets(lines: &[AsmLine]) -> Result<HashMap<String, u32>, CompileError> {
    let mut offsets = HashMap::new();
    let mut cursor: u32 = 0;
    for line in lines {
        match line {
            AsmLine::Label(name) => {
                offsets.insert(name.clone(), cursor);
            }
            AsmLine::Comment(_) => {}
            AsmLine::Instr(instr) => {
                cursor += 1; // opcode byte
                for operand in &instr.operands {
                    cursor += operand_encoded_len(operand);
                }
            }
        }
    }
    Ok(offsets)
}

fn operand_encoded_len(operand: &Operand) -> u32 {
    match operand {
        Operand::Reg(_) => 1,
        Operand::Label(_) => 4,
        Operand::Global(name) => 4 + name.len() as u32,
        Operand::Imm(ImmValue::Str(s)) => 4 + s.len() as u32,
        Operand::Imm(ImmValue::Address(a)) => 4 + a.len() as u32,
        Operand::Imm(ImmValue::Hash(h)) => 4 + h.len() as u32,
        Operand::Imm(ImmValue::Bytes(b)) => 4 + b.len() as u32,
        Operand::Imm(ImmValue::Number(n)) => 4 + n.to_signed_bytes_be().len() as u32,
        Operand::Imm(ImmValue::Bool(_)) => 1,
        Operand::Imm(ImmValue::None) => 0,
    }
}

fn encode_operand(
    operand: &Operand,
    offsets: &HashMap<String, u32>,
    line: usize,
    out: &mut Vec<u8>,
) -> Result<(), CompileError> {
    match operand {
        Operand::Reg(r) => out.push(r.0),
        Operand::Label(name) => {
            let offset = offsets
                .get(name)
                .ok_or_else(|| CompileError::assemble(line, format!("undefined label '{}'", name)))?;
            out.extend_from_slice(&offset.to_le_bytes());
        }
        Operand::Global(name) => encode_bytes(name.as_bytes(), out),
        Operand::Imm(ImmValue::Str(s)) => encode_bytes(s.as_bytes(), out),
        Operand::Imm(ImmValue::Address(a)) => encode_bytes(a.as_bytes(), out),
        Operand::Imm(ImmValue::Hash(h)) => encode_bytes(h.as_bytes(), out),
        Operand::Imm(ImmValue::Bytes(b)) => encode_bytes(b, out),
        Operand::Imm(ImmValue::Number(n)) => encode_bytes(&n.to_signed_bytes_be(), out),
        Operand::Imm(ImmValue::Bool(b)) => out.push(if *b { 1 } else { 0 }),
        Operand::Imm(ImmValue::None) => {}
    }
    Ok(())
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::asm::{Instruction, Opcode};
    use crate::compiler::register::RegId;

    #[test]
    fn resolves_forward_label() {
        let lines = vec![
            AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label("end".into())], 1)),
            AsmLine::Instr(Instruction::new(Opcode::Nop, vec![], 1)),
            AsmLine::Label("end".into()),
            AsmLine::Instr(Instruction::new(Opcode::Halt, vec![], 1)),
        ];
        let bytes = assemble(&lines).unwrap();
        // JMP opcode (1 byte) + 4-byte offset, then NOP (1 byte), then HALT (1 byte).
        assert_eq!(bytes[0], Opcode::Jmp as u8);
        let offset = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        assert_eq!(offset, 6); // JMP(5 bytes) + NOP(1 byte)
        assert_eq!(bytes[5], Opcode::Nop as u8);
        assert_eq!(bytes[6], Opcode::Halt as u8);
    }

    #[test]
    fn encodes_register_operand() {
        let lines = vec![AsmLine::Instr(Instruction::new(
            Opcode::Move,
            vec![Operand::Reg(RegId(3)), Operand::Reg(RegId(1))],
            1,
        ))];
        let bytes = assemble(&lines).unwrap();
        assert_eq!(bytes, vec![Opcode::Move as u8, 3, 1]);
    }

    #[test]
    fn undefined_label_is_an_assemble_error() {
        let lines = vec![AsmLine::Instr(Instruction::new(Opcode::Jmp, vec![Operand::Label("nope".into())], 1))];
        let err = assemble(&lines).unwrap_err();
        assert_eq!(err.phase, crate::compiler::error::Phase::Assemble);
    }
}
