//! # Structured VM Assembly IR
//!
//! The code generator never builds assembly text directly: it builds a
//! `Vec<AsmLine>`, and the assembler consumes that structured form directly —
//! codegen and assembler share a crate, so a textual round-trip would just
//! be busywork. `AsmLine`'s `Display` impl renders the textual assembly form
//! for `--show-asm` and debug output only; it is never re-parsed.
//!
//! Opcode numbers here are a concrete stand-in (see DESIGN.md, Open
//! Questions): the real VM owns the numbering, and this repository has none
//! to read from, so `Opcode` fixes one consistent assignment so the rest of
//! the crate has something to target and test against.

use crate::compiler::register::RegId;
use num_bigint::BigInt;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0,
    Load = 1,
    Move = 2,
    LoadGlobal = 3,
    StoreGlobal = 4,
    Push = 5,
    Pop = 6,
    Add = 7,
    Sub = 8,
    Mul = 9,
    Div = 10,
    Mod = 11,
    Shl = 12,
    Shr = 13,
    Eq = 14,
    Ne = 15,
    Lt = 16,
    Le = 17,
    Gt = 18,
    Ge = 19,
    And = 20,
    Or = 21,
    Not = 22,
    Neg = 23,
    Jmp = 24,
    Jz = 25,
    Jnz = 39,
    Call = 26,
    Ret = 27,
    ExtCall = 28,
    Ctx = 29,
    Switch = 30,
    NewArray = 31,
    IndexGet = 32,
    IndexSet = 33,
    NewStruct = 34,
    SetField = 35,
    GetField = 36,
    Throw = 37,
    Halt = 38,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Load => "LOAD",
            Opcode::Move => "MOVE",
            Opcode::LoadGlobal => "LOADG",
            Opcode::StoreGlobal => "STOREG",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Shl => "SHL",
            Opcode::Shr => "SHR",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Ge => "GE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Neg => "NEG",
            Opcode::Jmp => "JMP",
            Opcode::Jz => "JZ",
            Opcode::Jnz => "JNZ",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::ExtCall => "EXTCALL",
            Opcode::Ctx => "CTX",
            Opcode::Switch => "SWITCH",
            Opcode::NewArray => "NEWARR",
            Opcode::IndexGet => "IDXGET",
            Opcode::IndexSet => "IDXSET",
            Opcode::NewStruct => "NEWSTRUCT",
            Opcode::SetField => "SETFIELD",
            Opcode::GetField => "GETFIELD",
            Opcode::Throw => "THROW",
            Opcode::Halt => "HALT",
        }
    }
}

/// An immediate value carried by a [`Operand::Imm`], wide enough to encode
/// every `Literal` variant of the AST without loss.
#[derive(Debug, Clone, PartialEq)]
pub enum ImmValue {
    Number(BigInt),
    Bool(bool),
    Str(String),
    Address(String),
    Hash(String),
    Bytes(Vec<u8>),
    None,
}

impl fmt::Display for ImmValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImmValue::Number(n) => write!(f, "{}", n),
            ImmValue::Bool(b) => write!(f, "{}", b),
            ImmValue::Str(s) => write!(f, "{:?}", s),
            ImmValue::Address(a) => write!(f, "@{}", a),
            ImmValue::Hash(h) => write!(f, "{}", h),
            ImmValue::Bytes(b) => write!(f, "bytes[{}]", b.len()),
            ImmValue::None => write!(f, "none"),
        }
    }
}

/// One operand of an [`Instruction`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Reg(RegId),
    Imm(ImmValue),
    /// A jump/call target resolved to a byte offset by the assembler's first pass.
    Label(String),
    /// A storage key for `LOADG`/`STOREG`.
    Global(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "r{}", r.0),
            Operand::Imm(v) => write!(f, "{}", v),
            Operand::Label(l) => write!(f, "@{}", l),
            Operand::Global(g) => write!(f, "\"{}\"", g),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Instruction {
    pub op: Opcode,
    pub operands: Vec<Operand>,
    /// The TombLang source line this instruction was generated from, used
    /// for the `// Line N: <source>` debug annotations.
    pub source_line: Option<usize>,
}

impl Instruction {
    pub fn new(op: Opcode, operands: Vec<Operand>, source_line: usize) -> Self {
        Self { op, operands, source_line: Some(source_line) }
    }
}

/// One line of structured output: a label definition, an instruction, or a
/// standalone comment (the `// Line N: <source>` annotation, emitted
/// separately from the instruction it precedes so the assembler's two
/// passes never have to parse comment text).
#[derive(Debug, Clone)]
pub enum AsmLine {
    Label(String),
    Instr(Instruction),
    Comment(String),
}

impl fmt::Display for AsmLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmLine::Label(name) => write!(f, "{}:", name),
            AsmLine::Comment(text) => write!(f, "; {}", text),
            AsmLine::Instr(instr) => {
                let operands = instr
                    .operands
                    .iter()
                    .map(|o| o.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                if operands.is_empty() {
                    write!(f, "    {}", instr.op.mnemonic())
                } else {
                    write!(f, "    {} {}", instr.op.mnemonic(), operands)
                }
            }
        }
    }
}

/// Renders a whole program's worth of [`AsmLine`]s as the textual assembly
/// form, one line per entry, annotated with source-line comments ahead of
/// each instruction when `emit_line_comments` is set
/// (`CompileOptions::emit_line_comments`).
pub fn render(lines: &[AsmLine], emit_line_comments: bool) -> String {
    let mut out = String::new();
    for line in lines {
        if emit_line_comments {
            if let AsmLine::Instr(instr) = line {
                if let Some(n) = instr.source_line {
                    out.push_str(&format!("    ; Line {}\n", n));
                }
            }
        }
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
