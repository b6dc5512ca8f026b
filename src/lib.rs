//! # TombLang Compiler Crate
//!
//! The TombLang compiler front-end and code generator: lexer, parser,
//! semantic elaboration, register allocator, register-VM code generator,
//! two-pass assembler, and ABI serializer. The VM itself, the host
//! blockchain, and a full CLI driver are out of scope — this crate
//! produces bytecode and ABI bytes for something else to execute.

pub mod abi;
pub mod assembler;
pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod debug;

pub use compiler::error::CompileError;
pub use compiler::{analyze, parse, tokenize, CompileOptions, CompiledModule, Compiler};
