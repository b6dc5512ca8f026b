//! # Code Generation Module
//!
//! Orchestrates translation of an elaborated [`crate::ast::nodes::SourceProgram`]
//! into structured register-VM assembly.
//!
//! - **`asm`**: the structured instruction IR the rest of this module builds
//!   and the assembler consumes.
//! - **`common`**: shared generation state — register allocator, library
//!   registry, label counter, and the name→register environment.
//! - **`expression_generator`** / **`statement_generator`**: lower each AST
//!   expression/statement form to `asm::AsmLine`s.
//! - **`module_generator`**: the per-module/per-method driver that ties the
//!   two together and collects ABI metadata.

pub mod asm;
pub mod common;
pub mod expression_generator;
pub mod module_generator;
pub mod statement_generator;
