//! # Compiler Module
//!
//! The core entry point and orchestrator for the TombLang compiler. It
//! aggregates the compile phases (lexer, parser, analyzer, codegen,
//! assembler, ABI serializer) behind a single [`Compiler::compile`] call — a
//! self-contained pipeline with no external process dependency.

pub mod analyzer;
pub mod error;
pub mod lexer;
pub mod library;
pub mod parser;
pub mod register;
pub mod scope;

pub use analyzer::analyze;
pub use lexer::tokenize;
pub use parser::parse;

use crate::abi;
use crate::assembler;
use crate::ast::nodes::ModuleKind;
use crate::codegen::common::CodeGenContext;
use crate::codegen::module_generator::{self, ModuleArtifact};
use crate::debug::{self, PerfTimer};
use error::CompileError;
use register::DEFAULT_BANK_SIZE;

/// Compile-time knobs a caller can set, threaded through a fresh
/// [`CodeGenContext`] per call rather than held in a `static`/`thread_local`.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Size of the register bank each method is compiled against (at least
    /// 32 slots).
    pub register_bank_size: u8,
    /// Whether generated assembly carries `// Line N: <source>` annotations,
    /// togglable so callers that don't need them skip the overhead.
    pub emit_line_comments: bool,
    /// Whether an unresolved library method is a hard [`CompileError`]
    /// (`true`, the default) rather than silently skipped.
    pub strict_library_calls: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            register_bank_size: DEFAULT_BANK_SIZE,
            emit_line_comments: true,
            strict_library_calls: true,
        }
    }
}

/// One compiled module: assembled bytecode (`script`), the serialized method
/// table (`abi`), and any nested `nft` sub-modules, recursively compiled the
/// same way.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub name: String,
    pub kind: ModuleKind,
    pub script: Vec<u8>,
    pub abi: Vec<u8>,
    pub sub_modules: Vec<CompiledModule>,
}

/// The stateless orchestrator driving the six compile phases (the
/// `Phase` enum) over one source string. Holds no fields: everything a
/// compilation needs lives on the `CompileOptions`/`CodeGenContext` created
/// fresh inside `compile`, so concurrent calls never share mutable state.
pub struct Compiler;

impl Compiler {
    /// Compiles one TombLang source string with default options.
    pub fn compile(source: &str) -> Result<Vec<CompiledModule>, CompileError> {
        Self::compile_with_options(source, CompileOptions::default())
    }

    pub fn compile_with_options(source: &str, options: CompileOptions) -> Result<Vec<CompiledModule>, CompileError> {
        let timer = PerfTimer::new("compile");
        let artifacts = Self::generate_artifacts(source, options)?;
        let compiled = artifacts.iter().map(finish_module).collect::<Result<Vec<_>, _>>()?;
        timer.finish();
        Ok(compiled)
    }

    /// Runs every phase through code generation without assembling, so a
    /// caller (the `--show-asm` CLI flag) can render the structured
    /// assembly text instead of bytecode.
    pub fn generate_artifacts(source: &str, options: CompileOptions) -> Result<Vec<ModuleArtifact>, CompileError> {
        debug::log_lex("tokenizing source");
        let tokens = tokenize(source)?;

        debug::log_parse(&format!("{} tokens", tokens.len()));
        let program = parse(tokens)?;

        debug::log_resolve("elaborating modules");
        analyze(&program)?;

        debug::log_codegen(&format!("generating code for {} module(s)", program.modules.len()));
        let mut ctx = CodeGenContext::new(options);
        program
            .modules
            .iter()
            .map(|m| module_generator::generate_module(&mut ctx, m))
            .collect::<Result<Vec<_>, _>>()
    }

    /// Joins `lines` with newlines and compiles the result — a convenience
    /// for callers that build source up as `Vec<String>`.
    pub fn compile_lines(lines: &[String]) -> Result<Vec<CompiledModule>, CompileError> {
        Self::compile(&lines.join("\n"))
    }

    /// Compiles every `.tomb` file directly inside `dir` (non-recursive),
    /// returning one compile result per file in directory-entry order.
    #[allow(clippy::type_complexity)]
    pub fn compile_many(
        dir: &std::path::Path,
    ) -> Result<Vec<(std::path::PathBuf, Result<Vec<CompiledModule>, CompileError>)>, std::io::Error> {
        let mut results = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("tomb") {
                continue;
            }
            let source = std::fs::read_to_string(&path)?;
            results.push((path, Self::compile(&source)));
        }
        Ok(results)
    }
}

fn finish_module(artifact: &ModuleArtifact) -> Result<CompiledModule, CompileError> {
    debug::log_assemble(&format!("assembling module '{}'", artifact.name));
    let script = assembler::assemble(&artifact.asm)?;
    let abi = abi::serialize(&artifact.abi_methods);
    let sub_modules = artifact.sub_modules.iter().map(finish_module).collect::<Result<Vec<_>, _>>()?;
    Ok(CompiledModule {
        name: artifact.name.clone(),
        kind: artifact.kind,
        script,
        abi,
        sub_modules,
    })
}
