//! # Compiler Error Definitions
//!
//! This module centralizes the single error type raised by every phase of the
//! TombLang compiler,: one `CompilerError{line, column, phase,
//! message}` is raised on the first failure and aborts the compilation — no
//! warnings, no recovery, no partial output.

use thiserror::Error;

/// The compiler phase active when a [`CompileError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lex,
    Parse,
    Resolve,
    TypeCheck,
    CodeGen,
    Assemble,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Lex => "lex",
            Phase::Parse => "parse",
            Phase::Resolve => "resolve",
            Phase::TypeCheck => "typecheck",
            Phase::CodeGen => "codegen",
            Phase::Assemble => "assemble",
        };
        write!(f, "{}", s)
    }
}

/// The single error kind raised by the TombLang compiler.
#[derive(Error, Debug)]
#[error("{phase} error at {line}:{column}: {message}")]
pub struct CompileError {
    pub phase: Phase,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl CompileError {
    pub fn new(phase: Phase, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            phase,
            line,
            column,
            message: message.into(),
        }
    }

    /// A lexical error; columns are not tracked by the lexer, so `0` stands
    /// for "unknown column" the way the line-only source reports elsewhere.
    pub fn lex(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Lex, line, 0, message)
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Parse, line, 0, message)
    }

    pub fn resolve(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Resolve, line, 0, message)
    }

    pub fn type_check(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::TypeCheck, line, 0, message)
    }

    pub fn codegen(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::CodeGen, line, 0, message)
    }

    pub fn assemble(line: usize, message: impl Into<String>) -> Self {
        Self::new(Phase::Assemble, line, 0, message)
    }

    /// Undefined-name error used by name resolution.
    pub fn undefined(line: usize, name: &str) -> Self {
        Self::resolve(line, format!("undefined identifier '{}'", name))
    }

    /// Duplicate-method error; message must contain "duplicate".
    pub fn duplicate_method(line: usize, name: &str, module: &str) -> Self {
        Self::resolve(
            line,
            format!("duplicate method name '{}' in module '{}'", name, module),
        )
    }

    /// Decimal-precision error; message must contain "precision".
    pub fn precision_overflow(line: usize, fractional_digits: u8, n: u8) -> Self {
        Self::type_check(
            line,
            format!(
                "decimal literal has {} fractional digits, exceeding the declared precision of {}",
                fractional_digits, n
            ),
        )
    }

    /// Legacy-operator error; message must contain "deprecated".
    pub fn deprecated_walrus(line: usize) -> Self {
        Self::parse(
            line,
            "the ':=' assignment operator is deprecated; use '='",
        )
    }

    /// Custom-library-method error; message must contain "not implemented".
    pub fn library_not_implemented(line: usize, library: &str, method: &str) -> Self {
        Self::codegen(
            line,
            format!(
                "library method '{}.{}' is marked custom but has not implemented lowering callbacks",
                library, method
            ),
        )
    }

    pub fn type_mismatch(line: usize, expected: impl std::fmt::Display, found: impl std::fmt::Display) -> Self {
        Self::type_check(
            line,
            format!("type mismatch: expected {}, found {}", expected, found),
        )
    }

    pub fn arity_mismatch(line: usize, name: &str, expected: usize, found: usize) -> Self {
        Self::type_check(
            line,
            format!(
                "'{}' expects {} argument(s), found {}",
                name, expected, found
            ),
        )
    }

    pub fn register_pressure_exceeded(line: usize) -> Self {
        Self::codegen(line, "register pressure exceeded")
    }
}
