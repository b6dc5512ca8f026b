//! # Parser Module
//!
//! Orchestrates the syntactic analysis phase: converting the lexer's flat
//! token stream into a [`SourceProgram`] AST via recursive descent, with no
//! error recovery — the first unexpected token aborts the whole parse.

pub mod common;
pub mod declaration_parser;
pub mod expression_parser;
pub mod statement_parser;

use crate::ast::nodes::SourceProgram;
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Spanned;
use common::Parser;

pub fn parse(tokens: Vec<Spanned>) -> Result<SourceProgram, CompileError> {
    let mut parser = Parser::new(tokens);
    declaration_parser::parse_program(&mut parser)
}
