//! # Abstract Syntax Tree (AST) for TombLang
//!
//! This module defines the core structures for the Abstract Syntax Tree (AST)
//! of TombLang. The AST is an intermediate representation of the source code
//! used by the analyzer and code generator.
//!
//! It includes:
//! - [`nodes`]: Definitions for various statement, expression, and program nodes.
//! - [`types`]: Definitions for the basic data types and type-related utilities.

pub mod nodes;
pub mod types;