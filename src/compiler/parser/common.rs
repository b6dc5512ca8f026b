//! # Parser Cursor
//!
//! [`Parser`] is the shared token cursor used by every parsing submodule
//! (declarations, statements, expressions): a simple index into the token
//! vector with `peek`/`advance`/`check`/`expect`, generalized from the
//! single-phase recursive-descent cursor this repository has always used to
//! the larger token and grammar set of TombLang.

use crate::compiler::error::CompileError;
use crate::compiler::lexer::{Spanned, Token};

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_at(&self, offset: usize) -> &Spanned {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn peek_token(&self) -> &Token {
        &self.peek().0
    }

    pub fn line(&self) -> usize {
        self.peek().1
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.peek().0, Token::Eof)
    }

    pub fn advance(&mut self) -> Spanned {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    pub fn check(&self, token: &Token) -> bool {
        self.peek_token() == token
    }

    /// Consumes and returns the current token if it matches `token`, else `None`.
    pub fn matches(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token, failing with a parse error naming `context`
    /// if it is not `token` — the sole error path for unexpected tokens: fails
    /// immediately, no recovery attempted.
    pub fn expect(&mut self, token: Token, context: &str) -> Result<Spanned, CompileError> {
        if self.check(&token) {
            Ok(self.advance())
        } else {
            Err(CompileError::parse(
                self.line(),
                format!(
                    "expected {:?} {}, found {:?}",
                    token,
                    context,
                    self.peek_token()
                ),
            ))
        }
    }

    pub fn get_identifier(&mut self) -> Result<String, CompileError> {
        match self.advance() {
            (Token::Identifier(name), ..) => Ok(name),
            (other, line, _) => Err(CompileError::parse(
                line,
                format!("expected identifier, found {:?}", other),
            )),
        }
    }
}

/// Parses a type expression: `NAME` or `NAME<ARG, ARG, ...>` (
/// "Types"). Generic arguments may themselves be nested type expressions
/// (`map<string, number>`) or a bare integer (`decimal<3>`'s `3`), so a
/// numeric argument is represented as a [`crate::ast::nodes::TypeExpr`]
/// whose `name` is the literal's digits and whose `args` is empty.
pub fn parse_type_expr(p: &mut Parser) -> Result<crate::ast::nodes::TypeExpr, CompileError> {
    let line = p.line();
    let name = match p.advance() {
        (Token::Identifier(name), ..) => name,
        (Token::Number(n), ..) => n.to_string(),
        (other, line, _) => {
            return Err(CompileError::parse(
                line,
                format!("expected type name, found {:?}", other),
            ))
        }
    };

    let mut args = Vec::new();
    if p.matches(&Token::Lt) {
        loop {
            args.push(parse_type_expr(p)?);
            if !p.matches(&Token::Comma) {
                break;
            }
        }
        p.expect(Token::Gt, "to close generic type argument list")?;
    }

    Ok(crate::ast::nodes::TypeExpr { name, args, line })
}
