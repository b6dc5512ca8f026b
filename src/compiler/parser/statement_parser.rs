//! # Statement Parser
//!
//! Parses the statement forms of : locals, assignment (including
//! the rejected legacy `:=` form), `if`/`else`, `switch`, `while`, `do-while`,
//! `for`, `break`/`continue`, `return`, `throw`, bare blocks, and expression
//! statements.

use super::common::{parse_type_expr, Parser};
use super::expression_parser::{parse_expression, parse_expr_for_assign_target};
use crate::ast::nodes::{AssignOp, Literal, Statement, SwitchCase};
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Token;

pub fn parse_block(p: &mut Parser) -> Result<Vec<Statement>, CompileError> {
    p.expect(Token::BraceOpen, "to open block")?;
    let mut statements = Vec::new();
    while !p.check(&Token::BraceClose) && !p.is_at_end() {
        statements.push(parse_statement(p)?);
    }
    p.expect(Token::BraceClose, "to close block")?;
    Ok(statements)
}

pub fn parse_statement(p: &mut Parser) -> Result<Statement, CompileError> {
    match p.peek_token() {
        Token::Local => parse_local(p),
        Token::If => parse_if(p),
        Token::While => parse_while(p),
        Token::Do => parse_do_while(p),
        Token::For => parse_for(p),
        Token::Switch => parse_switch(p),
        Token::Break => {
            let line = p.line();
            p.advance();
            p.expect(Token::Semicolon, "after 'break'")?;
            Ok(Statement::Break(line))
        }
        Token::Continue => {
            let line = p.line();
            p.advance();
            p.expect(Token::Semicolon, "after 'continue'")?;
            Ok(Statement::Continue(line))
        }
        Token::Return => parse_return(p),
        Token::Throw => parse_throw(p),
        Token::BraceOpen => {
            let line = p.line();
            let body = parse_block(p)?;
            Ok(Statement::Block(body, line))
        }
        _ => parse_assign_or_expr(p),
    }
}

fn parse_local(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;

    let ty = if p.matches(&Token::Colon) {
        Some(parse_type_expr(p)?)
    } else {
        None
    };

    let value = if p.matches(&Token::Eq) {
        Some(parse_expression(p)?)
    } else {
        None
    };

    p.expect(Token::Semicolon, "after local declaration")?;
    Ok(Statement::Local { name, ty, value, line })
}

/// Parses `lvalue = expr;`, a compound form, the rejected `lvalue := expr;`
/// (raised as a "deprecated" diagnostic rather than a generic syntax error),
/// or a bare expression statement when no assignment operator follows.
fn parse_assign_or_expr(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    let target = parse_expr_for_assign_target(p)?;

    let op = match p.peek_token() {
        Token::Eq => AssignOp::Assign,
        Token::PlusEq => AssignOp::AddAssign,
        Token::MinusEq => AssignOp::SubAssign,
        Token::StarEq => AssignOp::MulAssign,
        Token::SlashEq => AssignOp::DivAssign,
        Token::PercentEq => AssignOp::ModAssign,
        Token::ColonEq => return Err(CompileError::deprecated_walrus(line)),
        _ => {
            p.expect(Token::Semicolon, "after expression statement")?;
            return Ok(Statement::Expr(target, line));
        }
    };
    p.advance();
    let value = parse_expression(p)?;
    p.expect(Token::Semicolon, "after assignment")?;
    Ok(Statement::Assign { target, op, value, line })
}

fn parse_if(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    p.expect(Token::ParenOpen, "after 'if'")?;
    let condition = parse_expression(p)?;
    p.expect(Token::ParenClose, "after if condition")?;
    let then_branch = parse_block(p)?;

    let else_branch = if p.matches(&Token::Else) {
        if p.check(&Token::If) {
            Some(vec![parse_if(p)?])
        } else {
            Some(parse_block(p)?)
        }
    } else {
        None
    };

    Ok(Statement::If { condition, then_branch, else_branch, line })
}

fn parse_while(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    p.expect(Token::ParenOpen, "after 'while'")?;
    let condition = parse_expression(p)?;
    p.expect(Token::ParenClose, "after while condition")?;
    let body = parse_block(p)?;
    Ok(Statement::While { condition, body, line })
}

fn parse_do_while(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    let body = parse_block(p)?;
    p.expect(Token::While, "after do-while body")?;
    p.expect(Token::ParenOpen, "after 'while'")?;
    let condition = parse_expression(p)?;
    p.expect(Token::ParenClose, "after do-while condition")?;
    p.expect(Token::Semicolon, "after do-while statement")?;
    Ok(Statement::DoWhile { body, condition, line })
}

fn parse_for(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    p.expect(Token::ParenOpen, "after 'for'")?;

    let init = if p.check(&Token::Semicolon) {
        None
    } else {
        Some(Box::new(parse_for_clause_statement(p)?))
    };
    p.expect(Token::Semicolon, "after for-loop init")?;

    let condition = if p.check(&Token::Semicolon) {
        None
    } else {
        Some(parse_expression(p)?)
    };
    p.expect(Token::Semicolon, "after for-loop condition")?;

    let post = if p.check(&Token::ParenClose) {
        None
    } else {
        Some(Box::new(parse_for_clause_statement(p)?))
    };
    p.expect(Token::ParenClose, "after for-loop clauses")?;

    let body = parse_block(p)?;
    Ok(Statement::For { init, condition, post, body, line })
}

/// Parses a single `local` declaration or assignment used in a `for(...)`
/// clause, without the trailing semicolon that terminates it as a standalone
/// statement — the surrounding `for` production consumes that separator itself.
fn parse_for_clause_statement(p: &mut Parser) -> Result<Statement, CompileError> {
    if p.check(&Token::Local) {
        let line = p.line();
        p.advance();
        let name = p.get_identifier()?;
        let ty = if p.matches(&Token::Colon) { Some(parse_type_expr(p)?) } else { None };
        let value = if p.matches(&Token::Eq) { Some(parse_expression(p)?) } else { None };
        return Ok(Statement::Local { name, ty, value, line });
    }

    let line = p.line();
    let target = parse_expr_for_assign_target(p)?;
    let op = match p.peek_token() {
        Token::Eq => AssignOp::Assign,
        Token::PlusEq => AssignOp::AddAssign,
        Token::MinusEq => AssignOp::SubAssign,
        Token::StarEq => AssignOp::MulAssign,
        Token::SlashEq => AssignOp::DivAssign,
        Token::PercentEq => AssignOp::ModAssign,
        Token::ColonEq => return Err(CompileError::deprecated_walrus(line)),
        _ => return Ok(Statement::Expr(target, line)),
    };
    p.advance();
    let value = parse_expression(p)?;
    Ok(Statement::Assign { target, op, value, line })
}

fn parse_switch(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    p.expect(Token::ParenOpen, "after 'switch'")?;
    let subject = parse_expression(p)?;
    p.expect(Token::ParenClose, "after switch subject")?;
    p.expect(Token::BraceOpen, "to open switch body")?;

    let mut cases = Vec::new();
    let mut default = None;

    while !p.check(&Token::BraceClose) && !p.is_at_end() {
        if p.matches(&Token::Case) {
            let mut labels = vec![parse_case_label(p)?];
            p.expect(Token::Colon, "after case label")?;
            while p.check(&Token::Case) {
                p.advance();
                labels.push(parse_case_label(p)?);
                p.expect(Token::Colon, "after case label")?;
            }
            let body = parse_case_body(p)?;
            cases.push(SwitchCase { labels, body });
        } else if p.matches(&Token::Default) {
            p.expect(Token::Colon, "after 'default'")?;
            default = Some(parse_case_body(p)?);
        } else {
            return Err(CompileError::parse(
                p.line(),
                format!("expected 'case' or 'default', found {:?}", p.peek_token()),
            ));
        }
    }

    p.expect(Token::BraceClose, "to close switch body")?;
    Ok(Statement::Switch { subject, cases, default, line })
}

fn parse_case_label(p: &mut Parser) -> Result<Literal, CompileError> {
    let (token, line, _) = p.advance();
    match token {
        Token::Number(n) => Ok(Literal::Number(n)),
        Token::StringLiteral(s) => Ok(Literal::Str(s)),
        Token::Identifier(name) => Ok(Literal::Str(name)),
        other => Err(CompileError::parse(line, format!("invalid case label {:?}", other))),
    }
}

/// Statements belonging to one `case`/`default` arm, up to (not including)
/// the next `case`, `default`, or the closing brace of the `switch` — TombLang
/// has no `break`-to-end-case fallthrough suppression beyond the explicit
/// `break;` statement.
fn parse_case_body(p: &mut Parser) -> Result<Vec<Statement>, CompileError> {
    let mut body = Vec::new();
    while !matches!(p.peek_token(), Token::Case | Token::Default | Token::BraceClose) {
        body.push(parse_statement(p)?);
    }
    Ok(body)
}

fn parse_return(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    if p.matches(&Token::Semicolon) {
        return Ok(Statement::Return(None, line));
    }
    let value = parse_expression(p)?;
    p.expect(Token::Semicolon, "after return expression")?;
    Ok(Statement::Return(Some(value), line))
}

fn parse_throw(p: &mut Parser) -> Result<Statement, CompileError> {
    let line = p.line();
    p.advance();
    let value = parse_expression(p)?;
    p.expect(Token::Semicolon, "after throw expression")?;
    Ok(Statement::Throw(value, line))
}
