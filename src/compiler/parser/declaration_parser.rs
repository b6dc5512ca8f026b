//! # Declaration Parser
//!
//! Parses the top-level and module-body declaration forms of :
//! `contract`/`token`/`script`/`nft` modules, bare `struct`/`enum` holders,
//! `import`, `global`, `property`, `constructor`, methods, and triggers.

use super::common::{parse_type_expr, Parser};
use super::statement_parser::parse_block;
use crate::ast::nodes::{
    EnumDecl, EnumVariant, FieldDecl, GlobalDecl, ImportDecl, MethodDecl, MethodKind, ModuleDecl,
    ModuleKind, Param, PropertyBody, PropertyDecl, SourceProgram, StructDecl, Visibility,
};
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Token;

pub fn parse_program(p: &mut Parser) -> Result<SourceProgram, CompileError> {
    let mut modules = Vec::new();
    while !p.is_at_end() {
        modules.push(parse_top_level(p)?);
    }
    Ok(SourceProgram { modules })
}

fn parse_top_level(p: &mut Parser) -> Result<ModuleDecl, CompileError> {
    match p.peek_token() {
        Token::Contract => parse_module(p, ModuleKind::Contract),
        Token::TokenKw => parse_module(p, ModuleKind::Token),
        Token::Script => parse_module(p, ModuleKind::Script),
        Token::Struct => parse_struct_holder(p),
        Token::Enum => parse_enum_holder(p),
        other => Err(CompileError::parse(
            p.line(),
            format!("expected a top-level declaration, found {:?}", other),
        )),
    }
}

fn parse_module(p: &mut Parser, kind: ModuleKind) -> Result<ModuleDecl, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;

    let mut type_params = Vec::new();
    if p.matches(&Token::Lt) {
        loop {
            type_params.push(p.get_identifier()?);
            if !p.matches(&Token::Comma) {
                break;
            }
        }
        p.expect(Token::Gt, "to close type parameter list")?;
    }

    let mut module = ModuleDecl::new(kind, name, line);
    module.type_params = type_params;

    p.expect(Token::BraceOpen, "to open module body")?;
    while !p.check(&Token::BraceClose) && !p.is_at_end() {
        parse_module_member(p, &mut module)?;
    }
    p.expect(Token::BraceClose, "to close module body")?;

    Ok(module)
}

fn parse_module_member(p: &mut Parser, module: &mut ModuleDecl) -> Result<(), CompileError> {
    match p.peek_token() {
        Token::Import => {
            let line = p.line();
            p.advance();
            let library = p.get_identifier()?;
            p.expect(Token::Semicolon, "after import")?;
            module.imports.push(ImportDecl { library, line });
        }
        Token::Struct => module.structs.push(parse_struct_decl(p)?),
        Token::Enum => module.enums.push(parse_enum_decl(p)?),
        Token::Global => module.globals.push(parse_global(p)?),
        Token::Property => module.properties.push(parse_property(p)?),
        Token::Constructor => {
            let ctor = parse_method(p, MethodKind::Constructor, Visibility::Public)?;
            if module.constructor.is_some() {
                return Err(CompileError::duplicate_method(ctor.line, "constructor", &module.name));
            }
            module.constructor = Some(ctor);
        }
        Token::Trigger => {
            let line = p.line();
            p.advance();
            let name = p.get_identifier()?;
            let params = parse_param_list(p)?;
            let body = parse_block(p)?;
            module.triggers.push(MethodDecl {
                name,
                kind: MethodKind::Trigger,
                visibility: Visibility::Internal,
                params,
                return_type: None,
                variadic: false,
                body,
                line,
            });
        }
        Token::Task => {
            let line = p.line();
            p.advance();
            let name = p.get_identifier()?;
            let (params, return_type, variadic) = parse_signature_tail(p)?;
            let body = parse_block(p)?;
            check_no_duplicate(module, &name, line)?;
            module.methods.push(MethodDecl {
                name,
                kind: MethodKind::Task,
                visibility: Visibility::Public,
                params,
                return_type,
                variadic,
                body,
                line,
            });
        }
        Token::Public => {
            p.advance();
            let m = parse_method(p, MethodKind::Method, Visibility::Public)?;
            check_no_duplicate(module, &m.name, m.line)?;
            module.methods.push(m);
        }
        Token::Private => {
            p.advance();
            let m = parse_method(p, MethodKind::Method, Visibility::Private)?;
            check_no_duplicate(module, &m.name, m.line)?;
            module.methods.push(m);
        }
        Token::Internal => {
            p.advance();
            let m = parse_method(p, MethodKind::Method, Visibility::Internal)?;
            check_no_duplicate(module, &m.name, m.line)?;
            module.methods.push(m);
        }
        Token::Nft => module.sub_modules.push(parse_nft(p)?),
        other => {
            return Err(CompileError::parse(
                p.line(),
                format!("unexpected token inside module body: {:?}", other),
            ))
        }
    }
    Ok(())
}

/// Enforces the no-overloading rule: no duplicate method names per module.
fn check_no_duplicate(module: &ModuleDecl, name: &str, line: usize) -> Result<(), CompileError> {
    if module.methods.iter().any(|m| m.name == name) {
        Err(CompileError::duplicate_method(line, name, &module.name))
    } else {
        Ok(())
    }
}

fn parse_nft(p: &mut Parser) -> Result<ModuleDecl, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;

    let mut type_params = Vec::new();
    if p.matches(&Token::Lt) {
        loop {
            type_params.push(p.get_identifier()?);
            if !p.matches(&Token::Comma) {
                break;
            }
        }
        p.expect(Token::Gt, "to close ROM/RAM type parameter list")?;
    }

    let mut module = ModuleDecl::new(ModuleKind::Nft, name, line);
    module.type_params = type_params;

    p.expect(Token::BraceOpen, "to open nft body")?;
    while !p.check(&Token::BraceClose) && !p.is_at_end() {
        parse_module_member(p, &mut module)?;
    }
    p.expect(Token::BraceClose, "to close nft body")?;

    Ok(module)
}

fn parse_struct_holder(p: &mut Parser) -> Result<ModuleDecl, CompileError> {
    let decl = parse_struct_decl(p)?;
    let line = decl.line;
    let name = decl.name.clone();
    let mut module = ModuleDecl::new(ModuleKind::StructHolder, name, line);
    module.structs.push(decl);
    Ok(module)
}

fn parse_enum_holder(p: &mut Parser) -> Result<ModuleDecl, CompileError> {
    let decl = parse_enum_decl(p)?;
    let line = decl.line;
    let name = decl.name.clone();
    let mut module = ModuleDecl::new(ModuleKind::StructHolder, name, line);
    module.enums.push(decl);
    Ok(module)
}

fn parse_struct_decl(p: &mut Parser) -> Result<StructDecl, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;
    p.expect(Token::BraceOpen, "to open struct body")?;

    let mut fields = Vec::new();
    while !p.check(&Token::BraceClose) && !p.is_at_end() {
        let field_name = p.get_identifier()?;
        p.expect(Token::Colon, "after field name")?;
        let ty = parse_type_expr(p)?;
        p.expect(Token::Semicolon, "after field declaration")?;
        fields.push(FieldDecl { name: field_name, ty });
    }
    p.expect(Token::BraceClose, "to close struct body")?;

    Ok(StructDecl { name, fields, line })
}

fn parse_enum_decl(p: &mut Parser) -> Result<EnumDecl, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;
    p.expect(Token::BraceOpen, "to open enum body")?;

    let mut variants = Vec::new();
    let mut next_value = 0i64;
    if !p.check(&Token::BraceClose) {
        loop {
            let variant_name = p.get_identifier()?;
            let value = if p.matches(&Token::Eq) {
                let (tok, vline, _) = p.advance();
                match tok {
                    Token::Number(n) => n
                        .to_string()
                        .parse::<i64>()
                        .map_err(|_| CompileError::parse(vline, "enum value out of range"))?,
                    other => return Err(CompileError::parse(vline, format!("expected integer enum value, found {:?}", other))),
                }
            } else {
                next_value
            };
            if variants.iter().any(|v: &EnumVariant| v.value == value) {
                return Err(CompileError::parse(
                    line,
                    format!("duplicate enum value {} in '{}'", value, name),
                ));
            }
            next_value = value + 1;
            variants.push(EnumVariant { name: variant_name, value });
            if !p.matches(&Token::Comma) {
                break;
            }
        }
    }
    p.expect(Token::BraceClose, "to close enum body")?;

    Ok(EnumDecl { name, variants, line })
}

fn parse_global(p: &mut Parser) -> Result<GlobalDecl, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;
    p.expect(Token::Colon, "after global name")?;
    let ty = parse_type_expr(p)?;
    p.expect(Token::Semicolon, "after global declaration")?;
    Ok(GlobalDecl { name, ty, line })
}

fn parse_property(p: &mut Parser) -> Result<PropertyDecl, CompileError> {
    let line = p.line();
    p.advance();
    let name = p.get_identifier()?;
    p.expect(Token::Colon, "after property name")?;
    let ty = parse_type_expr(p)?;

    let body = if p.matches(&Token::Eq) {
        let expr = super::expression_parser::parse_expression(p)?;
        p.expect(Token::Semicolon, "after property expression")?;
        PropertyBody::Expr(expr)
    } else {
        PropertyBody::Block(parse_block(p)?)
    };

    Ok(PropertyDecl { name, ty, visibility: Visibility::Public, body, line })
}

fn parse_method(p: &mut Parser, kind: MethodKind, visibility: Visibility) -> Result<MethodDecl, CompileError> {
    let is_ctor = matches!(kind, MethodKind::Constructor);
    let line = p.line();
    if is_ctor {
        p.expect(Token::Constructor, "for constructor")?;
    } else {
        p.advance();
    }
    let name = if is_ctor { "constructor".to_string() } else { p.get_identifier()? };
    let (params, return_type, variadic) = parse_signature_tail(p)?;
    let body = parse_block(p)?;

    Ok(MethodDecl { name, kind, visibility, params, return_type, variadic, body, line })
}

/// Parses `(args)[:TYPE[*]]`, shared by methods, tasks, and triggers.
fn parse_signature_tail(
    p: &mut Parser,
) -> Result<(Vec<Param>, Option<crate::ast::nodes::TypeExpr>, bool), CompileError> {
    let params = parse_param_list(p)?;

    let mut variadic = false;
    let return_type = if p.matches(&Token::Colon) {
        let ty = parse_type_expr(p)?;
        if p.matches(&Token::Star) {
            variadic = true;
        }
        Some(ty)
    } else {
        None
    };

    Ok((params, return_type, variadic))
}

fn parse_param_list(p: &mut Parser) -> Result<Vec<Param>, CompileError> {
    p.expect(Token::ParenOpen, "to open parameter list")?;
    let mut params = Vec::new();
    if !p.check(&Token::ParenClose) {
        loop {
            let name = p.get_identifier()?;
            p.expect(Token::Colon, "after parameter name")?;
            let ty = parse_type_expr(p)?;
            params.push(Param { name, ty });
            if !p.matches(&Token::Comma) {
                break;
            }
        }
    }
    p.expect(Token::ParenClose, "to close parameter list")?;
    Ok(params)
}
