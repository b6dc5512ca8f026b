//! # Lexer
//!
//! Tokenizes TombLang source text into a flat, line-annotated token stream
//!. Unlike an indentation-sensitive language, TombLang blocks are
//! brace-delimited and statements are semicolon-terminated, so this lexer
//! never needs an indent/dedent stack — whitespace is simply skipped.

use crate::compiler::error::CompileError;
use num_bigint::BigInt;
use std::str::FromStr;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Identifier(String),
    /// `$NAME` — a compile-time macro reference (`$THIS_ADDRESS`, `$THIS_SYMBOL`, `$TYPE_OF`).
    MacroIdent(String),

    Number(BigInt),
    Decimal { mantissa: BigInt, fractional_digits: u8 },
    StringLiteral(String),
    CharLiteral(char),
    /// `@...` address literal.
    AddressLiteral(String),
    /// `0x...` hex literal.
    HexLiteral(String),
    True,
    False,

    // --- Keywords ---
    Contract,
    TokenKw,
    Script,
    Struct,
    Enum,
    Import,
    Global,
    Property,
    Constructor,
    Public,
    Private,
    Internal,
    Trigger,
    Nft,
    Task,
    Local,
    If,
    Else,
    Switch,
    Case,
    Default,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    Throw,
    This,

    // --- Operators ---
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Shl,
    Shr,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    /// `:=`, accepted by the lexer only so the parser can reject it with a
    /// "deprecated" diagnostic rather than a generic syntax error.
    ColonEq,

    // --- Punctuation ---
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    Colon,
    Semicolon,
    Comma,
    Dot,

    Eof,
}

/// One lexed token, paired with its 1-based source line (used for both
/// diagnostics and the `// Line N: <source>` codegen annotations of )
/// and the raw lexeme text for error messages.
pub type Spanned = (Token, usize, String);

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, CompileError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '\n' => {
                chars.next();
                line += 1;
            }
            '/' => {
                chars.next();
                match chars.peek() {
                    Some('/') => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == '\n' {
                                line += 1;
                                break;
                            }
                        }
                    }
                    Some('*') => {
                        chars.next();
                        let mut depth = 1usize;
                        while depth > 0 {
                            match chars.next() {
                                Some('\n') => line += 1,
                                Some('*') if chars.peek() == Some(&'/') => {
                                    chars.next();
                                    depth -= 1;
                                }
                                Some('/') if chars.peek() == Some(&'*') => {
                                    chars.next();
                                    depth += 1;
                                }
                                Some(_) => {}
                                None => return Err(CompileError::lex(line, "unterminated block comment")),
                            }
                        }
                    }
                    Some('=') => {
                        chars.next();
                        tokens.push((Token::SlashEq, line, "/=".into()));
                    }
                    _ => tokens.push((Token::Slash, line, "/".into())),
                }
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some('"') => s.push('"'),
                            Some('\\') => s.push('\\'),
                            Some('x') => {
                                let hi = chars.next();
                                let lo = chars.next();
                                if let (Some(hi), Some(lo)) = (hi, lo) {
                                    let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                                        .map_err(|_| CompileError::lex(line, "invalid \\xHH escape"))?;
                                    s.push(byte as char);
                                } else {
                                    return Err(CompileError::lex(line, "invalid \\xHH escape"));
                                }
                            }
                            Some(other) => return Err(CompileError::lex(line, format!("unknown escape '\\{}'", other))),
                            None => return Err(CompileError::lex(line, "unterminated string literal")),
                        },
                        Some('\n') => return Err(CompileError::lex(line, "unterminated string literal")),
                        Some(c) => s.push(c),
                        None => return Err(CompileError::lex(line, "unterminated string literal")),
                    }
                }
                tokens.push((Token::StringLiteral(s.clone()), line, s));
            }
            '\'' => {
                chars.next();
                let c = match chars.next() {
                    Some('\\') => match chars.next() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some(other) => return Err(CompileError::lex(line, format!("unknown escape '\\{}'", other))),
                        None => return Err(CompileError::lex(line, "unterminated char literal")),
                    },
                    Some(c) => c,
                    None => return Err(CompileError::lex(line, "unterminated char literal")),
                };
                if chars.next() != Some('\'') {
                    return Err(CompileError::lex(line, "char literal must contain exactly one character"));
                }
                tokens.push((Token::CharLiteral(c), line, c.to_string()));
            }
            '@' => {
                chars.next();
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        s.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::AddressLiteral(s.clone()), line, format!("@{}", s)));
            }
            '$' => {
                chars.next();
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        s.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::MacroIdent(s.clone()), line, format!("${}", s)));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let token = match ident.as_str() {
                    "contract" => Token::Contract,
                    "token" => Token::TokenKw,
                    "script" => Token::Script,
                    "struct" => Token::Struct,
                    "enum" => Token::Enum,
                    "import" => Token::Import,
                    "global" => Token::Global,
                    "property" => Token::Property,
                    "constructor" => Token::Constructor,
                    "public" => Token::Public,
                    "private" => Token::Private,
                    "internal" => Token::Internal,
                    "trigger" => Token::Trigger,
                    "nft" => Token::Nft,
                    "task" => Token::Task,
                    "local" => Token::Local,
                    "if" => Token::If,
                    "else" => Token::Else,
                    "switch" => Token::Switch,
                    "case" => Token::Case,
                    "default" => Token::Default,
                    "while" => Token::While,
                    "do" => Token::Do,
                    "for" => Token::For,
                    "break" => Token::Break,
                    "continue" => Token::Continue,
                    "return" => Token::Return,
                    "throw" => Token::Throw,
                    "this" => Token::This,
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Identifier(ident.clone()),
                };
                tokens.push((token, line, ident));
            }
            '0'..='9' => {
                let start_line = line;
                let mut raw = String::new();
                if ch == '0' {
                    // peek ahead for hex prefix without consuming on a false match
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.peek() == Some(&'x') || lookahead.peek() == Some(&'X') {
                        chars.next();
                        chars.next();
                        raw.push_str("0x");
                        while let Some(&c) = chars.peek() {
                            if c.is_ascii_hexdigit() {
                                raw.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        tokens.push((Token::HexLiteral(raw.clone()), start_line, raw));
                        continue;
                    }
                }
                let mut int_part = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() {
                        int_part.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek() == Some(&'.') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if matches!(lookahead.peek(), Some(c) if c.is_ascii_digit()) {
                        chars.next();
                        let mut frac = String::new();
                        while let Some(&c) = chars.peek() {
                            if c.is_ascii_digit() {
                                frac.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        let mantissa_str = format!("{}{}", int_part, frac);
                        let mantissa = BigInt::from_str(&mantissa_str)
                            .map_err(|_| CompileError::lex(start_line, format!("invalid decimal literal '{}.{}'", int_part, frac)))?;
                        tokens.push((
                            Token::Decimal { mantissa, fractional_digits: frac.len() as u8 },
                            start_line,
                            format!("{}.{}", int_part, frac),
                        ));
                        continue;
                    }
                }
                let n = BigInt::from_str(&int_part)
                    .map_err(|_| CompileError::lex(start_line, format!("invalid integer literal '{}'", int_part)))?;
                tokens.push((Token::Number(n), start_line, int_part));
            }
            '{' => { chars.next(); tokens.push((Token::BraceOpen, line, "{".into())); }
            '}' => { chars.next(); tokens.push((Token::BraceClose, line, "}".into())); }
            '(' => { chars.next(); tokens.push((Token::ParenOpen, line, "(".into())); }
            ')' => { chars.next(); tokens.push((Token::ParenClose, line, ")".into())); }
            '[' => { chars.next(); tokens.push((Token::BracketOpen, line, "[".into())); }
            ']' => { chars.next(); tokens.push((Token::BracketClose, line, "]".into())); }
            ';' => { chars.next(); tokens.push((Token::Semicolon, line, ";".into())); }
            ',' => { chars.next(); tokens.push((Token::Comma, line, ",".into())); }
            '.' => { chars.next(); tokens.push((Token::Dot, line, ".".into())); }
            ':' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push((Token::ColonEq, line, ":=".into()));
                } else {
                    tokens.push((Token::Colon, line, ":".into()));
                }
            }
            '+' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::PlusEq, line, "+=".into())); }
                else { tokens.push((Token::Plus, line, "+".into())); }
            }
            '-' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::MinusEq, line, "-=".into())); }
                else { tokens.push((Token::Minus, line, "-".into())); }
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::StarEq, line, "*=".into())); }
                else { tokens.push((Token::Star, line, "*".into())); }
            }
            '%' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::PercentEq, line, "%=".into())); }
                else { tokens.push((Token::Percent, line, "%".into())); }
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::EqEq, line, "==".into())); }
                else { tokens.push((Token::Eq, line, "=".into())); }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::NotEq, line, "!=".into())); }
                else { tokens.push((Token::Bang, line, "!".into())); }
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::Le, line, "<=".into())); }
                else if chars.peek() == Some(&'<') { chars.next(); tokens.push((Token::Shl, line, "<<".into())); }
                else { tokens.push((Token::Lt, line, "<".into())); }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') { chars.next(); tokens.push((Token::Ge, line, ">=".into())); }
                else if chars.peek() == Some(&'>') { chars.next(); tokens.push((Token::Shr, line, ">>".into())); }
                else { tokens.push((Token::Gt, line, ">".into())); }
            }
            '&' => {
                chars.next();
                if chars.peek() == Some(&'&') { chars.next(); tokens.push((Token::AndAnd, line, "&&".into())); }
                else { return Err(CompileError::lex(line, "unexpected character '&'")); }
            }
            '|' => {
                chars.next();
                if chars.peek() == Some(&'|') { chars.next(); tokens.push((Token::OrOr, line, "||".into())); }
                else { return Err(CompileError::lex(line, "unexpected character '|'")); }
            }
            other => {
                return Err(CompileError::lex(line, format!("unexpected character '{}'", other)));
            }
        }
    }

    tokens.push((Token::Eof, line, String::new()));
    Ok(tokens)
}
