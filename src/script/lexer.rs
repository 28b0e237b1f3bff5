//! Lexer for the shell command language
//!
//! Turns source text into a flat token stream. Newlines separate
//! statements, but only at delimiter depth zero: inside `()`, `[]`, or
//! `{}` a line break is ordinary whitespace, which is what lets multi-line
//! input read naturally once the loop has collected a complete unit.

use std::iter::Peekable;
use std::str::Chars;

use super::error::{ScriptError, ScriptResult};

/// A single token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Number literal
    Number(f64),
    /// String literal (escapes already resolved)
    Str(String),
    /// Identifier
    Ident(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `var`
    Var,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,

    /// Statement separator (depth-zero line break)
    Newline,
}

impl Token {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Str(_) => "string literal".to_string(),
            Token::Ident(name) => format!("'{}'", name),
            Token::Newline => "end of line".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::Var => "var",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Eq => "=",
            Token::EqEq => "==",
            Token::BangEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Bang => "!",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Dot => ".",
            _ => "",
        }
    }
}

/// Tokenize source text
pub fn tokenize(source: &str) -> ScriptResult<Vec<Token>> {
    let mut chars = source.chars().peekable();
    let mut tokens = Vec::new();
    // Delimiter depth; newlines inside a group are not separators
    let mut depth: usize = 0;

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\r' => {}
            '\n' => {
                if depth == 0 {
                    tokens.push(Token::Newline);
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' => tokens.push(Token::Str(lex_string(&mut chars)?)),
            '0'..='9' => tokens.push(lex_number(c, &mut chars)?),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                name.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match name.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    "var" => Token::Var,
                    _ => Token::Ident(name),
                });
            }
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' => tokens.push(Token::Star),
            '/' => tokens.push(Token::Slash),
            '%' => tokens.push(Token::Percent),
            '=' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::EqEq);
                } else {
                    tokens.push(Token::Eq);
                }
            }
            '!' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::BangEq);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '<' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::LtEq);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::GtEq);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '&' => {
                if chars.peek() == Some(&'&') {
                    chars.next();
                    tokens.push(Token::AndAnd);
                } else {
                    return Err(ScriptError::Syntax("expected '&&'".to_string()));
                }
            }
            '|' => {
                if chars.peek() == Some(&'|') {
                    chars.next();
                    tokens.push(Token::OrOr);
                } else {
                    return Err(ScriptError::Syntax("expected '||'".to_string()));
                }
            }
            '(' => {
                depth += 1;
                tokens.push(Token::LParen);
            }
            '[' => {
                depth += 1;
                tokens.push(Token::LBracket);
            }
            '{' => {
                depth += 1;
                tokens.push(Token::LBrace);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                tokens.push(Token::RParen);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                tokens.push(Token::RBracket);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                tokens.push(Token::RBrace);
            }
            ',' => tokens.push(Token::Comma),
            ':' => tokens.push(Token::Colon),
            ';' => tokens.push(Token::Semicolon),
            '.' => tokens.push(Token::Dot),
            other => {
                return Err(ScriptError::Syntax(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        }
    }

    Ok(tokens)
}

fn lex_string(chars: &mut Peekable<Chars<'_>>) -> ScriptResult<String> {
    let mut text = String::new();

    loop {
        match chars.next() {
            Some('"') => return Ok(text),
            Some('\\') => match chars.next() {
                Some('"') => text.push('"'),
                Some('\\') => text.push('\\'),
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some(other) => {
                    return Err(ScriptError::Syntax(format!(
                        "unknown escape '\\{}'",
                        other
                    )))
                }
                None => return Err(ScriptError::Syntax("unterminated string".to_string())),
            },
            Some('\n') | None => {
                return Err(ScriptError::Syntax("unterminated string".to_string()))
            }
            Some(other) => text.push(other),
        }
    }
}

fn lex_number(
    first: char,
    chars: &mut Peekable<Chars<'_>>,
) -> ScriptResult<Token> {
    let mut text = String::new();
    text.push(first);

    while let Some(&next) = chars.peek() {
        if next.is_ascii_digit() {
            text.push(next);
            chars.next();
        } else {
            break;
        }
    }

    if chars.peek() == Some(&'.') {
        // Only consume the dot when a digit follows; `1.foo` stays a
        // member access on the number
        let mut lookahead = chars.clone();
        lookahead.next();
        if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            chars.next();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_digit() {
                    text.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }

    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| ScriptError::Syntax(format!("bad number literal '{}'", text)))
}
