use std::fmt;

use winnow::combinator::{alt, delimited, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

use crate::{CompareOp, Value};

use super::LexError;

/// A lexical token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(Value),
    And,
    Or,
    Op(CompareOp),
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Str(s) => write!(f, "string '{s}'"),
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::And => write!(f, "'AND'"),
            TokenKind::Or => write!(f, "'OR'"),
            TokenKind::Op(op) => write!(f, "operator '{op}'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
        }
    }
}

// -- Token classes ----------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

fn quoted<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('\'', take_till(0.., '\''), '\'').parse_next(input)
}

fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .parse_next(input)
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        ">=".value(CompareOp::Gte),
        "<=".value(CompareOp::Lte),
        "!=".value(CompareOp::Neq),
        "==".value(CompareOp::Eq),
        ">".value(CompareOp::Gt),
        "<".value(CompareOp::Lt),
        "=".value(CompareOp::Eq),
    ))
    .parse_next(input)
}

fn number_value(text: &str) -> Result<Value, std::num::ParseFloatError> {
    if !text.contains('.') {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Int(i));
        }
    }
    // Integers too wide for i64 fall back to floats.
    text.parse::<f64>().map(Value::Float)
}

fn word(text: &str) -> TokenKind {
    if text.eq_ignore_ascii_case("and") {
        TokenKind::And
    } else if text.eq_ignore_ascii_case("or") {
        TokenKind::Or
    } else {
        TokenKind::Ident(text.to_owned())
    }
}

fn token_kind(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        '('.value(TokenKind::LParen),
        ')'.value(TokenKind::RParen),
        compare_op.map(TokenKind::Op),
        quoted.map(|s: &str| TokenKind::Str(s.to_owned())),
        number.try_map(number_value).map(TokenKind::Number),
        ident.map(word),
    ))
    .parse_next(input)
}

// -- Driver -----------------------------------------------------------------

/// Split rule text into tokens. Whitespace only separates tokens.
///
/// # Errors
///
/// Returns [`LexError`] on an unterminated `'...'` literal or a character that
/// starts no token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut input = source;
    let mut tokens = Vec::new();
    loop {
        input = input.trim_start();
        let offset = source.len() - input.len();
        let Some(ch) = input.chars().next() else {
            return Ok(tokens);
        };
        match token_kind.parse_next(&mut input) {
            Ok(kind) => tokens.push(Token { kind, offset }),
            Err(_) if ch == '\'' => return Err(LexError::UnterminatedString { offset }),
            Err(_) => return Err(LexError::UnexpectedChar { ch, offset }),
        }
    }
}
