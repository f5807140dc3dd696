//! Parse error types and error reporting

use crate::token::{Span, TokenKind};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A recoverable syntax diagnostic with its source location.
///
/// Parse errors never abort a parse; they are collected alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ParseErrorKind {
    /// Unexpected token found
    #[error("expected {}, found {found}", describe_expected(.expected))]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        found: TokenKind,
    },

    /// Unexpected end of file
    #[error("unexpected end of file, expected {}", describe_expected(.expected))]
    UnexpectedEof { expected: Vec<TokenKind> },

    /// A pair or variable has an operator but no value after it
    #[error("expected a value")]
    MissingValue,

    /// Character the lexer could not place in any token
    #[error("unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char },

    /// String literal without its closing quote
    #[error("unterminated string literal")]
    UnterminatedString,

    /// Nested objects or arrays went past the configured depth
    #[error("nesting too deep (limit is {limit})")]
    NestingTooDeep { limit: usize },

    /// Parser loop made no progress or hit its iteration cap
    #[error("parser stuck in {rule}")]
    ParserStuck { rule: &'static str },
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "something else".to_string(),
        [one] => one.describe().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|k| k.describe()).collect();
            format!("{} or {}", head.join(", "), last.describe())
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.line, self.span.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// Create an error whose message is the kind's display text.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    /// Create an "unexpected token" error, or an "unexpected EOF" one when
    /// `found` is the end of input.
    pub fn unexpected(expected: Vec<TokenKind>, found: TokenKind, span: Span) -> Self {
        if found == TokenKind::Eof {
            Self::new(ParseErrorKind::UnexpectedEof { expected }, span)
        } else {
            Self::new(ParseErrorKind::UnexpectedToken { expected, found }, span)
        }
    }

    /// Create a "missing value" error.
    pub fn missing_value(span: Span) -> Self {
        Self::new(ParseErrorKind::MissingValue, span)
    }

    /// Create a "nesting too deep" error.
    pub fn nesting_too_deep(limit: usize, span: Span) -> Self {
        Self::new(ParseErrorKind::NestingTooDeep { limit }, span)
    }

    /// Create a "parser stuck" error.
    pub fn parser_stuck(rule: &'static str, span: Span) -> Self {
        Self::new(ParseErrorKind::ParserStuck { rule }, span)
    }

    /// Diagnostic for a lexical `Error` token with the given text.
    pub fn lexical(text: &str, span: Span) -> Self {
        if text.starts_with('"') || text.starts_with('`') {
            Self::new(ParseErrorKind::UnterminatedString, span)
        } else {
            let ch = text.chars().next().unwrap_or('\0');
            Self::new(ParseErrorKind::UnexpectedCharacter { ch }, span)
        }
    }
}
