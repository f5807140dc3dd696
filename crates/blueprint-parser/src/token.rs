//! Token definitions for Blueprint module files.
//!
//! This module defines the closed set of terminals that can appear in a
//! Blueprint file, including the trivia kinds (whitespace and comments) that
//! the concrete syntax tree keeps for lossless reconstruction.

use serde::Serialize;
use std::fmt;

/// The kind of a token in a Blueprint file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Delimiters
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,

    // Operators
    Plus,
    PlusEquals,
    Separator,
    Equals,

    // Trivia
    Comment,
    Whitespace,

    // Literals
    Number,
    String,
    Bool,

    // Identifier-shaped
    BlueprintTypeName,
    VariableName,
    VariableValueRef,
    Link,
    FieldName,

    // Special
    Eof,
    Error,
}

impl TokenKind {
    /// Returns true for tokens without grammatical significance.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Whitespace)
    }

    /// Human readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::ObjectStart => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::ArrayStart => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::Plus => "'+'",
            TokenKind::PlusEquals => "'+='",
            TokenKind::Separator => "','",
            TokenKind::Equals => "'='",
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Bool => "boolean",
            TokenKind::BlueprintTypeName => "module type",
            TokenKind::VariableName => "variable name",
            TokenKind::VariableValueRef => "variable reference",
            TokenKind::Link => "module link",
            TokenKind::FieldName => "field name",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Source location information for a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Smallest span covering both spans. Line and column come from whichever
    /// span starts first.
    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if other.start < self.start {
            (other.line, other.column)
        } else {
            (self.line, self.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

/// A single terminal with its provenance in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The exact source text covered by this token.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}
