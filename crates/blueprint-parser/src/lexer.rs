//! Lexer for Blueprint module files.
//!
//! Tokenization happens in two passes. A logos-generated scanner splits the
//! source by character class, then a classification pass looks at the
//! surrounding significant tokens and bracket nesting to decide which of the
//! identifier-shaped kinds each word is. Trivia is kept, so concatenating the
//! text of every token reproduces the input exactly.
//!
//! The lexer never fails: anything it does not recognize becomes one
//! single-character [`TokenKind::Error`] token per character.

use crate::token::{Span, Token, TokenKind};
use logos::Logos;

/// Termination state of a quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminated {
    Yes,
    No,
}

/// Character-class tokens produced by logos before classification.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    #[token("true")]
    #[token("false")]
    Bool,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"-?[0-9]+")]
    Number,

    #[token("\"", lex_quoted)]
    Quoted(Terminated),

    #[token("`", lex_raw)]
    Raw(Terminated),

    #[token("+=")]
    PlusEquals,

    #[token("+")]
    Plus,

    #[token("=")]
    Equals,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,
}

fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    // "/*" already consumed; an unterminated comment runs to end of input
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
    true
}

fn lex_quoted(lex: &mut logos::Lexer<RawToken>) -> Terminated {
    let remainder = lex.remainder();
    let mut chars = remainder.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    if escaped == '\n' {
                        lex.bump(idx + 1);
                        return Terminated::No;
                    }
                }
            }
            '"' => {
                lex.bump(idx + 1);
                return Terminated::Yes;
            }
            '\n' => {
                lex.bump(idx);
                return Terminated::No;
            }
            _ => {}
        }
    }
    lex.bump(remainder.len());
    Terminated::No
}

fn lex_raw(lex: &mut logos::Lexer<RawToken>) -> Terminated {
    let remainder = lex.remainder();
    match remainder.find('`') {
        Some(end) => {
            lex.bump(end + 1);
            Terminated::Yes
        }
        None => {
            lex.bump(remainder.len());
            Terminated::No
        }
    }
}

/// Raw scan result: either a recognized character class or an error byte run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scanned {
    Raw(RawToken),
    Error,
}

impl Scanned {
    fn is_trivia(self) -> bool {
        matches!(
            self,
            Scanned::Raw(RawToken::Whitespace | RawToken::LineComment | RawToken::BlockComment)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Brace,
    Bracket,
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole source. The result always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let scanned = self.scan();
        let mut tokens = classify(self.source, &scanned);

        let end = self.source.len();
        tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(end, end, self.line, self.column),
        ));
        tracing::trace!(tokens = tokens.len(), "tokenized source");
        tokens
    }

    fn scan(&mut self) -> Vec<(Scanned, Span)> {
        let mut raw = RawToken::lexer(self.source);
        let mut out = Vec::new();
        let mut last_end = 0;

        while let Some(result) = raw.next() {
            let range = raw.span();
            if range.start < last_end {
                // Tail of a multi-byte character already reported
                continue;
            }
            if range.start > last_end {
                self.push_errors(last_end, range.start, &mut out);
            }

            match result {
                Ok(token) => {
                    let span = self.span_for(range.start, range.end);
                    out.push((Scanned::Raw(token), span));
                    last_end = range.end;
                }
                Err(()) => {
                    let end = self.char_boundary_after(range.end);
                    self.push_errors(range.start, end, &mut out);
                    last_end = end;
                }
            }
        }

        if last_end < self.source.len() {
            self.push_errors(last_end, self.source.len(), &mut out);
        }
        out
    }

    fn char_boundary_after(&self, mut offset: usize) -> usize {
        while offset < self.source.len() && !self.source.is_char_boundary(offset) {
            offset += 1;
        }
        offset
    }

    /// Emit one `Error` token per character in `start..end`.
    fn push_errors(&mut self, start: usize, end: usize, out: &mut Vec<(Scanned, Span)>) {
        for (offset, c) in self.source[start..end].char_indices() {
            let from = start + offset;
            let span = self.span_for(from, from + c.len_utf8());
            out.push((Scanned::Error, span));
        }
    }

    /// Build a span for `start..end` and advance the line/column cursor past it.
    fn span_for(&mut self, start: usize, end: usize) -> Span {
        let span = Span::new(start, end, self.line, self.column);
        for c in self.source[start..end].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        span
    }
}

/// Tokenize `source` into a lossless token stream.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Turn character-class tokens into grammar terminals.
fn classify(source: &str, scanned: &[(Scanned, Span)]) -> Vec<Token> {
    // Index of the next significant token after each position
    let mut next_significant = vec![None; scanned.len()];
    let mut upcoming = None;
    for idx in (0..scanned.len()).rev() {
        next_significant[idx] = upcoming;
        if !scanned[idx].0.is_trivia() {
            upcoming = Some(scanned[idx].0);
        }
    }

    let mut tokens = Vec::with_capacity(scanned.len() + 1);
    let mut nesting: Vec<Delimiter> = Vec::new();
    let mut previous: Option<Scanned> = None;

    for (idx, &(scan, span)) in scanned.iter().enumerate() {
        let kind = match scan {
            Scanned::Error => TokenKind::Error,
            Scanned::Raw(raw) => match raw {
                RawToken::Whitespace => TokenKind::Whitespace,
                RawToken::LineComment | RawToken::BlockComment => TokenKind::Comment,
                RawToken::Bool => TokenKind::Bool,
                RawToken::Number => TokenKind::Number,
                RawToken::Ident => {
                    classify_identifier(previous, next_significant[idx], nesting.last().copied())
                }
                RawToken::Quoted(Terminated::Yes) => {
                    let in_array = nesting.last() == Some(&Delimiter::Bracket);
                    if in_array && span.slice(source).starts_with("\":") {
                        TokenKind::Link
                    } else {
                        TokenKind::String
                    }
                }
                RawToken::Raw(Terminated::Yes) => TokenKind::String,
                RawToken::Quoted(Terminated::No) | RawToken::Raw(Terminated::No) => {
                    TokenKind::Error
                }
                RawToken::PlusEquals => TokenKind::PlusEquals,
                RawToken::Plus => TokenKind::Plus,
                RawToken::Equals | RawToken::Colon => TokenKind::Equals,
                RawToken::Comma => TokenKind::Separator,
                RawToken::LeftBrace => {
                    nesting.push(Delimiter::Brace);
                    TokenKind::ObjectStart
                }
                RawToken::RightBrace => {
                    pop_delimiter(&mut nesting, Delimiter::Brace);
                    TokenKind::ObjectEnd
                }
                RawToken::LeftBracket => {
                    nesting.push(Delimiter::Bracket);
                    TokenKind::ArrayStart
                }
                RawToken::RightBracket => {
                    pop_delimiter(&mut nesting, Delimiter::Bracket);
                    TokenKind::ArrayEnd
                }
            },
        };

        if !scan.is_trivia() {
            previous = Some(scan);
        }
        tokens.push(Token::new(kind, span));
    }

    tokens
}

/// Pop up to and including the innermost matching delimiter, so a stray
/// closer does not unbalance the rest of the file.
fn pop_delimiter(nesting: &mut Vec<Delimiter>, close: Delimiter) {
    if let Some(pos) = nesting.iter().rposition(|d| *d == close) {
        nesting.truncate(pos);
    }
}

fn classify_identifier(
    previous: Option<Scanned>,
    next: Option<Scanned>,
    innermost: Option<Delimiter>,
) -> TokenKind {
    let assigns = |s: Option<Scanned>| {
        matches!(
            s,
            Some(Scanned::Raw(RawToken::Equals | RawToken::PlusEquals | RawToken::Colon))
        )
    };

    if next == Some(Scanned::Raw(RawToken::LeftBrace)) {
        return TokenKind::BlueprintTypeName;
    }
    if innermost == Some(Delimiter::Bracket) {
        return TokenKind::VariableName;
    }
    if assigns(next) {
        return if innermost.is_none() {
            TokenKind::VariableName
        } else {
            TokenKind::FieldName
        };
    }
    if assigns(previous) || previous == Some(Scanned::Raw(RawToken::Plus)) {
        return TokenKind::VariableValueRef;
    }
    match innermost {
        Some(Delimiter::Brace) => TokenKind::FieldName,
        _ => TokenKind::VariableName,
    }
}

/// Decode the text of a `String` or `Link` token into its value.
///
/// Double-quoted literals have their escapes processed; backquoted
/// literals are taken verbatim.
pub fn unquote(text: &str) -> String {
    if let Some(inner) = text.strip_prefix('`') {
        return inner.strip_suffix('`').unwrap_or(inner).to_string();
    }
    let inner = text.strip_prefix('"').unwrap_or(text);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    unescape_string(inner)
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some('0') => result.push('\0'),
                Some(c) => result.push(c),
                None => break,
            }
        } else {
            result.push(c);
        }
    }

    result
}
