//! Parser for Blueprint module files
//!
//! This module implements an error-tolerant recursive descent parser that
//! turns the token stream from the lexer into a lossless concrete syntax
//! tree. Parsing never fails: malformed input produces `Error` nodes and a
//! list of [`ParseError`] diagnostics alongside a complete tree.

pub mod error;
pub mod guards;
pub mod items;
pub mod members;
pub mod recovery;
pub mod values;

use crate::config::ParserConfig;
use crate::lexer::Lexer;
use crate::syntax::{NodeId, NodeKind, SyntaxNode, SyntaxTree, TreeBuilder};
use crate::token::{Span, TokenKind};
use std::sync::Arc;

pub use error::{ParseError, ParseErrorKind};

/// Outcome of a single grammar rule.
///
/// A rule either did not apply at all (nothing was consumed), or it built a
/// node, possibly with diagnostics and recovered input inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    Complete(NodeId),
    Partial(NodeId),
    NoMatch,
}

impl Parsed {
    pub fn is_match(self) -> bool {
        !matches!(self, Parsed::NoMatch)
    }

    pub fn is_complete(self) -> bool {
        matches!(self, Parsed::Complete(_))
    }

    pub fn node(self) -> Option<NodeId> {
        match self {
            Parsed::Complete(id) | Parsed::Partial(id) => Some(id),
            Parsed::NoMatch => None,
        }
    }

    /// `Complete` when `ok` holds, `Partial` otherwise.
    pub(crate) fn from_node(id: NodeId, ok: bool) -> Self {
        if ok {
            Parsed::Complete(id)
        } else {
            Parsed::Partial(id)
        }
    }
}

/// The result of parsing one file: a full tree plus every diagnostic.
#[derive(Debug, Clone)]
pub struct Parse {
    tree: SyntaxTree,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The root `File` node.
    pub fn syntax(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// True when the input parsed without any diagnostic.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a Blueprint file with the default configuration.
pub fn parse(source: &str) -> Parse {
    Parser::new(source).parse()
}

/// Parse a Blueprint file with explicit limits.
pub fn parse_with_config(source: &str, config: &ParserConfig) -> Parse {
    Parser::with_config(source, config.clone()).parse()
}

/// Parser state for Blueprint files.
///
/// Trivia never reaches the grammar rules: `current` and `nth` look only at
/// significant tokens, and skipped whitespace and comments are attached to
/// whichever node is open when the next significant token is consumed.
pub struct Parser {
    builder: TreeBuilder,

    /// First token not yet attached to the tree
    pos: usize,

    /// Index of the next significant token (never before `pos`)
    cursor: usize,

    /// Span of the last significant token consumed
    prev: Option<Span>,

    /// Current object/array nesting
    pub(crate) depth: usize,

    config: ParserConfig,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a new parser from source code.
    pub fn new(source: &str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &str, config: ParserConfig) -> Self {
        let source: Arc<str> = Arc::from(source);
        let tokens = Lexer::new(&source).tokenize();
        let builder = TreeBuilder::new(source, tokens);
        let mut parser = Self {
            builder,
            pos: 0,
            cursor: 0,
            prev: None,
            depth: 0,
            config,
            errors: Vec::new(),
        };
        parser.cursor = parser.next_significant(0);
        parser
    }

    /// Parse the whole input into a `File` tree.
    pub fn parse(mut self) -> Parse {
        tracing::debug!(
            tokens = self.builder.tokens().len(),
            max_depth = self.config.max_depth,
            "parsing blueprint file"
        );

        self.builder.start_node(NodeKind::File);
        items::parse_file(&mut self);

        // A tripped loop guard can end the file rule early
        if !self.at_eof() {
            self.start_node(NodeKind::Error);
            while !self.at_eof() {
                self.bump();
            }
            self.finish_node();
        }

        // Remaining trivia and the end-of-file marker belong to the file
        self.flush_trivia();
        if self.cursor < self.builder.tokens().len() {
            self.builder.token(self.cursor);
        }
        self.builder.finish_node();

        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "parse finished with diagnostics");
        }

        Parse {
            tree: self.builder.finish(),
            errors: self.errors,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    fn next_significant(&self, from: usize) -> usize {
        let tokens = self.builder.tokens();
        let mut i = from;
        while i + 1 < tokens.len() && tokens[i].kind.is_trivia() {
            i += 1;
        }
        i
    }

    /// Kind of the current significant token.
    #[inline]
    pub fn current(&self) -> TokenKind {
        self.builder.tokens()[self.cursor].kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.builder.tokens()[self.cursor].span
    }

    /// Span of the last consumed significant token, or the current one when
    /// nothing has been consumed yet.
    pub fn prev_span(&self) -> Span {
        self.prev.unwrap_or_else(|| self.current_span())
    }

    pub fn current_text(&self) -> &str {
        self.builder.tokens()[self.cursor].text(self.builder.source())
    }

    /// Kind of the significant token `n` positions ahead; `Eof` past the end.
    pub fn nth(&self, n: usize) -> TokenKind {
        let mut i = self.cursor;
        for _ in 0..n {
            if i + 1 >= self.builder.tokens().len() {
                return TokenKind::Eof;
            }
            i = self.next_significant(i + 1);
        }
        self.builder.tokens()[i].kind
    }

    #[inline]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current())
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Token index of the current significant token. Used to detect loops that
    /// make no progress.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// True when trivia containing whitespace sits before the current token.
    pub fn preceded_by_whitespace(&self) -> bool {
        self.builder.tokens()[self.pos..self.cursor]
            .iter()
            .any(|t| t.kind == TokenKind::Whitespace)
    }

    /// Attach pending trivia to the open node.
    fn flush_trivia(&mut self) {
        for i in self.pos..self.cursor {
            self.builder.token(i);
        }
        self.pos = self.cursor;
    }

    /// Attach the current token, and any trivia before it, to the open node.
    /// The end-of-file marker is never consumed.
    pub fn bump(&mut self) {
        if self.at_eof() {
            return;
        }
        self.flush_trivia();
        self.builder.token(self.cursor);
        self.prev = Some(self.current_span());
        self.pos = self.cursor + 1;
        self.cursor = self.next_significant(self.pos);
    }

    /// Consume the current token if it matches the expected kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the expected token, or record a diagnostic and consume nothing.
    pub fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_at_current(&[kind]);
            false
        }
    }

    // ========================================================================
    // Tree Building
    // ========================================================================

    /// Open a node. Trivia before it stays with the enclosing node.
    pub fn start_node(&mut self, kind: NodeKind) -> NodeId {
        self.flush_trivia();
        self.builder.start_node(kind)
    }

    pub fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Record a parse error. A second diagnostic starting at the same offset
    /// as the previous one is dropped.
    pub fn error(&mut self, err: ParseError) {
        if self
            .errors
            .last()
            .is_some_and(|last| last.span.start == err.span.start)
        {
            return;
        }
        tracing::trace!(line = err.span.line, column = err.span.column, message = %err.message, "syntax error");
        self.errors.push(err);
    }

    /// Report the current token as unexpected. Lexical error tokens get their
    /// own, more precise, diagnostic.
    pub fn error_at_current(&mut self, expected: &[TokenKind]) {
        let span = self.current_span();
        let err = if self.at(TokenKind::Error) {
            ParseError::lexical(self.current_text(), span)
        } else {
            ParseError::unexpected(expected.to_vec(), self.current(), span)
        };
        self.error(err);
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}
