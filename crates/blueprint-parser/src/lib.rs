//! Blueprint Module File Parser
//!
//! Lexer, error-tolerant parser and lossless syntax tree for Blueprint
//! (`Android.bp`-style) module definition files.
//!
//! This crate provides:
//! - A context-aware lexer that keeps whitespace and comments as trivia
//! - A recursive descent parser that always returns a tree, plus diagnostics
//! - Typed accessors and a visitor over the concrete syntax tree
//! - Resolution hooks for module and variable lookups
//!
//! # Usage
//!
//! ```
//! use blueprint_parser::ast::{AstNode, File};
//! use blueprint_parser::parse;
//!
//! let source = "cc_library {\n    name: \"libfoo\",\n}\n";
//! let parse = parse(source);
//! assert!(parse.errors().is_empty());
//! assert_eq!(parse.tree().text(), source);
//!
//! let file = File::cast(parse.syntax()).unwrap();
//! let module = file.blueprints().next().unwrap();
//! assert_eq!(module.type_name(), Some("cc_library"));
//! assert_eq!(module.module_name().as_deref(), Some("libfoo"));
//! ```

pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod syntax;
pub mod token;

// Re-export main types
pub use config::ParserConfig;
pub use diagnostic::Diagnostic;
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_with_config, Parse, ParseError, ParseErrorKind, Parser};
pub use resolve::{FileScope, ModuleRef, Resolver, VariableRef};
pub use syntax::{NodeKind, SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTree};
pub use token::{Span, Token, TokenKind};
