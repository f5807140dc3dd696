//! `bp tokens`: dump the classified token stream of one file.

use std::io::Write;
use std::path::Path;

use blueprint_parser::{tokenize, Span, TokenKind};
use serde::Serialize;

use super::read_source;
use crate::output::Format;

#[derive(Serialize)]
struct TokenEntry<'a> {
    kind: TokenKind,
    span: Span,
    text: &'a str,
}

pub fn execute(path: &Path, format: Format, out: &mut dyn Write) -> anyhow::Result<()> {
    let source = read_source(path)?;
    let tokens = tokenize(&source);

    match format {
        Format::Pretty => {
            for token in &tokens {
                writeln!(
                    out,
                    "{}:{}\t{:?}\t{:?}",
                    token.span.line,
                    token.span.column,
                    token.kind,
                    token.text(&source)
                )?;
            }
        }
        Format::Json => {
            let entries: Vec<_> = tokens
                .iter()
                .map(|token| TokenEntry {
                    kind: token.kind,
                    span: token.span,
                    text: token.text(&source),
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
