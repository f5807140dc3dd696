//! `bp tree`: dump the concrete syntax tree of one file.

use std::io::Write;
use std::path::Path;

use blueprint_parser::syntax::dump;
use blueprint_parser::{parse_with_config, ParserConfig, SyntaxElement};
use serde::Serialize;

use super::read_source;
use crate::output::Format;

/// One line of the outline. Tokens carry their text; nodes do not.
#[derive(Serialize)]
struct OutlineEntry<'a> {
    depth: usize,
    kind: String,
    start: usize,
    end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

pub fn execute(
    path: &Path,
    config: &ParserConfig,
    format: Format,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let source = read_source(path)?;
    let parse = parse_with_config(&source, config);
    if !parse.errors().is_empty() {
        tracing::warn!(
            file = %path.display(),
            errors = parse.errors().len(),
            "tree contains recovered errors"
        );
    }

    match format {
        Format::Pretty => write!(out, "{}", dump(parse.tree()))?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &outline(parse.syntax()))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Flatten the tree in pre-order. Reference chains can nest thousands of
/// levels, so this walks with an explicit stack.
fn outline(root: blueprint_parser::SyntaxNode<'_>) -> Vec<OutlineEntry<'_>> {
    let mut entries = Vec::new();
    let mut stack = vec![(SyntaxElement::Node(root), 0usize)];

    while let Some((element, depth)) = stack.pop() {
        let span = element.span();
        match element {
            SyntaxElement::Node(node) => {
                entries.push(OutlineEntry {
                    depth,
                    kind: node.kind().to_string(),
                    start: span.start,
                    end: span.end,
                    text: None,
                });
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
            SyntaxElement::Token(token) => entries.push(OutlineEntry {
                depth,
                kind: format!("{:?}", token.kind()),
                start: span.start,
                end: span.end,
                text: Some(token.text()),
            }),
        }
    }
    entries
}
