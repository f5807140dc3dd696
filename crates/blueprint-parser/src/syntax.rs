//! Concrete syntax tree storage.
//!
//! A [`SyntaxTree`] owns the source text, the full token stream and an arena
//! of nodes. Every token, trivia included, is a child of exactly one node, so
//! the tree reproduces the input byte for byte. Trees are immutable once
//! built; [`SyntaxNode`] is a cheap borrowed cursor into one.

use crate::token::{Span, Token, TokenKind};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Non-terminal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    File,
    Blueprint,
    BlueprintType,
    Variable,
    Members,
    Pair,
    FieldName,
    Object,
    Value,
    StringExpr,
    ArrayExpr,
    Array,
    Elements,
    ArrayElement,
    VariableRefExpr,
    /// Tokens skipped during recovery
    Error,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Index of a token in its tree's token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

/// Narrow an arena position to a `u32` handle.
///
/// Token and node counts are bounded by the source length, so a source under
/// 4 GiB always fits.
#[inline]
fn arena_index(n: usize) -> u32 {
    debug_assert!(u32::try_from(n).is_ok(), "syntax tree arena overflow at {n}");
    n as u32
}

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<ElementId>,
    span: Span,
}

/// An immutable concrete syntax tree for one source text.
///
/// Nodes and tokens are addressed by `u32` handles, which limits a tree to
/// sources under 4 GiB.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    source: Arc<str>,
    tokens: Vec<Token>,
    token_parents: Vec<NodeId>,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// The root `File` node.
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All tokens in source order, ending with `Eof`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    pub fn token(&self, id: TokenId) -> SyntaxToken<'_> {
        SyntaxToken { tree: self, id }
    }

    /// Rebuild the source from the token stream.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text(&self.source))
            .collect()
    }

    /// The innermost token covering `offset`, if any.
    pub fn token_at_offset(&self, offset: usize) -> Option<SyntaxToken<'_>> {
        let idx = self
            .tokens
            .partition_point(|t| t.span.end <= offset);
        self.tokens
            .get(idx)
            .filter(|t| t.span.contains(offset))
            .map(|_| self.token(TokenId(arena_index(idx))))
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.root())
    }
}

/// A borrowed handle to a node.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

/// A borrowed handle to a token.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'t> {
    tree: &'t SyntaxTree,
    id: TokenId,
}

/// A borrowed child: node or token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyntaxElement<'t> {
    Node(SyntaxNode<'t>),
    Token(SyntaxToken<'t>),
}

impl<'t> SyntaxElement<'t> {
    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(n) => n.span(),
            SyntaxElement::Token(t) => t.span(),
        }
    }

    pub fn as_node(&self) -> Option<SyntaxNode<'t>> {
        match self {
            SyntaxElement::Node(n) => Some(*n),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<SyntaxToken<'t>> {
        match self {
            SyntaxElement::Token(t) => Some(*t),
            SyntaxElement::Node(_) => None,
        }
    }
}

impl<'t> SyntaxNode<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.data(self.id).kind
    }

    /// Span covering every token owned by this node, trivia included.
    pub fn span(&self) -> Span {
        self.tree.data(self.id).span
    }

    pub fn text(&self) -> &'t str {
        self.span().slice(self.tree.source())
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.tree
            .data(self.id)
            .parent
            .map(|id| SyntaxNode { tree: self.tree, id })
    }

    /// Ancestors, starting with the parent.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// Ordered children, nodes and tokens interleaved.
    pub fn children(&self) -> impl Iterator<Item = SyntaxElement<'t>> + 't {
        let tree = self.tree;
        tree.data(self.id).children.iter().map(move |child| match *child {
            ElementId::Node(id) => SyntaxElement::Node(SyntaxNode { tree, id }),
            ElementId::Token(id) => SyntaxElement::Token(SyntaxToken { tree, id }),
        })
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.children().filter_map(|c| c.as_node())
    }

    pub fn child_tokens(&self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        self.children().filter_map(|c| c.as_token())
    }

    /// Significant (non-trivia) child tokens.
    pub fn significant_tokens(&self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        self.child_tokens().filter(|t| !t.kind().is_trivia())
    }

    pub fn first_child_of(&self, kind: NodeKind) -> Option<SyntaxNode<'t>> {
        self.child_nodes().find(|n| n.kind() == kind)
    }

    pub fn first_token_of(&self, kind: TokenKind) -> Option<SyntaxToken<'t>> {
        self.child_tokens().find(|t| t.kind() == kind)
    }

    /// Pre-order traversal of this node and all nodes below it.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let mut stack = vec![*self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let children: Vec<_> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev());
            Some(node)
        })
    }

    /// Every token below this node in source order.
    pub fn descendant_tokens(&self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        let mut tokens: Vec<SyntaxToken<'t>> = self
            .descendants()
            .flat_map(|n| n.child_tokens().collect::<Vec<_>>())
            .collect();
        tokens.sort_by_key(|t| t.id);
        tokens.into_iter()
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxToken<'_> {}

impl<'t> SyntaxToken<'t> {
    pub fn id(&self) -> TokenId {
        self.id
    }

    fn raw(&self) -> &'t Token {
        &self.tree.tokens[self.id.index()]
    }

    pub fn kind(&self) -> TokenKind {
        self.raw().kind
    }

    pub fn span(&self) -> Span {
        self.raw().span
    }

    pub fn text(&self) -> &'t str {
        self.raw().text(self.tree.source())
    }

    /// The node that owns this token.
    pub fn parent(&self) -> SyntaxNode<'t> {
        SyntaxNode {
            tree: self.tree,
            id: self.tree.token_parents[self.id.index()],
        }
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.kind(), self.span().start, self.span().end)
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{} {:?}", self.kind(), self.span().start, self.span().end, self.text())
    }
}

/// Render the tree as an indented outline, one element per line.
pub fn dump(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    let mut stack = vec![(SyntaxElement::Node(tree.root()), 0usize)];
    while let Some((element, depth)) = stack.pop() {
        out.push_str(&"  ".repeat(depth));
        match element {
            SyntaxElement::Node(node) => {
                out.push_str(&format!("{:?}\n", node));
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
            SyntaxElement::Token(token) => out.push_str(&format!("{:?}\n", token)),
        }
    }
    out
}

/// Incremental builder used by the parser.
///
/// Nodes are opened and closed in stack order; tokens are attached to the
/// innermost open node.
pub(crate) struct TreeBuilder {
    source: Arc<str>,
    tokens: Vec<Token>,
    token_parents: Vec<Option<NodeId>>,
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
    attached: usize,
}

impl TreeBuilder {
    pub(crate) fn new(source: Arc<str>, tokens: Vec<Token>) -> Self {
        let token_count = tokens.len();
        Self {
            source,
            tokens,
            token_parents: vec![None; token_count],
            nodes: Vec::new(),
            open: Vec::new(),
            attached: 0,
        }
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn start_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(arena_index(self.nodes.len()));
        let parent = self.open.last().copied();
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
            span: Span::new(0, 0, 0, 0),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(ElementId::Node(id));
        }
        self.open.push(id);
        id
    }

    pub(crate) fn token(&mut self, index: usize) {
        let parent = self.current_parent();
        self.nodes[parent.index()]
            .children
            .push(ElementId::Token(TokenId(arena_index(index))));
        self.token_parents[index] = Some(parent);
        self.attached = self.attached.max(index + 1);
    }

    /// Innermost open node; the root once everything else is closed.
    fn current_parent(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId(0))
    }

    pub(crate) fn finish_node(&mut self) {
        if let Some(id) = self.open.pop() {
            let span = self.compute_span(id);
            self.nodes[id.index()].span = span;
        }
    }

    fn compute_span(&self, id: NodeId) -> Span {
        let first = self.nodes[id.index()].children.first().map(|c| self.element_span(*c));
        let last = self.nodes[id.index()].children.last().map(|c| self.element_span(*c));
        match (first, last) {
            (Some(first), Some(last)) => first.merge(&last),
            _ => {
                // Empty node: zero width at the next token
                let at = self.next_token_span();
                Span::new(at.start, at.start, at.line, at.column)
            }
        }
    }

    fn element_span(&self, element: ElementId) -> Span {
        match element {
            ElementId::Node(n) => self.nodes[n.index()].span,
            ElementId::Token(t) => self.tokens[t.index()].span,
        }
    }

    fn next_token_span(&self) -> Span {
        self.tokens
            .get(self.attached)
            .or(self.tokens.last())
            .map(|t| t.span)
            .unwrap_or(Span::new(0, 0, 1, 1))
    }

    pub(crate) fn finish(mut self) -> SyntaxTree {
        while !self.open.is_empty() {
            self.finish_node();
        }
        let root = NodeId(0);
        let token_parents = self
            .token_parents
            .into_iter()
            .map(|p| p.unwrap_or(root))
            .collect();
        SyntaxTree {
            source: self.source,
            tokens: self.tokens,
            token_parents,
            nodes: self.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_every_token_has_one_parent() {
        let parse = parse("// head\nfoo { a = 1 }\n");
        let tree = parse.tree();
        let owned: usize = tree
            .root()
            .descendants()
            .map(|n| n.child_tokens().count())
            .sum();
        assert_eq!(owned, tree.tokens().len());
    }

    #[test]
    fn test_arena_index_keeps_u32_positions() {
        assert_eq!(arena_index(0), 0);
        assert_eq!(arena_index(u32::MAX as usize), u32::MAX);
    }

    #[cfg(all(debug_assertions, target_pointer_width = "64"))]
    #[test]
    #[should_panic(expected = "arena overflow")]
    fn test_arena_index_overflow_is_caught() {
        arena_index(u32::MAX as usize + 1);
    }

    #[test]
    fn test_leading_trivia_stays_with_parent() {
        let parse = parse("  foo {}");
        let root = parse.syntax();
        let first = root.children().next().and_then(|c| c.as_token()).unwrap();
        assert_eq!(first.kind(), TokenKind::Whitespace);
        let blueprint = root.first_child_of(NodeKind::Blueprint).unwrap();
        assert_eq!(blueprint.text(), "foo {}");
        assert_eq!(blueprint.span().column, 3);
    }

    #[test]
    fn test_token_at_offset() {
        let parse = parse("x = 10");
        let token = parse.tree().token_at_offset(5).unwrap();
        assert_eq!(token.kind(), TokenKind::Number);
        assert_eq!(token.text(), "10");
        assert_eq!(token.parent().kind(), NodeKind::Value);
        assert!(parse.tree().token_at_offset(60).is_none());
    }

    #[test]
    fn test_dump_outline() {
        let parse = parse("x = 1");
        let outline = dump(parse.tree());
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines[0], "File@0..5");
        assert_eq!(lines[1], "  Variable@0..5");
        assert!(lines[2].starts_with("    VariableName@0..1"));
    }
}
