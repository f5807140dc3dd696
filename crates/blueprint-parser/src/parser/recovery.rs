//! Error recovery strategies for the parser.
//!
//! When a rule meets a token it cannot use, it reports one diagnostic and
//! calls one of these functions to skip ahead to a point where parsing can
//! resume. Skipped tokens are wrapped in an `Error` node so the tree still
//! covers the whole input. Brackets opened inside the skipped run are skipped
//! as a unit, so a terminator nested inside them never ends recovery early.

use super::guards::LoopGuard;
use super::values::VALUE_START;
use super::Parser;
use crate::syntax::{NodeId, NodeKind};
use crate::token::TokenKind;

/// Skip tokens until `stop` holds at bracket depth zero, or end of file.
///
/// Returns true when at least one token was skipped.
pub fn skip_until(parser: &mut Parser, rule: &'static str, stop: impl Fn(&Parser) -> bool) -> bool {
    if parser.at_eof() || stop(parser) {
        return false;
    }

    parser.start_node(NodeKind::Error);
    let mut guard = LoopGuard::new(rule, parser);
    let mut nesting = 0usize;
    let mut skipped = 0usize;

    loop {
        if parser.at_eof() {
            break;
        }
        if nesting == 0 && stop(parser) {
            break;
        }
        if guard.check(parser.current_span()).is_err() {
            break;
        }

        match parser.current() {
            TokenKind::ObjectStart | TokenKind::ArrayStart => nesting += 1,
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => nesting = nesting.saturating_sub(1),
            _ => {}
        }
        parser.bump();
        skipped += 1;
    }

    parser.finish_node();
    tracing::trace!(rule, skipped, "recovered");
    true
}

/// Pair recovery: stop before `,`, `}`, or a whitespace-separated pair start.
pub fn recover_pair(parser: &mut Parser) -> bool {
    skip_until(parser, "pair_recovery", |p| {
        p.at_any(&[TokenKind::Separator, TokenKind::ObjectEnd])
            || (p.preceded_by_whitespace() && at_pair_start(p))
    })
}

/// Members recovery: stop before `}` or where a new pair can start.
pub fn recover_members(parser: &mut Parser) -> bool {
    skip_until(parser, "members_recovery", |p| {
        p.at(TokenKind::ObjectEnd) || at_pair_start(p)
    })
}

/// Elements recovery: stop before `]`. A stray `}` also ends the array so the
/// enclosing object can close.
pub fn recover_elements(parser: &mut Parser) -> bool {
    skip_until(parser, "elements_recovery", |p| {
        p.at_any(&[TokenKind::ArrayEnd, TokenKind::ObjectEnd])
    })
}

/// File-level recovery: stop where a module or variable definition starts.
pub fn recover_item(parser: &mut Parser) -> bool {
    skip_until(parser, "item_recovery", |p| {
        p.at_any(&[TokenKind::BlueprintTypeName, TokenKind::VariableName])
    })
}

/// Swallow the bracketed construct starting at the current token, through
/// its matching close bracket, into an `Error` node.
pub fn skip_balanced(parser: &mut Parser) -> NodeId {
    let node = parser.start_node(NodeKind::Error);
    bump_balanced(parser);
    parser.finish_node();
    node
}

/// Swallow the rest of a reference chain, from the reference at the cursor
/// through its last `+` operand, into an `Error` node.
pub fn skip_reference_chain(parser: &mut Parser) -> NodeId {
    let node = parser.start_node(NodeKind::Error);
    let mut guard = LoopGuard::new("chain_recovery", parser);

    while !parser.at_eof() {
        if guard.check(parser.current_span()).is_err() {
            break;
        }
        bump_balanced(parser);
        if !parser.at(TokenKind::Plus) || !VALUE_START.contains(&parser.nth(1)) {
            break;
        }
        parser.bump();
    }

    parser.finish_node();
    node
}

/// Consume one token, or a whole bracketed group when it opens one.
fn bump_balanced(parser: &mut Parser) {
    let mut guard = LoopGuard::new("nesting_recovery", parser);
    let mut nesting = 0usize;

    while !parser.at_eof() {
        if guard.check(parser.current_span()).is_err() {
            break;
        }
        match parser.current() {
            TokenKind::ObjectStart | TokenKind::ArrayStart => nesting += 1,
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => nesting = nesting.saturating_sub(1),
            _ => {}
        }
        parser.bump();
        if nesting == 0 {
            break;
        }
    }
}

/// A field name directly followed by `=` (or `:`).
pub fn at_pair_start(parser: &Parser) -> bool {
    parser.at(TokenKind::FieldName) && parser.nth(1) == TokenKind::Equals
}
