//! Value parsing: literals, concatenations, arrays and variable references

use super::guards::{DepthGuard, LoopGuard};
use super::members::{parse_object, too_deep};
use super::{recovery, ParseError, Parsed, Parser};
use crate::syntax::NodeKind;
use crate::token::{Span, TokenKind};

/// Tokens that can begin a value.
pub const VALUE_START: &[TokenKind] = &[
    TokenKind::String,
    TokenKind::ArrayStart,
    TokenKind::ObjectStart,
    TokenKind::Bool,
    TokenKind::Number,
    TokenKind::VariableValueRef,
];

/// Tokens allowed as array elements.
pub const ELEMENT_KINDS: &[TokenKind] = &[
    TokenKind::String,
    TokenKind::Bool,
    TokenKind::Number,
    TokenKind::VariableName,
    TokenKind::Link,
];

/// Parse one `Value`. Consumes nothing and returns `NoMatch` when the current
/// token cannot start a value.
pub fn parse_value(parser: &mut Parser) -> Parsed {
    let kind = parser.current();
    if !VALUE_START.contains(&kind) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::Value);
    let inner = match kind {
        TokenKind::String => parse_string_expr(parser),
        TokenKind::ArrayStart => parse_array_expr(parser),
        TokenKind::ObjectStart => parse_object(parser),
        TokenKind::VariableValueRef => parse_variable_ref_expr(parser),
        _ => {
            // Bool or Number
            parser.bump();
            Parsed::Complete(node)
        }
    };
    parser.finish_node();
    Parsed::from_node(node, inner.is_complete())
}

/// Record a missing value for the construct that started at `start`.
///
/// The diagnostic covers the name and operator already consumed, unless the
/// current token is a lexical error, which is reported on its own.
pub fn report_missing_value(parser: &mut Parser, start: Span) {
    if parser.at(TokenKind::Error) {
        parser.error_at_current(VALUE_START);
    } else {
        let span = start.merge(&parser.prev_span());
        parser.error(ParseError::missing_value(span));
    }
}

/// Parse `String (Plus String)*`.
pub fn parse_string_expr(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::String) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::StringExpr);
    parser.bump();
    let mut guard = LoopGuard::new("string_expr", parser);
    while parser.at(TokenKind::Plus) && parser.nth(1) == TokenKind::String {
        if let Err(err) = guard.check(parser.current_span()) {
            parser.error(err);
            break;
        }
        parser.bump();
        parser.bump();
    }
    parser.finish_node();
    Parsed::Complete(node)
}

/// Parse `Array (Plus Array)*`.
pub fn parse_array_expr(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::ArrayStart) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::ArrayExpr);
    let mut ok = parse_array(parser).is_complete();
    let mut guard = LoopGuard::new("array_expr", parser);
    while parser.at(TokenKind::Plus) && parser.nth(1) == TokenKind::ArrayStart {
        if let Err(err) = guard.check(parser.current_span()) {
            parser.error(err);
            ok = false;
            break;
        }
        parser.bump();
        ok &= parse_array(parser).is_complete();
    }
    parser.finish_node();
    Parsed::from_node(node, ok)
}

/// Parse `ArrayStart Elements? ArrayEnd`.
pub fn parse_array(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::ArrayStart) {
        return Parsed::NoMatch;
    }

    if !DepthGuard::can_enter(parser) {
        return too_deep(parser);
    }
    let mut parser = DepthGuard::new(parser);

    let node = parser.start_node(NodeKind::Array);
    parser.bump();
    let mut ok = true;
    if !parser.at_any(&[TokenKind::ArrayEnd, TokenKind::Eof]) {
        ok &= parse_elements(&mut parser).is_complete();
    }
    ok &= parser.expect(TokenKind::ArrayEnd);
    parser.finish_node();
    Parsed::from_node(node, ok)
}

/// Parse `ArrayElement (Separator ArrayElement)* Separator?`.
///
/// The first unusable token is reported and everything up to the closing
/// bracket is skipped.
pub fn parse_elements(parser: &mut Parser) -> Parsed {
    let node = parser.start_node(NodeKind::Elements);
    let mut guard = LoopGuard::new("elements", parser);
    let mut ok = true;

    loop {
        if let Err(err) = guard.check(parser.current_span()) {
            parser.error(err);
            ok = false;
            break;
        }

        if !parse_array_element(parser).is_match() {
            ok = false;
            parser.error_at_current(ELEMENT_KINDS);
            recovery::recover_elements(parser);
            break;
        }

        match parser.current() {
            TokenKind::Separator => {
                parser.bump();
                if parser.at(TokenKind::ArrayEnd) {
                    break;
                }
            }
            TokenKind::ArrayEnd | TokenKind::Eof => break,
            _ => {
                ok = false;
                parser.error_at_current(&[TokenKind::Separator, TokenKind::ArrayEnd]);
                recovery::recover_elements(parser);
                break;
            }
        }
    }

    parser.finish_node();
    Parsed::from_node(node, ok)
}

/// Parse a single literal, variable name or link inside an array.
pub fn parse_array_element(parser: &mut Parser) -> Parsed {
    if !parser.at_any(ELEMENT_KINDS) {
        return Parsed::NoMatch;
    }
    let node = parser.start_node(NodeKind::ArrayElement);
    parser.bump();
    parser.finish_node();
    Parsed::Complete(node)
}

/// Parse `VariableValueRef (Plus Value)?`.
///
/// A chain `A + B + C` nests one `VariableRefExpr` inside the tail `Value` of
/// the previous one. The chain is walked with a loop and the nodes are
/// closed together at the end. Every nested link counts as one nesting level,
/// so the tree stays within the depth limit however long the chain is.
pub fn parse_variable_ref_expr(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::VariableValueRef) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::VariableRefExpr);
    let mut open = 1usize;
    let mut links = 0usize;
    let mut ok = true;
    let mut guard = LoopGuard::new("variable_ref_expr", parser);

    loop {
        if let Err(err) = guard.check(parser.current_span()) {
            parser.error(err);
            ok = false;
            break;
        }

        parser.bump();
        if !parser.at(TokenKind::Plus) || !VALUE_START.contains(&parser.nth(1)) {
            break;
        }
        parser.bump();

        if parser.at(TokenKind::VariableValueRef) {
            if !DepthGuard::can_enter(parser) {
                let limit = parser.config().max_depth;
                parser.error(ParseError::nesting_too_deep(limit, parser.current_span()));
                recovery::skip_reference_chain(parser);
                ok = false;
                break;
            }
            parser.depth += 1;
            links += 1;
            parser.start_node(NodeKind::Value);
            parser.start_node(NodeKind::VariableRefExpr);
            open += 2;
            continue;
        }

        ok &= parse_value(parser).is_complete();
        break;
    }

    parser.depth -= links;
    for _ in 0..open {
        parser.finish_node();
    }
    Parsed::from_node(node, ok)
}
