//! Object bodies: members, pairs and nested objects

use super::guards::{DepthGuard, LoopGuard};
use super::items::parse_body;
use super::{recovery, values, ParseError, Parsed, Parser};
use crate::syntax::NodeKind;
use crate::token::TokenKind;

/// Parse `Pair (Separator Pair)* Separator?`.
///
/// Called with the parser just inside an opening brace. An unexpected token
/// is reported once, then skipped until the closing brace or the start of
/// another pair, so a single bad entry leaves its siblings intact.
pub fn parse_members(parser: &mut Parser) -> Parsed {
    let node = parser.start_node(NodeKind::Members);
    let mut guard = LoopGuard::new("members", parser);
    let mut ok = true;
    let mut pairs = 0usize;

    loop {
        if let Err(err) = guard.check(parser.current_span()) {
            parser.error(err);
            ok = false;
            break;
        }

        match parser.current() {
            TokenKind::ObjectEnd | TokenKind::Eof => break,
            TokenKind::FieldName => {
                ok &= parse_pair(parser).is_complete();
                pairs += 1;

                match parser.current() {
                    TokenKind::Separator => {
                        parser.bump();
                    }
                    TokenKind::ObjectEnd | TokenKind::Eof => break,
                    _ => {
                        ok = false;
                        parser.error_at_current(&[TokenKind::Separator, TokenKind::ObjectEnd]);
                        recovery::recover_members(parser);
                    }
                }
            }
            _ => {
                ok = false;
                parser.error_at_current(&[TokenKind::FieldName]);
                recovery::recover_members(parser);
            }
        }
    }

    parser.finish_node();
    Parsed::from_node(node, ok && pairs > 0)
}

/// Parse `FieldName Equals Value`.
///
/// Anything the pair cannot use is skipped up to the next separator, closing
/// brace, or the start of the following pair.
pub fn parse_pair(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::FieldName) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::Pair);
    let start = parser.current_span();
    parser.start_node(NodeKind::FieldName);
    parser.bump();
    parser.finish_node();

    let ok = if !parser.eat(TokenKind::Equals) {
        parser.error_at_current(&[TokenKind::Equals]);
        recovery::recover_pair(parser);
        false
    } else {
        match values::parse_value(parser) {
            Parsed::Complete(_) => true,
            Parsed::Partial(_) => false,
            Parsed::NoMatch => {
                values::report_missing_value(parser, start);
                recovery::recover_pair(parser);
                false
            }
        }
    };

    parser.finish_node();
    Parsed::from_node(node, ok)
}

/// Parse `ObjectStart Members? ObjectEnd` as a value.
pub fn parse_object(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::ObjectStart) {
        return Parsed::NoMatch;
    }

    if !DepthGuard::can_enter(parser) {
        return too_deep(parser);
    }
    let mut parser = DepthGuard::new(parser);

    let node = parser.start_node(NodeKind::Object);
    let ok = parse_body(&mut parser);
    parser.finish_node();
    Parsed::from_node(node, ok)
}

/// Report the nesting limit and swallow the construct at the cursor.
pub(super) fn too_deep(parser: &mut Parser) -> Parsed {
    let limit = parser.config().max_depth;
    parser.error(ParseError::nesting_too_deep(limit, parser.current_span()));
    Parsed::Partial(recovery::skip_balanced(parser))
}
