//! File-level parsing: module definitions and variable assignments

use super::guards::LoopGuard;
use super::{members, recovery, values, ParseError, Parsed, Parser};
use crate::syntax::NodeKind;
use crate::token::TokenKind;

/// Parse `Item*` until end of file. The caller owns the `File` node.
pub fn parse_file(parser: &mut Parser) {
    let mut guard = LoopGuard::new("file", parser);

    while !parser.at_eof() {
        if let Err(err) = guard.check(parser.current_span()) {
            parser.error(err);
            break;
        }

        let before = parser.position();
        let parsed = match parser.current() {
            TokenKind::BlueprintTypeName => parse_blueprint(parser),
            TokenKind::VariableName => parse_variable(parser),
            _ => Parsed::NoMatch,
        };

        if !parsed.is_match() {
            parser.error_at_current(&[TokenKind::BlueprintTypeName, TokenKind::VariableName]);
            recovery::recover_item(parser);
        }

        if parser.position() == before {
            // Nothing consumed: swallow the token so the loop advances
            parser.error(ParseError::parser_stuck("file", parser.current_span()));
            parser.start_node(NodeKind::Error);
            parser.bump();
            parser.finish_node();
        }
    }
}

/// Parse a module definition: `type { members }`.
///
/// The rule is committed once the type name is consumed; a missing brace is
/// reported on the returned node.
pub fn parse_blueprint(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::BlueprintTypeName) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::Blueprint);
    parser.start_node(NodeKind::BlueprintType);
    parser.bump();
    parser.finish_node();

    let ok = parse_body(parser);

    parser.finish_node();
    Parsed::from_node(node, ok)
}

/// `{ Members? }` after the pin point. Shared by modules and nested objects.
pub(super) fn parse_body(parser: &mut Parser) -> bool {
    if !parser.expect(TokenKind::ObjectStart) {
        return false;
    }

    let mut ok = true;
    if !parser.at_any(&[TokenKind::ObjectEnd, TokenKind::Eof]) {
        ok &= members::parse_members(parser).is_complete();
    }
    ok &= parser.expect(TokenKind::ObjectEnd);
    ok
}

/// Parse a variable definition: `name = value` or `name += value`.
///
/// The rule is committed once the name is consumed.
pub fn parse_variable(parser: &mut Parser) -> Parsed {
    if !parser.at(TokenKind::VariableName) {
        return Parsed::NoMatch;
    }

    let node = parser.start_node(NodeKind::Variable);
    let start = parser.current_span();
    parser.bump();

    if !parser.eat(TokenKind::Equals) && !parser.eat(TokenKind::PlusEquals) {
        parser.error_at_current(&[TokenKind::Equals, TokenKind::PlusEquals]);
        parser.finish_node();
        return Parsed::Partial(node);
    }

    let ok = match values::parse_value(parser) {
        Parsed::Complete(_) => true,
        Parsed::Partial(_) => false,
        Parsed::NoMatch => {
            values::report_missing_value(parser, start);
            false
        }
    };

    parser.finish_node();
    Parsed::from_node(node, ok)
}
