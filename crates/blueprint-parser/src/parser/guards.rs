//! Parser guards to prevent infinite loops and stack overflow

use super::{ParseError, Parser};
use crate::token::Span;
use std::ops::{Deref, DerefMut};

/// Guard against runaway parser loops
///
/// Tracks iteration count and returns error if exceeded.
///
/// # Example
///
/// ```ignore
/// let mut guard = LoopGuard::with_limit("members", parser.config().max_loop_iterations);
/// while !done {
///     guard.check(parser.current_span())?;
///     // ... parse something ...
/// }
/// ```
pub struct LoopGuard {
    name: &'static str,
    count: usize,
    max: usize,
}

impl LoopGuard {
    /// Create a loop guard using the parser's configured limit
    #[inline]
    pub fn new(name: &'static str, parser: &Parser) -> Self {
        Self::with_limit(name, parser.config().max_loop_iterations)
    }

    /// Create a loop guard with custom limit
    #[inline]
    pub fn with_limit(name: &'static str, max: usize) -> Self {
        Self { name, count: 0, max }
    }

    /// Check iteration count, return error if exceeded
    #[inline]
    pub fn check(&mut self, span: Span) -> Result<(), ParseError> {
        self.count += 1;
        if self.count > self.max {
            tracing::warn!(rule = self.name, limit = self.max, "parser loop limit exceeded");
            return Err(ParseError::parser_stuck(self.name, span));
        }
        Ok(())
    }
}

/// RAII guard that tracks object/array nesting
///
/// Dereferences to the parser it guards and decrements the depth on drop.
///
/// # Example
///
/// ```ignore
/// if !DepthGuard::can_enter(parser) {
///     return too_deep(parser);
/// }
/// let mut parser = DepthGuard::new(parser);
/// parse_members(&mut parser);
/// ```
pub struct DepthGuard<'p> {
    parser: &'p mut Parser,
}

impl<'p> DepthGuard<'p> {
    /// True while one more nesting level fits under the configured limit.
    #[inline]
    pub fn can_enter(parser: &Parser) -> bool {
        parser.depth < parser.config().max_depth
    }

    /// Enter one nesting level.
    #[inline]
    pub fn new(parser: &'p mut Parser) -> Self {
        parser.depth += 1;
        Self { parser }
    }
}

impl Deref for DepthGuard<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        self.parser
    }
}

impl DerefMut for DepthGuard<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        self.parser
    }
}

impl Drop for DepthGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.parser.depth -= 1;
    }
}
