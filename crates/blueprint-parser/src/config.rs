//! Parser limits
//!
//! Both limits guard against pathological input. The defaults are far above
//! anything a hand-written module file needs.

use serde::{Deserialize, Serialize};

/// Default maximum nesting of objects and arrays
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default iteration cap for any single parser loop
pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 1_000_000;

/// Limits applied while parsing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Nested objects/arrays deeper than this are reported and skipped
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Iteration cap for the item, member and element loops
    #[serde(default = "default_max_loop_iterations")]
    pub max_loop_iterations: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_loop_iterations() -> usize {
    DEFAULT_MAX_LOOP_ITERATIONS
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_loop_iterations: default_max_loop_iterations(),
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
