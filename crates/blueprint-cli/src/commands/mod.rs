//! Subcommand implementations.

pub mod check;
pub mod files;
pub mod modules;
pub mod tokens;
pub mod tree;

use anyhow::Context;
use std::path::Path;

/// Read a source file, naming it in the error.
pub fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
