//! Library half of the `bp` tool.
//!
//! Commands render into caller-supplied writers so the binary can point them
//! at the terminal and tests can capture them.

pub mod commands;
pub mod output;

pub use output::{resolve_color_choice, Format, StyledOutput};
