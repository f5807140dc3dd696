//! `bp modules`: list the modules each file defines.

use std::io::Write;
use std::path::{Path, PathBuf};

use blueprint_parser::ast::{AstNode, File};
use blueprint_parser::{parse_with_config, ParserConfig};
use serde::Serialize;
use termcolor::WriteColor;

use super::files::collect_bp_files;
use super::read_source;
use crate::output::{Format, StyledOutput};

/// One module definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEntry {
    pub file: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// `None` when the module has no string `name` property
    pub name: Option<String>,
    pub line: u32,
    pub column: u32,
}

pub fn execute(
    paths: &[String],
    config: &ParserConfig,
    format: Format,
    out: &mut dyn WriteColor,
) -> anyhow::Result<()> {
    let files = collect_bp_files(paths)?;
    let entries = list_modules(&files, config)?;

    match format {
        Format::Pretty => {
            let mut out = StyledOutput::new(out);
            for entry in &entries {
                out.dim(&format!("{}:{}:{}", entry.file, entry.line, entry.column));
                out.plain("\t");
                out.info(&entry.type_name);
                out.plain("\t");
                match &entry.name {
                    Some(name) => out.plain(name),
                    None => out.dim("<unnamed>"),
                }
                out.newline();
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Parse `paths` and collect their modules in file order. Modules lost to
/// recovery still appear if their type name survived.
pub fn list_modules(paths: &[PathBuf], config: &ParserConfig) -> anyhow::Result<Vec<ModuleEntry>> {
    let mut entries = Vec::new();
    for path in paths {
        entries.extend(modules_in(path, config)?);
    }
    Ok(entries)
}

fn modules_in(path: &Path, config: &ParserConfig) -> anyhow::Result<Vec<ModuleEntry>> {
    let source = read_source(path)?;
    let parse = parse_with_config(&source, config);
    let Some(file) = File::cast(parse.syntax()) else {
        return Ok(Vec::new());
    };

    let entries = file
        .blueprints()
        .filter_map(|blueprint| {
            let type_name = blueprint.type_name()?;
            let span = blueprint.span();
            Some(ModuleEntry {
                file: path.display().to_string(),
                type_name: type_name.to_string(),
                name: blueprint.module_name(),
                line: span.line,
                column: span.column,
            })
        })
        .collect();
    Ok(entries)
}
