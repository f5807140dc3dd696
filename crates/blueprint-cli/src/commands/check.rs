//! `bp check`: parse files and report diagnostics.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use blueprint_parser::diagnostic::{create_files, Diagnostic, JsonDiagnostic};
use blueprint_parser::{parse_with_config, ParserConfig};
use serde::Serialize;
use termcolor::WriteColor;

use super::files::collect_bp_files;
use super::read_source;
use crate::output::{plural, Format, StyledOutput};

/// Totals over one `check` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
}

impl CheckSummary {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    diagnostics: Vec<JsonDiagnostic>,
}

pub fn execute(
    paths: &[String],
    config: &ParserConfig,
    format: Format,
    out: &mut dyn WriteColor,
    diagnostics: &mut dyn WriteColor,
) -> anyhow::Result<CheckSummary> {
    let files = collect_bp_files(paths)?;
    if files.is_empty() {
        anyhow::bail!("no .bp files found");
    }
    check_files(&files, config, format, out, diagnostics)
}

/// Check already collected files. Pretty diagnostics go to `diagnostics`;
/// the summary and JSON reports go to `out`.
pub fn check_files(
    paths: &[PathBuf],
    config: &ParserConfig,
    format: Format,
    out: &mut dyn WriteColor,
    diagnostics: &mut dyn WriteColor,
) -> anyhow::Result<CheckSummary> {
    let mut summary = CheckSummary::default();
    let mut reports = Vec::new();

    for path in paths {
        let source = read_source(path)?;
        let parse = parse_with_config(&source, config);
        tracing::debug!(file = %path.display(), errors = parse.errors().len(), "checked file");

        summary.files += 1;
        summary.errors += parse.errors().len();
        if parse.errors().is_empty() {
            continue;
        }

        let files = create_files(path, source.as_str());
        let rendered = parse
            .errors()
            .iter()
            .map(|error| Diagnostic::from_parse_error(error, 0));

        match format {
            Format::Pretty => {
                for diag in rendered {
                    diag.emit_to(diagnostics, &files)
                        .with_context(|| format!("failed to render {}", path.display()))?;
                }
            }
            Format::Json => reports.push(FileReport {
                file: path.display().to_string(),
                diagnostics: rendered
                    .map(|diag| JsonDiagnostic::from_diagnostic(&diag, &files))
                    .collect(),
            }),
        }
    }

    match format {
        Format::Pretty => print_summary(&mut StyledOutput::new(out), &summary),
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
        }
    }

    Ok(summary)
}

fn print_summary(out: &mut StyledOutput<'_>, summary: &CheckSummary) {
    out.plain(&format!("Checked {}: ", plural(summary.files, "file")));
    if summary.is_clean() {
        out.success("no errors found.");
    } else {
        out.error(&format!("{}.", plural(summary.errors, "error")));
    }
    out.newline();
}
