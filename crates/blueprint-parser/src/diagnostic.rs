//! Diagnostic rendering for parse errors
//!
//! Turns [`ParseError`]s into source-annotated reports for terminals and
//! into JSON for editor integration.

use crate::parser::{ParseError, ParseErrorKind};
use crate::token::{Span, TokenKind};
use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::WriteColor;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    /// The underlying codespan diagnostic
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "B0001")
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a ParseError
    pub fn from_parse_error(error: &ParseError, file_id: usize) -> Self {
        use ParseErrorKind::*;

        let label = match &error.kind {
            UnexpectedToken { found, .. } => format!("unexpected {found}"),
            UnexpectedEof { .. } => "file ends here".to_string(),
            MissingValue => "value missing".to_string(),
            UnexpectedCharacter { .. } => "not valid here".to_string(),
            UnterminatedString => "string starts here".to_string(),
            NestingTooDeep { .. } => "skipped".to_string(),
            ParserStuck { .. } => "parsing stopped here".to_string(),
        };

        let diag = Diagnostic::error(error.message.clone())
            .with_code(error_code(&error.kind))
            .with_primary_label(file_id, error.span, label);

        match &error.kind {
            UnexpectedEof { expected } if expected.contains(&TokenKind::ObjectEnd) => {
                diag.with_help("add the missing '}'")
            }
            UnexpectedEof { expected } if expected.contains(&TokenKind::ArrayEnd) => {
                diag.with_help("add the missing ']'")
            }
            UnexpectedToken { expected, .. } if expected.contains(&TokenKind::Separator) => {
                diag.with_help("entries are separated by ','")
            }
            UnterminatedString => diag.with_help("close the string with '\"' on the same line"),
            _ => diag,
        }
    }

    /// Emit the diagnostic to any color-capable writer
    pub fn emit_to(&self, writer: &mut dyn WriteColor, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Convert to JSON representation for editor integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

/// Serializable form of a [`Diagnostic`], as printed by `--format json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "B0001")
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    /// Help lines, each prefixed with `help:`
    pub notes: Vec<String>,
}

/// One labelled source range. Lines and columns are 1-based.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: Option<String>,
    /// `"primary"` or `"secondary"`
    pub style: String,
}

impl JsonDiagnostic {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a parse error kind
pub fn error_code(kind: &ParseErrorKind) -> ErrorCode {
    use ParseErrorKind::*;

    match kind {
        UnexpectedToken { .. } => ErrorCode("B0001"),
        UnexpectedEof { .. } => ErrorCode("B0002"),
        MissingValue => ErrorCode("B0003"),
        UnexpectedCharacter { .. } => ErrorCode("B0004"),
        UnterminatedString => ErrorCode("B0005"),
        NestingTooDeep { .. } => ErrorCode("B0006"),
        ParserStuck { .. } => ErrorCode("B0007"),
    }
}

/// A file database holding one source, with file id 0.
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
