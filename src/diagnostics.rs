//! Error accumulation and rendering.
//!
//! Neither the lexer nor the parser stops on a malformed construct.
//! They record a [`Diagnostic`] here and keep going, and the caller
//! prints everything once the pass is over.

use std::io::{self, Write};

use crate::lexer::LexErrorKind;
use crate::parser::ParseErrorKind;
use crate::token::Span;

/// Any error the front end can record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Raised while scanning characters into tokens.
    #[error("{0}")]
    Lex(#[from] LexErrorKind),
    /// Raised while recognizing token runs.
    #[error("{0}")]
    Parse(#[from] ParseErrorKind),
}

/// One recorded error with the line it points into.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{span}: error: {kind}")]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub span: Span,
    pub source_line: String,
}

impl Diagnostic {
    /// Message text without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Write the three-line block: header, echoed line, caret.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{self}")?;
        writeln!(out, "{}", self.source_line)?;
        let pad = self.span.column.saturating_sub(1);
        writeln!(out, "{:pad$}^", "")
    }
}

/// Append-only list of diagnostics in the order they were raised.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record an error. Never fails and never deduplicates.
    pub fn push_error(
        &mut self,
        kind: impl Into<ErrorKind>,
        span: Span,
        source_line: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind: kind.into(),
            span,
            source_line: source_line.into(),
        };
        tracing::debug!(%diagnostic, "recorded diagnostic");
        self.records.push(diagnostic);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    /// Render every record into `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.records {
            diagnostic.write_to(out)?;
        }
        Ok(())
    }

    /// Render every record into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Print every record to stdout.
    ///
    /// Returns `true` if anything was recorded, which callers use as
    /// the failure signal.
    pub fn print_errors(&self) -> bool {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        if let Err(e) = self.write_to(&mut lock) {
            tracing::warn!(error = %e, "failed to write diagnostics");
        }
        self.has_errors()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
