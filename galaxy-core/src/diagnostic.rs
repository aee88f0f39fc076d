//! Positioned compiler messages.
//!
//! Both the lexer and the parser report problems by pushing a
//! [`Diagnostic`] into a [`Diagnostics`] log and carrying on. Nothing in
//! this module aborts or returns an error by itself.

use std::fmt;
use std::ops::Range;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single compiler message.
///
/// `text` is the offending lexeme or character (empty when there is
/// none, e.g. at end of input). `message` is already fully worded and
/// embeds `text` where it helps the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source_name: String,
    pub line: u32,
    pub column: u32,
    pub range: Range<usize>,
    pub text: String,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        source_name: impl Into<String>,
        span: Span,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            source_name: source_name.into(),
            line: span.line,
            column: span.column_start,
            range: span.range(),
            text: text.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn error(
        source_name: impl Into<String>,
        span: Span,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic::new(Severity::Error, source_name, span, text, message)
    }

    pub fn warning(
        source_name: impl Into<String>,
        span: Span,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic::new(Severity::Warning, source_name, span, text, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `<source-name>:<line>:<column>: <message>`; tooling depends on this shape.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.source_name, self.line, self.column, self.message
        )
    }
}

/// Ordered diagnostic log for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "diagnostic recorded");
        self.entries.push(diagnostic);
    }

    /// Append another log, keeping its order after ours.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
