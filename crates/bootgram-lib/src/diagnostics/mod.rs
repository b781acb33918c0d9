//! Source-located errors in grammar text.

mod printer;


use std::fmt;
use std::ops::Range;

pub use printer::DiagnosticPrinter;

/// An error at a byte span of grammar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDiagnostic {
    message: String,
    span: Range<usize>,
}

impl SourceDiagnostic {
    pub fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn printer(&self) -> DiagnosticPrinter<'_, '_> {
        DiagnosticPrinter::new(self)
    }
}

impl fmt::Display for SourceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            self.span.start, self.span.end, self.message
        )
    }
}
