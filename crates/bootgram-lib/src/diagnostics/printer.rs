//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::SourceDiagnostic;

/// Renders a [`SourceDiagnostic`], with a source excerpt when the source is set.
pub struct DiagnosticPrinter<'d, 's> {
    diagnostic: &'d SourceDiagnostic,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticPrinter<'d, 's> {
    pub fn new(diagnostic: &'d SourceDiagnostic) -> Self {
        Self {
            diagnostic,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return write!(w, "{}", self.diagnostic);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let diag = self.diagnostic;
        let range = adjust_range(diag.span(), source.len());
        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range));
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report: Vec<Group> = vec![Level::ERROR.primary_title(diag.message()).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Zero-width spans are widened to one character so they stay visible.
fn adjust_range(range: Range<usize>, limit: usize) -> Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range
}
