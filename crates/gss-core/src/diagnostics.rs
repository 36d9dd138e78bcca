//! Diagnostics collected while compiling.
//!
//! Passes report problems to an [`ErrorManager`] instead of returning errors.
//! `report` is for problems that invalidate a construct (the pass removes the
//! node); `report_warning` is for recoverable anomalies (the node is kept or
//! converted best-effort). Diagnostics accumulate across all passes; the job
//! fails if any error, as opposed to a warning, was recorded.

use std::fmt;

use annotate_snippets::{Level, Renderer, Snippet};

use crate::location::SourceLocation;

// ============================================================================
// Diagnostic
// ============================================================================

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A human-readable message anchored at a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GssDiagnostic {
    pub message: String,
    pub location: SourceLocation,
}

impl GssDiagnostic {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        GssDiagnostic {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for GssDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_unknown() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

/// A diagnostic together with the severity it was reported with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDiagnostic {
    pub severity: Severity,
    pub diagnostic: GssDiagnostic,
}

impl RecordedDiagnostic {
    /// Render with a source excerpt and a caret under the offending span.
    pub fn render(&self) -> String {
        render_diagnostic(self.severity, &self.diagnostic)
    }
}

// ============================================================================
// Error Manager
// ============================================================================

/// Sink for diagnostics produced by passes.
pub trait ErrorManager {
    /// Record a problem that invalidates a construct.
    fn report(&mut self, diagnostic: GssDiagnostic);

    /// Record a recoverable anomaly.
    fn report_warning(&mut self, diagnostic: GssDiagnostic);

    /// True once any error (not warning) has been reported.
    fn has_errors(&self) -> bool;
}

/// An [`ErrorManager`] that keeps every diagnostic in report order.
#[derive(Debug, Default)]
pub struct BasicErrorManager {
    diagnostics: Vec<RecordedDiagnostic>,
}

impl BasicErrorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics, in the order they were reported.
    pub fn diagnostics(&self) -> &[RecordedDiagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &GssDiagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &GssDiagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Render every diagnostic, separated by blank lines.
    pub fn render_all(&self) -> String {
        self.diagnostics
            .iter()
            .map(RecordedDiagnostic::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &GssDiagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.diagnostic)
    }

    fn record(&mut self, severity: Severity, diagnostic: GssDiagnostic) {
        self.diagnostics.push(RecordedDiagnostic {
            severity,
            diagnostic,
        });
    }
}

impl ErrorManager for BasicErrorManager {
    fn report(&mut self, diagnostic: GssDiagnostic) {
        tracing::error!(location = %diagnostic.location, "{}", diagnostic.message);
        self.record(Severity::Error, diagnostic);
    }

    fn report_warning(&mut self, diagnostic: GssDiagnostic) {
        tracing::warn!(location = %diagnostic.location, "{}", diagnostic.message);
        self.record(Severity::Warning, diagnostic);
    }

    fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a diagnostic with annotate-snippets.
///
/// Diagnostics without a location render as a single `severity: message` line.
pub fn render_diagnostic(severity: Severity, diagnostic: &GssDiagnostic) -> String {
    let location = &diagnostic.location;
    let source = match location.source() {
        Some(source) if !source.text().is_empty() => source,
        _ => return format!("{}: {}", severity, diagnostic.message),
    };

    let text = source.text();
    let start = location.begin().byte_offset;
    let end = location.end().byte_offset;
    let end = if start == end {
        (end + 1).min(text.len())
    } else {
        end
    };
    let start = start.min(end);

    let level = match severity {
        Severity::Error => Level::Error,
        Severity::Warning => Level::Warning,
    };
    let message = level.title(&diagnostic.message).snippet(
        Snippet::source(text)
            .line_start(1)
            .origin(source.file_name())
            .fold(true)
            .annotation(level.span(start..end)),
    );
    Renderer::plain().render(message).to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SourceCode;

    #[test]
    fn errors_and_warnings_are_separated() {
        let mut manager = BasicErrorManager::new();
        manager.report_warning(GssDiagnostic::new("duplicate @charset", SourceLocation::unknown()));
        assert!(!manager.has_errors());
        manager.report(GssDiagnostic::new("bad @page", SourceLocation::unknown()));
        assert!(manager.has_errors());
        assert_eq!(manager.error_count(), 1);
        assert_eq!(manager.warning_count(), 1);
        assert_eq!(manager.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn render_without_location_is_one_line() {
        let diagnostic = GssDiagnostic::new("something odd", SourceLocation::unknown());
        assert_eq!(
            render_diagnostic(Severity::Warning, &diagnostic),
            "warning: something odd"
        );
    }

    #[test]
    fn render_includes_file_and_message() {
        let source = SourceCode::shared("style.gss", "@page :invalid { margin: 0; }\n");
        let location = SourceLocation::from_offsets(&source, 0, 14);
        let diagnostic = GssDiagnostic::new("invalid page parameter", location);
        let rendered = render_diagnostic(Severity::Error, &diagnostic);
        assert!(rendered.contains("error: invalid page parameter"));
        assert!(rendered.contains("style.gss"));
        assert!(rendered.contains("@page :invalid"));
    }

    #[test]
    fn display_prefixes_location() {
        let source = SourceCode::shared("a.gss", "x");
        let diagnostic = GssDiagnostic::new("msg", SourceLocation::from_offsets(&source, 0, 1));
        assert_eq!(diagnostic.to_string(), "a.gss:1:1: msg");
    }
}
