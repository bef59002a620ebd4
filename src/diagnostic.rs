use std::fmt;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::span::Span;

/// A front-end or backend diagnostic. Backend diagnostics carry a dummy
/// span because they refer to the generated program, not the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn report_parts(self) -> (ReportKind<'static>, Color) {
        match self {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        }
    }
}

type SourceReport<'a> = Report<'a, (&'a str, Range<usize>)>;

impl Diagnostic {
    fn new(severity: Severity, message: String, span: Span) -> Self {
        Self {
            severity,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn error(message: String, span: Span) -> Self {
        Self::new(Severity::Error, message, span)
    }

    pub fn warning(message: String, span: Span) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn report<'a>(&self, filename: &'a str) -> SourceReport<'a> {
        let (kind, color) = self.severity.report_parts();
        let label = Label::new((filename, self.span.range()))
            .with_message(&self.message)
            .with_color(color);

        let mut report = Report::build(kind, filename, self.span.start as usize)
            .with_message(&self.message)
            .with_label(label);
        for note in &self.notes {
            report = report.with_note(note);
        }
        if let Some(help) = &self.help {
            report = report.with_help(help);
        }
        report.finish()
    }

    /// Render to stderr with source context.
    pub fn render(&self, filename: &str, source: &str) {
        if let Err(err) = self.report(filename).eprint((filename, Source::from(source))) {
            tracing::warn!(%err, "failed to render diagnostic");
        }
    }

    /// Same report as `render`, captured into a string (colors included).
    pub fn render_to_string(&self, filename: &str, source: &str) -> String {
        let mut buf = Vec::new();
        if let Err(err) = self
            .report(filename)
            .write((filename, Source::from(source)), &mut buf)
        {
            tracing::warn!(%err, "failed to render diagnostic");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Plain one-line form, used where no source text is at hand.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.label(), self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        match &self.help {
            Some(help) => write!(f, "\n  help: {}", help),
            None => Ok(()),
        }
    }
}

pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str, source: &str) {
    for diagnostic in diagnostics {
        diagnostic.render(filename, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let err = Diagnostic::error("expected ';'".to_string(), Span::new(10, 15));
        assert!(err.is_error());
        assert_eq!(err.span.range(), 10..15);
        assert!(err.notes.is_empty() && err.help.is_none());

        let warn = Diagnostic::warning("value is never displayed".to_string(), Span::dummy());
        assert_eq!(warn.severity, Severity::Warning);
        assert!(!warn.is_error());
    }

    #[test]
    fn test_builders_accumulate_notes() {
        let d = Diagnostic::error("failed to lower function 'f'".to_string(), Span::dummy())
            .with_note("caused by: unsupported operator '**'".to_string())
            .with_help("use one of the supported operators".to_string())
            .with_note("second".to_string());
        assert_eq!(d.notes, ["caused by: unsupported operator '**'", "second"]);
        assert_eq!(d.help.as_deref(), Some("use one of the supported operators"));
    }

    #[test]
    fn test_display_is_one_line_per_part() {
        let d = Diagnostic::warning("bad".to_string(), Span::dummy())
            .with_note("n".to_string())
            .with_help("h".to_string());
        assert_eq!(d.to_string(), "warning: bad\n  note: n\n  help: h");
        let plain = Diagnostic::error("division by zero".to_string(), Span::dummy());
        assert_eq!(plain.to_string(), "error: division by zero");
    }

    #[test]
    fn test_render_to_stderr_does_not_panic() {
        let source = "let x = 1;\nx + ;\n";
        let d = Diagnostic::error("expected expression".to_string(), Span::new(15, 16))
            .with_help("an expression must follow `+`".to_string());
        render_diagnostics(&[d.clone(), d], "test.ss", source);
    }

    #[test]
    fn test_render_to_string_mentions_message_and_file() {
        let source = "let = 3;\n";
        let d = Diagnostic::error("expected identifier".to_string(), Span::new(4, 5));
        let rendered = d.render_to_string("test.ss", source);
        assert!(rendered.contains("expected identifier"));
        assert!(rendered.contains("test.ss"));
    }
}
