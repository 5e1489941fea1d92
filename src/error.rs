// ==============================================================================
// Compile Diagnostics
// ==============================================================================
//
// Every failure the compiler reports about its input (syntax errors from the
// grammar, semantic errors from the analyzer) and every non-fatal warning is a
// `CompileDiagnostic`. It carries the source text so that `miette` handlers can
// point at the offending span, an `ErrorKind` that tests and callers can match
// on, and an optional remediation hint rendered as the diagnostic's `help`.

use std::fmt;

use miette::{LabeledSpan, NamedSource, Severity, SourceSpan};

/// The class of a [`CompileDiagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The grammar rejected the input.
    Syntax,
    /// A field type is neither a builtin nor `bytes[N]`/`cstr[N]`.
    UnresolvedType,
    /// A request/response message has no `-> (...)` clause.
    MissingReturn,
    /// Two messages, or two fields of one record, generate the same C name.
    DuplicateName,
    /// `bytes` or `cstr` used without a length.
    InvalidArray,
    /// A generated record is not smaller than 4096 bytes on the target.
    MessageTooLarge,
    /// Warning: a `///` comment that no message follows.
    OrphanDocComment,
    /// Warning: a oneway message declares return values.
    IgnoredReturn,
}

impl ErrorKind {
    /// Stable diagnostic code, shown by handlers that render codes.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "ipcstub::syntax",
            ErrorKind::UnresolvedType => "ipcstub::unresolved_type",
            ErrorKind::MissingReturn => "ipcstub::missing_return",
            ErrorKind::DuplicateName => "ipcstub::duplicate_name",
            ErrorKind::InvalidArray => "ipcstub::invalid_array",
            ErrorKind::MessageTooLarge => "ipcstub::message_too_large",
            ErrorKind::OrphanDocComment => "ipcstub::orphan_doc_comment",
            ErrorKind::IgnoredReturn => "ipcstub::ignored_return",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::OrphanDocComment | ErrorKind::IgnoredReturn => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// An error or warning about IDL source, with location information for rich
/// diagnostics.
#[derive(Debug)]
pub struct CompileDiagnostic {
    pub kind: ErrorKind,
    pub src: NamedSource<String>,
    pub span: SourceSpan,
    pub message: String,
    /// Text attached to the primary span. Falls back to `message` when absent.
    pub label: Option<String>,
    pub help: Option<String>,
    /// Additional spans, e.g. the first definition of a duplicated name.
    pub secondary: Vec<LabeledSpan>,
}

impl CompileDiagnostic {
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, label: impl Into<String>, span: SourceSpan) -> Self {
        self.secondary
            .push(LabeledSpan::new_with_span(Some(label.into()), span));
        self
    }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompileDiagnostic {}

impl miette::Diagnostic for CompileDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.kind.severity())
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let primary = LabeledSpan::new_primary_with_span(
            Some(self.label.clone().unwrap_or_else(|| self.message.clone())),
            self.span,
        );
        Some(Box::new(
            std::iter::once(primary).chain(self.secondary.iter().cloned()),
        ))
    }
}

/// The text being compiled and the name it is reported under.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceFile<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl<'a> SourceFile<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        SourceFile { name, text }
    }

    /// Start a diagnostic of `kind` pointing at `span` in this file.
    pub fn diagnostic(
        &self,
        kind: ErrorKind,
        span: impl Into<SourceSpan>,
        message: impl Into<String>,
    ) -> CompileDiagnostic {
        CompileDiagnostic {
            kind,
            src: NamedSource::new(self.name, self.text.to_string()),
            span: span.into(),
            message: message.into(),
            label: None,
            help: None,
            secondary: Vec::new(),
        }
    }
}

/// The kind of the `CompileDiagnostic` behind `report`, if there is one.
pub fn error_kind(report: &miette::Report) -> Option<ErrorKind> {
    report.downcast_ref::<CompileDiagnostic>().map(|d| d.kind)
}
