// ==============================================================================
// Plain Diagnostic Rendering
// ==============================================================================
//
// The CLI installs `StubReportHandler` as the miette hook so every report it
// prints has the same compact shape build logs expect:
//
//   ipcstub: error: ping: return values is not specified
//    --> messages.idl:3:5
//       | Hint: Add '-> ()' or consider defining it as 'oneway' message
//
// Warnings use `warning:` instead of `error:`. When a report wraps another
// error (e.g. an I/O error with "read <path>" context), the causes are joined
// onto the first line.

use std::fmt::{self, Write as _};

use miette::{Diagnostic, ReportHandler, Severity};

/// Renders diagnostics as `<program>: error: <message>` lines with an
/// optional location and `Hint:` line.
#[derive(Debug, Clone)]
pub struct StubReportHandler {
    program: String,
}

impl StubReportHandler {
    pub fn new(program: impl Into<String>) -> Self {
        StubReportHandler {
            program: program.into(),
        }
    }

    /// Render `diagnostic` into `f`.
    pub fn render_report(&self, f: &mut impl fmt::Write, diagnostic: &dyn Diagnostic) -> fmt::Result {
        let marker = match diagnostic.severity() {
            Some(Severity::Warning) => "warning",
            Some(Severity::Advice) => "note",
            Some(Severity::Error) | None => "error",
        };

        write!(f, "{}: {marker}: {diagnostic}", self.program)?;
        let mut cause = diagnostic.source();
        while let Some(err) = cause {
            write!(f, ": {err}")?;
            cause = err.source();
        }
        writeln!(f)?;

        // Location and hint come from the innermost diagnostic that has them.
        let detailed = innermost_detailed(diagnostic);
        if let Some(location) = location(detailed) {
            writeln!(f, " --> {location}")?;
        }
        if let Some(help) = detailed.help() {
            writeln!(f, "    | Hint: {help}")?;
        }
        Ok(())
    }

    /// Render `diagnostic` to a `String`.
    pub fn render_to_string(&self, diagnostic: &dyn Diagnostic) -> String {
        let mut buf = String::new();
        self.render_report(&mut buf, diagnostic)
            .expect("write to String is infallible");
        buf
    }
}

impl ReportHandler for StubReportHandler {
    fn debug(&self, diagnostic: &dyn Diagnostic, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return fmt::Debug::fmt(diagnostic, f);
        }
        // The trailing newline belongs to the caller (`eprintln!`).
        let rendered = self.render_to_string(diagnostic);
        f.write_str(rendered.trim_end_matches('\n'))
    }
}

/// Follow `diagnostic_source` links down to the first diagnostic that carries
/// source labels or help text.
fn innermost_detailed(diagnostic: &dyn Diagnostic) -> &dyn Diagnostic {
    let mut current = diagnostic;
    loop {
        if current.labels().is_some() || current.help().is_some() {
            return current;
        }
        match current.diagnostic_source() {
            Some(inner) => current = inner,
            None => return diagnostic,
        }
    }
}

/// `name:line:column` (1-based) of the diagnostic's first label.
fn location(diagnostic: &dyn Diagnostic) -> Option<String> {
    let source = diagnostic.source_code()?;
    let label = diagnostic.labels()?.next()?;
    let contents = source.read_span(label.inner(), 0, 0).ok()?;
    let mut location = String::new();
    if let Some(name) = contents.name() {
        write!(location, "{name}:").expect("write to String is infallible");
    }
    write!(location, "{}:{}", contents.line() + 1, contents.column() + 1)
        .expect("write to String is infallible");
    Some(location)
}
