// ==============================================================================
// Library API: the `Ipcstub` Builder
// ==============================================================================
//
// `Ipcstub` runs the whole pipeline for one IDL file or string:
//
//   source -> reader (syntax tree) -> analyzer (resolved messages)
//          -> codegen (header text)
//
// It follows the non-consuming `&mut self` builder pattern, so a configured
// builder can compile many files. All per-compilation state (the id counter,
// name tables, warnings) lives in an `Analyzer` created fresh for each call,
// so compiling the same source twice yields identical output.

use std::fmt;
use std::fs;
use std::path::Path;

use miette::{Context, IntoDiagnostic};
use serde_json::Value;

use crate::analyze::Analyzer;
use crate::codegen::render_header;
use crate::error::SourceFile;
use crate::layout::Target;
use crate::model::Message;
use crate::model::json::messages_to_json;
use crate::reader::parse_idl;

/// Builder for compiling message IDL into a C header.
///
/// # Examples
///
/// ```no_run
/// use ipcstub::{Ipcstub, Target};
///
/// let output = Ipcstub::new()
///     .target(Target::Ilp32)
///     .compile("messages.idl")?;
/// std::fs::write("ipcstub.h", &output.header)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct Ipcstub {
    target: Target,
    /// Warnings from the most recent call that returned `Err`.
    accumulated_warnings: Vec<miette::Report>,
}

impl Ipcstub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data model used to check record sizes. Defaults to ILP32.
    pub fn target(&mut self, target: Target) -> &mut Self {
        self.target = target;
        self
    }

    /// Drain warnings collected during the most recent `compile*` call.
    ///
    /// On success the same warnings are in [`StubOutput::warnings`]; when a
    /// call fails this is the only way to retrieve them.
    pub fn drain_warnings(&mut self) -> Vec<miette::Report> {
        std::mem::take(&mut self.accumulated_warnings)
    }

    /// Compile the IDL file at `path`.
    pub fn compile(&mut self, path: impl AsRef<Path>) -> miette::Result<StubOutput> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("read {}", path.display()))?;
        self.compile_str_named(&source, &path.display().to_string())
    }

    /// Compile IDL source text, reported as `<input>` in diagnostics.
    pub fn compile_str(&mut self, source: &str) -> miette::Result<StubOutput> {
        self.compile_str_named(source, "<input>")
    }

    /// Compile IDL source text, reported as `name` in diagnostics.
    pub fn compile_str_named(&mut self, source: &str, name: &str) -> miette::Result<StubOutput> {
        self.accumulated_warnings.clear();

        let src = SourceFile::new(name, source);
        let file = parse_idl(src).map_err(|e| miette::Report::new(*e))?;

        let mut analyzer = Analyzer::new(src, self.target);
        let analysis = match analyzer.analyze(&file) {
            Ok(analysis) => analysis,
            Err(e) => {
                self.accumulated_warnings = analyzer
                    .take_warnings()
                    .into_iter()
                    .map(miette::Report::new)
                    .collect();
                return Err(miette::Report::new(*e));
            }
        };

        let header = render_header(&analysis.messages, analysis.msgid_max);
        Ok(StubOutput {
            header,
            messages: analysis.messages,
            msgid_max: analysis.msgid_max,
            target: self.target,
            warnings: analysis
                .warnings
                .into_iter()
                .map(miette::Report::new)
                .collect(),
        })
    }
}

/// The result of a successful compilation.
pub struct StubOutput {
    /// The generated C header.
    pub header: String,
    /// Resolved messages in declaration order.
    pub messages: Vec<Message>,
    /// The highest allocated message id (0 for an empty file).
    pub msgid_max: u32,
    /// The data model sizes were computed for.
    pub target: Target,
    /// Non-fatal warnings (orphaned doc comments, ignored return values).
    ///
    /// Each warning is a [`miette::Report`] with `Severity::Warning` set.
    pub warnings: Vec<miette::Report>,
}

impl StubOutput {
    /// The message with the given name.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// The resolved model as JSON, as written by `--emit json`.
    pub fn to_json(&self) -> Value {
        messages_to_json(&self.messages, self.msgid_max)
    }
}

/// Shows the message count and warning count without dumping the header or
/// the graphical rendering of every warning.
impl fmt::Debug for StubOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubOutput")
            .field("messages", &format_args!("[{} messages]", self.messages.len()))
            .field("msgid_max", &self.msgid_max)
            .field("target", &self.target)
            .field("warnings", &format_args!("[{} warnings]", self.warnings.len()))
            .finish_non_exhaustive()
    }
}
