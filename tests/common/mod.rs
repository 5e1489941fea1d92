// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Each test file that imports this module compiles its own copy, so not every
// function is used in every binary. Suppress the resulting dead_code warnings.
#![allow(dead_code)]
// Import this module in each test file with:
//
//     mod common;
//     use common::{compile, compile_err, render_compact};

use ipcstub::{Ipcstub, StubOutput, StubReportHandler, Target};
use miette::{GraphicalReportHandler, GraphicalTheme};

/// Compile `source` for ILP32, panicking on failure.
pub fn compile(source: &str) -> StubOutput {
    compile_for(source, Target::Ilp32)
}

/// Compile `source` for `target`, panicking on failure.
pub fn compile_for(source: &str, target: Target) -> StubOutput {
    match Ipcstub::new().target(target).compile_str_named(source, "test.idl") {
        Ok(output) => output,
        Err(report) => panic!("compilation failed:\n{}", render_compact(&report)),
    }
}

/// Compile `source` for ILP32, expecting failure.
pub fn compile_err(source: &str) -> miette::Report {
    match Ipcstub::new().compile_str_named(source, "test.idl") {
        Ok(output) => panic!("compilation unexpectedly succeeded:\n{}", output.header),
        Err(report) => report,
    }
}

/// Render a report the way the CLI prints it.
pub fn render_compact(report: &miette::Report) -> String {
    StubReportHandler::new("ipcstub").render_to_string(report.as_ref())
}

/// Render a report with the graphical handler, without Unicode or color, at
/// 80 columns.
pub fn render_graphical(report: &miette::Report) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::none()).with_width(80);
    let mut buf = String::new();
    handler
        .render_report(&mut buf, report.as_ref())
        .expect("render to String is infallible");
    buf
}

/// `(id, reply_id)` of every message, in declaration order.
pub fn ids(output: &StubOutput) -> Vec<(u32, Option<u32>)> {
    output.messages.iter().map(|m| (m.id, m.reply_id)).collect()
}
