//! IPC stub compiler: parse a message IDL and emit the C header of message
//! layouts, message-type constants and runtime tables that an IPC runtime
//! includes.
//!
//! An IDL file declares request/response (`rpc`) and fire-and-forget
//! (`oneway`, or any message marked `async`) messages:
//!
//! ```text
//! /// Liveness check.
//! rpc ping(value: int32) -> (value: int32);
//! oneway notify(msg: cstr[32]);
//! async rpc blk_write(sector: uint, data: bytes[512]) -> ();
//! ```
//!
//! Each message gets a numeric id, and each reply gets the next one. The
//! header carries one `struct <msg>_fields` per request, one
//! `struct <msg>_reply_fields` per reply, and `<MSG>_MSG` /
//! `<MSG>_REPLY_MSG` constants that pack the id and the record size.
//!
//! # Compiling a file
//!
//! ```no_run
//! use ipcstub::{Ipcstub, Target};
//!
//! let output = Ipcstub::new()
//!     .target(Target::Lp64)
//!     .compile("messages.idl")?;
//! std::fs::write("ipcstub.h", &output.header)?;
//! println!("highest message id: {}", output.msgid_max);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error handling
//!
//! All fallible methods return [`miette::Result`]. Errors about the input are
//! [`CompileDiagnostic`]s carrying the source span and an optional hint; use
//! [`error_kind`] to find out which check failed. [`StubReportHandler`]
//! renders reports in the compact `error:` / `Hint:` form the CLI prints.

pub(crate) mod analyze;
pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod compiler;
pub mod error;
pub mod layout;
pub mod model;
pub(crate) mod parser;
pub(crate) mod reader;
pub mod report;
pub(crate) mod suggest;

// Re-export the small number of public API at the crate root.
pub use compiler::{Ipcstub, StubOutput};
pub use error::{CompileDiagnostic, ErrorKind, error_kind};
pub use layout::Target;
pub use report::StubReportHandler;
