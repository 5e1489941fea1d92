//! The resolved schema model produced by analysis and consumed by code
//! generation.

pub mod json;
pub mod message;
pub mod types;

pub use message::{Field, FieldList, Message, MessageKind, Modifier};
pub use types::{Builtin, FieldType};
