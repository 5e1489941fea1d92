use super::types::FieldType;
pub use crate::ast::{MessageKind, Modifier};

/// A resolved message, ready for code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u32,
    /// Present iff the message expects a reply.
    pub reply_id: Option<u32>,
    pub name: String,
    pub kind: MessageKind,
    pub modifiers: Vec<Modifier>,
    pub oneway: bool,
    pub doc: Option<String>,
    pub args: FieldList,
    pub rets: FieldList,
    /// `sizeof(struct <name>_fields)` on the configured target.
    pub size: u64,
    /// `sizeof(struct <name>_reply_fields)`, for messages with a reply.
    pub reply_size: Option<u64>,
}

impl Message {
    /// `(id << 12) | size`, the value of `<NAME>_MSG`.
    pub fn msg_type(&self) -> u64 {
        msg_type(self.id, self.size)
    }

    /// The value of `<NAME>_REPLY_MSG`, if the message has a reply.
    pub fn reply_msg_type(&self) -> Option<u64> {
        Some(msg_type(self.reply_id?, self.reply_size?))
    }
}

pub(crate) fn msg_type(id: u32, size: u64) -> u64 {
    (u64::from(id) << 12) | size
}

/// The payload layout of a request or reply.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldList {
    /// Declared `any`: the layout is defined by the caller and the generated
    /// record is empty.
    Any,
    Fields(Vec<Field>),
}

impl FieldList {
    /// The declared fields; empty for `any`.
    pub fn fields(&self) -> &[Field] {
        match self {
            FieldList::Any => &[],
            FieldList::Fields(fields) => fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}
