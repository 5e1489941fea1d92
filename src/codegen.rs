// ==============================================================================
// Header Generation
// ==============================================================================
//
// Renders resolved messages into the C header the IPC runtime includes. The
// renderer only reads the model; every line goes through `HeaderWriter`, which
// knows about indentation and macro line continuations.
//
// Names in the output are part of the runtime's ABI and must not change:
//
//   struct <msg>_fields / struct <msg>_reply_fields
//   <MSG>_MSG / <MSG>_REPLY_MSG = __DEFINE_MSG_TYPE(id, sizeof(record))
//   IPCSTUB_MESSAGE_FIELDS, IPCSTUB_MSGID_MAX, IPCSTUB_MSGID2STR,
//   IPCSTUB_STATIC_ASSERTIONS

use std::fmt::Write as _;

use crate::layout::MAX_RECORD_SIZE;
use crate::model::{Field, FieldList, FieldType, Message};

/// Render the header for `messages`. `msgid_max` is the highest allocated id.
pub fn render_header(messages: &[Message], msgid_max: u32) -> String {
    let mut w = HeaderWriter::new();

    w.line("#pragma once");
    w.line("//");
    w.line("//  IPC stubs generated by ipcstub.");
    w.line("//");
    w.line("//  Do not edit this file directly. Edit the IDL file it was generated");
    w.line("//  from and regenerate it instead.");
    w.line("//");
    w.line("#include <libs/common/types.h>");
    w.blank();

    w.section("Message fields");
    for msg in messages {
        w.blank();
        write_record(&mut w, &format!("{}_fields", msg.name), &msg.args);
        if msg.reply_id.is_some() {
            write_record(&mut w, &format!("{}_reply_fields", msg.name), &msg.rets);
        }
    }
    w.blank();

    w.line("#define __DEFINE_MSG_TYPE(type, len) ((type) << 12 | (len))");
    w.blank();
    for msg in messages {
        let upper = msg.name.to_uppercase();
        w.line(format!(
            "#define {upper}_MSG __DEFINE_MSG_TYPE({}, sizeof(struct {}_fields))",
            msg.id, msg.name
        ));
        if let Some(reply_id) = msg.reply_id {
            w.line(format!(
                "#define {upper}_REPLY_MSG __DEFINE_MSG_TYPE({reply_id}, sizeof(struct {}_reply_fields))",
                msg.name
            ));
        }
    }
    w.blank();

    w.section("Runtime macros");
    w.macro_start("IPCSTUB_MESSAGE_FIELDS");
    for msg in messages {
        w.macro_line(1, format!("struct {0}_fields {0};", msg.name));
        if msg.reply_id.is_some() {
            w.macro_line(1, format!("struct {0}_reply_fields {0}_reply;", msg.name));
        }
    }
    w.blank();

    w.line(format!("#define IPCSTUB_MSGID_MAX {msgid_max}"));
    w.macro_start("IPCSTUB_MSGID2STR");
    w.macro_line(1, "(const char *[]){");
    for msg in messages {
        w.macro_line(2, format!("[{}] = \"{}\",", msg.id, msg.name));
        if let Some(reply_id) = msg.reply_id {
            w.macro_line(2, format!("[{reply_id}] = \"{}_reply\",", msg.name));
        }
    }
    w.line("    }");
    w.blank();

    w.macro_start("IPCSTUB_STATIC_ASSERTIONS");
    for msg in messages {
        write_size_assertion(&mut w, &msg.name);
        if msg.reply_id.is_some() {
            write_size_assertion(&mut w, &format!("{}_reply", msg.name));
        }
    }
    w.blank();

    w.finish()
}

/// `struct <record> { ... };`
fn write_record(w: &mut HeaderWriter, record: &str, fields: &FieldList) {
    w.line(format!("struct {record} {{"));
    for field in fields.fields() {
        for member in field_members(field) {
            w.line(format!("    {member};"));
        }
    }
    w.line("};");
}

/// The C member declarations a field expands to.
fn field_members(field: &Field) -> Vec<String> {
    let name = &field.name;
    match field.ty {
        FieldType::Scalar {
            builtin,
            count: None,
        } => vec![format!("{} {name}", builtin.c_type())],
        FieldType::Scalar {
            builtin,
            count: Some(n),
        } => vec![format!("{} {name}[{n}]", builtin.c_type())],
        FieldType::Bytes(n) => vec![format!("uint8_t {name}[{n}]"), format!("size_t {name}_len")],
        FieldType::Cstr(n) => vec![format!("char {name}[{n}]")],
    }
}

/// `record` is the record name without the `_fields` suffix.
fn write_size_assertion(w: &mut HeaderWriter, record: &str) {
    w.macro_line(1, "_Static_assert(");
    w.macro_line(
        2,
        format!("sizeof(struct {record}_fields) < {MAX_RECORD_SIZE},"),
    );
    w.macro_line(
        2,
        format!(
            "\"'{record}' message is too large, should be less than {MAX_RECORD_SIZE} bytes\""
        ),
    );
    w.macro_line(1, ");");
}

/// Line-oriented text builder for the header.
struct HeaderWriter {
    out: String,
}

impl HeaderWriter {
    fn new() -> Self {
        HeaderWriter { out: String::new() }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// A banner comment introducing a group of definitions.
    fn section(&mut self, title: &str) {
        self.line("//");
        self.line(format!("//  {title}"));
        self.line("//");
    }

    /// `#define NAME \`. The body is written with `macro_line` and ends at the
    /// next blank line.
    fn macro_start(&mut self, name: &str) {
        self.line(format!("#define {name} \\"));
    }

    /// One continued line of a multi-line macro body.
    fn macro_line(&mut self, indent: usize, text: impl AsRef<str>) {
        writeln!(self.out, "{}{} \\", "    ".repeat(indent), text.as_ref())
            .expect("write to String is infallible");
    }

    fn finish(self) -> String {
        self.out
    }
}
