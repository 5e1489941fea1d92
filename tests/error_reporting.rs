// ==============================================================================
// Error Reporting Snapshot Tests
// ==============================================================================
//
// These tests pin down the text users see for invalid input. Each test
// compiles an inline IDL string, renders the resulting report the way the CLI
// does (`ipcstub: error: ...`, location, `Hint:`), and snapshots it with
// `insta` so that wording changes are reviewed explicitly.

mod common;

use common::{compile, compile_err, render_compact, render_graphical};

// ==============================================================================
// Semantic Errors
// ==============================================================================

#[test]
fn missing_return_values() {
    let err = compile_err("rpc ping(x: int32);");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: ping: return values is not specified
     --> test.idl:1:5
        | Hint: Add '-> ()' or consider defining it as 'oneway' message
    ");
}

#[test]
fn unknown_type_lists_available_types() {
    let err = compile_err("rpc foo(x: bogus) -> ();");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: foo: Unknown data type: 'bogus'
     --> test.idl:1:12
        | Hint: available types: char, bool, int, uint, int8, int16, int32, int64, uint8, uint16, uint32, uint64, size, offset, uaddr, paddr, task, notifications, bytes, cstr (`bytes` and `cstr` take a length, e.g. `cstr[32]`)
    ");
}

#[test]
fn unknown_type_suggests_a_close_name() {
    let err = compile_err("oneway foo(x: uin32);");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: foo: Unknown data type: 'uin32'
     --> test.idl:1:15
        | Hint: did you mean `uint32`?
    ");
}

#[test]
fn buffer_without_length() {
    let err = compile_err("oneway foo(x: cstr);");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: foo: 'cstr' requires a length
     --> test.idl:1:15
        | Hint: declare it as `cstr[N]`, e.g. `cstr[64]`
    ");
}

#[test]
fn duplicate_message_name() {
    let err = compile_err("rpc a() -> ();\nrpc a() -> ();\n");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: duplicate message name 'a'
     --> test.idl:2:5
        | Hint: message names must be unique, ignoring case and the `_reply` suffix
    ");
}

#[test]
fn generated_names_collide() {
    let err = compile_err("rpc get() -> ();\noneway get_reply();\n");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: get_reply: generated names collide with those of 'get'
     --> test.idl:2:8
        | Hint: message names must be unique, ignoring case and the `_reply` suffix
    ");
}

#[test]
fn message_too_large() {
    let err = compile_err("oneway big(data: bytes[4096]);");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: 'big' message is too large, should be less than 4096 bytes (4100 bytes on ilp32)
     --> test.idl:1:8
        | Hint: shrink the `bytes`/`cstr` buffers or split the payload across messages
    ");
}

#[test]
fn reply_too_large() {
    let err = compile_err("rpc get() -> (data: bytes[5000]);");
    insta::assert_snapshot!(render_compact(&err), @r"
    ipcstub: error: 'get_reply' message is too large, should be less than 4096 bytes (5004 bytes on ilp32)
     --> test.idl:1:5
        | Hint: shrink the `bytes`/`cstr` buffers or split the payload across messages
    ");
}

// ==============================================================================
// Syntax Errors
// ==============================================================================

#[test]
fn missing_semicolon() {
    let err = compile_err("rpc ping(x: int32)");
    let rendered = render_compact(&err);
    assert!(
        rendered.starts_with("ipcstub: error: syntax error: "),
        "got: {rendered}"
    );
    assert!(rendered.contains(" --> test.idl:1:19\n"), "got: {rendered}");
}

#[test]
fn syntax_error_points_at_the_offending_line() {
    let err = compile_err("rpc a() -> ();\nrpc b(x int32) -> ();\n");
    let rendered = render_compact(&err);
    assert!(rendered.contains(" --> test.idl:2:"), "got: {rendered}");
}

#[test]
fn missing_comma_between_fields() {
    let err = compile_err("rpc a(x: int32 y: int) -> ();");
    let rendered = render_compact(&err);
    assert!(rendered.contains("`,`"), "got: {rendered}");
    assert!(!rendered.contains("`any`"), "got: {rendered}");
    assert!(rendered.contains(" --> test.idl:1:16\n"), "got: {rendered}");
}

#[test]
fn missing_semicolon_after_reply_fields() {
    let err = compile_err("rpc a(x: int32) -> (y: int32)");
    let rendered = render_compact(&err);
    assert!(
        rendered.starts_with("ipcstub: error: syntax error: expected `;`"),
        "got: {rendered}"
    );
    assert!(rendered.contains(" --> test.idl:1:30\n"), "got: {rendered}");
}

// ==============================================================================
// Warnings
// ==============================================================================

#[test]
fn orphan_doc_comment_warning() {
    let output = compile("rpc a() -> ();\n/// dangling\n");
    insta::assert_snapshot!(render_compact(&output.warnings[0]), @r"
    ipcstub: warning: doc comment is not attached to any message
     --> test.idl:2:1
        | Hint: move the comment above a message or turn it into a `//` comment
    ");
}

#[test]
fn ignored_return_warning() {
    let output = compile("oneway notify(x: int) -> (y: int);");
    insta::assert_snapshot!(render_compact(&output.warnings[0]), @r"
    ipcstub: warning: notify: return values of a oneway message are ignored
     --> test.idl:1:8
        | Hint: remove the `-> (...)` clause or declare the message with `rpc`
    ");
}

// ==============================================================================
// Graphical Rendering
// ==============================================================================

#[test]
fn graphical_report_carries_code_label_and_help() {
    let err = compile_err("rpc a() -> ();\nrpc a() -> ();\n");
    let rendered = render_graphical(&err);
    assert!(rendered.contains("ipcstub::duplicate_name"), "got: {rendered}");
    assert!(rendered.contains("redefined here"), "got: {rendered}");
    assert!(rendered.contains("first defined here"), "got: {rendered}");
    assert!(rendered.contains("help: message names must be unique"), "got: {rendered}");
}
