// ==============================================================================
// IDL Reader: Parse Tree Walker
// ==============================================================================
//
// Runs the pest parser over IDL source and lowers the resulting pair tree into
// the typed syntax tree in `ast`. Each walk function handles one grammar rule
// and returns a value; spans are carried along so the analyzer can point at
// the exact token it is complaining about.
//
// Pest guarantees the shape of the pair tree, but we still report a malformed
// tree as a diagnostic rather than panicking.

use miette::SourceSpan;
use pest::Parser as _;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::ast::{
    DocComment, FieldDecl, FieldsDecl, Ident, IdlFile, MessageDef, MessageKind, Modifier,
    Statement, TypeRef,
};
use crate::error::{CompileDiagnostic, ErrorKind, SourceFile};
use crate::parser::{IdlParser, Rule, describe_rule, is_punctuation};

type Result<T> = std::result::Result<T, Box<CompileDiagnostic>>;

// ==========================================================================
// Public API
// ==========================================================================

/// Parse IDL source into a syntax tree.
pub(crate) fn parse_idl(src: SourceFile<'_>) -> Result<IdlFile> {
    let mut pairs =
        IdlParser::parse(Rule::file, src.text).map_err(|e| Box::new(syntax_error(src, e)))?;
    let file = pairs
        .next()
        .ok_or_else(|| malformed(src, (0, 0).into(), "IDL file"))?;

    let mut statements = Vec::new();
    for pair in file.into_inner() {
        match pair.as_rule() {
            Rule::doc_comment => statements.push(Statement::DocComment(walk_doc_comment(pair))),
            Rule::message_def => statements.push(Statement::Message(walk_message_def(src, pair)?)),
            Rule::EOI => {}
            _ => return Err(unexpected(src, &pair)),
        }
    }

    Ok(IdlFile { statements })
}

// ==========================================================================
// Tree Walking Functions
// ==========================================================================

fn walk_doc_comment(pair: Pair<'_, Rule>) -> DocComment {
    let span = to_span(pair.as_span());
    let raw = pair
        .into_inner()
        .next()
        .map(|text| text.as_str())
        .unwrap_or_default();
    // `/// foo` documents "foo"; only the single separating space is dropped so
    // that indented continuation lines keep their shape.
    let text = raw.strip_prefix(' ').unwrap_or(raw).trim_end();
    DocComment {
        text: text.to_string(),
        span,
    }
}

fn walk_message_def(src: SourceFile<'_>, pair: Pair<'_, Rule>) -> Result<MessageDef> {
    let span = to_span(pair.as_span());
    let mut modifiers = Vec::new();
    let mut kind = None;
    let mut name = None;
    let mut args = None;
    let mut rets = None;

    for inner in children(pair) {
        match inner.as_rule() {
            Rule::modifier => {
                let modifier = Modifier::from_keyword(inner.as_str())
                    .ok_or_else(|| unexpected(src, &inner))?;
                modifiers.push(modifier);
            }
            Rule::kind => {
                kind = Some(
                    MessageKind::from_keyword(inner.as_str())
                        .ok_or_else(|| unexpected(src, &inner))?,
                );
            }
            Rule::ident => name = Some(walk_ident(inner)),
            Rule::fields => args = Some(walk_fields(src, inner)?),
            Rule::returns => rets = Some(walk_returns(src, inner)?),
            _ => return Err(unexpected(src, &inner)),
        }
    }

    Ok(MessageDef {
        modifiers,
        kind: kind.ok_or_else(|| malformed(src, span, "message kind"))?,
        name: name.ok_or_else(|| malformed(src, span, "message name"))?,
        args: args.ok_or_else(|| malformed(src, span, "message arguments"))?,
        rets,
        span,
    })
}

/// `-> ( fields )`
fn walk_returns(src: SourceFile<'_>, pair: Pair<'_, Rule>) -> Result<FieldsDecl> {
    let span = to_span(pair.as_span());
    let fields = children(pair)
        .next()
        .ok_or_else(|| malformed(src, span, "return values"))?;
    walk_fields(src, fields)
}

fn walk_fields(src: SourceFile<'_>, pair: Pair<'_, Rule>) -> Result<FieldsDecl> {
    let mut fields = Vec::new();
    for inner in children(pair) {
        match inner.as_rule() {
            Rule::any_fields => return Ok(FieldsDecl::Any(to_span(inner.as_span()))),
            Rule::field => fields.push(walk_field(src, inner)?),
            _ => return Err(unexpected(src, &inner)),
        }
    }
    Ok(FieldsDecl::List(fields))
}

fn walk_field(src: SourceFile<'_>, pair: Pair<'_, Rule>) -> Result<FieldDecl> {
    let span = to_span(pair.as_span());
    let mut inner = children(pair);
    let name = inner
        .next()
        .map(walk_ident)
        .ok_or_else(|| malformed(src, span, "field name"))?;
    let ty = inner
        .next()
        .ok_or_else(|| malformed(src, span, "field type"))?;
    Ok(FieldDecl {
        name,
        ty: walk_type_ref(src, ty)?,
    })
}

fn walk_type_ref(src: SourceFile<'_>, pair: Pair<'_, Rule>) -> Result<TypeRef> {
    let span = to_span(pair.as_span());
    let mut name = None;
    let mut count = None;

    for inner in children(pair) {
        match inner.as_rule() {
            Rule::ident => name = Some(walk_ident(inner)),
            Rule::count => count = Some(parse_count(src, &inner)?),
            _ => return Err(unexpected(src, &inner)),
        }
    }

    Ok(TypeRef {
        name: name.ok_or_else(|| malformed(src, span, "type name"))?,
        count,
        span,
    })
}

fn walk_ident(pair: Pair<'_, Rule>) -> Ident {
    Ident {
        text: pair.as_str().to_string(),
        span: to_span(pair.as_span()),
    }
}

/// The grammar only admits `[1-9][0-9]*`, so the one way this fails is a
/// length that does not fit in 32 bits.
fn parse_count(src: SourceFile<'_>, pair: &Pair<'_, Rule>) -> Result<u32> {
    pair.as_str().parse::<u32>().map_err(|_| {
        Box::new(
            src.diagnostic(
                ErrorKind::Syntax,
                to_span(pair.as_span()),
                format!("syntax error: array length `{}` is out of range", pair.as_str()),
            )
            .with_label("too large"),
        )
    })
}

// ==========================================================================
// Helpers
// ==========================================================================

/// The content-bearing children of `pair`, without punctuation tokens.
fn children(pair: Pair<'_, Rule>) -> impl Iterator<Item = Pair<'_, Rule>> {
    pair.into_inner().filter(|p| !is_punctuation(p.as_rule()))
}

fn to_span(span: pest::Span<'_>) -> SourceSpan {
    (span.start(), span.end() - span.start()).into()
}

/// Convert a pest error into a syntax diagnostic. Rule names are replaced
/// with readable descriptions so the message reads "expected identifier"
/// rather than "expected ident".
fn syntax_error(src: SourceFile<'_>, err: pest::error::Error<Rule>) -> CompileDiagnostic {
    let err = err.renamed_rules(describe_rule);
    let span: SourceSpan = match err.location {
        InputLocation::Pos(pos) => {
            let len = src.text[pos..].chars().next().map_or(0, char::len_utf8);
            (pos, len).into()
        }
        InputLocation::Span((start, end)) => (start, end - start).into(),
    };
    let message = err.variant.message();
    src.diagnostic(ErrorKind::Syntax, span, format!("syntax error: {message}"))
        .with_label(message.into_owned())
}

fn unexpected(src: SourceFile<'_>, pair: &Pair<'_, Rule>) -> Box<CompileDiagnostic> {
    Box::new(src.diagnostic(
        ErrorKind::Syntax,
        to_span(pair.as_span()),
        format!("syntax error: unexpected {}", describe_rule(&pair.as_rule())),
    ))
}

fn malformed(src: SourceFile<'_>, span: SourceSpan, what: &str) -> Box<CompileDiagnostic> {
    Box::new(src.diagnostic(
        ErrorKind::Syntax,
        span,
        format!("syntax error: missing {what}"),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> IdlFile {
        parse_idl(SourceFile::new("test.idl", text)).expect("test input should parse")
    }

    fn parse_err(text: &str) -> CompileDiagnostic {
        *parse_idl(SourceFile::new("test.idl", text)).expect_err("test input should not parse")
    }

    fn messages(file: &IdlFile) -> Vec<&MessageDef> {
        file.statements
            .iter()
            .filter_map(|s| match s {
                Statement::Message(m) => Some(m),
                Statement::DocComment(_) => None,
            })
            .collect()
    }

    #[test]
    fn empty_file() {
        assert_eq!(parse("").statements, vec![]);
        assert_eq!(parse("  \n// just a comment\n").statements, vec![]);
    }

    #[test]
    fn rpc_with_return_clause() {
        let file = parse("rpc ping(value: int) -> (value: int);");
        let msgs = messages(&file);
        assert_eq!(msgs.len(), 1);
        let ping = msgs[0];
        assert_eq!(ping.kind, MessageKind::Rpc);
        assert_eq!(ping.name.text, "ping");
        assert_eq!(ping.modifiers, vec![]);
        let FieldsDecl::List(args) = &ping.args else {
            panic!("expected a field list, got {:?}", ping.args);
        };
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].name.text, "value");
        assert_eq!(args[0].ty.name.text, "int");
        assert_eq!(args[0].ty.count, None);
        assert!(matches!(&ping.rets, Some(FieldsDecl::List(rets)) if rets.len() == 1));
    }

    #[test]
    fn oneway_without_return_clause() {
        let file = parse("oneway notify(notifications: notifications);");
        let msgs = messages(&file);
        assert_eq!(msgs[0].kind, MessageKind::Oneway);
        assert_eq!(msgs[0].rets, None);
    }

    #[test]
    fn async_modifier() {
        let file = parse("async rpc recv() -> ();");
        let msgs = messages(&file);
        assert_eq!(msgs[0].modifiers, vec![Modifier::Async]);
        assert_eq!(msgs[0].kind, MessageKind::Rpc);
    }

    #[test]
    fn any_and_empty_field_lists() {
        let file = parse("oneway raw(any);\nrpc nothing() -> (any);");
        let msgs = messages(&file);
        assert!(matches!(msgs[0].args, FieldsDecl::Any(_)));
        assert_eq!(msgs[1].args, FieldsDecl::List(vec![]));
        assert!(matches!(msgs[1].rets, Some(FieldsDecl::Any(_))));
    }

    #[test]
    fn field_named_like_a_keyword() {
        // `any` is only the marker when it is the whole field list.
        let file = parse("rpc f(any: int, rpc: int) -> (oneway: int);");
        let msgs = messages(&file);
        let FieldsDecl::List(args) = &msgs[0].args else {
            panic!("expected a field list");
        };
        assert_eq!(args[0].name.text, "any");
        assert_eq!(args[1].name.text, "rpc");
    }

    #[test]
    fn array_counts() {
        let file = parse("rpc blk_read(sector: uint, buf: bytes[1024], name: cstr[32]) -> ();");
        let msgs = messages(&file);
        let FieldsDecl::List(args) = &msgs[0].args else {
            panic!("expected a field list");
        };
        assert_eq!(args[1].ty.name.text, "bytes");
        assert_eq!(args[1].ty.count, Some(1024));
        assert_eq!(args[2].ty.count, Some(32));
    }

    #[test]
    fn doc_comments_are_statements() {
        let file = parse("/// Sends a ping.\n///   indented\nrpc ping() -> ();\n");
        let docs: Vec<_> = file
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::DocComment(d) => Some(d.text.as_str()),
                Statement::Message(_) => None,
            })
            .collect();
        assert_eq!(docs, vec!["Sends a ping.", "  indented"]);
    }

    #[test]
    fn line_comments_are_ignored() {
        let file = parse("// a comment\nrpc a() -> (); // trailing\n//\nrpc b() -> ();");
        assert_eq!(messages(&file).len(), 2);
        assert_eq!(file.statements.len(), 2);
    }

    #[test]
    fn spans_point_at_names() {
        let text = "rpc ping() -> ();";
        let file = parse(text);
        let name = &messages(&file)[0].name;
        assert_eq!(&text[name.span.offset()..name.span.offset() + name.span.len()], "ping");
    }

    #[test]
    fn missing_semicolon_is_a_syntax_error() {
        let err = parse_err("rpc ping() -> ()");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.starts_with("syntax error:"), "{}", err.message);
        assert_eq!(err.help, None);
    }

    #[test]
    fn unknown_keyword_is_a_syntax_error() {
        let err = parse_err("message ping() -> ();");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.span.offset(), 0);
    }

    #[test]
    fn zero_and_leading_zero_counts_are_rejected() {
        assert_eq!(parse_err("oneway a(x: cstr[0]);").kind, ErrorKind::Syntax);
        assert_eq!(parse_err("oneway a(x: cstr[08]);").kind, ErrorKind::Syntax);
    }

    #[test]
    fn oversized_count_is_rejected() {
        let err = parse_err("oneway a(x: bytes[99999999999]);");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("99999999999"), "{}", err.message);
    }

    #[test]
    fn trailing_comma_is_rejected() {
        assert_eq!(parse_err("oneway a(x: int,);").kind, ErrorKind::Syntax);
    }

    #[test]
    fn missing_comma_points_at_the_next_field() {
        let text = "rpc a(x: int32 y: int) -> ();";
        let err = parse_err(text);
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.span.offset(), text.find('y').expect("has y"));
        assert!(err.message.contains("`,`"), "{}", err.message);
        assert!(!err.message.contains("`any`"), "{}", err.message);
    }

    #[test]
    fn missing_semicolon_after_reply_fields() {
        let text = "rpc a(x: int32) -> (y: int32)";
        let err = parse_err(text);
        assert_eq!(err.span.offset(), text.len());
        assert!(err.message.contains("`;`"), "{}", err.message);
    }

    #[test]
    fn missing_colon_and_bracket_are_named() {
        let err = parse_err("oneway a(x int);");
        assert!(err.message.contains("`:`"), "{}", err.message);
        assert_eq!(err.span.offset(), 11);

        let err = parse_err("oneway a(x: cstr[32);");
        assert!(err.message.contains("`]`"), "{}", err.message);
        assert_eq!(err.span.offset(), 19);
    }
}
