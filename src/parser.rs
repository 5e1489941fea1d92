// ==============================================================================
// Generated PEG Parser
// ==============================================================================
//
// `pest_derive` generates the `Rule` enum and the parser from `idl.pest` at
// compile time. The reader walks the resulting pair tree; nothing else in the
// crate depends on pest types.

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "idl.pest"]
pub(crate) struct IdlParser;

/// Human-readable names for grammar rules, used in syntax error messages.
pub(crate) fn describe_rule(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of input",
        Rule::file => "IDL file",
        Rule::doc_comment | Rule::doc_text => "doc comment",
        Rule::message_def => "message definition",
        Rule::returns => "return values",
        Rule::modifier => "`async`",
        Rule::kind => "`rpc` or `oneway`",
        Rule::fields => "field list",
        Rule::any_fields => "`any`",
        Rule::field => "field",
        Rule::type_ref => "type",
        Rule::count => "array length",
        Rule::ident => "identifier",
        Rule::lparen => "`(`",
        Rule::rparen => "`)`",
        Rule::rbracket => "`]`",
        Rule::comma => "`,`",
        Rule::colon => "`:`",
        Rule::semicolon => "`;`",
        Rule::arrow => "`->`",
        _ => "token",
    }
    .to_string()
}

/// Punctuation rules exist only for error reporting and carry no content.
pub(crate) fn is_punctuation(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::lparen
            | Rule::rparen
            | Rule::rbracket
            | Rule::comma
            | Rule::colon
            | Rule::semicolon
            | Rule::arrow
    )
}
