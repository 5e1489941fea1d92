// ==============================================================================
// Syntax Tree
// ==============================================================================
//
// A closed, typed view of the parse tree. The reader lowers pest pairs into
// these nodes; the analyzer matches on them exhaustively, so adding a grammar
// production means adding a variant here and a case there.

use miette::SourceSpan;

/// A parsed IDL file: its statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct IdlFile {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    DocComment(DocComment),
    Message(MessageDef),
}

/// One `///` line, without the slashes.
#[derive(Debug, Clone, PartialEq)]
pub struct DocComment {
    pub text: String,
    pub span: SourceSpan,
}

/// `modifier* kind name(args) (-> (rets))? ;`
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDef {
    pub modifiers: Vec<Modifier>,
    pub kind: MessageKind,
    pub name: Ident,
    pub args: FieldsDecl,
    pub rets: Option<FieldsDecl>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldsDecl {
    /// The `any` marker: the payload layout is left to the caller.
    Any(SourceSpan),
    List(Vec<FieldDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TypeRef,
}

/// `name` or `name[count]`, unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: Ident,
    pub count: Option<u32>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub span: SourceSpan,
}

/// The keyword a message is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Rpc,
    Oneway,
}

impl MessageKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "rpc" => Some(MessageKind::Rpc),
            "oneway" => Some(MessageKind::Oneway),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            MessageKind::Rpc => "rpc",
            MessageKind::Oneway => "oneway",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// The sender does not wait for a reply; implies oneway.
    Async,
}

impl Modifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "async" => Some(Modifier::Async),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Async => "async",
        }
    }
}
