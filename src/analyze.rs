// ==============================================================================
// Semantic Analysis: Id Allocation, Type Resolution, Layout Validation
// ==============================================================================
//
// Walks the syntax tree in source order and produces resolved `Message`s.
//
// Ids come from a counter owned by the `Analyzer`, which is created fresh for
// every compilation. A request takes the next id; its reply, if any, takes the
// one after. Oneway messages (including `async` ones) take a single id even
// when they declare return values.
//
// The first error aborts analysis. Warnings are collected and returned with
// the result.

use indexmap::IndexMap;
use indexmap::map::Entry;
use miette::SourceSpan;

use crate::ast::{
    DocComment, FieldDecl, FieldsDecl, Ident, IdlFile, MessageDef, MessageKind, Modifier,
    Statement, TypeRef,
};
use crate::error::{CompileDiagnostic, ErrorKind, SourceFile};
use crate::layout::{MAX_RECORD_SIZE, Target, record_size};
use crate::model::types::{BYTES, CSTR};
use crate::model::{Builtin, Field, FieldList, FieldType, Message};
use crate::suggest::{known_type_names, suggest_type};

type Result<T> = std::result::Result<T, Box<CompileDiagnostic>>;

/// The resolved messages of one IDL file.
#[derive(Debug)]
pub(crate) struct Analysis {
    pub messages: Vec<Message>,
    /// The highest id handed out, or 0 if there are no messages.
    pub msgid_max: u32,
    pub warnings: Vec<CompileDiagnostic>,
}

pub(crate) struct Analyzer<'a> {
    src: SourceFile<'a>,
    target: Target,
    next_id: u32,
    /// Generated macro stems (`<NAME>`, `<NAME>_REPLY`) already taken, with the
    /// message name and span that took them.
    taken_names: IndexMap<String, (String, SourceSpan)>,
    /// `///` lines waiting for the next message.
    pending_doc: Vec<DocComment>,
    warnings: Vec<CompileDiagnostic>,
}

impl<'a> Analyzer<'a> {
    pub fn new(src: SourceFile<'a>, target: Target) -> Self {
        Analyzer {
            src,
            target,
            next_id: 1,
            taken_names: IndexMap::new(),
            pending_doc: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Warnings collected so far. Used to recover them when analysis fails.
    pub fn take_warnings(&mut self) -> Vec<CompileDiagnostic> {
        std::mem::take(&mut self.warnings)
    }

    pub fn analyze(&mut self, file: &IdlFile) -> Result<Analysis> {
        let mut messages = Vec::new();
        for statement in &file.statements {
            match statement {
                Statement::DocComment(doc) => self.pending_doc.push(doc.clone()),
                Statement::Message(def) => messages.push(self.visit_message(def)?),
            }
        }

        if let Some(first) = self.pending_doc.first() {
            let last = self.pending_doc.last().unwrap_or(first);
            let span = (
                first.span.offset(),
                last.span.offset() + last.span.len() - first.span.offset(),
            );
            let warning = self
                .src
                .diagnostic(
                    ErrorKind::OrphanDocComment,
                    span,
                    "doc comment is not attached to any message",
                )
                .with_label("no message follows this comment")
                .with_help("move the comment above a message or turn it into a `//` comment");
            self.warnings.push(warning);
            self.pending_doc.clear();
        }

        Ok(Analysis {
            messages,
            msgid_max: self.next_id - 1,
            warnings: self.take_warnings(),
        })
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn visit_message(&mut self, def: &MessageDef) -> Result<Message> {
        let name = &def.name.text;
        let oneway = def.kind == MessageKind::Oneway || def.modifiers.contains(&Modifier::Async);
        let doc = self.take_doc();

        self.claim_name(name.to_uppercase(), &def.name)?;

        let id = self.allocate_id();
        let args = self.resolve_fields(name, &def.args)?;

        let (rets, reply_id) = match &def.rets {
            Some(rets_decl) => {
                let rets = self.resolve_fields(name, rets_decl)?;
                if oneway {
                    self.warn_ignored_return(def);
                    (rets, None)
                } else {
                    self.claim_name(format!("{}_REPLY", name.to_uppercase()), &def.name)?;
                    (rets, Some(self.allocate_id()))
                }
            }
            None if oneway => (FieldList::Fields(Vec::new()), None),
            None => {
                return Err(Box::new(
                    self.src
                        .diagnostic(
                            ErrorKind::MissingReturn,
                            def.name.span,
                            format!("{name}: return values is not specified"),
                        )
                        .with_label("expects a reply but declares no return values")
                        .with_help("Add '-> ()' or consider defining it as 'oneway' message"),
                ));
            }
        };

        let size = self.check_size(name, &def.name, &args)?;
        let reply_size = match reply_id {
            Some(_) => Some(self.check_size(&format!("{name}_reply"), &def.name, &rets)?),
            None => None,
        };

        Ok(Message {
            id,
            reply_id,
            name: name.clone(),
            kind: def.kind,
            modifiers: def.modifiers.clone(),
            oneway,
            doc,
            args,
            rets,
            size,
            reply_size,
        })
    }

    fn take_doc(&mut self) -> Option<String> {
        if self.pending_doc.is_empty() {
            return None;
        }
        let lines: Vec<String> = self.pending_doc.drain(..).map(|d| d.text).collect();
        Some(lines.join("\n"))
    }

    /// Reserve a generated macro stem. `foo` and `FOO` both generate `FOO_MSG`,
    /// and a message `foo_reply` collides with the reply of `foo`.
    fn claim_name(&mut self, stem: String, ident: &Ident) -> Result<()> {
        match self.taken_names.entry(stem) {
            Entry::Vacant(slot) => {
                slot.insert((ident.text.clone(), ident.span));
                Ok(())
            }
            Entry::Occupied(slot) => {
                let (first_name, first_span) = slot.get();
                let message = if *first_name == ident.text {
                    format!("duplicate message name '{}'", ident.text)
                } else {
                    format!(
                        "{}: generated names collide with those of '{first_name}'",
                        ident.text
                    )
                };
                Err(Box::new(
                    self.src
                        .diagnostic(ErrorKind::DuplicateName, ident.span, message)
                        .with_label("redefined here")
                        .with_secondary("first defined here", *first_span)
                        .with_help("message names must be unique, ignoring case and the `_reply` suffix"),
                ))
            }
        }
    }

    fn resolve_fields(&self, msg_name: &str, decl: &FieldsDecl) -> Result<FieldList> {
        let fields = match decl {
            FieldsDecl::Any(_) => return Ok(FieldList::Any),
            FieldsDecl::List(fields) => fields,
        };

        // Names of the C members generated so far, including `<field>_len`.
        let mut members: IndexMap<String, SourceSpan> = IndexMap::new();
        let mut resolved = Vec::with_capacity(fields.len());
        for field in fields {
            let ty = self.resolve_type(msg_name, field)?;
            let mut generated = vec![field.name.text.clone()];
            if let FieldType::Bytes(_) = ty {
                generated.push(format!("{}_len", field.name.text));
            }
            for member in generated {
                if let Some(first) = members.get(&member) {
                    return Err(Box::new(
                        self.src
                            .diagnostic(
                                ErrorKind::DuplicateName,
                                field.name.span,
                                format!("{msg_name}: duplicate field '{member}'"),
                            )
                            .with_label("redefined here")
                            .with_secondary("first defined here", *first)
                            .with_help("field names must be unique within a field list; `bytes` fields also define `<name>_len`"),
                    ));
                }
                members.insert(member, field.name.span);
            }
            resolved.push(Field {
                name: field.name.text.clone(),
                ty,
            });
        }
        Ok(FieldList::Fields(resolved))
    }

    fn resolve_type(&self, msg_name: &str, field: &FieldDecl) -> Result<FieldType> {
        let TypeRef { name, count, span } = &field.ty;
        match name.text.as_str() {
            BYTES => Ok(FieldType::Bytes(self.require_count(msg_name, &name.text, *count, *span)?)),
            CSTR => Ok(FieldType::Cstr(self.require_count(msg_name, &name.text, *count, *span)?)),
            other => match Builtin::from_name(other) {
                Some(builtin) => Ok(FieldType::Scalar {
                    builtin,
                    count: *count,
                }),
                None => {
                    let help = match suggest_type(other) {
                        Some(suggestion) => format!("did you mean `{suggestion}`?"),
                        None => format!(
                            "available types: {} (`bytes` and `cstr` take a length, e.g. `cstr[32]`)",
                            known_type_names().collect::<Vec<_>>().join(", ")
                        ),
                    };
                    Err(Box::new(
                        self.src
                            .diagnostic(
                                ErrorKind::UnresolvedType,
                                name.span,
                                format!("{msg_name}: Unknown data type: '{other}'"),
                            )
                            .with_label(format!("unknown type of field `{}`", field.name.text))
                            .with_help(help),
                    ))
                }
            },
        }
    }

    fn require_count(
        &self,
        msg_name: &str,
        type_name: &str,
        count: Option<u32>,
        span: SourceSpan,
    ) -> Result<u32> {
        count.ok_or_else(|| {
            Box::new(
                self.src
                    .diagnostic(
                        ErrorKind::InvalidArray,
                        span,
                        format!("{msg_name}: '{type_name}' requires a length"),
                    )
                    .with_label("missing `[N]`")
                    .with_help(format!("declare it as `{type_name}[N]`, e.g. `{type_name}[64]`")),
            )
        })
    }

    fn check_size(&self, record: &str, ident: &Ident, fields: &FieldList) -> Result<u64> {
        let size = record_size(fields, self.target);
        if size >= MAX_RECORD_SIZE {
            return Err(Box::new(
                self.src
                    .diagnostic(
                        ErrorKind::MessageTooLarge,
                        ident.span,
                        format!(
                            "'{record}' message is too large, should be less than {MAX_RECORD_SIZE} bytes ({size} bytes on {})",
                            self.target
                        ),
                    )
                    .with_label(format!("`struct {record}_fields` is {size} bytes"))
                    .with_help("shrink the `bytes`/`cstr` buffers or split the payload across messages"),
            ));
        }
        Ok(size)
    }

    fn warn_ignored_return(&mut self, def: &MessageDef) {
        let warning = self
            .src
            .diagnostic(
                ErrorKind::IgnoredReturn,
                def.name.span,
                format!("{}: return values of a oneway message are ignored", def.name.text),
            )
            .with_label("oneway message declares return values")
            .with_help("remove the `-> (...)` clause or declare the message with `rpc`");
        self.warnings.push(warning);
    }
}
