// ==============================================================================
// Builtin Type Catalog
// ==============================================================================
//
// The closed set of scalar types a field may use, plus the two buffer forms
// (`bytes[N]` and `cstr[N]`). Each scalar maps to the C type the IPC runtime's
// `libs/common/types.h` defines for it.

/// A scalar type from the builtin catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Char,
    Bool,
    Int,
    Uint,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Size,
    Offset,
    Uaddr,
    Paddr,
    Task,
    Notifications,
}

impl Builtin {
    /// Every catalog entry, in the order they are listed to users.
    pub const ALL: [Builtin; 18] = [
        Builtin::Char,
        Builtin::Bool,
        Builtin::Int,
        Builtin::Uint,
        Builtin::Int8,
        Builtin::Int16,
        Builtin::Int32,
        Builtin::Int64,
        Builtin::Uint8,
        Builtin::Uint16,
        Builtin::Uint32,
        Builtin::Uint64,
        Builtin::Size,
        Builtin::Offset,
        Builtin::Uaddr,
        Builtin::Paddr,
        Builtin::Task,
        Builtin::Notifications,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    /// The name used in IDL source.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Char => "char",
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Uint => "uint",
            Builtin::Int8 => "int8",
            Builtin::Int16 => "int16",
            Builtin::Int32 => "int32",
            Builtin::Int64 => "int64",
            Builtin::Uint8 => "uint8",
            Builtin::Uint16 => "uint16",
            Builtin::Uint32 => "uint32",
            Builtin::Uint64 => "uint64",
            Builtin::Size => "size",
            Builtin::Offset => "offset",
            Builtin::Uaddr => "uaddr",
            Builtin::Paddr => "paddr",
            Builtin::Task => "task",
            Builtin::Notifications => "notifications",
        }
    }

    /// The C type emitted into the header.
    pub fn c_type(self) -> &'static str {
        match self {
            Builtin::Char => "char",
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Uint => "unsigned",
            Builtin::Int8 => "int8_t",
            Builtin::Int16 => "int16_t",
            Builtin::Int32 => "int32_t",
            Builtin::Int64 => "int64_t",
            Builtin::Uint8 => "uint8_t",
            Builtin::Uint16 => "uint16_t",
            Builtin::Uint32 => "uint32_t",
            Builtin::Uint64 => "uint64_t",
            Builtin::Size => "size_t",
            Builtin::Offset => "offset_t",
            Builtin::Uaddr => "uaddr_t",
            Builtin::Paddr => "paddr_t",
            Builtin::Task => "task_t",
            Builtin::Notifications => "notifications_t",
        }
    }
}

/// IDL name of the byte-buffer form.
pub const BYTES: &str = "bytes";
/// IDL name of the character-buffer form.
pub const CSTR: &str = "cstr";

/// A resolved field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A catalog scalar, or a fixed-size array of one when `count` is set.
    Scalar { builtin: Builtin, count: Option<u32> },
    /// `bytes[N]`: an N-byte buffer plus a `<field>_len` size field.
    Bytes(u32),
    /// `cstr[N]`: an N-byte character buffer.
    Cstr(u32),
}

impl FieldType {
    /// The type name as written in IDL source, without the count.
    pub fn idl_name(&self) -> &'static str {
        match self {
            FieldType::Scalar { builtin, .. } => builtin.name(),
            FieldType::Bytes(_) => BYTES,
            FieldType::Cstr(_) => CSTR,
        }
    }

    pub fn count(&self) -> Option<u32> {
        match *self {
            FieldType::Scalar { count, .. } => count,
            FieldType::Bytes(n) | FieldType::Cstr(n) => Some(n),
        }
    }
}
