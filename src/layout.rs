// ==============================================================================
// Record Layout
// ==============================================================================
//
// Computes `sizeof` for the generated `struct <msg>_fields` records the way a
// C compiler lays them out: each member is placed at the next multiple of its
// alignment and the total is rounded up to the largest member alignment. An
// empty struct has size 0 (GNU C).
//
// Sizes depend on the data model. The IPC runtime builds for riscv32 (ILP32),
// where `size_t` and the address typedefs are 32 bits but `int64_t` is still
// 8-byte aligned; LP64 widens the `uintmax_t`-based typedefs to 64 bits.

use std::fmt;
use std::str::FromStr;

use crate::model::{Builtin, FieldList, FieldType};

/// Generated records must be strictly smaller than this many bytes.
pub const MAX_RECORD_SIZE: u64 = 4096;

/// The C data model used to compute record sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Ilp32,
    Lp64,
}

impl Target {
    /// Width of `size_t`, `offset_t`, `uaddr_t` and `paddr_t`.
    fn word(self) -> u64 {
        match self {
            Target::Ilp32 => 4,
            Target::Lp64 => 8,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Ilp32 => "ilp32",
            Target::Lp64 => "lp64",
        })
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ilp32" => Ok(Target::Ilp32),
            "lp64" => Ok(Target::Lp64),
            other => Err(format!(
                "unknown target `{other}` (expected `ilp32` or `lp64`)"
            )),
        }
    }
}

/// Size and alignment of one C object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub size: u64,
    pub align: u64,
}

impl Layout {
    const fn scalar(size: u64) -> Self {
        Layout { size, align: size }
    }

    fn array(self, count: u32) -> Self {
        Layout {
            size: self.size * u64::from(count),
            align: self.align,
        }
    }
}

pub fn builtin_layout(builtin: Builtin, target: Target) -> Layout {
    match builtin {
        Builtin::Char | Builtin::Bool | Builtin::Int8 | Builtin::Uint8 => Layout::scalar(1),
        Builtin::Int16 | Builtin::Uint16 => Layout::scalar(2),
        Builtin::Int
        | Builtin::Uint
        | Builtin::Int32
        | Builtin::Uint32
        | Builtin::Task
        | Builtin::Notifications => Layout::scalar(4),
        Builtin::Int64 | Builtin::Uint64 => Layout::scalar(8),
        Builtin::Size | Builtin::Offset | Builtin::Uaddr | Builtin::Paddr => {
            Layout::scalar(target.word())
        }
    }
}

/// The C members a field expands to, in order.
fn member_layouts(ty: FieldType, target: Target) -> Vec<Layout> {
    match ty {
        FieldType::Scalar {
            builtin,
            count: None,
        } => vec![builtin_layout(builtin, target)],
        FieldType::Scalar {
            builtin,
            count: Some(n),
        } => vec![builtin_layout(builtin, target).array(n)],
        FieldType::Bytes(n) => vec![
            builtin_layout(Builtin::Uint8, target).array(n),
            builtin_layout(Builtin::Size, target),
        ],
        FieldType::Cstr(n) => vec![builtin_layout(Builtin::Char, target).array(n)],
    }
}

/// `sizeof` the record generated for `fields`.
pub fn record_size(fields: &FieldList, target: Target) -> u64 {
    let mut offset: u64 = 0;
    let mut align: u64 = 1;
    for field in fields.fields() {
        for member in member_layouts(field.ty, target) {
            offset = offset.next_multiple_of(member.align) + member.size;
            align = align.max(member.align);
        }
    }
    offset.next_multiple_of(align)
}
