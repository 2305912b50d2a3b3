//! Type table: ordered type descriptors referenced by index.
//!
//! | Tag  | Kind      | Payload (after tag)            | Width    |
//! | ---- | --------- | ------------------------------ | -------- |
//! | 0x00 | Void      | -                              | 0        |
//! | 0x01 | Primitive | kind (u8), width (u8)          | declared |
//! | 0x02 | Boxed     | points_to (u32)                | 8        |
//! | 0x03 | Reference | points_to (u32)                | 8        |
//! | 0x04 | Custom    | width (u8)                     | declared |

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use super::constants::{POINTER_WIDTH, type_tag};
use super::cursor::Cursor;
use super::error::{DecodeError, Section};

/// Index into the type table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primitive kind byte of a [`TypeEntry::Primitive`].
///
/// Unrecognized kind bytes are kept as [`PrimitiveKind::Other`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Int,
    Float,
    Str,
    Bool,
    Other(u8),
}

impl PrimitiveKind {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x01 => Self::Int,
            0x02 => Self::Float,
            0x03 => Self::Str,
            0x04 => Self::Bool,
            other => Self::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Int => 0x01,
            Self::Float => 0x02,
            Self::Str => 0x03,
            Self::Bool => 0x04,
            Self::Other(v) => v,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("str"),
            Self::Bool => f.write_str("bool"),
            Self::Other(v) => write!(f, "Unknown(0x{v:02x})"),
        }
    }
}

/// A type descriptor.
///
/// `Boxed` (owning) and `Reference` (non-owning) share a layout but are kept
/// apart so consumers can branch on ownership.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeEntry {
    Void,
    Primitive { primitive: PrimitiveKind, width: u8 },
    Boxed { points_to: TypeId },
    Reference { points_to: TypeId },
    Custom { width: u8 },
}

impl TypeEntry {
    /// Byte width of a value of this type.
    pub fn width(&self) -> usize {
        match self {
            Self::Void => 0,
            Self::Primitive { width, .. } | Self::Custom { width } => *width as usize,
            Self::Boxed { .. } | Self::Reference { .. } => POINTER_WIDTH,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::Void => type_tag::VOID,
            Self::Primitive { .. } => type_tag::PRIMITIVE,
            Self::Boxed { .. } => type_tag::BOXED,
            Self::Reference { .. } => type_tag::REFERENCE,
            Self::Custom { .. } => type_tag::CUSTOM,
        }
    }

    /// Bytes occupied in the type table, tag included.
    pub fn encoded_size(&self) -> usize {
        match self {
            Self::Void => 1,
            Self::Primitive { .. } => 3,
            Self::Boxed { .. } | Self::Reference { .. } => 5,
            Self::Custom { .. } => 2,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Void => "Void",
            Self::Primitive { .. } => "Primitive",
            Self::Boxed { .. } => "Boxed",
            Self::Reference { .. } => "Reference",
            Self::Custom { .. } => "Custom",
        }
    }

    /// Target of a Boxed or Reference type.
    pub fn points_to(&self) -> Option<TypeId> {
        match self {
            Self::Boxed { points_to } | Self::Reference { points_to } => Some(*points_to),
            _ => None,
        }
    }

    /// Decode one entry at the cursor position.
    fn read(cursor: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        let offset = cursor.position();

        let tag = cursor.read_u8().map_err(truncated(offset, "1-byte type tag"))?;
        let entry = match tag {
            type_tag::VOID => Self::Void,
            type_tag::PRIMITIVE => {
                let primitive = cursor
                    .read_u8()
                    .map_err(truncated(offset, "1-byte primitive kind"))?;
                let width = cursor.read_u8().map_err(truncated(offset, "1-byte width"))?;
                Self::Primitive {
                    primitive: PrimitiveKind::from_u8(primitive),
                    width,
                }
            }
            type_tag::BOXED => Self::Boxed {
                points_to: TypeId(
                    cursor
                        .read_u32()
                        .map_err(truncated(offset, "4-byte points_to index"))?,
                ),
            },
            type_tag::REFERENCE => Self::Reference {
                points_to: TypeId(
                    cursor
                        .read_u32()
                        .map_err(truncated(offset, "4-byte points_to index"))?,
                ),
            },
            type_tag::CUSTOM => Self::Custom {
                width: cursor.read_u8().map_err(truncated(offset, "1-byte width"))?,
            },
            tag => return Err(DecodeError::InvalidTypeTag { tag, offset }),
        };
        Ok(entry)
    }
}

fn truncated(offset: usize, expected: &'static str) -> impl FnOnce(DecodeError) -> DecodeError {
    move |_| DecodeError::TruncatedTypeEntry { offset, expected }
}

/// Decoded type table, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeTable {
    entries: Vec<TypeEntry>,
}

impl TypeTable {
    /// Decode entries until the cursor reaches `range.end`.
    pub fn parse(bytes: &[u8], range: Range<usize>) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::section(bytes, range, Section::TypeTable)?;
        let mut entries = Vec::new();
        while !cursor.is_at_end() {
            entries.push(TypeEntry::read(&mut cursor)?);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeEntry> {
        self.entries.get(id.index())
    }

    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.entries.len()
    }

    /// Width of the type at `id`, if it exists.
    pub fn width_of(&self, id: TypeId) -> Option<usize> {
        self.get(id).map(TypeEntry::width)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[TypeEntry] {
        &self.entries
    }
}

impl From<Vec<TypeEntry>> for TypeTable {
    fn from(entries: Vec<TypeEntry>) -> Self {
        Self { entries }
    }
}
