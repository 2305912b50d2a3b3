//! Function table: entry offsets, arity and local slot types.
//!
//! Entry layout: code offset (u64), param count (u16), local count (u16),
//! then `local count` type indices (u32 each).

use std::ops::Range;

use serde::Serialize;

use super::cursor::Cursor;
use super::error::{DecodeError, Section};
use super::type_table::{TypeId, TypeTable};

/// Fixed part of an entry, before the local type indices.
const FIXED_SIZE: usize = 12;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct FunctionEntry {
    /// Byte offset of the function body within the instruction stream.
    pub code_offset: u64,
    pub param_count: u16,
    pub local_count: u16,
    /// Type of each local slot; `locals.len() == local_count`.
    pub locals: Vec<TypeId>,
}

/// Decoded function table, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FunctionTable {
    entries: Vec<FunctionEntry>,
}

impl FunctionTable {
    /// Decode entries until the cursor reaches `range.end`.
    ///
    /// Local type indices are stored as-is.
    pub fn parse(bytes: &[u8], range: Range<usize>) -> Result<Self, DecodeError> {
        Self::parse_with(bytes, range, None)
    }

    /// Like [`parse`](Self::parse), but every local type index must address `types`.
    pub fn parse_checked(
        bytes: &[u8],
        range: Range<usize>,
        types: &TypeTable,
    ) -> Result<Self, DecodeError> {
        Self::parse_with(bytes, range, Some(types))
    }

    fn parse_with(
        bytes: &[u8],
        range: Range<usize>,
        types: Option<&TypeTable>,
    ) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::section(bytes, range, Section::FunctionTable)?;
        let mut entries = Vec::new();

        while !cursor.is_at_end() {
            let offset = cursor.position();

            let code_offset = cursor
                .read_u64()
                .map_err(truncated(offset, "8-byte code offset"))?;
            let param_count = cursor
                .read_u16()
                .map_err(truncated(offset, "2-byte param count"))?;
            let local_count = cursor
                .read_u16()
                .map_err(truncated(offset, "2-byte local count"))?;

            let mut locals = Vec::with_capacity(local_count as usize);
            for local in 0..local_count as usize {
                let local_offset = cursor.position();
                let index = cursor
                    .read_u32()
                    .map_err(truncated(offset, "4-byte local type index"))?;
                if let Some(types) = types
                    && !types.contains(TypeId(index))
                {
                    return Err(DecodeError::UnknownLocalType {
                        function: entries.len(),
                        local,
                        index,
                        offset: local_offset,
                        count: types.len(),
                    });
                }
                locals.push(TypeId(index));
            }

            entries.push(FunctionEntry {
                code_offset,
                param_count,
                local_count,
                locals,
            });
        }

        Ok(Self { entries })
    }

    pub fn get(&self, idx: usize) -> Option<&FunctionEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.entries.iter()
    }
}

fn truncated(offset: usize, expected: &'static str) -> impl FnOnce(DecodeError) -> DecodeError {
    move |_| DecodeError::TruncatedFunctionEntry { offset, expected }
}

impl FunctionEntry {
    /// Bytes this entry occupies in the function table.
    pub fn encoded_size(&self) -> usize {
        FIXED_SIZE + 4 * self.locals.len()
    }
}
