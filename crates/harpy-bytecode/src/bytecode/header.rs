//! Bytecode image header (33 bytes).
//!
//! Layout:
//! - 0-4: magic (opaque, display-only)
//! - 5-12: version (u16), flags (u16), entry point (u32)
//! - 13-32: type table, const pool, function table, bytecode offsets and bytecode size (5 × u32)

use std::ops::Range;

use serde::Serialize;

use super::constants::{HEADER_SIZE, MAGIC};
use super::cursor::Cursor;
use super::error::{DecodeError, Section};

/// Decoded image header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Magic bytes, normally `b"harpy"`. Not validated unless decoding strictly.
    pub magic: [u8; 5],
    pub version: u16,
    pub flags: u16,
    /// Byte address of the program entry.
    pub entry_point: u32,
    pub type_table_offset: u32,
    pub const_pool_offset: u32,
    pub function_table_offset: u32,
    /// Informational only: the stream is located from `bytecode_size`.
    pub bytecode_offset: u32,
    pub bytecode_size: u32,
}

/// Absolute byte ranges of the four sections following the header.
///
/// `bytecode.start` is the derived stream start, reported next to the header's
/// declared `bytecode_offset`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionLayout {
    pub type_table: Range<usize>,
    pub const_pool: Range<usize>,
    pub function_table: Range<usize>,
    pub bytecode: Range<usize>,
}

impl Header {
    /// Decode the header from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader { len: bytes.len() });
        }

        let mut cursor = Cursor::over(bytes, 0..HEADER_SIZE);
        Ok(Self {
            magic: cursor.read_array()?,
            version: cursor.read_u16()?,
            flags: cursor.read_u16()?,
            entry_point: cursor.read_u32()?,
            type_table_offset: cursor.read_u32()?,
            const_pool_offset: cursor.read_u32()?,
            function_table_offset: cursor.read_u32()?,
            bytecode_offset: cursor.read_u32()?,
            bytecode_size: cursor.read_u32()?,
        })
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    /// Where the instruction stream starts in an image of `total_len` bytes.
    pub fn bytecode_start(&self, total_len: usize) -> Option<usize> {
        total_len.checked_sub(self.bytecode_size as usize)
    }

    /// Derive section ranges for an image of `total_len` bytes.
    ///
    /// Requires `type_table_offset <= const_pool_offset <= function_table_offset <=
    /// total_len - bytecode_size`. `bytecode_offset` is not consulted.
    pub fn layout(&self, total_len: usize) -> Result<SectionLayout, DecodeError> {
        let bytecode_start = self.bytecode_start(total_len).ok_or(
            DecodeError::BytecodeSizeExceedsImage {
                size: self.bytecode_size,
                len: total_len,
            },
        )?;

        let type_table = section_range(
            Section::TypeTable,
            self.type_table_offset as usize,
            self.const_pool_offset as usize,
            bytecode_start,
        )?;
        let const_pool = section_range(
            Section::ConstPool,
            self.const_pool_offset as usize,
            self.function_table_offset as usize,
            bytecode_start,
        )?;
        let function_table = section_range(
            Section::FunctionTable,
            self.function_table_offset as usize,
            bytecode_start,
            bytecode_start,
        )?;

        Ok(SectionLayout {
            type_table,
            const_pool,
            function_table,
            bytecode: bytecode_start..total_len,
        })
    }
}

fn section_range(
    section: Section,
    start: usize,
    end: usize,
    limit: usize,
) -> Result<Range<usize>, DecodeError> {
    if start > end || end > limit {
        return Err(DecodeError::InvalidSectionRange {
            section,
            start,
            end,
            limit,
        });
    }
    Ok(start..end)
}
