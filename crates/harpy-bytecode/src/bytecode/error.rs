//! Structural decode errors.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use super::constants::HEADER_SIZE;

/// Image section, used to attribute errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    TypeTable,
    ConstPool,
    FunctionTable,
    Bytecode,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::TypeTable => "type table",
            Self::ConstPool => "const pool",
            Self::FunctionTable => "function table",
            Self::Bytecode => "bytecode",
        })
    }
}

/// Decoding failure.
///
/// Offsets are absolute positions in the image, except for
/// [`TruncatedInstruction`](Self::TruncatedInstruction), whose offset is relative to
/// the start of the instruction stream.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated header: {len} bytes (minimum {HEADER_SIZE})")]
    TruncatedHeader { len: usize },

    /// A read would run past the readable end of the buffer.
    #[error(
        "read of {} bytes at offset {} is out of bounds (readable length {limit})",
        range.len(),
        range.start
    )]
    OutOfBounds { range: Range<usize>, limit: usize },

    #[error("bytecode size {size} exceeds image length {len}")]
    BytecodeSizeExceedsImage { size: u32, len: usize },

    /// A section range is reversed or ends past `limit`: the instruction stream
    /// start when derived from the header, the buffer length otherwise.
    #[error("{section} range {start}..{end} is invalid (must end by {limit})")]
    InvalidSectionRange {
        section: Section,
        start: usize,
        end: usize,
        limit: usize,
    },

    #[error("invalid type tag 0x{tag:02x} at offset {offset}: expected one of 0x00..=0x04")]
    InvalidTypeTag { tag: u8, offset: usize },

    #[error("truncated type entry at offset {offset}: expected {expected}")]
    TruncatedTypeEntry {
        offset: usize,
        expected: &'static str,
    },

    #[error("unknown type index {index} at offset {offset}: type table has {count} entries")]
    UnknownTypeIndex {
        index: u32,
        offset: usize,
        count: usize,
    },

    #[error("truncated const entry at offset {offset}: expected {expected}")]
    TruncatedConstEntry {
        offset: usize,
        expected: &'static str,
    },

    #[error("truncated function entry at offset {offset}: expected {expected}")]
    TruncatedFunctionEntry {
        offset: usize,
        expected: &'static str,
    },

    #[error(
        "truncated instruction at bytecode offset 0x{offset:04x}: {mnemonic} needs {size} bytes, {available} available"
    )]
    TruncatedInstruction {
        offset: usize,
        mnemonic: &'static str,
        size: usize,
        available: usize,
    },

    #[error("bad magic {found:02x?}: expected \"harpy\"")]
    BadMagic { found: [u8; 5] },

    #[error(
        "function {function} local {local} at offset {offset}: unknown type index {index} (type table has {count} entries)"
    )]
    UnknownLocalType {
        function: usize,
        local: usize,
        index: u32,
        offset: usize,
        count: usize,
    },

    #[error("bytecode offset mismatch: header declares {declared}, stream starts at {derived}")]
    BytecodeOffsetMismatch { declared: u32, derived: usize },
}

impl DecodeError {
    /// Section the error was raised in.
    pub fn section(&self) -> Section {
        match self {
            Self::TruncatedHeader { .. }
            | Self::OutOfBounds { .. }
            | Self::BytecodeSizeExceedsImage { .. }
            | Self::BadMagic { .. }
            | Self::BytecodeOffsetMismatch { .. } => Section::Header,
            Self::InvalidSectionRange { section, .. } => *section,
            Self::InvalidTypeTag { .. } | Self::TruncatedTypeEntry { .. } => Section::TypeTable,
            Self::UnknownTypeIndex { .. } | Self::TruncatedConstEntry { .. } => Section::ConstPool,
            Self::TruncatedFunctionEntry { .. } | Self::UnknownLocalType { .. } => {
                Section::FunctionTable
            }
            Self::TruncatedInstruction { .. } => Section::Bytecode,
        }
    }
}
