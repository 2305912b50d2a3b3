//! Whole-image decoding.
//!
//! Sections are decoded strictly in order, each pass consuming what the
//! previous one produced: header offsets → type table → constant pool (needs
//! type widths) → function table → instruction stream.

use std::fmt;
use std::io;
use std::path::Path;

use serde::Serialize;

use super::const_pool::ConstPool;
use super::constants::HEADER_SIZE;
use super::error::DecodeError;
use super::function_table::FunctionTable;
use super::header::{Header, SectionLayout};
use super::instructions::{Instruction, decode_stream};
use super::type_table::TypeTable;

/// Decoding switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject a wrong magic, unknown local types and a bytecode offset that
    /// disagrees with the derived stream start.
    pub strict: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Non-fatal observation about the image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// `bytecode_offset` differs from `total_length - bytecode_size`.
    /// The derived value is the one used for decoding.
    BytecodeOffsetMismatch { declared: u32, derived: usize },
    /// The type table does not start right after the header.
    TypeTableOffset { declared: u32 },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BytecodeOffsetMismatch { declared, derived } => write!(
                f,
                "header bytecode offset {declared} disagrees with stream start {derived} (using {derived})"
            ),
            Self::TypeTableOffset { declared } => write!(
                f,
                "type table offset {declared} does not follow the {HEADER_SIZE}-byte header"
            ),
        }
    }
}

/// Failure to load an image from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A fully decoded image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Program {
    pub header: Header,
    pub layout: SectionLayout,
    pub types: TypeTable,
    pub constants: ConstPool,
    pub functions: FunctionTable,
    pub instructions: Vec<Instruction>,
    pub findings: Vec<Finding>,
}

impl Program {
    /// Decode with default (lenient) options.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(bytes, DecodeOptions::default())
    }

    pub fn decode_with(bytes: &[u8], options: DecodeOptions) -> Result<Self, DecodeError> {
        let header = Header::parse(bytes)?;
        if options.strict && !header.validate_magic() {
            return Err(DecodeError::BadMagic {
                found: header.magic,
            });
        }

        let layout = header.layout(bytes.len())?;

        let mut findings = Vec::new();
        if header.type_table_offset as usize != HEADER_SIZE {
            findings.push(Finding::TypeTableOffset {
                declared: header.type_table_offset,
            });
        }
        if header.bytecode_offset as usize != layout.bytecode.start {
            if options.strict {
                return Err(DecodeError::BytecodeOffsetMismatch {
                    declared: header.bytecode_offset,
                    derived: layout.bytecode.start,
                });
            }
            findings.push(Finding::BytecodeOffsetMismatch {
                declared: header.bytecode_offset,
                derived: layout.bytecode.start,
            });
        }

        let types = TypeTable::parse(bytes, layout.type_table.clone())?;
        let constants = ConstPool::parse(bytes, layout.const_pool.clone(), &types)?;
        let functions = if options.strict {
            FunctionTable::parse_checked(bytes, layout.function_table.clone(), &types)?
        } else {
            FunctionTable::parse(bytes, layout.function_table.clone())?
        };
        let instructions = decode_stream(&bytes[layout.bytecode.clone()])?;

        Ok(Self {
            header,
            layout,
            types,
            constants,
            functions,
            instructions,
            findings,
        })
    }

    /// Read a file into memory and decode it.
    pub fn from_path(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::decode_with(&bytes, options)?)
    }
}
