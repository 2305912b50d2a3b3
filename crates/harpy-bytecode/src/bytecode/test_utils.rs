//! Test-only image assembly.

use super::constants::{HEADER_SIZE, MAGIC};

/// Assembles a bytecode image section by section.
///
/// Offsets are computed on [`build`](Self::build) so sections tile the image
/// exactly, unless overridden.
pub struct ImageBuilder {
    magic: [u8; 5],
    version: u16,
    flags: u16,
    entry_point: u32,
    types: Vec<u8>,
    consts: Vec<u8>,
    functions: Vec<u8>,
    code: Vec<u8>,
    bytecode_offset: Option<u32>,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            version: 1,
            flags: 0,
            entry_point: 0,
            types: Vec::new(),
            consts: Vec::new(),
            functions: Vec::new(),
            code: Vec::new(),
            bytecode_offset: None,
        }
    }

    pub fn magic(mut self, magic: [u8; 5]) -> Self {
        self.magic = magic;
        self
    }

    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn entry_point(mut self, entry_point: u32) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn bytecode_offset(mut self, offset: u32) -> Self {
        self.bytecode_offset = Some(offset);
        self
    }

    pub fn void(mut self) -> Self {
        self.types.push(0x00);
        self
    }

    pub fn primitive(mut self, kind: u8, width: u8) -> Self {
        self.types.extend([0x01, kind, width]);
        self
    }

    pub fn boxed(mut self, points_to: u32) -> Self {
        self.types.push(0x02);
        self.types.extend(points_to.to_be_bytes());
        self
    }

    pub fn reference(mut self, points_to: u32) -> Self {
        self.types.push(0x03);
        self.types.extend(points_to.to_be_bytes());
        self
    }

    pub fn custom(mut self, width: u8) -> Self {
        self.types.extend([0x04, width]);
        self
    }

    pub fn raw_types(mut self, bytes: &[u8]) -> Self {
        self.types.extend_from_slice(bytes);
        self
    }

    /// Constant with an explicit big-endian value (its width must match the type).
    pub fn constant(mut self, type_index: u32, value: &[u8]) -> Self {
        self.consts.extend(type_index.to_be_bytes());
        self.consts.extend_from_slice(value);
        self
    }

    pub fn function(mut self, code_offset: u64, params: u16, locals: &[u32]) -> Self {
        self.functions.extend(code_offset.to_be_bytes());
        self.functions.extend(params.to_be_bytes());
        self.functions.extend((locals.len() as u16).to_be_bytes());
        for local in locals {
            self.functions.extend(local.to_be_bytes());
        }
        self
    }

    pub fn code(mut self, bytes: &[u8]) -> Self {
        self.code.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let type_table_offset = HEADER_SIZE as u32;
        let const_pool_offset = type_table_offset + self.types.len() as u32;
        let function_table_offset = const_pool_offset + self.consts.len() as u32;
        let bytecode_start = function_table_offset + self.functions.len() as u32;

        let mut out = Vec::new();
        out.extend(self.magic);
        out.extend(self.version.to_be_bytes());
        out.extend(self.flags.to_be_bytes());
        out.extend(self.entry_point.to_be_bytes());
        out.extend(type_table_offset.to_be_bytes());
        out.extend(const_pool_offset.to_be_bytes());
        out.extend(function_table_offset.to_be_bytes());
        out.extend(self.bytecode_offset.unwrap_or(bytecode_start).to_be_bytes());
        out.extend((self.code.len() as u32).to_be_bytes());
        assert_eq!(out.len(), HEADER_SIZE);

        out.extend(self.types);
        out.extend(self.consts);
        out.extend(self.functions);
        out.extend(self.code);
        out
    }
}

/// Header bytes with explicit field values.
pub fn raw_header(
    type_table_offset: u32,
    const_pool_offset: u32,
    function_table_offset: u32,
    bytecode_offset: u32,
    bytecode_size: u32,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(MAGIC);
    out.extend(1u16.to_be_bytes());
    out.extend(0u16.to_be_bytes());
    out.extend(0u32.to_be_bytes());
    out.extend(type_table_offset.to_be_bytes());
    out.extend(const_pool_offset.to_be_bytes());
    out.extend(function_table_offset.to_be_bytes());
    out.extend(bytecode_offset.to_be_bytes());
    out.extend(bytecode_size.to_be_bytes());
    out
}
