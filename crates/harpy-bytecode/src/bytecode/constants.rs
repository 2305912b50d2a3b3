//! Bytecode format constants.

/// Magic bytes written by the Harpy compiler.
///
/// Decoding never requires them unless strict mode is on.
pub const MAGIC: [u8; 5] = *b"harpy";

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 33;

/// Width of Boxed and Reference values.
pub const POINTER_WIDTH: usize = 8;

/// Type table tags.
pub(crate) mod type_tag {
    pub const VOID: u8 = 0x00;
    pub const PRIMITIVE: u8 = 0x01;
    pub const BOXED: u8 = 0x02;
    pub const REFERENCE: u8 = 0x03;
    pub const CUSTOM: u8 = 0x04;
}
