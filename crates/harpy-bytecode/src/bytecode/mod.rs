//! Bytecode image format.
//!
//! Layout (all multi-byte integers big-endian):
//! Header (33 bytes) → TypeTable → ConstPool → FunctionTable → instruction stream.
//! The instruction stream always occupies the last `bytecode_size` bytes.

mod const_pool;
mod constants;
mod cursor;
mod dump;
mod error;
mod function_table;
mod header;
mod instructions;
mod program;
mod type_table;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod program_tests;

pub use const_pool::{ConstEntry, ConstPool, ConstValue};
pub use constants::{HEADER_SIZE, MAGIC, POINTER_WIDTH};
pub use cursor::Cursor;
pub use dump::dump;
pub use error::{DecodeError, Section};
pub use function_table::{FunctionEntry, FunctionTable};
pub use header::{Header, SectionLayout};
pub use instructions::{Instruction, InstructionIter, Op, Opcode, Operand, OperandKind, decode_stream};
pub use program::{DecodeOptions, Finding, LoadError, Program};
pub use type_table::{PrimitiveKind, TypeEntry, TypeId, TypeTable};
