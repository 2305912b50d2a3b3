#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Decoder for compiled Harpy bytecode images.
//!
//! This crate contains:
//! - Binary layout readers (Header, TypeTable, ConstPool, FunctionTable, instruction stream)
//! - The [`Program`] aggregate produced by a single forward decode pass
//! - A text reporter ([`dump`]) for human inspection

pub mod bytecode;

// Re-export commonly used items at crate root
pub use bytecode::{
    ConstEntry, ConstPool, ConstValue, Cursor, DecodeError, DecodeOptions, Finding,
    FunctionEntry, FunctionTable, HEADER_SIZE, Header, Instruction, InstructionIter, LoadError,
    MAGIC, Op, Opcode, Operand, OperandKind, PrimitiveKind, Program, Section, SectionLayout,
    TypeEntry, TypeId, TypeTable, decode_stream, dump,
};
pub use harpy_core::Colors;
