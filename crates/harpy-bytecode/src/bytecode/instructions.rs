//! Instruction stream decoding.
//!
//! Every opcode has a fixed encoded size; operands are big-endian and follow
//! the opcode byte directly. Unknown opcodes decode as one-byte placeholders so
//! the stream can be walked past forward-compatible extensions.

use std::borrow::Cow;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::cursor::Cursor;
use super::error::DecodeError;

/// Instruction opcodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0x00,
    LoadConst = 0x01,
    PushAddrLocal = 0x10,
    LoadLocal = 0x11,
    StoreLocal = 0x12,
    Load = 0x31,
    Store = 0x32,
    BoxAlloc = 0x40,
    Add = 0x50,
    Sub = 0x51,
    Mul = 0x52,
    Div = 0x53,
    Neg = 0x54,
    Inc = 0x55,
    Jmp = 0x60,
    JmpIfTrue = 0x61,
    JmpIfFalse = 0x62,
    Call = 0x70,
    Ret = 0x71,
    Eq = 0x80,
    Neq = 0x81,
    Lt = 0x82,
    Lte = 0x83,
    Gt = 0x84,
    Gte = 0x85,
    And = 0x86,
    Or = 0x87,
    Not = 0x88,
    Pop = 0x90,
    Dup = 0x91,
    Halt = 0xFF,
}

impl Opcode {
    /// Every opcode, in byte order.
    pub const ALL: [Opcode; 31] = [
        Self::Nop,
        Self::LoadConst,
        Self::PushAddrLocal,
        Self::LoadLocal,
        Self::StoreLocal,
        Self::Load,
        Self::Store,
        Self::BoxAlloc,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Neg,
        Self::Inc,
        Self::Jmp,
        Self::JmpIfTrue,
        Self::JmpIfFalse,
        Self::Call,
        Self::Ret,
        Self::Eq,
        Self::Neq,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Pop,
        Self::Dup,
        Self::Halt,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| *op as u8 == v)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::LoadConst => "LOAD_CONST",
            Self::PushAddrLocal => "PUSH_ADDR_LOCAL",
            Self::LoadLocal => "LOAD_LOCAL",
            Self::StoreLocal => "STORE_LOCAL",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::BoxAlloc => "BOX_ALLOC",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Neg => "NEG",
            Self::Inc => "INC",
            Self::Jmp => "JMP",
            Self::JmpIfTrue => "JMP_IF_TRUE",
            Self::JmpIfFalse => "JMP_IF_FALSE",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Pop => "POP",
            Self::Dup => "DUP",
            Self::Halt => "HALT",
        }
    }

    pub fn operand_kind(self) -> OperandKind {
        match self {
            Self::LoadConst => OperandKind::ConstIndex,
            Self::BoxAlloc => OperandKind::TypeIndex,
            Self::PushAddrLocal | Self::LoadLocal | Self::StoreLocal => OperandKind::LocalIndex,
            Self::Jmp | Self::JmpIfTrue | Self::JmpIfFalse => OperandKind::Address,
            Self::Call => OperandKind::FunctionIndex,
            _ => OperandKind::None,
        }
    }

    /// Encoded size in bytes, opcode included.
    pub fn size(self) -> usize {
        1 + self.operand_kind().width()
    }

    /// Whether this opcode transfers control to an absolute address.
    pub fn is_jump(self) -> bool {
        self.operand_kind() == OperandKind::Address
    }
}

/// Operand encoding rule of an opcode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandKind {
    None,
    /// Constant pool index (u32).
    ConstIndex,
    /// Type table index (u32).
    TypeIndex,
    /// Local slot index (u16).
    LocalIndex,
    /// Absolute byte address in the instruction stream (u64).
    Address,
    /// Function table index (u32).
    FunctionIndex,
}

impl OperandKind {
    pub fn width(self) -> usize {
        match self {
            Self::None => 0,
            Self::LocalIndex => 2,
            Self::ConstIndex | Self::TypeIndex | Self::FunctionIndex => 4,
            Self::Address => 8,
        }
    }

    fn read(self, cursor: &mut Cursor<'_>) -> Result<Option<Operand>, DecodeError> {
        let operand = match self {
            Self::None => return Ok(None),
            Self::ConstIndex => Operand::Const(cursor.read_u32()?),
            Self::TypeIndex => Operand::Type(cursor.read_u32()?),
            Self::LocalIndex => Operand::Local(cursor.read_u16()?),
            Self::Address => Operand::Address(cursor.read_u64()?),
            Self::FunctionIndex => Operand::Function(cursor.read_u32()?),
        };
        Ok(Some(operand))
    }
}

/// Decoded operand value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    Const(u32),
    Type(u32),
    Local(u16),
    Address(u64),
    Function(u32),
}

impl Operand {
    pub fn value(self) -> u64 {
        match self {
            Self::Const(v) | Self::Type(v) | Self::Function(v) => u64::from(v),
            Self::Local(v) => u64::from(v),
            Self::Address(v) => v,
        }
    }
}

/// Addresses render as hex, everything else as decimal.
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(v) => write!(f, "0x{v:04x}"),
            other => write!(f, "{}", other.value()),
        }
    }
}

/// Opcode byte, recognized or not.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Op {
    Known(Opcode),
    Unknown(u8),
}

impl Op {
    pub fn from_u8(v: u8) -> Self {
        Opcode::from_u8(v).map_or(Self::Unknown(v), Self::Known)
    }

    pub fn byte(self) -> u8 {
        match self {
            Self::Known(op) => op as u8,
            Self::Unknown(v) => v,
        }
    }

    pub fn mnemonic(self) -> Cow<'static, str> {
        match self {
            Self::Known(op) => Cow::Borrowed(op.mnemonic()),
            Self::Unknown(v) => Cow::Owned(format!("UNKNOWN_{v:02x}")),
        }
    }

    /// Encoded size; unknown opcodes count as a single byte.
    pub fn size(self) -> usize {
        match self {
            Self::Known(op) => op.size(),
            Self::Unknown(_) => 1,
        }
    }
}

/// One decoded instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Instruction {
    /// Byte offset relative to the start of the instruction stream.
    pub offset: usize,
    pub op: Op,
    pub operand: Option<Operand>,
}

impl Instruction {
    pub fn mnemonic(&self) -> Cow<'static, str> {
        self.op.mnemonic()
    }

    pub fn size(&self) -> usize {
        self.op.size()
    }

    /// Offset of the instruction that follows.
    pub fn next_offset(&self) -> usize {
        self.offset + self.size()
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.op, Op::Unknown(_))
    }
}

impl Serialize for Instruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Instruction", 5)?;
        s.serialize_field("offset", &self.offset)?;
        s.serialize_field("opcode", &self.op.byte())?;
        s.serialize_field("mnemonic", &self.mnemonic())?;
        s.serialize_field("operand", &self.operand)?;
        s.serialize_field("size", &self.size())?;
        s.end()
    }
}

/// Forward-only decoder over an instruction stream.
///
/// Yields `Err` at most once; iteration stops after a truncated instruction.
pub struct InstructionIter<'a> {
    cursor: Cursor<'a>,
    failed: bool,
}

impl<'a> InstructionIter<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(stream),
            failed: false,
        }
    }

    fn decode_next(&mut self) -> Result<Instruction, DecodeError> {
        let offset = self.cursor.position();
        let op = Op::from_u8(self.cursor.read_u8()?);

        let Op::Known(opcode) = op else {
            return Ok(Instruction {
                offset,
                op,
                operand: None,
            });
        };

        let kind = opcode.operand_kind();
        if self.cursor.remaining() < kind.width() {
            return Err(DecodeError::TruncatedInstruction {
                offset,
                mnemonic: opcode.mnemonic(),
                size: opcode.size(),
                available: self.cursor.limit() - offset,
            });
        }

        Ok(Instruction {
            offset,
            op,
            operand: kind.read(&mut self.cursor)?,
        })
    }
}

impl Iterator for InstructionIter<'_> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_at_end() {
            return None;
        }
        let result = self.decode_next();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Decode a whole instruction stream, left to right.
pub fn decode_stream(stream: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    InstructionIter::new(stream).collect()
}
