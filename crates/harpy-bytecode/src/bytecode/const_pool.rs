//! Constant pool: typed literal values.
//!
//! Entry layout: type index (u32) followed by a value whose width equals the
//! referenced type's width. Values are kept as unsigned big-endian integers;
//! floats and strings are not reconstructed.

use std::fmt;
use std::ops::Range;

use serde::{Serialize, Serializer};

use super::cursor::Cursor;
use super::error::{DecodeError, Section};
use super::type_table::{TypeId, TypeTable};

/// Unsigned big-endian integer of arbitrary width.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ConstValue(Vec<u8>);

impl ConstValue {
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoded width in bytes.
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// The value, if it fits in 128 bits.
    pub fn to_u128(&self) -> Option<u128> {
        let significant = self.significant();
        if significant.len() > 16 {
            return None;
        }
        Some(
            significant
                .iter()
                .fold(0u128, |acc, &b| (acc << 8) | u128::from(b)),
        )
    }

    /// The value, if it fits in 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    /// Bytes without leading zeros.
    fn significant(&self) -> &[u8] {
        let first = self.0.iter().position(|&b| b != 0).unwrap_or(self.0.len());
        &self.0[first..]
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.to_u128() {
            return write!(f, "{v}");
        }

        // Schoolbook division by 10 over the big-endian digits.
        let mut num = self.significant().to_vec();
        let mut digits = Vec::new();
        while num.iter().any(|&b| b != 0) {
            let mut rem = 0u32;
            for byte in num.iter_mut() {
                let acc = (rem << 8) | u32::from(*byte);
                *byte = (acc / 10) as u8;
                rem = acc % 10;
            }
            digits.push(rem as u8);
        }
        let text: String = digits.iter().rev().map(|&d| char::from(b'0' + d)).collect();
        f.write_str(&text)
    }
}

impl Serialize for ConstValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A constant: its type and raw value.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ConstEntry {
    pub type_id: TypeId,
    pub value: ConstValue,
}

/// Decoded constant pool, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConstPool {
    entries: Vec<ConstEntry>,
}

impl ConstPool {
    /// Decode entries until the cursor reaches `range.end`.
    ///
    /// Each value's width is looked up in `types`, so the full type table
    /// must be decoded first.
    pub fn parse(
        bytes: &[u8],
        range: Range<usize>,
        types: &TypeTable,
    ) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::section(bytes, range, Section::ConstPool)?;
        let mut entries = Vec::new();

        while !cursor.is_at_end() {
            let offset = cursor.position();
            let index = cursor
                .read_u32()
                .map_err(|_| DecodeError::TruncatedConstEntry {
                    offset,
                    expected: "4-byte type index",
                })?;
            let type_id = TypeId(index);
            let width = types
                .width_of(type_id)
                .ok_or(DecodeError::UnknownTypeIndex {
                    index,
                    offset,
                    count: types.len(),
                })?;
            let value = cursor
                .read_bytes(width)
                .map_err(|_| DecodeError::TruncatedConstEntry {
                    offset,
                    expected: "value as wide as the referenced type",
                })?;
            entries.push(ConstEntry {
                type_id,
                value: ConstValue::from_be_bytes(value),
            });
        }

        Ok(Self { entries })
    }

    pub fn get(&self, idx: usize) -> Option<&ConstEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstEntry> {
        self.entries.iter()
    }
}
