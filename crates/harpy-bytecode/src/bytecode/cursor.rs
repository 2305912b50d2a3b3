//! Bounds-checked forward reader over an immutable byte buffer.

use std::ops::Range;

use super::error::{DecodeError, Section};

/// Reads big-endian integers and raw slices, advancing monotonically.
///
/// Positions are absolute within the underlying buffer; a cursor created with
/// [`Cursor::over`] refuses to read past the end of its range.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor over the whole buffer, starting at 0.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            limit: bytes.len(),
        }
    }

    /// Cursor over `range`, clamped to the buffer length.
    pub fn over(bytes: &'a [u8], range: Range<usize>) -> Self {
        let limit = range.end.min(bytes.len());
        Self {
            bytes,
            pos: range.start.min(limit),
            limit,
        }
    }

    /// Cursor over the `section` table at `range`.
    ///
    /// Unlike [`over`](Self::over), the range is not clamped: it must be ordered
    /// and lie inside the buffer.
    pub fn section(
        bytes: &'a [u8],
        range: Range<usize>,
        section: Section,
    ) -> Result<Self, DecodeError> {
        if range.start > range.end || range.end > bytes.len() {
            return Err(DecodeError::InvalidSectionRange {
                section,
                start: range.start,
                end: range.end,
                limit: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            pos: range.start,
            limit: range.end,
        })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Readable end (exclusive).
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.limit
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let start = self.pos;
        let end = start.checked_add(n).filter(|&end| end <= self.limit);
        let Some(end) = end else {
            return Err(DecodeError::OutOfBounds {
                range: start..start.saturating_add(n),
                limit: self.limit,
            });
        };
        self.pos = end;
        Ok(&self.bytes[start..end])
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.read_array().map(u64::from_be_bytes)
    }
}
