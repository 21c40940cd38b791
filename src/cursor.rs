// Read cursor over an immutable compressed byte slice.
//
// All reads are bounds-checked and never consume partially: a failed read
// leaves the position where it was, so error offsets point at the start of
// the truncated operand.

use crate::error::{DecodeError, Stage};

/// Immutable byte slice plus a read position.
#[derive(Debug, Clone)]
pub struct CompressedCursor<'a> {
    data: &'a [u8],
    pos: usize,
    stage: Stage,
}

impl<'a> CompressedCursor<'a> {
    /// Create a cursor at the start of `data`. `stage` tags any errors raised.
    pub fn new(data: &'a [u8], stage: Stage) -> Self {
        Self { data, pos: 0, stage }
    }

    /// Current read offset from the start of the slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consume the next byte, or `None` at end of input.
    #[inline]
    pub fn next_u8(&mut self) -> Option<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Some(byte)
    }

    /// Read an operand byte. `context` names the operand in the error.
    #[inline]
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        self.next_u8()
            .ok_or_else(|| DecodeError::truncated(self.stage, self.pos, context))
    }

    /// Read a little-endian 16-bit operand.
    #[inline]
    pub fn read_u16_le(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2, context)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Borrow the next `len` bytes.
    #[inline]
    pub fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::truncated(self.stage, self.pos, context));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
