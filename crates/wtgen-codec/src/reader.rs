//! Bounds-checked little-endian reads over a byte buffer.

use crate::error::{CodecError, CodecResult};

/// A cursor over a byte slice. Every read is bounds-checked and failures
/// surface as [`CodecError::Truncated`] carrying the decoder stage that hit
/// the end of the buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns the next `n` bytes without advancing, or `None` if fewer
    /// remain.
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        self.buf.get(self.pos..self.pos + n)
    }

    /// Reads `n` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize, stage: &'static str) -> CodecResult<&'a [u8]> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + n)
            .ok_or(CodecError::Truncated { stage })?;
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned 16-bit little-endian value.
    pub fn read_u16_le(&mut self, stage: &'static str) -> CodecResult<u16> {
        let b = self.read_bytes(2, stage)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a signed 16-bit little-endian value.
    pub fn read_i16_le(&mut self, stage: &'static str) -> CodecResult<i16> {
        let b = self.read_bytes(2, stage)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }
}
