// Bounds-checked big-endian reader over a patch buffer.
//
// All field decoding for the codec goes through `ByteCursor`, so endianness
// and truncation handling live in one place.

use crate::error::FormatError;

/// Forward-only reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            return Err(FormatError::Truncated {
                at: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16, FormatError> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Three-byte big-endian integer (IPS offset field).
    #[inline]
    pub fn read_u24_be(&mut self) -> Result<u32, FormatError> {
        let [hi, mid, lo] = self.read_array::<3>()?;
        Ok(u32::from_be_bytes([0, hi, mid, lo]))
    }

    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32, FormatError> {
        self.read_array().map(u32::from_be_bytes)
    }
}
