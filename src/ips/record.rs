// IPS record: one literal write or one run-length fill at an offset.
//
// Wire layout (big-endian):
//   offset     3 bytes (IPS) or 4 bytes (IPS32)
//   size       2 bytes, non-zero for a literal
//   payload    `size` literal bytes
// or, for an RLE record:
//   offset     3 / 4 bytes
//   size       2 bytes, always zero
//   count      2 bytes
//   fill       1 byte

use std::io::{self, Write};

use super::patch::{MAX_RECORD_LEN, Variant};
use crate::error::InvalidRecordError;

/// Size of the `size` field and the RLE `count` field.
const SIZE_FIELD_LEN: usize = 2;

/// A single edit in a patch.
///
/// Literal records carry `content` verbatim and have no `rle_size`. RLE
/// records carry exactly one fill byte in `content` and repeat it
/// `rle_size` times.
#[derive(Debug, Clone)]
pub struct Record {
    offset: u64,
    content: Vec<u8>,
    rle_size: Option<u16>,
}

impl Record {
    /// Build a record that will be stored in a patch of the given variant.
    ///
    /// `rle_size` of `None` makes a literal record; `Some(n)` makes an RLE
    /// record repeating the single byte of `content` `n` times.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordError`] when the offset does not fit the
    /// variant, the RLE count exceeds 65535, RLE content is not exactly one
    /// byte, or literal content is empty or longer than 65535 bytes.
    pub fn new(
        variant: Variant,
        offset: u64,
        content: impl Into<Vec<u8>>,
        rle_size: Option<usize>,
    ) -> Result<Self, InvalidRecordError> {
        let content = content.into();

        if rle_size.is_some() && content.len() != 1 {
            return Err(InvalidRecordError::RleContentLength(content.len()));
        }
        if offset > variant.max_offset() {
            return Err(InvalidRecordError::OffsetOutOfRange { offset, variant });
        }

        let rle_size = match rle_size {
            Some(count) => Some(
                u16::try_from(count).map_err(|_| InvalidRecordError::RleSizeTooLarge(count))?,
            ),
            None if content.len() > MAX_RECORD_LEN => {
                return Err(InvalidRecordError::LiteralTooLong(content.len()));
            }
            None if content.is_empty() => return Err(InvalidRecordError::EmptyLiteral),
            None => None,
        };

        Ok(Self {
            offset,
            content,
            rle_size,
        })
    }

    /// Build a literal record.
    pub fn literal(
        variant: Variant,
        offset: u64,
        content: impl Into<Vec<u8>>,
    ) -> Result<Self, InvalidRecordError> {
        Self::new(variant, offset, content, None)
    }

    /// Build an RLE record repeating `fill` `count` times.
    pub fn rle(
        variant: Variant,
        offset: u64,
        fill: u8,
        count: usize,
    ) -> Result<Self, InvalidRecordError> {
        Self::new(variant, offset, vec![fill], Some(count))
    }

    /// Literal record whose bounds the caller has already established.
    pub(crate) fn literal_unchecked(offset: u64, content: Vec<u8>) -> Self {
        debug_assert!(!content.is_empty() && content.len() <= MAX_RECORD_LEN);
        Self {
            offset,
            content,
            rle_size: None,
        }
    }

    /// RLE record whose bounds the caller has already established.
    pub(crate) fn rle_unchecked(offset: u64, fill: u8, count: u16) -> Self {
        Self {
            offset,
            content: vec![fill],
            rle_size: Some(count),
        }
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Literal bytes, or the single fill byte of an RLE record.
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    #[inline]
    pub fn rle_size(&self) -> Option<u16> {
        self.rle_size
    }

    #[inline]
    pub fn is_rle(&self) -> bool {
        self.rle_size.is_some()
    }

    /// Number of target bytes this record writes.
    #[inline]
    pub fn payload_len(&self) -> usize {
        match self.rle_size {
            Some(count) => usize::from(count),
            None => self.content.len(),
        }
    }

    /// First target position after this record.
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.payload_len() as u64
    }

    /// Shorten the payload so that it covers `len` bytes.
    ///
    /// `len` must be non-zero and no larger than the current payload.
    pub(crate) fn truncate(&mut self, len: usize) {
        debug_assert!(len > 0 && len <= self.payload_len());
        match self.rle_size {
            // `len` never exceeds the current u16 count.
            Some(_) => self.rle_size = Some(len as u16),
            None => self.content.truncate(len),
        }
    }

    /// Serialized size of this record in the given variant.
    pub fn encoded_len(&self, variant: Variant) -> usize {
        let body = match self.rle_size {
            Some(_) => SIZE_FIELD_LEN + SIZE_FIELD_LEN + 1,
            None => SIZE_FIELD_LEN + self.content.len(),
        };
        variant.offset_width() + body
    }

    /// Write the record's wire form.
    ///
    /// The offset is truncated to the variant's field width; records built
    /// through [`Record::new`] or a [`Patch`](super::Patch) always fit.
    pub fn write_to<W: Write + ?Sized>(&self, variant: Variant, w: &mut W) -> io::Result<()> {
        let offset = (self.offset as u32).to_be_bytes();
        w.write_all(&offset[4 - variant.offset_width()..])?;

        match self.rle_size {
            Some(count) => {
                w.write_all(&0u16.to_be_bytes())?;
                w.write_all(&count.to_be_bytes())?;
                w.write_all(&self.content)
            }
            None => {
                // Literal length is bounded by MAX_RECORD_LEN at construction.
                w.write_all(&(self.content.len() as u16).to_be_bytes())?;
                w.write_all(&self.content)
            }
        }
    }
}

/// Offsets and content always compare; RLE counts only compare when at
/// least one side has a positive count.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        let counted = |r: &Record| r.rle_size.filter(|&n| n > 0);
        if (counted(self).is_some() || counted(other).is_some()) && self.rle_size != other.rle_size
        {
            return false;
        }
        self.offset == other.offset && self.content == other.content
    }
}

impl Eq for Record {}
