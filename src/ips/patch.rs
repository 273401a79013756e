// IPS patch model: format variant, record list and wire constants.

use std::fmt;
use std::io::Write;

use super::record::Record;
use super::{codec, patcher};
use crate::diff;
use crate::error::{Error, InvalidRecordError};
use crate::io::ByteSource;

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

pub const CLASSIC_HEADER: &[u8; 5] = b"PATCH";
pub const EXTENDED_HEADER: &[u8; 5] = b"IPS32";
pub const CLASSIC_TERMINATOR: &[u8; 3] = b"EOF";
pub const EXTENDED_TERMINATOR: &[u8; 4] = b"EEOF";

/// Largest literal length or RLE count a record can carry.
pub const MAX_RECORD_LEN: usize = 0xFFFF;

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Field-width configuration of a patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `PATCH` ... `EOF`, 24-bit offsets.
    #[default]
    Classic,
    /// `IPS32` ... `EEOF`, 32-bit offsets.
    Extended,
}

impl Variant {
    #[inline]
    pub const fn header(self) -> &'static [u8; 5] {
        match self {
            Self::Classic => CLASSIC_HEADER,
            Self::Extended => EXTENDED_HEADER,
        }
    }

    #[inline]
    pub const fn terminator(self) -> &'static [u8] {
        match self {
            Self::Classic => CLASSIC_TERMINATOR,
            Self::Extended => EXTENDED_TERMINATOR,
        }
    }

    /// Width in bytes of a record's offset field.
    #[inline]
    pub const fn offset_width(self) -> usize {
        match self {
            Self::Classic => 3,
            Self::Extended => 4,
        }
    }

    /// Largest offset the variant can address.
    #[inline]
    pub const fn max_offset(self) -> u64 {
        match self {
            Self::Classic => 0xFF_FFFF,
            Self::Extended => 0xFFFF_FFFF,
        }
    }

    /// The terminator read as an offset field: `0x454F46` / `0x45454F46`.
    ///
    /// A record at this offset would be indistinguishable from the end of
    /// the patch.
    pub fn terminator_offset(self) -> u64 {
        match self {
            Self::Classic => 0x45_4F46,
            Self::Extended => 0x4545_4F46,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => f.write_str("IPS"),
            Self::Extended => f.write_str("IPS32"),
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// An ordered list of records plus the variant they are serialized with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    variant: Variant,
    records: Vec<Record>,
}

/// Summary counters over a patch's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub records: usize,
    pub literal_records: usize,
    pub rle_records: usize,
    /// Bytes carried verbatim by literal records.
    pub literal_bytes: u64,
    /// Target bytes produced by RLE records.
    pub rle_bytes: u64,
}

impl Patch {
    /// Create an empty patch.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            records: Vec::new(),
        }
    }

    /// Compute a patch turning `source` into `target`.
    ///
    /// See [`diff::create`].
    pub fn create(source: &[u8], target: &[u8]) -> Self {
        diff::create(source, target)
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub fn header(&self) -> &'static [u8; 5] {
        self.variant.header()
    }

    #[inline]
    pub fn terminator(&self) -> &'static [u8] {
        self.variant.terminator()
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Switch a classic patch to the extended variant.
    ///
    /// Every classic offset stays valid, and none can spell `EEOF`.
    pub fn promote(&mut self) {
        if self.variant == Variant::Classic {
            log::debug!("promoting patch to {}", Variant::Extended);
            self.variant = Variant::Extended;
        }
    }

    /// Build a record for this patch's variant and append it.
    ///
    /// # Errors
    ///
    /// See [`Record::new`]; additionally rejects offsets that serialize to
    /// the terminator.
    pub fn add_record(
        &mut self,
        offset: u64,
        content: impl Into<Vec<u8>>,
        rle_size: Option<usize>,
    ) -> Result<(), InvalidRecordError> {
        let record = Record::new(self.variant, offset, content, rle_size)?;
        self.push(record)
    }

    /// Append an existing record, checking it against this patch's variant.
    ///
    /// # Errors
    ///
    /// Fails when the offset is out of range for the variant or equals the
    /// terminator.
    pub fn push(&mut self, record: Record) -> Result<(), InvalidRecordError> {
        let offset = record.offset();
        if offset > self.variant.max_offset() {
            return Err(InvalidRecordError::OffsetOutOfRange {
                offset,
                variant: self.variant,
            });
        }
        if offset == self.variant.terminator_offset() {
            return Err(InvalidRecordError::TerminatorOffset { offset });
        }
        self.records.push(record);
        Ok(())
    }

    /// Append a record whose validity the caller guarantees.
    pub(crate) fn push_unchecked(&mut self, record: Record) {
        debug_assert!(record.offset() <= self.variant.max_offset());
        debug_assert_ne!(record.offset(), self.variant.terminator_offset());
        self.records.push(record);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Record> {
        self.records.last_mut()
    }

    pub(crate) fn pop(&mut self) -> Option<Record> {
        self.records.pop()
    }

    /// Replay the patch over `source`, writing the result to `target`.
    ///
    /// Returns the number of bytes written. See [`patcher::apply`].
    pub fn apply<S, W>(&self, source: &mut S, target: &mut W) -> Result<u64, Error>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        patcher::apply(self, source, target)
    }

    /// Exact size of the serialized patch.
    pub fn encoded_len(&self) -> usize {
        self.header().len()
            + self
                .records
                .iter()
                .map(|r| r.encoded_len(self.variant))
                .sum::<usize>()
            + self.terminator().len()
    }

    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::serialize(self)
    }

    pub fn stats(&self) -> PatchStats {
        self.records
            .iter()
            .fold(PatchStats::default(), |mut stats, r| {
                stats.records += 1;
                if r.is_rle() {
                    stats.rle_records += 1;
                    stats.rle_bytes += r.payload_len() as u64;
                } else {
                    stats.literal_records += 1;
                    stats.literal_bytes += r.payload_len() as u64;
                }
                stats
            })
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
