// Error types for parsing, building and applying IPS patches.
//
// `FormatError` covers malformed patch streams, `InvalidRecordError` covers
// records that do not fit the wire format, and `Error` is the umbrella type
// returned by the operations that also touch I/O.

use std::io;

use thiserror::Error;

use crate::ips::Variant;

// ---------------------------------------------------------------------------
// Format errors
// ---------------------------------------------------------------------------

/// The byte stream is not a well-formed IPS / IPS32 patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The first five bytes are neither `PATCH` nor `IPS32`.
    #[error("unrecognized header {0:02X?}")]
    UnrecognizedHeader([u8; 5]),
    /// The input ended before the terminator was found.
    #[error("truncated patch: needed {needed} bytes at offset {at}, {available} available")]
    Truncated {
        at: usize,
        needed: usize,
        available: usize,
    },
}

// ---------------------------------------------------------------------------
// Record errors
// ---------------------------------------------------------------------------

/// A record cannot be represented in the patch's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRecordError {
    /// The offset does not fit the variant's 24- or 32-bit offset field.
    #[error("offset {offset:#X} is too large for the {variant} format")]
    OffsetOutOfRange { offset: u64, variant: Variant },
    /// The offset would serialize to the same bytes as the terminator.
    #[error("offset {offset:#X} collides with the end-of-patch marker")]
    TerminatorOffset { offset: u64 },
    /// RLE repeat count exceeds 65535.
    #[error("RLE size {0} is too large")]
    RleSizeTooLarge(usize),
    /// RLE records carry exactly one fill byte.
    #[error("RLE content must be exactly one byte, got {0}")]
    RleContentLength(usize),
    /// Literal payload exceeds 65535 bytes.
    #[error("literal content of {0} bytes is too large")]
    LiteralTooLong(usize),
    /// A zero-length literal would be read back as an RLE record.
    #[error("literal content is empty")]
    EmptyLiteral,
}

// ---------------------------------------------------------------------------
// Crate error
// ---------------------------------------------------------------------------

/// Errors returned by stream-level operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecordError),
    /// A record starts before bytes that have already been written.
    #[error("record at offset {offset:#X} starts before the write cursor {cursor:#X}")]
    RecordOutOfOrder { offset: u64, cursor: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_header_message() {
        let err = FormatError::UnrecognizedHeader(*b"HELLO");
        assert!(err.to_string().starts_with("unrecognized header"));
    }

    #[test]
    fn record_error_converts_into_crate_error() {
        let err: Error = InvalidRecordError::EmptyLiteral.into();
        assert!(matches!(
            err,
            Error::InvalidRecord(InvalidRecordError::EmptyLiteral)
        ));
    }

    #[test]
    fn offset_error_names_variant() {
        let err = InvalidRecordError::OffsetOutOfRange {
            offset: 0x100_0000,
            variant: Variant::Classic,
        };
        assert_eq!(
            err.to_string(),
            "offset 0x1000000 is too large for the IPS format"
        );
    }
}
