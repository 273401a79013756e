// IPS / IPS32 wire codec.
//
// Stream layout:
//   1. Header: `PATCH` or `IPS32` (5 bytes)
//   2. Records until an offset field spells the terminator
//   3. Terminator: `EOF` (3 bytes) or `EEOF` (4 bytes)
//
// Anything after the terminator is ignored.

use std::io::{self, Read, Write};

use super::cursor::ByteCursor;
use super::patch::{CLASSIC_HEADER, EXTENDED_HEADER, Patch, Variant};
use super::record::Record;
use crate::error::{Error, FormatError};

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse a complete patch from memory.
///
/// # Errors
///
/// [`FormatError::UnrecognizedHeader`] for an unknown magic and
/// [`FormatError::Truncated`] when the input ends before the terminator.
pub fn parse(data: &[u8]) -> Result<Patch, FormatError> {
    let mut cursor = ByteCursor::new(data);

    let variant = match &cursor.read_array::<5>()? {
        EXTENDED_HEADER => Variant::Extended,
        CLASSIC_HEADER => Variant::Classic,
        other => return Err(FormatError::UnrecognizedHeader(*other)),
    };

    let mut patch = Patch::new(variant);
    let terminator = variant.terminator_offset();

    loop {
        let offset = read_offset(&mut cursor, variant)?;
        if offset == terminator {
            break;
        }

        let size = cursor.read_u16_be()?;
        let record = if size == 0 {
            let count = cursor.read_u16_be()?;
            let fill = cursor.read_u8()?;
            Record::rle_unchecked(offset, fill, count)
        } else {
            let content = cursor.read_bytes(usize::from(size))?;
            Record::literal_unchecked(offset, content.to_vec())
        };
        // Offsets come from a field of the variant's width and are not the
        // terminator, so the record is always valid here.
        patch.push_unchecked(record);
    }

    log::debug!(
        "parsed {} patch: {} records, {} trailing bytes",
        variant,
        patch.len(),
        cursor.remaining()
    );
    Ok(patch)
}

/// Read a whole patch stream and parse it.
///
/// # Errors
///
/// I/O failures surface as [`Error::Io`], malformed input as
/// [`Error::Format`].
pub fn read_patch<R: Read + ?Sized>(reader: &mut R) -> Result<Patch, Error> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(parse(&data)?)
}

/// Offset field of the variant's width. The terminator reads as
/// [`Variant::terminator_offset`].
fn read_offset(cursor: &mut ByteCursor<'_>, variant: Variant) -> Result<u64, FormatError> {
    let offset = match variant {
        Variant::Classic => cursor.read_u24_be()?,
        Variant::Extended => cursor.read_u32_be()?,
    };
    Ok(u64::from(offset))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Write header, records in order, then the terminator.
pub fn write_patch<W: Write + ?Sized>(patch: &Patch, w: &mut W) -> io::Result<()> {
    let variant = patch.variant();
    w.write_all(variant.header())?;
    for record in patch {
        record.write_to(variant, w)?;
    }
    w.write_all(variant.terminator())
}

/// Serialize a patch into a new buffer.
pub fn serialize(patch: &Patch) -> Vec<u8> {
    let mut out = Vec::with_capacity(patch.encoded_len());
    // Writing into a Vec cannot fail.
    let _ = write_patch(patch, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classic() {
        let data = b"PATCH\x00\x00\x02\x00\x01B\x00\x00\x10\x00\x00\x00\x04\xFFEOF";
        let patch = parse(data).unwrap();
        assert_eq!(patch.variant(), Variant::Classic);
        assert_eq!(patch.len(), 2);

        let lit = &patch.records()[0];
        assert_eq!((lit.offset(), lit.content(), lit.rle_size()), (2, &b"B"[..], None));

        let run = &patch.records()[1];
        assert_eq!(run.offset(), 0x10);
        assert_eq!(run.content(), &[0xFF]);
        assert_eq!(run.rle_size(), Some(4));
    }

    #[test]
    fn parse_extended_offsets_are_four_byte_big_endian() {
        let data = b"IPS32\x01\x02\x03\x04\x00\x02hi\x00\x45\x4F\x46\x00\x01!EEOF";
        let patch = parse(data).unwrap();
        assert_eq!(patch.variant(), Variant::Extended);
        assert_eq!(patch.records()[0].offset(), 0x0102_0304);
        // "EOF" as a 4-byte offset is an ordinary record in IPS32.
        assert_eq!(patch.records()[1].offset(), 0x45_4F46);
        assert_eq!(patch.records()[1].content(), b"!");
    }

    #[test]
    fn empty_patch() {
        let patch = parse(b"PATCHEOF").unwrap();
        assert!(patch.is_empty());
        assert_eq!(serialize(&patch), b"PATCHEOF");
    }

    #[test]
    fn trailing_bytes_after_terminator_are_ignored() {
        let patch = parse(b"PATCHEOF\x00\x10\x00").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn unknown_header() {
        assert_eq!(
            parse(b"PATCX\x00\x00\x00EOF"),
            Err(FormatError::UnrecognizedHeader(*b"PATCX"))
        );
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(parse(b"PAT"), Err(FormatError::Truncated { at: 0, .. })));
    }

    #[test]
    fn missing_terminator_is_truncated() {
        assert!(matches!(
            parse(b"PATCH\x00\x00\x01\x00\x02a"),
            Err(FormatError::Truncated { at: 10, needed: 2, available: 1 })
        ));
        assert!(matches!(
            parse(b"PATCH\x00\x00\x01\x00\x01a"),
            Err(FormatError::Truncated { .. })
        ));
        assert!(matches!(
            parse(b"IPS32EOF"),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn offset_fields_use_variant_width() {
        let mut c = ByteCursor::new(b"\x12\x34\x56\x78");
        assert_eq!(read_offset(&mut c, Variant::Classic).unwrap(), 0x12_3456);

        let mut c = ByteCursor::new(b"\x12\x34\x56\x78");
        assert_eq!(read_offset(&mut c, Variant::Extended).unwrap(), 0x1234_5678);

        let mut c = ByteCursor::new(b"EOF");
        assert_eq!(
            read_offset(&mut c, Variant::Classic).unwrap(),
            Variant::Classic.terminator_offset()
        );

        let mut c = ByteCursor::new(b"EEOF");
        assert_eq!(
            read_offset(&mut c, Variant::Extended).unwrap(),
            Variant::Extended.terminator_offset()
        );
        assert_eq!(c.remaining(), 0);

        let mut c = ByteCursor::new(b"EO");
        assert_eq!(
            read_offset(&mut c, Variant::Classic),
            Err(FormatError::Truncated {
                at: 0,
                needed: 3,
                available: 2
            })
        );
    }

    #[test]
    fn read_patch_from_stream() {
        let mut reader = io::Cursor::new(b"PATCH\x00\x00\x00\x00\x01zEOF".to_vec());
        let patch = read_patch(&mut reader).unwrap();
        assert_eq!(patch.records()[0].content(), b"z");
    }

    #[test]
    fn serialize_roundtrip() {
        let mut patch = Patch::new(Variant::Extended);
        patch.add_record(0x0100_0000, b"abc".to_vec(), None).unwrap();
        patch.add_record(7, vec![0x55], Some(0x1234)).unwrap();
        let bytes = serialize(&patch);
        assert_eq!(
            bytes,
            b"IPS32\x01\x00\x00\x00\x00\x03abc\x00\x00\x00\x07\x00\x00\x12\x34\x55EEOF"
        );
        assert_eq!(parse(&bytes).unwrap(), patch);
    }
}
