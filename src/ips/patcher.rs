// Patch application: replays records over a source into a target writer.
//
// The write cursor is the number of target bytes written so far. For each
// record the source bytes between the cursor and the record's offset are
// copied verbatim, then the payload is written. After the last record the
// rest of the source is copied.
//
// Gap copies read source bytes at the cursor position, so a record placed
// beyond the end of the source lands directly after the last source byte.
// The trailing copy always appends whatever source remains: a target shorter
// than its source is reproduced only when the final record ends at the
// source's length. Patches generated by the differ for targets at least as
// long as their source always satisfy this; arbitrary patches need not.

use std::io::Write;

use super::patch::Patch;
use super::record::Record;
use crate::error::Error;
use crate::io::ByteSource;

const COPY_BUF_SIZE: usize = 64 * 1024;

/// Replay `patch` over `source`, writing the reconstructed target.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// [`Error::RecordOutOfOrder`] when a record starts before bytes that have
/// already been written, and [`Error::Io`] for read or write failures.
pub fn apply<S, W>(patch: &Patch, source: &mut S, target: &mut W) -> Result<u64, Error>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    let source_len = source.length()?;
    let mut copy_buf = vec![0u8; COPY_BUF_SIZE];
    let mut cursor = 0u64;

    for record in patch {
        let offset = record.offset();
        if offset < cursor {
            return Err(Error::RecordOutOfOrder { offset, cursor });
        }
        cursor += copy_source(source, cursor, offset, target, &mut copy_buf)?;
        write_payload(record, target, &mut copy_buf)?;
        cursor += record.payload_len() as u64;
    }

    cursor += copy_source(source, cursor, source_len, target, &mut copy_buf)?;

    log::debug!(
        "applied {} records: {} bytes written from {} source bytes",
        patch.len(),
        cursor,
        source_len
    );
    Ok(cursor)
}

/// Apply `patch` to an in-memory source, returning the target.
pub fn apply_to_vec(patch: &Patch, source: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(source.len());
    let mut src = source;
    apply(patch, &mut src, &mut out)?;
    Ok(out)
}

/// Copy `source[from..to)` to `target`, stopping early at the end of the
/// source. Returns the number of bytes copied.
fn copy_source<S, W>(
    source: &mut S,
    from: u64,
    to: u64,
    target: &mut W,
    buf: &mut [u8],
) -> Result<u64, Error>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    let mut pos = from;
    while pos < to {
        let want = usize::try_from(to - pos).map_or(buf.len(), |n| n.min(buf.len()));
        let n = source.read_at(pos, &mut buf[..want])?;
        if n == 0 {
            break;
        }
        target.write_all(&buf[..n])?;
        pos += n as u64;
    }
    Ok(pos - from)
}

fn write_payload<W: Write + ?Sized>(
    record: &Record,
    target: &mut W,
    buf: &mut [u8],
) -> Result<(), Error> {
    match record.rle_size() {
        None => target.write_all(record.content())?,
        Some(count) => {
            let count = usize::from(count);
            // RLE counts never exceed the copy buffer.
            buf[..count].fill(record.content()[0]);
            target.write_all(&buf[..count])?;
        }
    }
    Ok(())
}
