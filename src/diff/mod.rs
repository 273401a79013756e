// Patch generation: a greedy single forward pass over the target.
//
// Per iteration:
//   1. Skip target bytes that already match the source
//   2. Grow an edit window until 6 matching bytes or 65535 bytes
//   3. Promote to IPS32 once offsets pass 24 bits
//   4. Step back one byte if the offset would spell the terminator
//   5. Clamp the window to the record limit and the target end
//   6. Emit an RLE record for a worthwhile fill run at the window start
//   7. Otherwise cut the literal before a repeat, trim unchanged tail
//      bytes, and emit it as RLE if uniform or as a literal
//
// The heuristic is fixed; its output size is a side effect, not a target.

pub mod scan;

use crate::error::{Error, InvalidRecordError};
use crate::io::ByteSource;
use crate::ips::{MAX_RECORD_LEN, Patch, Record, Variant};

use scan::FillRun;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for patch generation.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Variant generation starts in. Classic patches are promoted to IPS32
    /// automatically when an offset passes 24 bits.
    pub variant: Variant,
}

// ---------------------------------------------------------------------------
// High-level API
// ---------------------------------------------------------------------------

/// Compute a patch that turns `source` into `target`.
///
/// Applying the result to `source` reproduces `target` whenever `target` is
/// at least as long as `source`.
///
/// # Panics
///
/// If a change lies past 4 GiB, which no IPS32 offset can address. Use
/// [`try_create_with_options`] to get an error instead.
pub fn create(source: &[u8], target: &[u8]) -> Patch {
    create_with_options(source, target, &DiffOptions::default())
}

/// Compute a patch between two byte sources.
///
/// Both sources are read into memory once, then diffed.
///
/// # Errors
///
/// Returns [`Error::Io`] if either source cannot be read and
/// [`Error::InvalidRecord`] if a change lies past 4 GiB.
pub fn create_from_sources<S, T>(
    source: &mut S,
    target: &mut T,
    opts: &DiffOptions,
) -> Result<Patch, Error>
where
    S: ByteSource + ?Sized,
    T: ByteSource + ?Sized,
{
    let source = source.read_all()?;
    let target = target.read_all()?;
    Ok(try_create_with_options(&source, &target, opts)?)
}

/// Compute a patch with custom options.
///
/// # Panics
///
/// If a change lies past 4 GiB.
pub fn create_with_options(source: &[u8], target: &[u8], opts: &DiffOptions) -> Patch {
    match try_create_with_options(source, target, opts) {
        Ok(patch) => patch,
        Err(err) => panic!("cannot build patch: {err}"),
    }
}

/// Compute a patch with custom options, failing if a record would start
/// past the IPS32 address space.
///
/// Unchanged bytes past 4 GiB are fine; only an edit there is an error.
///
/// # Errors
///
/// [`InvalidRecordError::OffsetOutOfRange`] for the first such record.
pub fn try_create_with_options(
    source: &[u8],
    target: &[u8],
    opts: &DiffOptions,
) -> Result<Patch, InvalidRecordError> {
    let new_len = target.len();
    let mut patch = Patch::new(opts.variant);
    let mut offset = 0usize;
    let mut last_change = 0usize;

    while offset < new_len {
        offset = scan::skip_unchanged(source, target, offset);
        let mut size =
            scan::grow_window(source, target, offset, last_change.saturating_sub(offset));

        if offset as u64 > Variant::Classic.max_offset() {
            patch.promote();
        }

        // Minimum bytes the record must keep to cover the first change.
        let mut floor = 1;
        if offset as u64 == patch.variant().terminator_offset() {
            log::trace!("offset {offset:#X} collides with terminator, stepping back");
            offset -= 1;
            size += 1;
            floor = 2;
            release_overlap(&mut patch, offset as u64);
        }

        last_change = offset + size;
        size = size.min(MAX_RECORD_LEN).min(new_len - offset);
        if offset == new_len {
            break;
        }
        if offset as u64 > Variant::Extended.max_offset() {
            return Err(InvalidRecordError::OffsetOutOfRange {
                offset: offset as u64,
                variant: Variant::Extended,
            });
        }

        let fill = target[offset];
        let run = scan::fill_run(source, target, offset, size);
        if scan::is_fill_worthy(run) {
            emit_rle(&mut patch, offset, fill, run.len);
            offset += run.len;
            continue;
        }

        let FillRun { size, .. } = run;
        offset += emit_literal_window(&mut patch, source, target, offset, size, floor);
    }

    log::debug!(
        "diffed {} source bytes against {} target bytes: {:?} ({})",
        source.len(),
        new_len,
        patch.stats(),
        patch.variant()
    );
    Ok(patch)
}

// ---------------------------------------------------------------------------
// Record emission
// ---------------------------------------------------------------------------

/// Shrink and emit a window that did not qualify as a fill run. Returns the
/// number of target bytes consumed.
fn emit_literal_window(
    patch: &mut Patch,
    source: &[u8],
    target: &[u8],
    offset: usize,
    mut size: usize,
    floor: usize,
) -> usize {
    if let Some(stop_at) = scan::repeat_cut(target, offset, size)
        && stop_at >= floor
    {
        size = stop_at;
    }
    size = scan::trim_unchanged_tail(source, target, offset, size, floor);

    let window = &target[offset..offset + size];
    if size > scan::WINDOW_FILL_RUN && scan::is_uniform(window) {
        emit_rle(patch, offset, window[0], size);
    } else {
        log::trace!("literal at {offset:#X}: {size} bytes");
        patch.push_unchecked(Record::literal_unchecked(offset as u64, window.to_vec()));
    }
    size
}

fn emit_rle(patch: &mut Patch, offset: usize, fill: u8, count: usize) {
    debug_assert!(count <= MAX_RECORD_LEN);
    log::trace!("rle at {offset:#X}: {count} x {fill:#04X}");
    patch.push_unchecked(Record::rle_unchecked(offset as u64, fill, count as u16));
}

/// Make the last record end at or before `start`, dropping it if nothing
/// remains. The record about to be emitted at `start` rewrites those bytes.
fn release_overlap(patch: &mut Patch, start: u64) {
    let Some(last) = patch.last_mut() else {
        return;
    };
    if last.end() <= start {
        return;
    }
    let keep = (start - last.offset()) as usize;
    if keep == 0 {
        patch.pop();
    } else {
        last.truncate(keep);
    }
}
