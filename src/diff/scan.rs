// Byte-scanning steps of the differ.
//
// Each function looks at one window of the target starting at `offset` and
// returns a length; none of them mutate state. Reads past the end of either
// buffer count as mismatches.

use crate::ips::MAX_RECORD_LEN;

/// Matching bytes needed to close an edit window.
pub const UNCHANGED_RUN: usize = 6;
/// A fill run covering the whole window is RLE-encoded above this length.
pub const WINDOW_FILL_RUN: usize = 3;
/// A fill run at the window start is RLE-encoded above this length.
pub const FILL_RUN: usize = 8;
/// A repeat this long always cuts a literal.
pub const STRONG_REPEAT: usize = 13;
/// A repeat this long cuts a literal at the window end or when periodic.
pub const REPEAT: usize = 8;
/// Bytes compared when probing for periodicity.
const REPEAT_PROBE: usize = 8;

#[inline]
fn unchanged_at(source: &[u8], target: &[u8], pos: usize) -> bool {
    pos < source.len() && target.get(pos) == Some(&source[pos])
}

/// Up to `REPEAT_PROBE` bytes of `target` from `pos`, clamped at the end.
#[inline]
fn probe(target: &[u8], pos: usize) -> &[u8] {
    let start = pos.min(target.len());
    let end = pos.saturating_add(REPEAT_PROBE).min(target.len());
    &target[start..end]
}

/// Advance `offset` past target bytes that equal the source.
pub fn skip_unchanged(source: &[u8], target: &[u8], offset: usize) -> usize {
    let common = source.len().min(target.len());
    if offset >= common {
        return offset;
    }
    offset
        + source[offset..common]
            .iter()
            .zip(&target[offset..common])
            .take_while(|(a, b)| a == b)
            .count()
}

/// Grow an edit window at `offset`, starting from `size` bytes.
///
/// Stops once `UNCHANGED_RUN` consecutive bytes past the window match the
/// source, or the window reaches `MAX_RECORD_LEN`. Shorter matching gaps
/// are absorbed into the window. The result may extend past the target.
pub fn grow_window(source: &[u8], target: &[u8], offset: usize, mut size: usize) -> usize {
    let mut unchanged = 0;
    loop {
        if unchanged_at(source, target, offset + size + unchanged) {
            unchanged += 1;
        } else {
            size += unchanged + 1;
            unchanged = 0;
        }
        if unchanged >= UNCHANGED_RUN || size >= MAX_RECORD_LEN {
            return size;
        }
    }
}

/// Result of [`fill_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRun {
    /// Length of the run of `target[offset]` from the window start.
    pub len: usize,
    /// Window size, grown if the run was extended past it.
    pub size: usize,
}

/// Measure the run of `target[offset]` at the start of a `size`-byte window.
///
/// When the run fills the whole window it is extended further: bytes that
/// continue the run are taken in, including ones the source already has,
/// as long as another byte the source lacks follows them.
pub fn fill_run(source: &[u8], target: &[u8], offset: usize, size: usize) -> FillRun {
    let fill = target[offset];
    let mut len = 1 + target[offset + 1..offset + size]
        .iter()
        .take_while(|&&b| b == fill)
        .count();
    let mut size = size;

    if len == size {
        let mut pending = 0;
        loop {
            let pos = offset + len + pending - 1;
            if target.get(pos) != Some(&fill) || len + pending > MAX_RECORD_LEN {
                break;
            }
            if source.get(pos) != Some(&fill) {
                len += pending;
                size += pending;
                pending = 0;
            }
            pending += 1;
        }
    }

    FillRun { len, size }
}

/// Whether a fill run should be emitted as an RLE record.
#[inline]
pub fn is_fill_worthy(run: FillRun) -> bool {
    (run.len > WINDOW_FILL_RUN && run.len == run.size) || run.len > FILL_RUN
}

/// Find where a literal window should stop because a repeat begins.
///
/// Walks runs of equal bytes through the window. Returns the start of the
/// first run longer than `STRONG_REPEAT`, or longer than `REPEAT` that
/// either reaches the window end or looks periodic. The returned position
/// may be 0.
pub fn repeat_cut(target: &[u8], offset: usize, size: usize) -> Option<usize> {
    let mut same = 0;
    let mut stop_at = 0;
    while stop_at + same < size {
        if target[offset + stop_at] == target[offset + stop_at + same] {
            same += 1;
        } else {
            stop_at += same;
            same = 0;
        }

        let here = offset + stop_at + same;
        if same > STRONG_REPEAT
            || (same > REPEAT
                && (stop_at + same == size || probe(target, here) == probe(target, here + 1)))
        {
            return Some(stop_at);
        }
    }
    None
}

/// Drop trailing window bytes that already equal the source, keeping at
/// least `floor` bytes.
pub fn trim_unchanged_tail(
    source: &[u8],
    target: &[u8],
    offset: usize,
    mut size: usize,
    floor: usize,
) -> usize {
    while size > floor && unchanged_at(source, target, offset + size - 1) {
        size -= 1;
    }
    size
}

#[inline]
pub fn is_uniform(window: &[u8]) -> bool {
    window.windows(2).all(|w| w[0] == w[1])
}
