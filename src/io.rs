// Random-access byte source adapters.
//
// The patcher and the differ read their inputs through `ByteSource`, so an
// in-memory buffer and a seekable stream are handled by the same code path.
// Adapters are built once at the API boundary.

use std::io::{self, Read, Seek, SeekFrom};

/// Random-access read capability over a finite byte sequence.
pub trait ByteSource {
    /// Total length in bytes.
    fn length(&mut self) -> io::Result<u64>;

    /// Read up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read, which is only short when the end
    /// of the source is reached. Reading at or past the end returns 0.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Read the whole source into memory.
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let len = usize::try_from(self.length()?)
            .map_err(|_| io::Error::new(io::ErrorKind::OutOfMemory, "source too large"))?;
        let mut out = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = self.read_at(filled as u64, &mut out[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        out.truncate(filled);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// In-memory sources
// ---------------------------------------------------------------------------

/// Copy from `data[offset..]` into `buf`, clamping at the end of `data`.
fn read_slice_at(data: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(off) = usize::try_from(offset) else {
        return 0;
    };
    if off >= data.len() {
        return 0;
    }
    let avail = &data[off..];
    let n = buf.len().min(avail.len());
    buf[..n].copy_from_slice(&avail[..n]);
    n
}

impl ByteSource for &[u8] {
    fn length(&mut self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(read_slice_at(self, offset, buf))
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl ByteSource for Vec<u8> {
    fn length(&mut self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(read_slice_at(self, offset, buf))
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Stream-backed source
// ---------------------------------------------------------------------------

/// Adapter exposing any `Read + Seek` stream (e.g. a `File`) as a source.
#[derive(Debug)]
pub struct SeekSource<R> {
    inner: R,
    len: Option<u64>,
}

impl<R: Read + Seek> SeekSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, len: None }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for SeekSource<R> {
    fn length(&mut self) -> io::Result<u64> {
        if let Some(len) = self.len {
            return Ok(len);
        }
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.len = Some(len);
        Ok(len)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if offset >= self.length()? {
            return Ok(0);
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}
