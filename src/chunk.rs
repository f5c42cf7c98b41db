//! Windowed chunk reads over a byte source.
//!
//! [`ChunkReader`] owns one reusable byte buffer and fills it with successive
//! windows handed down by the scan driver. The buffer is fully overwritten on
//! every read, never appended to, and the returned slice borrows from the
//! reader, so holding chunk contents past the next read is a compile error
//! rather than a contract violation to document.

use crate::error::ScanResult;
use crate::source::ByteSource;

/// Reads exact byte windows into a reusable buffer.
pub struct ChunkReader<'a, S: ByteSource> {
    source: &'a mut S,
    buf: Vec<u8>,
}

impl<'a, S: ByteSource> ChunkReader<'a, S> {
    /// Wrap `source` with an empty buffer; the first read sizes it.
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            buf: Vec::new(),
        }
    }

    /// Wrap `source` with a buffer pre-sized to `capacity_bytes`.
    pub fn with_capacity(source: &'a mut S, capacity_bytes: usize) -> Self {
        Self {
            source,
            buf: Vec::with_capacity(capacity_bytes),
        }
    }

    /// Read the window `[offset, offset + len)` and return it as a slice.
    ///
    /// The buffer is resized to exactly `len` and fully overwritten; a
    /// shorter window than the previous call shrinks the visible slice, it
    /// never exposes stale tail bytes.
    ///
    /// # Errors
    /// Propagates [`ScanError::ShortRead`] / [`ScanError::Io`] from the
    /// source unchanged; there is no retry and no partial chunk.
    ///
    /// [`ScanError::ShortRead`]: crate::ScanError::ShortRead
    /// [`ScanError::Io`]: crate::ScanError::Io
    pub fn read_window(&mut self, offset: u64, len: usize) -> ScanResult<&[u8]> {
        self.buf.resize(len, 0);
        self.source.read_exact_at(offset, &mut self.buf)?;
        Ok(&self.buf)
    }
}
