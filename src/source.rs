//! Positioned byte sources.
//!
//! A [`ByteSource`] hands out exact byte windows: a read either fills the
//! whole destination buffer or fails. There is no partial-result path, since
//! a silently short chunk would break the scan's no-omission guarantee.
//!
//! [`File`] and in-memory [`Cursor`]s are sources out of the box; any other
//! `Read + Seek` type gets an implementation in one line via
//! [`read_exact_at_from`]. With the `mmap` feature, [`MmapSource`] maps a
//! file once and serves windows as slice copies out of the mapping;
//! truncated or inconsistent files surface the same [`ScanError::ShortRead`]
//! either way.

use crate::error::{ScanError, ScanResult};
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// A seekable byte container supporting positioned exact reads.
pub trait ByteSource {
    /// Fill `buf` with the bytes at `[offset, offset + buf.len())`.
    ///
    /// # Errors
    /// [`ScanError::ShortRead`] if fewer than `buf.len()` bytes exist at
    /// `offset`; [`ScanError::Io`] for any other underlying failure. On
    /// error the contents of `buf` are unspecified.
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanResult<()>;
}

/// Positioned exact read over any `Read + Seek` value.
///
/// Seeks to `offset`, then reads until `buf` is full. A clean end-of-file
/// before that becomes [`ScanError::ShortRead`] with the byte counts; any
/// other failure becomes [`ScanError::Io`]. Interrupted reads are resumed.
///
/// This is the whole [`ByteSource`] contract, so wrapping a new reader type
/// is a one-line `impl` delegating here.
///
/// # Errors
/// See above.
pub fn read_exact_at_from<T: Read + Seek>(
    reader: &mut T,
    offset: u64,
    buf: &mut [u8],
) -> ScanResult<()> {
    reader
        .seek(SeekFrom::Start(offset))
        .map_err(|source| ScanError::Io { offset, source })?;
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ScanError::ShortRead {
                    offset,
                    wanted: buf.len(),
                    got: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(ScanError::Io { offset, source }),
        }
    }
    Ok(())
}

impl ByteSource for File {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanResult<()> {
        read_exact_at_from(self, offset, buf)
    }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanResult<()> {
        read_exact_at_from(self, offset, buf)
    }
}

/// Memory-mapped byte source: map once, slice windows.
///
/// The mapping is immutable and lives as long as the source. Windows beyond
/// the mapped length report [`ScanError::ShortRead`] with the bytes that were
/// actually available, matching the file-backed behavior on truncation.
#[cfg_attr(docsrs, doc(cfg(feature = "mmap")))]
#[cfg(feature = "mmap")]
pub struct MmapSource {
    map: memmap2::Mmap,
}

#[cfg(feature = "mmap")]
impl MmapSource {
    /// Map `file` read-only.
    ///
    /// The map is created with `memmap2`; as with any mapped file,
    /// truncating it while mapped is undefined behavior at the OS level.
    /// Callers needing truncation-tolerance should stick to the
    /// `Read + Seek` path.
    ///
    /// # Errors
    /// [`ScanError::Io`] if the mapping cannot be created.
    pub fn new(file: &File) -> ScanResult<Self> {
        let map = unsafe { memmap2::Mmap::map(file) }
            .map_err(|source| ScanError::Io { offset: 0, source })?;
        Ok(Self { map })
    }

    /// Open and map the file at `path` read-only.
    ///
    /// # Errors
    /// [`ScanError::Io`] if the file cannot be opened or mapped.
    pub fn open(path: impl AsRef<std::path::Path>) -> ScanResult<Self> {
        let file =
            File::open(path).map_err(|source| ScanError::Io { offset: 0, source })?;
        Self::new(&file)
    }

    /// Length of the mapped file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the mapped file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(feature = "mmap")]
impl ByteSource for MmapSource {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanResult<()> {
        let start = usize::try_from(offset).map_err(|_| ScanError::ShortRead {
            offset,
            wanted: buf.len(),
            got: 0,
        })?;
        let available = self.map.len().saturating_sub(start);
        if available < buf.len() {
            return Err(ScanError::ShortRead {
                offset,
                wanted: buf.len(),
                got: available,
            });
        }
        buf.copy_from_slice(&self.map[start..start + buf.len()]);
        Ok(())
    }
}
