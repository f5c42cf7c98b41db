//! File geometry and record-window arithmetic.
//!
//! [`FileGeometry`] is the byte-offset bookkeeping for one file: how many
//! bytes of header precede the record area, how many records the area holds,
//! and how many bytes of footer follow it. The engine never parses header or
//! footer content; it only needs their lengths to place the record area.
//!
//! Callers supply the record count explicitly. It is not inferred from file
//! size alone, since a footer of unknown length makes that inference
//! ambiguous in the general case.

use crate::error::{ScanError, ScanResult};
use crate::layout::RecordLayout;
use serde::{Deserialize, Serialize};

/// Byte-level placement of a file's header, record area, and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileGeometry {
    header_bytes: u64,
    record_count: u64,
    record_size_bytes: usize,
    footer_bytes: u64,
}

impl FileGeometry {
    /// Describe a file holding `record_count` records of `layout` shape,
    /// preceded by `header_bytes` and followed by `footer_bytes` raw bytes.
    ///
    /// Taking the layout (rather than a free-standing record size) keeps the
    /// geometry's record size from drifting out of agreement with it.
    #[must_use]
    pub fn new(
        header_bytes: u64,
        record_count: u64,
        layout: &RecordLayout,
        footer_bytes: u64,
    ) -> Self {
        Self {
            header_bytes,
            record_count,
            record_size_bytes: layout.record_size_bytes(),
            footer_bytes,
        }
    }

    /// Header length in bytes.
    #[must_use]
    pub const fn header_bytes(&self) -> u64 {
        self.header_bytes
    }

    /// Number of records in the record area.
    #[must_use]
    pub const fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Size of one record in bytes.
    #[must_use]
    pub const fn record_size_bytes(&self) -> usize {
        self.record_size_bytes
    }

    /// Footer length in bytes.
    #[must_use]
    pub const fn footer_bytes(&self) -> u64 {
        self.footer_bytes
    }

    /// Total file size implied by this geometry.
    #[must_use]
    pub const fn total_file_size(&self) -> u64 {
        self.header_bytes
            + self.record_count * self.record_size_bytes as u64
            + self.footer_bytes
    }
}

/// Byte window for records `[start_record, start_record + count)`.
///
/// Pure arithmetic, no I/O: `offset = header_bytes + start * record_size`,
/// `length = count * record_size`.
///
/// # Errors
/// Returns [`ScanError::OutOfRange`] if the window extends past the declared
/// record count.
pub fn record_byte_range(
    geometry: &FileGeometry,
    start_record: u64,
    count: u64,
) -> ScanResult<(u64, usize)> {
    if start_record + count > geometry.record_count() {
        return Err(ScanError::OutOfRange {
            start_record,
            count,
            record_count: geometry.record_count(),
        });
    }
    let record_size = geometry.record_size_bytes() as u64;
    let offset = geometry.header_bytes() + start_record * record_size;
    Ok((offset, count as usize * geometry.record_size_bytes()))
}
