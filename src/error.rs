//! Error taxonomy for the scan engine.
//!
//! Every failure aborts the in-progress scan and is surfaced to the caller
//! with enough context (record index, byte offset) to diagnose the mismatch.
//! None of these conditions are retried: they all stem from configuration or
//! data inconsistencies, not transient faults, and the engine never downgrades
//! a failure to a log line.

use std::fmt;
use std::io;

/// Result alias used throughout the engine.
pub type ScanResult<T> = Result<T, ScanError>;

/// All the ways a scan can fail.
#[derive(Debug)]
pub enum ScanError {
    /// Malformed record layout description, detected at construction.
    InvalidLayout {
        /// What made the layout unusable.
        reason: String,
    },
    /// A requested record window exceeds the declared record count.
    ///
    /// Indicates a geometry/caller bug, not a file problem.
    OutOfRange {
        /// First record of the rejected window.
        start_record: u64,
        /// Number of records requested.
        count: u64,
        /// Declared total record count.
        record_count: u64,
    },
    /// A predicate or projection column index is outside the record's fields.
    ColumnOutOfRange {
        /// The offending column index.
        column: usize,
        /// Number of fields per record.
        field_count: usize,
    },
    /// The underlying source yielded fewer bytes than the window asked for.
    ///
    /// Signals file truncation or a geometry mismatch. Never padded or
    /// retried: a silently short chunk would fabricate data.
    ShortRead {
        /// Absolute byte offset of the read.
        offset: u64,
        /// Bytes the window required.
        wanted: usize,
        /// Bytes actually available.
        got: usize,
    },
    /// A chunk's raw bytes cannot be interpreted under the declared layout.
    ///
    /// Unreachable when geometry and layout are consistent; its appearance
    /// means they are not, and that must be surfaced rather than swallowed.
    Decode {
        /// Index of the first record of the offending chunk.
        record_index: u64,
        /// Absolute byte offset of the chunk.
        offset: u64,
        /// What failed to decode.
        reason: String,
    },
    /// `chunk_size` was zero; the engine accepts any chunk size ≥ 1.
    InvalidChunkSize,
    /// The scan was cancelled cooperatively between chunk iterations.
    Cancelled,
    /// An underlying I/O failure that is not a clean end-of-file.
    Io {
        /// Absolute byte offset of the failed read.
        offset: u64,
        /// The operating-system error.
        source: io::Error,
    },
}

impl ScanError {
    /// Build an [`ScanError::InvalidLayout`] from any message.
    pub fn invalid_layout<S: Into<String>>(reason: S) -> Self {
        Self::InvalidLayout {
            reason: reason.into(),
        }
    }

    /// Build a [`ScanError::Decode`] from a chunk position and message.
    pub fn decode<S: Into<String>>(record_index: u64, offset: u64, reason: S) -> Self {
        Self::Decode {
            record_index,
            offset,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayout { reason } => write!(f, "invalid record layout: {reason}"),
            Self::OutOfRange {
                start_record,
                count,
                record_count,
            } => write!(
                f,
                "record window [{start_record}, {}) exceeds record count {record_count}",
                start_record + count
            ),
            Self::ColumnOutOfRange {
                column,
                field_count,
            } => write!(
                f,
                "column {column} out of range for a {field_count}-field record"
            ),
            Self::ShortRead {
                offset,
                wanted,
                got,
            } => write!(
                f,
                "short read at byte offset {offset}: wanted {wanted} bytes, got {got}"
            ),
            Self::Decode {
                record_index,
                offset,
                reason,
            } => write!(
                f,
                "decode failure in chunk starting at record {record_index} (byte offset {offset}): {reason}"
            ),
            Self::InvalidChunkSize => write!(f, "chunk size must be at least 1"),
            Self::Cancelled => write!(f, "scan cancelled"),
            Self::Io { offset, source } => {
                write!(f, "i/o error at byte offset {offset}: {source}")
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
