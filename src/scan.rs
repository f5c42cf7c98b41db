//! The scan driver: chunked scan-and-filter over a record area.
//!
//! [`Scanner`] walks the record area in chunks of at most `chunk_size`
//! records, evaluates the predicate over each chunk, and accumulates the
//! projected values of matching records in ascending record order. Peak
//! additional memory is one chunk buffer plus the growing result vector,
//! independent of the file's record count, and every record byte is read
//! exactly once.
//!
//! Chunk size is an optimization knob, not a correctness parameter: any
//! `chunk_size >= 1` yields an identical result sequence.
//!
//! The accumulator is owned by the driver and handed to the caller once, on
//! success only. A failed scan returns no partial results, so "no matches"
//! and "aborted mid-scan" can never be confused.

use crate::chunk::ChunkReader;
use crate::error::{ScanError, ScanResult};
use crate::geometry::{FileGeometry, record_byte_range};
use crate::layout::RecordLayout;
use crate::predicate::{Predicate, evaluate, project};
use crate::source::ByteSource;
use crate::value::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observable lifecycle of a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No scan has run yet.
    Idle,
    /// A scan is in progress.
    Scanning,
    /// The most recent scan completed and returned its results.
    Done,
    /// The most recent scan aborted with an error.
    Failed,
}

/// Drives chunked scans and owns the per-scan state.
///
/// One scanner serves one scan at a time; running it again starts a fresh
/// scan with the same configuration. [`ScanState`] describes the most recent
/// run.
pub struct Scanner {
    chunk_size: usize,
    cancel: Option<Arc<AtomicBool>>,
    state: ScanState,
}

impl Scanner {
    /// Create a scanner reading up to `chunk_size` records per chunk.
    ///
    /// # Errors
    /// [`ScanError::InvalidChunkSize`] if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> ScanResult<Self> {
        if chunk_size == 0 {
            return Err(ScanError::InvalidChunkSize);
        }
        Ok(Self {
            chunk_size,
            cancel: None,
            state: ScanState::Idle,
        })
    }

    /// Install a cooperative cancellation flag.
    ///
    /// The flag is checked once per chunk iteration, never mid-chunk; a set
    /// flag fails the scan with [`ScanError::Cancelled`] and no partial
    /// results. Non-cancelled runs are unaffected.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// State of the most recent run.
    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Configured maximum records per chunk.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Scan the whole record area, returning the projected values of every
    /// record matching `predicate`, in ascending record order.
    ///
    /// # Errors
    /// Any layout/geometry/column inconsistency or read failure aborts the
    /// scan immediately; the originating [`ScanError`] is propagated
    /// unchanged and no partial results are returned.
    pub fn run<S: ByteSource>(
        &mut self,
        source: &mut S,
        geometry: &FileGeometry,
        layout: &RecordLayout,
        predicate: &Predicate,
        projection_column: usize,
    ) -> ScanResult<Vec<Value>> {
        self.state = ScanState::Scanning;
        match self.run_inner(source, geometry, layout, predicate, projection_column) {
            Ok(results) => {
                self.state = ScanState::Done;
                Ok(results)
            }
            Err(e) => {
                self.state = ScanState::Failed;
                Err(e)
            }
        }
    }

    fn run_inner<S: ByteSource>(
        &self,
        source: &mut S,
        geometry: &FileGeometry,
        layout: &RecordLayout,
        predicate: &Predicate,
        projection_column: usize,
    ) -> ScanResult<Vec<Value>> {
        validate_scan_inputs(geometry, layout, predicate, projection_column)?;

        let record_size = layout.record_size_bytes();
        let mut reader = ChunkReader::with_capacity(source, self.chunk_size * record_size);
        let mut results = Vec::new();
        let mut cursor: u64 = 0;

        while cursor < geometry.record_count() {
            if let Some(flag) = &self.cancel
                && flag.load(Ordering::Relaxed)
            {
                return Err(ScanError::Cancelled);
            }
            let q = (self.chunk_size as u64).min(geometry.record_count() - cursor);
            let (offset, len) = record_byte_range(geometry, cursor, q)?;
            let bytes = reader.read_window(offset, len)?;
            let mask = evaluate(bytes, layout, predicate, cursor, offset)?;
            let mut projected = project(bytes, layout, &mask, projection_column, cursor, offset)?;
            results.append(&mut projected);
            cursor += q;
        }
        Ok(results)
    }
}

/// Checks shared by the sequential and pipelined drivers, all before any I/O.
fn validate_scan_inputs(
    geometry: &FileGeometry,
    layout: &RecordLayout,
    predicate: &Predicate,
    projection_column: usize,
) -> ScanResult<()> {
    if geometry.record_size_bytes() != layout.record_size_bytes() {
        return Err(ScanError::invalid_layout(format!(
            "geometry record size {} disagrees with layout record size {}",
            geometry.record_size_bytes(),
            layout.record_size_bytes()
        )));
    }
    for column in [predicate.column, projection_column] {
        if column >= layout.field_count() {
            return Err(ScanError::ColumnOutOfRange {
                column,
                field_count: layout.field_count(),
            });
        }
    }
    Ok(())
}

/// Scan `source` in chunks of `chunk_size` records and return the projected
/// values of every record matching `predicate`, in ascending record order.
///
/// Convenience wrapper over [`Scanner`]; see its documentation for the full
/// contract.
///
/// # Errors
/// See [`Scanner::run`].
pub fn scan<S: ByteSource>(
    source: &mut S,
    geometry: &FileGeometry,
    layout: &RecordLayout,
    predicate: &Predicate,
    projection_column: usize,
    chunk_size: usize,
) -> ScanResult<Vec<Value>> {
    Scanner::new(chunk_size)?.run(source, geometry, layout, predicate, projection_column)
}

/// Queue depth between the reading and evaluating halves of the pipeline.
#[cfg(feature = "parallel-scan")]
const PIPELINE_DEPTH: usize = 2;

/// Pipelined variant of [`scan`]: one worker reads chunks, the other
/// evaluates them, connected by a bounded queue of depth 2.
///
/// The queue blocks the reader when full (backpressure) and delivers chunks
/// strictly in read order, so the result sequence is identical to the
/// sequential scan's. The first error on either side aborts the whole scan
/// and is propagated unchanged.
///
/// # Errors
/// See [`Scanner::run`].
#[cfg_attr(docsrs, doc(cfg(feature = "parallel-scan")))]
#[cfg(feature = "parallel-scan")]
pub fn scan_pipelined<S: ByteSource + Send>(
    source: &mut S,
    geometry: &FileGeometry,
    layout: &RecordLayout,
    predicate: &Predicate,
    projection_column: usize,
    chunk_size: usize,
) -> ScanResult<Vec<Value>> {
    use std::sync::mpsc;

    if chunk_size == 0 {
        return Err(ScanError::InvalidChunkSize);
    }
    validate_scan_inputs(geometry, layout, predicate, projection_column)?;

    let mut results = Vec::new();
    std::thread::scope(|s| -> ScanResult<()> {
        // Each queue entry is (first record index, byte offset, chunk bytes).
        let (tx, rx) = mpsc::sync_channel::<ScanResult<(u64, u64, Vec<u8>)>>(PIPELINE_DEPTH);

        s.spawn(move || {
            let mut cursor: u64 = 0;
            while cursor < geometry.record_count() {
                let q = (chunk_size as u64).min(geometry.record_count() - cursor);
                let item = record_byte_range(geometry, cursor, q).and_then(|(offset, len)| {
                    let mut buf = vec![0u8; len];
                    source.read_exact_at(offset, &mut buf)?;
                    Ok((cursor, offset, buf))
                });
                let failed = item.is_err();
                // A closed queue means the evaluator already gave up.
                if tx.send(item).is_err() || failed {
                    break;
                }
                cursor += q;
            }
        });

        for item in rx {
            let (record_index, offset, bytes) = item?;
            let mask = evaluate(&bytes, layout, predicate, record_index, offset)?;
            let mut projected =
                project(&bytes, layout, &mask, projection_column, record_index, offset)?;
            results.append(&mut projected);
        }
        Ok(())
    })?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ByteOrder, NumericKind};
    use crate::predicate::CmpOp;
    use std::io::Cursor;

    fn f32_file(header: usize, rows: &[&[f32]], footer: usize) -> Vec<u8> {
        let mut bytes = vec![0xAA; header];
        for row in rows {
            for v in *row {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        bytes.extend(std::iter::repeat_n(0xBB, footer));
        bytes
    }

    #[test]
    fn scanner_states_track_the_most_recent_run() {
        let layout = RecordLayout::new(2, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let geometry = FileGeometry::new(0, 2, &layout, 0);
        let mut src = Cursor::new(f32_file(0, &[&[1.0, 2.0], &[3.0, 4.0]], 0));
        let pred = Predicate::new(0, CmpOp::Gt, Value::F32(0.0));

        let mut scanner = Scanner::new(1).unwrap();
        assert_eq!(scanner.state(), ScanState::Idle);
        scanner.run(&mut src, &geometry, &layout, &pred, 1).unwrap();
        assert_eq!(scanner.state(), ScanState::Done);

        // Same geometry against a truncated source must fail.
        let mut short = Cursor::new(vec![0u8; 4]);
        assert!(scanner.run(&mut short, &geometry, &layout, &pred, 1).is_err());
        assert_eq!(scanner.state(), ScanState::Failed);
    }

    #[test]
    fn empty_record_area_yields_empty_results() {
        let layout = RecordLayout::new(2, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let geometry = FileGeometry::new(8, 0, &layout, 8);
        let mut src = Cursor::new(f32_file(8, &[], 8));
        let pred = Predicate::new(0, CmpOp::Gt, Value::F32(0.0));
        let out = scan(&mut src, &geometry, &layout, &pred, 1, 64).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_chunk_size_is_rejected_before_any_io() {
        let layout = RecordLayout::new(2, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let geometry = FileGeometry::new(0, 1, &layout, 0);
        let mut src = Cursor::new(Vec::<u8>::new());
        let pred = Predicate::new(0, CmpOp::Gt, Value::F32(0.0));
        let err = scan(&mut src, &geometry, &layout, &pred, 1, 0).unwrap_err();
        assert!(matches!(err, ScanError::InvalidChunkSize));
    }

    #[test]
    fn geometry_layout_disagreement_is_caught_up_front() {
        let layout = RecordLayout::new(2, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let other = RecordLayout::new(3, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let geometry = FileGeometry::new(0, 1, &other, 0);
        let mut src = Cursor::new(vec![0u8; 12]);
        let pred = Predicate::new(0, CmpOp::Gt, Value::F32(0.0));
        let err = scan(&mut src, &geometry, &layout, &pred, 0, 4).unwrap_err();
        assert!(matches!(err, ScanError::InvalidLayout { .. }));
    }
}
