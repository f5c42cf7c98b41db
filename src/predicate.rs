//! Vectorized predicate evaluation over chunk buffers.
//!
//! A chunk is interpreted as a 2-D table: rows are records, columns are
//! fields. [`evaluate`] decodes one column across every row and produces a
//! boolean mask; [`project`] decodes another column for the masked rows only,
//! preserving record order within the chunk. This is the step carrying all
//! the correctness risk in the system: a row/column or width mismatch decodes
//! to garbage rather than an error, which is why chunk length and column
//! bounds are checked before any value is produced.

use crate::error::{ScanError, ScanResult};
use crate::layout::RecordLayout;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CmpOp {
    /// Whether `ordering` (of value vs. threshold) satisfies this operator.
    ///
    /// `None` means an unordered comparison (a NaN side); no operator matches
    /// it, `Ne` included — an unordered row is indistinguishable from garbage
    /// and must not silently pass a filter.
    #[must_use]
    pub fn matches(self, ordering: Option<Ordering>) -> bool {
        let Some(ord) = ordering else { return false };
        match self {
            Self::Gt => ord == Ordering::Greater,
            Self::Ge => ord != Ordering::Less,
            Self::Lt => ord == Ordering::Less,
            Self::Le => ord != Ordering::Greater,
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
        }
    }
}

/// A single-column comparison applied uniformly to every record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Field index the comparison reads.
    pub column: usize,
    /// Comparison operator.
    pub op: CmpOp,
    /// Right-hand side of the comparison.
    pub threshold: Value,
}

impl Predicate {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(column: usize, op: CmpOp, threshold: Value) -> Self {
        Self {
            column,
            op,
            threshold,
        }
    }
}

/// Number of whole records in `chunk_bytes`, or a decode error.
///
/// `record_index` and `offset` locate the chunk for diagnostics.
fn chunk_record_count(
    chunk_bytes: &[u8],
    layout: &RecordLayout,
    record_index: u64,
    offset: u64,
) -> ScanResult<usize> {
    let record_size = layout.record_size_bytes();
    if chunk_bytes.len() % record_size != 0 {
        return Err(ScanError::decode(
            record_index,
            offset,
            format!(
                "chunk length {} is not a multiple of record size {}",
                chunk_bytes.len(),
                record_size
            ),
        ));
    }
    Ok(chunk_bytes.len() / record_size)
}

fn check_column(column: usize, layout: &RecordLayout) -> ScanResult<()> {
    if column >= layout.field_count() {
        return Err(ScanError::ColumnOutOfRange {
            column,
            field_count: layout.field_count(),
        });
    }
    Ok(())
}

/// Decode field `column` of record `row` out of `chunk_bytes`. Bounds must
/// already be checked.
fn field(chunk_bytes: &[u8], layout: &RecordLayout, row: usize, column: usize) -> Value {
    let width = layout.field_width_bytes();
    let start = row * layout.record_size_bytes() + column * width;
    Value::decode(
        &chunk_bytes[start..start + width],
        layout.numeric_kind(),
        layout.byte_order(),
    )
}

/// Evaluate `predicate` across every record of the chunk.
///
/// Returns one mask entry per record, in record order. The chunk is located
/// at `record_index`/`offset` for error reporting only.
///
/// # Errors
/// [`ScanError::ColumnOutOfRange`] if the predicate column does not exist;
/// [`ScanError::Decode`] if the chunk is not a whole number of records.
pub fn evaluate(
    chunk_bytes: &[u8],
    layout: &RecordLayout,
    predicate: &Predicate,
    record_index: u64,
    offset: u64,
) -> ScanResult<Vec<bool>> {
    check_column(predicate.column, layout)?;
    let rows = chunk_record_count(chunk_bytes, layout, record_index, offset)?;
    let mut mask = Vec::with_capacity(rows);
    for row in 0..rows {
        let v = field(chunk_bytes, layout, row, predicate.column);
        mask.push(predicate.op.matches(v.compare(&predicate.threshold)));
    }
    Ok(mask)
}

/// Decode field `column` for every masked record, in record order.
///
/// Output length equals the number of `true` entries in `mask`.
///
/// # Errors
/// [`ScanError::ColumnOutOfRange`] if `column` does not exist;
/// [`ScanError::Decode`] if the chunk is not a whole number of records or the
/// mask length disagrees with the chunk's record count.
pub fn project(
    chunk_bytes: &[u8],
    layout: &RecordLayout,
    mask: &[bool],
    column: usize,
    record_index: u64,
    offset: u64,
) -> ScanResult<Vec<Value>> {
    check_column(column, layout)?;
    let rows = chunk_record_count(chunk_bytes, layout, record_index, offset)?;
    if mask.len() != rows {
        return Err(ScanError::decode(
            record_index,
            offset,
            format!("mask length {} does not match {} records", mask.len(), rows),
        ));
    }
    let mut out = Vec::new();
    for (row, keep) in mask.iter().enumerate() {
        if *keep {
            out.push(field(chunk_bytes, layout, row, column));
        }
    }
    Ok(out)
}
