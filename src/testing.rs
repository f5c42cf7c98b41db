//! Testing utilities for scan callers.
//!
//! The engine itself never generates files; that is a collaborator concern.
//! This module is that collaborator for tests: it writes synthetic
//! header/records/footer fixtures, persists layout+geometry manifests as
//! JSON sidecars, and wraps byte sources with accounting so tests can assert
//! the engine's exact-coverage guarantee.
//!
//! # Quick start
//!
//! ```no_run
//! use binscan::testing::*;
//! use binscan::{ByteOrder, CmpOp, NumericKind, Predicate, RecordLayout, Value, scan};
//!
//! # fn main() -> anyhow::Result<()> {
//! let tmp = tempfile::tempdir()?;
//! let path = tmp.path().join("records.bin");
//!
//! let layout = RecordLayout::new(2, 4, NumericKind::F32, ByteOrder::Little)?;
//! let rows = f32_rows(&[vec![1.0, 10.0], vec![-1.0, 20.0]]);
//! let geometry = write_record_file(&path, 16, 8, &layout, &rows)?;
//!
//! let mut file = std::fs::File::open(&path)?;
//! let out = scan(
//!     &mut file,
//!     &geometry,
//!     &layout,
//!     &Predicate::new(0, CmpOp::Gt, Value::F32(0.0)),
//!     1,
//!     64,
//! )?;
//! assert_eq!(out, vec![Value::F32(10.0)]);
//! # Ok(())
//! # }
//! ```

use crate::error::ScanResult;
use crate::geometry::FileGeometry;
use crate::layout::RecordLayout;
use crate::source::ByteSource;
use crate::value::Value;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// In-memory byte source for tests that never touch the filesystem.
pub type SliceSource = Cursor<Vec<u8>>;

/// Fill byte for synthetic headers and footers. The engine never reads
/// either, so a recognizable pattern helps when eyeballing hexdumps.
pub const PAD_BYTE: u8 = 0xCD;

/// Write a synthetic record file: `header_bytes` of padding, `rows` encoded
/// per `layout`, `footer_bytes` of padding. Parent directories are created
/// as needed.
///
/// Returns the matching [`FileGeometry`].
///
/// # Errors
/// Returns an error if any row disagrees with the layout (field count or
/// value kind) or the file cannot be written.
pub fn write_record_file(
    path: impl AsRef<Path>,
    header_bytes: u64,
    footer_bytes: u64,
    layout: &RecordLayout,
    rows: &[Vec<Value>],
) -> Result<FileGeometry> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    w.write_all(&vec![PAD_BYTE; header_bytes as usize])?;
    let mut record = Vec::with_capacity(layout.record_size_bytes());
    for (i, row) in rows.iter().enumerate() {
        ensure!(
            row.len() == layout.field_count(),
            "row {} has {} fields, layout declares {}",
            i,
            row.len(),
            layout.field_count()
        );
        record.clear();
        for (j, value) in row.iter().enumerate() {
            ensure!(
                value.kind() == layout.numeric_kind(),
                "row {} field {} is {:?}, layout declares {:?}",
                i,
                j,
                value.kind(),
                layout.numeric_kind()
            );
            value.encode_into(layout.byte_order(), &mut record);
        }
        w.write_all(&record)
            .with_context(|| format!("write record {} to {}", i, path.display()))?;
    }
    w.write_all(&vec![PAD_BYTE; footer_bytes as usize])?;
    w.flush()?;

    Ok(FileGeometry::new(
        header_bytes,
        rows.len() as u64,
        layout,
        footer_bytes,
    ))
}

/// Lift plain `f32` rows into [`Value`] rows.
#[must_use]
pub fn f32_rows(rows: &[Vec<f32>]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|row| row.iter().copied().map(Value::F32).collect())
        .collect()
}

/// The standard 12-record fixture used across the integration tests.
///
/// Ten `f32` fields per record. Field 0 carries `record_index + 1`, field 3
/// carries `42.0` at record indices 0, 5, and 11 and `-1.0` elsewhere, so a
/// `field 3 > 0` scan projecting field 0 yields `[1.0, 6.0, 12.0]`.
#[must_use]
pub fn sample_rows() -> Vec<Vec<Value>> {
    (0..12u32)
        .map(|i| {
            let mut row = vec![0.0f32; 10];
            row[0] = (i + 1) as f32;
            row[3] = if matches!(i, 0 | 5 | 11) { 42.0 } else { -1.0 };
            row.into_iter().map(Value::F32).collect()
        })
        .collect()
}

/// Layout plus geometry, persisted next to a fixture as a JSON sidecar.
///
/// This is the sidecar-config pattern callers are expected to use for real
/// files: the record count travels with the file instead of being inferred
/// from its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixtureManifest {
    pub layout: RecordLayout,
    pub geometry: FileGeometry,
}

/// Write `manifest` as pretty-printed JSON at `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or serialized.
pub fn write_manifest(path: impl AsRef<Path>, manifest: &FixtureManifest) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(f, manifest)
        .with_context(|| format!("serialize manifest to {}", path.display()))
}

/// Read a [`FixtureManifest`] back from JSON at `path`.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<FixtureManifest> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(f).with_context(|| format!("parse manifest {}", path.display()))
}

/// [`ByteSource`] wrapper that tallies the bytes and reads requested.
///
/// Lets tests assert the no-over-read guarantee: a full scan requests
/// exactly `record_count * record_size_bytes` bytes, once each.
pub struct CountingSource<S: ByteSource> {
    inner: S,
    bytes_requested: u64,
    reads: u64,
}

impl<S: ByteSource> CountingSource<S> {
    /// Wrap `inner` with zeroed counters.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            bytes_requested: 0,
            reads: 0,
        }
    }

    /// Total bytes requested so far, successful or not.
    #[must_use]
    pub const fn bytes_requested(&self) -> u64 {
        self.bytes_requested
    }

    /// Number of positioned reads issued so far.
    #[must_use]
    pub const fn reads(&self) -> u64 {
        self.reads
    }
}

impl<S: ByteSource> ByteSource for CountingSource<S> {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanResult<()> {
        self.bytes_requested += buf.len() as u64;
        self.reads += 1;
        self.inner.read_exact_at(offset, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ByteOrder, NumericKind};

    #[test]
    fn fixture_file_matches_declared_geometry() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("fixture.bin");
        let layout = RecordLayout::new(3, 4, NumericKind::F32, ByteOrder::Little)?;
        let rows = f32_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let geometry = write_record_file(&path, 7, 5, &layout, &rows)?;

        assert_eq!(geometry.record_count(), 2);
        assert_eq!(std::fs::metadata(&path)?.len(), geometry.total_file_size());
        Ok(())
    }

    #[test]
    fn mismatched_row_width_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.bin");
        let layout = RecordLayout::new(3, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let rows = f32_rows(&[vec![1.0, 2.0]]);
        assert!(write_record_file(&path, 0, 0, &layout, &rows).is_err());
    }

    #[test]
    fn manifest_round_trips_through_json() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("fixture.json");
        let layout = RecordLayout::new(4, 8, NumericKind::F64, ByteOrder::Big)?;
        let manifest = FixtureManifest {
            layout,
            geometry: FileGeometry::new(16, 100, &layout, 4),
        };
        write_manifest(&path, &manifest)?;
        assert_eq!(read_manifest(&path)?, manifest);
        Ok(())
    }
}
