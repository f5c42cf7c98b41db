//! # Binscan
//!
//! An **out-of-core scan-and-filter engine** for fixed-layout binary record
//! files. Binscan reads a file whose record area does not fit comfortably in
//! memory in bounded-size chunks, applies a single-column predicate across
//! each chunk, and returns the projected value of another column for every
//! matching record, in file order.
//!
//! ## Key Properties
//!
//! - **Bounded memory** - peak additional memory is one chunk buffer plus the
//!   results, independent of file size
//! - **Exact coverage** - every record byte is read exactly once; no re-reads,
//!   no gaps
//! - **Chunk-size independence** - any `chunk_size >= 1` produces an identical
//!   result sequence; the knob trades I/O amortization against peak memory
//! - **Fail loud** - truncated files, inconsistent geometry, and bad column
//!   indices abort the scan with a typed error carrying the record index and
//!   byte offset; no partial results, no silent padding, no logging side
//!   channel
//!
//! ## Quick Start
//!
//! ```no_run
//! use binscan::{
//!     ByteOrder, CmpOp, FileGeometry, NumericKind, Predicate, RecordLayout, Value, scan,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! // 12 records of ten little-endian f32 fields, between a 10-byte header
//! // and a 10-byte footer.
//! let layout = RecordLayout::new(10, 4, NumericKind::F32, ByteOrder::Little)?;
//! let geometry = FileGeometry::new(10, 12, &layout, 10);
//!
//! let mut file = std::fs::File::open("records.bin")?;
//! let results = scan(
//!     &mut file,
//!     &geometry,
//!     &layout,
//!     &Predicate::new(3, CmpOp::Gt, Value::F32(0.0)),
//!     /* projection column */ 0,
//!     /* chunk size, in records */ 10_000,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Layout and geometry
//!
//! A [`RecordLayout`] describes record *shape*: field count, field width,
//! numeric kind, byte order. A [`FileGeometry`] places the record area inside
//! one file: header length, record count, footer length. The record count is
//! supplied by the caller, never inferred from file size - a footer of
//! unknown length would make that inference ambiguous. Header and footer
//! content is never parsed.
//!
//! ### Sources and chunks
//!
//! Files and in-memory cursors are [`ByteSource`]s out of the box, and any
//! other `Read + Seek` type becomes one by delegating to
//! [`read_exact_at_from`]; with the `mmap` feature, [`MmapSource`] maps the
//! file once and serves windows out of the mapping.
//! Either way the driver sees the same contract: a positioned read returns
//! the whole requested window or fails with [`ScanError::ShortRead`].
//!
//! ### Predicates and projection
//!
//! A [`Predicate`] compares one column against a threshold [`Value`] with a
//! [`CmpOp`]. Matching records contribute the value of the projection column
//! to the result, in ascending record order. Integer comparisons are exact;
//! float comparisons follow IEEE ordering, and NaN rows match no operator.
//!
//! ### Driving a scan
//!
//! [`scan`] is the one-call entry point. [`Scanner`] is the underlying state
//! machine ([`ScanState`]) for callers that want to observe progress states
//! or install a cooperative cancellation flag, checked between chunks.
//!
//! ## Feature Flags
//!
//! - `mmap` - memory-mapped [`MmapSource`] backend (adds `memmap2`)
//! - `parallel-scan` - [`scan_pipelined`], a two-worker read/evaluate
//!   pipeline over a bounded queue with identical output to [`scan`]
//!
//! Both are enabled by default.
//!
//! ## Module Overview
//!
//! - [`layout`] - record shape descriptors
//! - [`geometry`] - header/record-area/footer bookkeeping and windowing
//! - [`source`] - positioned exact-read byte sources
//! - [`chunk`] - reusable-buffer chunk reads
//! - [`predicate`] - vectorized mask evaluation and projection
//! - [`scan`](mod@scan) - the chunked scan driver
//! - [`error`] - the failure taxonomy
//! - [`testing`] - fixture writers, manifests, and accounting sources

pub mod chunk;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod predicate;
pub mod scan;
pub mod source;
pub mod testing;
pub mod value;

// General re-exports
pub use chunk::ChunkReader;
pub use error::{ScanError, ScanResult};
pub use geometry::{FileGeometry, record_byte_range};
pub use layout::{ByteOrder, NumericKind, RecordLayout};
pub use predicate::{CmpOp, Predicate, evaluate, project};
pub use scan::{ScanState, Scanner, scan};
pub use source::{ByteSource, read_exact_at_from};
pub use value::Value;

// Gated re-exports
#[cfg(feature = "mmap")]
pub use source::MmapSource;

#[cfg(feature = "parallel-scan")]
pub use scan::scan_pipelined;
