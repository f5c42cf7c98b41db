//! Record layout descriptors.
//!
//! A [`RecordLayout`] is a static, immutable description of record shape:
//! how many fields a record has, how wide each field is, and how field bytes
//! are to be interpreted. It is created once per file and shared read-only by
//! every other component; nothing here performs I/O.

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};

/// Element type of every field in a record.
///
/// Records are homogeneous: one kind covers all fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl NumericKind {
    /// Width of one field of this kind in bytes.
    #[must_use]
    pub const fn width_bytes(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F64 | Self::I64 | Self::U64 => 8,
        }
    }
}

/// Byte order the file's fields were written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Shape of one fixed-size record: field count, field width, and encoding.
///
/// Invariants, enforced at construction:
/// - `field_count >= 1`
/// - `field_width_bytes > 0`
/// - `field_width_bytes` matches [`NumericKind::width_bytes`] for the declared
///   kind (a disagreeing width could only ever decode garbage, so it is
///   rejected here instead of surfacing as a decode failure mid-scan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    field_count: usize,
    field_width_bytes: usize,
    numeric_kind: NumericKind,
    byte_order: ByteOrder,
}

impl RecordLayout {
    /// Construct a validated layout.
    ///
    /// # Errors
    /// Returns [`ScanError::InvalidLayout`] if `field_count` or
    /// `field_width_bytes` is zero, or if the width disagrees with the kind.
    pub fn new(
        field_count: usize,
        field_width_bytes: usize,
        numeric_kind: NumericKind,
        byte_order: ByteOrder,
    ) -> ScanResult<Self> {
        if field_count == 0 {
            return Err(ScanError::invalid_layout("field_count must be at least 1"));
        }
        if field_width_bytes == 0 {
            return Err(ScanError::invalid_layout("field_width_bytes must be nonzero"));
        }
        if field_width_bytes != numeric_kind.width_bytes() {
            return Err(ScanError::invalid_layout(format!(
                "field_width_bytes {} does not match {:?} width {}",
                field_width_bytes,
                numeric_kind,
                numeric_kind.width_bytes()
            )));
        }
        Ok(Self {
            field_count,
            field_width_bytes,
            numeric_kind,
            byte_order,
        })
    }

    /// Number of fields per record.
    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.field_count
    }

    /// Width of one field in bytes.
    #[must_use]
    pub const fn field_width_bytes(&self) -> usize {
        self.field_width_bytes
    }

    /// Element kind shared by every field.
    #[must_use]
    pub const fn numeric_kind(&self) -> NumericKind {
        self.numeric_kind
    }

    /// Byte order of every field.
    #[must_use]
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Size of one whole record in bytes.
    #[must_use]
    pub const fn record_size_bytes(&self) -> usize {
        self.field_count * self.field_width_bytes
    }
}
