//! Numeric scalar shared by predicates and projections.
//!
//! A [`Value`] is one decoded field. Decoding is bit-for-bit against the
//! layout's declared kind and byte order; any mismatch there yields garbage
//! values rather than an error, which is exactly why the layout is validated
//! at construction and never guessed.

use crate::layout::{ByteOrder, NumericKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One decoded field value, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Value {
    /// Decode one field from `bytes`, which must be exactly
    /// `kind.width_bytes()` long.
    ///
    /// # Panics
    /// Panics if `bytes` has the wrong length. Callers slice fields out of a
    /// chunk whose length was already checked, so a wrong length here is a
    /// bug in the slicing arithmetic, not a data condition.
    #[must_use]
    pub fn decode(bytes: &[u8], kind: NumericKind, order: ByteOrder) -> Self {
        macro_rules! read {
            ($ty:ty, $variant:ident) => {{
                let raw: [u8; size_of::<$ty>()] = bytes.try_into().unwrap();
                match order {
                    ByteOrder::Little => Self::$variant(<$ty>::from_le_bytes(raw)),
                    ByteOrder::Big => Self::$variant(<$ty>::from_be_bytes(raw)),
                }
            }};
        }
        match kind {
            NumericKind::F32 => read!(f32, F32),
            NumericKind::F64 => read!(f64, F64),
            NumericKind::I8 => read!(i8, I8),
            NumericKind::I16 => read!(i16, I16),
            NumericKind::I32 => read!(i32, I32),
            NumericKind::I64 => read!(i64, I64),
            NumericKind::U8 => read!(u8, U8),
            NumericKind::U16 => read!(u16, U16),
            NumericKind::U32 => read!(u32, U32),
            NumericKind::U64 => read!(u64, U64),
        }
    }

    /// Encode this value in `order`, appending to `out`.
    pub fn encode_into(&self, order: ByteOrder, out: &mut Vec<u8>) {
        macro_rules! write {
            ($v:expr) => {
                match order {
                    ByteOrder::Little => out.extend_from_slice(&$v.to_le_bytes()),
                    ByteOrder::Big => out.extend_from_slice(&$v.to_be_bytes()),
                }
            };
        }
        match *self {
            Self::F32(v) => write!(v),
            Self::F64(v) => write!(v),
            Self::I8(v) => write!(v),
            Self::I16(v) => write!(v),
            Self::I32(v) => write!(v),
            Self::I64(v) => write!(v),
            Self::U8(v) => write!(v),
            Self::U16(v) => write!(v),
            Self::U32(v) => write!(v),
            Self::U64(v) => write!(v),
        }
    }

    /// The kind this value carries.
    #[must_use]
    pub const fn kind(&self) -> NumericKind {
        match self {
            Self::F32(_) => NumericKind::F32,
            Self::F64(_) => NumericKind::F64,
            Self::I8(_) => NumericKind::I8,
            Self::I16(_) => NumericKind::I16,
            Self::I32(_) => NumericKind::I32,
            Self::I64(_) => NumericKind::I64,
            Self::U8(_) => NumericKind::U8,
            Self::U16(_) => NumericKind::U16,
            Self::U32(_) => NumericKind::U32,
            Self::U64(_) => NumericKind::U64,
        }
    }

    /// Lossy view as `f64`, handy for assertions and reporting.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
            Self::I8(v) => f64::from(v),
            Self::I16(v) => f64::from(v),
            Self::I32(v) => f64::from(v),
            Self::I64(v) => v as f64,
            Self::U8(v) => f64::from(v),
            Self::U16(v) => f64::from(v),
            Self::U32(v) => f64::from(v),
            Self::U64(v) => v as f64,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::I8(v) => Some(i128::from(v)),
            Self::I16(v) => Some(i128::from(v)),
            Self::I32(v) => Some(i128::from(v)),
            Self::I64(v) => Some(i128::from(v)),
            Self::U8(v) => Some(i128::from(v)),
            Self::U16(v) => Some(i128::from(v)),
            Self::U32(v) => Some(i128::from(v)),
            Self::U64(v) => Some(i128::from(v)),
            Self::F32(_) | Self::F64(_) => None,
        }
    }

    /// Compare two values numerically.
    ///
    /// Integer pairs compare exactly through `i128`; once a float is involved
    /// both sides are promoted to `f64`. `None` only when a float side is NaN.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
        }
    }
}
