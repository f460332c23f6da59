//! Numeric values edited by widgets.
//!
//! Widgets that step or drag a number take a [`DataValue`] and hand back a
//! new one, so a single implementation covers every numeric kind.

use std::fmt;

/// A number of one of the supported kinds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum DataValue {
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
}

/// Arithmetic applied by [`DataValue::apply_op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOp {
    /// `lhs + rhs`.
    Add,
    /// `lhs - rhs`.
    Sub,
}

impl DataValue {
    /// Applies `op` with `rhs` converted to this value's kind. Integer
    /// arithmetic saturates instead of wrapping.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply_op(self, op: DataOp, rhs: Self) -> Self {
        match (self, op) {
            (Self::I32(a), DataOp::Add) => Self::I32(a.saturating_add(rhs.as_f64() as i32)),
            (Self::I32(a), DataOp::Sub) => Self::I32(a.saturating_sub(rhs.as_f64() as i32)),
            (Self::I64(a), DataOp::Add) => Self::I64(a.saturating_add(rhs.as_i64())),
            (Self::I64(a), DataOp::Sub) => Self::I64(a.saturating_sub(rhs.as_i64())),
            (Self::F32(a), DataOp::Add) => Self::F32(a + rhs.as_f64() as f32),
            (Self::F32(a), DataOp::Sub) => Self::F32(a - rhs.as_f64() as f32),
            (Self::F64(a), DataOp::Add) => Self::F64(a + rhs.as_f64()),
            (Self::F64(a), DataOp::Sub) => Self::F64(a - rhs.as_f64()),
        }
    }

    /// Clamps into `[min, max]` compared in this value's kind. An inverted
    /// range is clamped as if its bounds were swapped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        let (lo, hi) = if min.as_f64() <= max.as_f64() { (min, max) } else { (max, min) };
        match self {
            Self::I32(v) => Self::I32(v.clamp(lo.as_f64() as i32, hi.as_f64() as i32)),
            Self::I64(v) => Self::I64(v.clamp(lo.as_i64(), hi.as_i64())),
            Self::F32(v) => Self::F32(v.clamp(lo.as_f64() as f32, hi.as_f64() as f32)),
            Self::F64(v) => Self::F64(v.clamp(lo.as_f64(), hi.as_f64())),
        }
    }

    /// Widened to `f64`. `I64` beyond 2^53 loses precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::I32(v) => f64::from(v),
            Self::I64(v) => v as f64,
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn as_i64(self) -> i64 {
        match self {
            Self::I32(v) => i64::from(v),
            Self::I64(v) => v,
            Self::F32(v) => v as i64,
            Self::F64(v) => v as i64,
        }
    }

    /// Returns true for the floating-point kinds.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32(_) | Self::F64(_))
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v:.3}"),
            Self::F64(v) => write!(f, "{v:.6}"),
        }
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ops_saturate() {
        assert_eq!(DataValue::I32(i32::MAX).apply_op(DataOp::Add, DataValue::I32(1)), DataValue::I32(i32::MAX));
        assert_eq!(DataValue::I64(i64::MIN).apply_op(DataOp::Sub, DataValue::I64(1)), DataValue::I64(i64::MIN));
        assert_eq!(DataValue::I32(5).apply_op(DataOp::Sub, DataValue::I32(7)), DataValue::I32(-2));
    }

    #[test]
    fn test_rhs_converted_to_lhs_kind() {
        assert_eq!(DataValue::I32(1).apply_op(DataOp::Add, DataValue::F64(2.9)), DataValue::I32(3));
        assert_eq!(DataValue::F32(1.5).apply_op(DataOp::Add, DataValue::I32(2)), DataValue::F32(3.5));
    }

    #[test]
    fn test_clamp() {
        let lo = DataValue::I32(0);
        let hi = DataValue::I32(10);
        assert_eq!(DataValue::I32(12).clamp(lo, hi), DataValue::I32(10));
        assert_eq!(DataValue::I32(-3).clamp(lo, hi), DataValue::I32(0));
        assert_eq!(DataValue::F64(0.5).clamp(DataValue::F64(1.0), DataValue::F64(0.0)), DataValue::F64(0.5));
        assert_eq!(DataValue::F32(4.0).clamp(DataValue::F32(1.0), DataValue::F32(2.0)), DataValue::F32(2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(DataValue::I64(42).to_string(), "42");
        assert_eq!(DataValue::F32(0.5).to_string(), "0.500");
    }
}
