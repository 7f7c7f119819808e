//! Conversion between the persisted no-data sentinel and the in-memory
//! missing marker (`NaN`).
//!
//! Arithmetic never sees the sentinel: grids are masked in right after they
//! are read and masked out right before they are written. `NaN` propagates
//! through subtraction, so a missing operand always yields a missing result.

use ndarray::{Array, ArrayBase, Data, Dimension};

/// Sentinel used by DayMet and most gridded archives for cells without data.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Replaces every cell equal to `sentinel` with `NaN`.
///
/// A `NaN` sentinel leaves the array unchanged, since `NaN` is already the
/// missing marker.
pub fn to_missing<D: Dimension>(mut values: Array<f64, D>, sentinel: f64) -> Array<f64, D> {
    if !sentinel.is_nan() {
        values.mapv_inplace(|v| if v == sentinel { f64::NAN } else { v });
    }
    values
}

/// Replaces every `NaN` cell with `sentinel`.
pub fn to_sentinel<D: Dimension>(mut values: Array<f64, D>, sentinel: f64) -> Array<f64, D> {
    values.mapv_inplace(|v| if v.is_nan() { sentinel } else { v });
    values
}

/// Counts computed (non-missing) cells that are exactly equal to `sentinel`.
///
/// Such cells cannot be told apart from no-data once persisted.
pub fn count_sentinel_collisions<S, D>(values: &ArrayBase<S, D>, sentinel: f64) -> usize
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if sentinel.is_nan() {
        return 0;
    }
    values.iter().filter(|&&v| v == sentinel).count()
}

/// Like [`count_sentinel_collisions`], but compares at `f32` precision.
///
/// Use this when the destination stores single-precision floats: a value
/// that rounds to the sentinel on narrowing reads back as missing too.
pub fn count_sentinel_collisions_f32<S, D>(values: &ArrayBase<S, D>, sentinel: f64) -> usize
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if sentinel.is_nan() {
        return 0;
    }
    let stored = sentinel as f32;
    values.iter().filter(|&&v| v as f32 == stored).count()
}

/// Returns `true` if `value` is the in-memory missing marker.
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}
