//! Multi-variable monthly products.

use ndarray::{Array3, ArrayView3, Zip};

use crate::error::GridError;

/// Liquid water input for one cell: precipitation minus snow accumulation.
///
/// A positive SWE net change (snow stored in the pack) is subtracted from
/// precipitation; a negative change (melt) subtracts nothing. Missing in
/// either operand gives a missing result.
pub fn water_input_cell(precip: f64, swe_change: f64) -> f64 {
    if precip.is_nan() || swe_change.is_nan() {
        return f64::NAN;
    }
    precip - swe_change.max(0.0)
}

/// Applies [`water_input_cell`] over aligned `(month, y, x)` stacks.
///
/// # Errors
///
/// Returns [`GridError::ShapeMismatch`] if the two stacks differ in shape.
pub fn water_input(
    precip: ArrayView3<'_, f64>,
    swe_change: ArrayView3<'_, f64>,
) -> Result<Array3<f64>, GridError> {
    if precip.shape() != swe_change.shape() {
        return Err(GridError::ShapeMismatch {
            what: "SWE net change",
            expected: precip.shape().to_vec(),
            got: swe_change.shape().to_vec(),
        });
    }
    Ok(Zip::from(&precip)
        .and(&swe_change)
        .map_collect(|&p, &s| water_input_cell(p, s)))
}
