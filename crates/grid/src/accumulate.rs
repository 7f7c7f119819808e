//! Day-over-day deltas of a state variable within one year.

use ndarray::{Array2, Array3, ArrayView3, Axis};

use crate::error::GridError;

/// Previous-day grid carried between consecutive days of one year.
///
/// Create one per year and drop it at the year boundary; the first grid
/// pushed into a fresh state always produces a zero delta.
#[derive(Debug, Default)]
pub struct AccumulationState {
    previous: Option<Array2<f64>>,
}

impl AccumulationState {
    /// Creates an empty state (no day seen yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` until the first day has been pushed.
    pub fn is_empty(&self) -> bool {
        self.previous.is_none()
    }

    /// Consumes the masked grid for the next day and returns its delta.
    ///
    /// The first day yields `0.0` for valid cells and `NaN` for missing
    /// ones. Later days yield `current - previous`, missing wherever either
    /// operand is missing. `current` becomes the new previous day.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `current` does not have the
    /// shape of the previous day.
    pub fn advance(&mut self, current: Array2<f64>) -> Result<Array2<f64>, GridError> {
        let delta = match &self.previous {
            None => current.mapv(|v| if v.is_nan() { f64::NAN } else { 0.0 }),
            Some(prev) => {
                if prev.shape() != current.shape() {
                    return Err(GridError::ShapeMismatch {
                        what: "daily grid",
                        expected: prev.shape().to_vec(),
                        got: current.shape().to_vec(),
                    });
                }
                &current - prev
            }
        };
        self.previous = Some(current);
        Ok(delta)
    }
}

/// Runs one year of accumulation, reading and writing one day at a time.
///
/// `read` yields the masked grid of each day in ascending order and
/// `write` receives that day's delta. A fresh [`AccumulationState`] is used,
/// so nothing leaks in from an earlier call.
///
/// # Errors
///
/// Stops at the first error from `read` or `write`, or at a day whose grid
/// changes shape.
pub fn accumulate_days<E, R, W>(n_days: usize, mut read: R, mut write: W) -> Result<(), E>
where
    E: From<GridError>,
    R: FnMut(usize) -> Result<Array2<f64>, E>,
    W: FnMut(usize, Array2<f64>) -> Result<(), E>,
{
    let mut state = AccumulationState::new();
    for day in 0..n_days {
        let delta = state.advance(read(day)?)?;
        write(day, delta)?;
    }
    Ok(())
}

/// Computes deltas for a whole in-memory `(day, y, x)` stack of masked grids.
///
/// # Errors
///
/// Cannot fail for a well-formed stack; the error type is shared with
/// [`accumulate_days`].
pub fn accumulate_stack(stack: ArrayView3<'_, f64>) -> Result<Array3<f64>, GridError> {
    let mut out = Array3::from_elem(stack.raw_dim(), f64::NAN);
    accumulate_days(
        stack.len_of(Axis(0)),
        |day| Ok::<_, GridError>(stack.index_axis(Axis(0), day).to_owned()),
        |day, delta| {
            out.index_axis_mut(Axis(0), day).assign(&delta);
            Ok(())
        },
    )?;
    Ok(out)
}
