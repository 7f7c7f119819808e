//! # hydat-grid
//!
//! Pure per-cell arithmetic on gridded climate stacks held as `ndarray`
//! arrays indexed `(time, y, x)`. No file access happens here.
//!
//! Missing cells are `NaN` in memory. The persisted no-data sentinel
//! (usually `-9999.0`) is converted with [`to_missing`] right after reading
//! and with [`to_sentinel`] right before writing.
//!
//! # Pipeline
//!
//! ```text
//!  read ─▶ to_missing ─▶ AccumulationState / MonthAccumulator / water_input ─▶ to_sentinel ─▶ write
//! ```
//!
//! # Quick start
//!
//! ```
//! use hydat_grid::{AccumulationState, DEFAULT_NODATA, to_missing, to_sentinel};
//! use ndarray::arr2;
//!
//! let mut state = AccumulationState::new();
//! let day0 = to_missing(arr2(&[[10.0, -9999.0]]), DEFAULT_NODATA);
//! let day1 = to_missing(arr2(&[[15.0, 3.0]]), DEFAULT_NODATA);
//! state.advance(day0).unwrap();
//! let delta = to_sentinel(state.advance(day1).unwrap(), DEFAULT_NODATA);
//! assert_eq!(delta, arr2(&[[5.0, -9999.0]]));
//! ```

mod accumulate;
mod combine;
mod error;
mod nodata;
mod reduce;

pub use accumulate::{AccumulationState, accumulate_days, accumulate_stack};
pub use combine::{water_input, water_input_cell};
pub use error::GridError;
pub use nodata::{
    DEFAULT_NODATA, count_sentinel_collisions, count_sentinel_collisions_f32, is_missing,
    to_missing, to_sentinel,
};
pub use reduce::{MonthAccumulator, Reducer, monthly_reduce, reduce_month};
