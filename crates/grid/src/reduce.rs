//! Monthly reductions of daily grids.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use hydat_calendar::MonthBoundaries;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

use crate::error::GridError;

/// Rule that collapses one month of daily grids into a single grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reducer {
    /// Per-cell mean over the valid days of the month.
    Average,
    /// Last day of the month minus the first day.
    NetChange,
    /// Per-cell total over the valid days of the month.
    Sum,
}

impl Reducer {
    /// Lowercase name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::NetChange => "net_change",
            Self::Sum => "sum",
        }
    }

    /// CF `cell_methods` string describing the reduction over time.
    pub fn cell_method(self) -> &'static str {
        match self {
            Self::Average => "time: mean within months",
            Self::NetChange => "time: net change within months",
            Self::Sum => "time: sum within months",
        }
    }

    /// Returns `true` if only the first and last day of a month are needed.
    pub fn endpoints_only(self) -> bool {
        matches!(self, Self::NetChange)
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reducer {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "average" | "mean" => Ok(Self::Average),
            "net_change" | "netchange" => Ok(Self::NetChange),
            "sum" | "total" => Ok(Self::Sum),
            _ => Err(GridError::UnknownReducer { name: s.to_string() }),
        }
    }
}

/// Streaming reducer for one month.
///
/// Days are pushed in calendar order. Memory use is a few grids regardless
/// of month length. For [`Reducer::NetChange`] only the first and last
/// pushed grids matter, so callers may push just the two endpoints.
#[derive(Debug)]
pub struct MonthAccumulator {
    reducer: Reducer,
    month: usize,
    n_days: usize,
    sum: Option<Array2<f64>>,
    count: Option<Array2<u32>>,
    first: Option<Array2<f64>>,
    last: Option<Array2<f64>>,
}

impl MonthAccumulator {
    /// Creates an accumulator for 0-based `month`.
    pub fn new(reducer: Reducer, month: usize) -> Self {
        Self {
            reducer,
            month,
            n_days: 0,
            sum: None,
            count: None,
            first: None,
            last: None,
        }
    }

    /// Number of days pushed so far.
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Adds one masked daily grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `grid` differs in shape from
    /// the first grid pushed.
    pub fn push(&mut self, grid: ArrayView2<'_, f64>) -> Result<(), GridError> {
        if let Some(expected) = self.shape()
            && expected != grid.shape()
        {
            return Err(GridError::ShapeMismatch {
                what: "daily grid",
                expected,
                got: grid.shape().to_vec(),
            });
        }

        match self.reducer {
            Reducer::NetChange => {
                if self.first.is_none() {
                    self.first = Some(grid.to_owned());
                }
                self.last = Some(grid.to_owned());
            }
            Reducer::Average | Reducer::Sum => {
                let sum = self
                    .sum
                    .get_or_insert_with(|| Array2::zeros(grid.raw_dim()));
                let count = self
                    .count
                    .get_or_insert_with(|| Array2::zeros(grid.raw_dim()));
                Zip::from(sum).and(count).and(&grid).for_each(|s, c, &v| {
                    if !v.is_nan() {
                        *s += v;
                        *c += 1;
                    }
                });
            }
        }
        self.n_days += 1;
        Ok(())
    }

    /// Produces the monthly grid; cells without any valid input are `NaN`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyWindow`] if no day was pushed.
    pub fn finish(self) -> Result<Array2<f64>, GridError> {
        let empty = GridError::EmptyWindow { month: self.month };
        match self.reducer {
            Reducer::NetChange => {
                let (first, last) = self.first.zip(self.last).ok_or(empty)?;
                Ok(&last - &first)
            }
            Reducer::Average => {
                let (sum, count) = self.sum.zip(self.count).ok_or(empty)?;
                Ok(Zip::from(&sum).and(&count).map_collect(|&s, &c| {
                    if c == 0 { f64::NAN } else { s / f64::from(c) }
                }))
            }
            Reducer::Sum => {
                let (sum, count) = self.sum.zip(self.count).ok_or(empty)?;
                Ok(Zip::from(&sum)
                    .and(&count)
                    .map_collect(|&s, &c| if c == 0 { f64::NAN } else { s }))
            }
        }
    }

    fn shape(&self) -> Option<Vec<usize>> {
        self.first
            .as_ref()
            .or(self.sum.as_ref())
            .map(|g| g.shape().to_vec())
    }
}

/// Reduces the days of one month, reading each daily grid on demand.
///
/// `read` is called once per day in calendar order, or only for the first
/// and last day when the reducer needs just the endpoints, so at most one
/// daily grid is alive at a time.
///
/// # Errors
///
/// Propagates errors from `read`, and [`GridError`]s from the accumulator
/// converted into `E`.
pub fn reduce_month<E, F>(
    reducer: Reducer,
    month: usize,
    days: Range<usize>,
    mut read: F,
) -> Result<Array2<f64>, E>
where
    E: From<GridError>,
    F: FnMut(usize) -> Result<Array2<f64>, E>,
{
    let mut acc = MonthAccumulator::new(reducer, month);
    if reducer.endpoints_only() && !days.is_empty() {
        for day in [days.start, days.end - 1] {
            acc.push(read(day)?.view())?;
        }
    } else {
        for day in days {
            acc.push(read(day)?.view())?;
        }
    }
    Ok(acc.finish()?)
}

/// Reduces a whole in-memory `(day, y, x)` stack of masked grids to `(12, y, x)`.
///
/// # Errors
///
/// Returns [`GridError::ShapeMismatch`] if the stack's day count differs from
/// `boundaries.total_days()`.
pub fn monthly_reduce(
    daily: ArrayView3<'_, f64>,
    boundaries: &MonthBoundaries,
    reducer: Reducer,
) -> Result<Array3<f64>, GridError> {
    let (n_days, ny, nx) = daily.dim();
    let expected_days = boundaries.total_days() as usize;
    if n_days != expected_days {
        return Err(GridError::ShapeMismatch {
            what: "daily stack",
            expected: vec![expected_days, ny, nx],
            got: vec![n_days, ny, nx],
        });
    }

    let mut out = Array3::from_elem((12, ny, nx), f64::NAN);
    for (month, range) in boundaries.ranges().into_iter().enumerate() {
        let reduced = reduce_month(reducer, month, range, |day| {
            Ok::<_, GridError>(daily.index_axis(Axis(0), day).to_owned())
        })?;
        out.index_axis_mut(Axis(0), month).assign(&reduced);
    }
    Ok(out)
}
