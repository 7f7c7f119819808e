//! Stacking monthly products across years into a cell-by-month matrix.

use hydat_grid::to_missing;
use hydat_io::{GridVariable, open_dataset};
use ndarray::{Array2, Axis};
use tracing::debug;

use crate::dataset::{check_month_count, sentinel_for};
use crate::error::HydatError;
use crate::locator::DatasetLocator;
use crate::options::check_year_range;

/// Reads the 12-step monthly product `variable` for each year and lays it
/// out as a `(cells, years * 12)` matrix.
///
/// Row `y * nx + x` holds one grid cell; column
/// `(year - year_start) * 12 + month` holds one month. Missing cells are
/// `NaN`. The variable's own fill value is used for masking where declared,
/// `nodata` otherwise.
///
/// # Errors
///
/// Any failing year aborts the stack with a [`HydatError::Year`]. Years
/// whose grid shape differs from the first year's give
/// [`HydatError::ShapeMismatch`].
pub fn monthly_matrix(
    variable: &str,
    year_start: i32,
    year_end: i32,
    locator: &impl DatasetLocator,
    nodata: f64,
) -> Result<Array2<f64>, HydatError> {
    check_year_range(year_start, year_end)?;
    let n_years = (year_end - year_start + 1) as usize;
    let mut matrix: Option<Array2<f64>> = None;
    let mut grid_shape = (0, 0);

    for (i, year) in (year_start..=year_end).enumerate() {
        let path = locator.locate(year);
        let read = || -> Result<_, HydatError> {
            let file = open_dataset(&path)?;
            let grid = GridVariable::open(&file, variable, &path)?;
            check_month_count(&grid, year)?;
            Ok(to_missing(grid.read_all()?, sentinel_for(&grid, nodata)))
        };
        let months = read().map_err(|e| e.in_year(variable, year))?;
        let (_, ny, nx) = months.dim();

        if matrix.is_some() && (ny, nx) != grid_shape {
            return Err(HydatError::shape(format!(
                "grid of {year} is {ny}x{nx}, earlier years are {}x{}",
                grid_shape.0, grid_shape.1
            ))
            .in_year(variable, year));
        }
        grid_shape = (ny, nx);
        let out = matrix.get_or_insert_with(|| Array2::from_elem((ny * nx, n_years * 12), f64::NAN));

        for (month, grid) in months.axis_iter(Axis(0)).enumerate() {
            let mut column = out.column_mut(i * 12 + month);
            for (dst, &v) in column.iter_mut().zip(grid.iter()) {
                *dst = v;
            }
        }
        debug!(year, path = %path.display(), "stacked monthly grids");
    }

    matrix.ok_or_else(|| HydatError::configuration("empty year range"))
}
