//! Monthly aggregation of daily grids.

use std::path::{Path, PathBuf};

use hydat_calendar::MonthBoundaries;
use hydat_grid::{reduce_month, to_missing};
use hydat_io::{
    CopyOptions, DatasetTemplate, GridVariable, IoError, VariableSpec, copy_template_with,
    open_dataset, write_axis,
};
use ndarray::Axis;
use netcdf::types::{FloatType, NcVariableType};
use tracing::{debug, info, warn};

use crate::dataset::{check_day_count, copy_error, sentinel_for, with_fill_value, write_masked};
use crate::error::HydatError;
use crate::locator::DatasetLocator;
use crate::options::{MonthlySpec, ProcessConfig};
use crate::run::{RunSummary, check_distinct_outputs, for_each_year};

/// Writes, for every year in `year_start..=year_end`, a 12-step monthly
/// product of the configured daily variable.
///
/// The output keeps the input's spatial layout and static variables; every
/// variable laid out along time is dropped, `time` is rebuilt as the twelve
/// month-start offsets, and the product is stored under
/// [`MonthlySpec::output_name`] with a `cell_methods` attribute.
///
/// # Errors
///
/// Configuration errors (including a reducer that does not apply to the
/// variable) are returned before any file is touched. Per-year failures
/// follow the configured [`crate::ErrorMode`].
pub fn aggregate_monthly(
    config: &ProcessConfig,
    spec: &MonthlySpec,
    year_start: i32,
    year_end: i32,
    input: &impl DatasetLocator,
    output: &impl DatasetLocator,
) -> Result<RunSummary, HydatError> {
    config.validate()?;
    spec.validate(config.variable())?;
    check_distinct_outputs(output, year_start, year_end)?;

    info!(
        variable = %config.variable(),
        reducer = %spec.reducer(),
        output = spec.output_name(),
        year_start,
        year_end,
        "aggregating monthly"
    );
    for_each_year(
        config.variable().as_str(),
        year_start,
        year_end,
        config.error_mode(),
        |year| aggregate_year(config, spec, year, &input.locate(year), &output.locate(year)),
    )
}

fn aggregate_year(
    config: &ProcessConfig,
    spec: &MonthlySpec,
    year: i32,
    source: &Path,
    destination: &Path,
) -> Result<PathBuf, HydatError> {
    let name = config.variable().as_str();
    let reducer = spec.reducer();
    let src = open_dataset(source)?;
    let grid = GridVariable::open(&src, name, source)?;
    check_day_count(grid.n_days(), config.convention(), year)?;
    let boundaries = config.convention().month_boundaries(year);
    let sentinel = sentinel_for(&grid, config.nodata());

    let template = DatasetTemplate::inspect(&src)?;
    let source_spec = template
        .variable(name)
        .cloned()
        .ok_or_else(|| IoError::MissingVariable {
            name: name.to_string(),
            path: source.to_path_buf(),
        })?;
    let time_dim = source_spec
        .dimensions()
        .first()
        .cloned()
        .ok_or_else(|| HydatError::shape(format!("'{name}' has no time dimension")))?;

    let output_spec = with_fill_value(
        source_spec
            .renamed(spec.output_name())
            .with_attribute("cell_methods", reducer.cell_method()),
        sentinel,
    );
    let time_spec = monthly_time_spec(template.variable(&time_dim), &time_dim, year);

    let options = CopyOptions::new()
        .excluding(template.variables_using(&time_dim))
        .with_unlimited(time_dim.as_str());
    let mut pending = copy_template_with(source, destination, &options).map_err(copy_error)?;
    let file = pending.file_mut();
    time_spec.define(file).map_err(HydatError::from_write)?;
    output_spec.define(file).map_err(HydatError::from_write)?;
    write_axis(file, &time_dim, &month_start_offsets(&boundaries))
        .map_err(HydatError::from_write)?;

    let mut collisions = 0;
    for (month, days) in boundaries.ranges().into_iter().enumerate() {
        let reduced = reduce_month(reducer, month, days.clone(), |day| {
            Ok::<_, HydatError>(to_missing(grid.read_day(day)?, sentinel))
        })?;
        collisions += write_masked(
            file,
            spec.output_name(),
            month,
            reduced.insert_axis(Axis(0)),
            sentinel,
        )?;
        debug!(month = month + 1, days = ?days, "month reduced");
    }

    if collisions > 0 {
        warn!(
            variable = spec.output_name(),
            collisions, sentinel, "computed values equal the no-data sentinel"
        );
    }
    pending.commit().map_err(HydatError::from_write)
}

/// Day-of-year offset of the first day of each month.
fn month_start_offsets(boundaries: &MonthBoundaries) -> Vec<f64> {
    boundaries
        .ranges()
        .iter()
        .map(|r| r.start as f64)
        .collect()
}

/// Schema for the rebuilt time coordinate.
///
/// Keeps the source coordinate's type and attributes where there is one,
/// but re-bases its units on January 1 of `year` and drops the daily
/// `bounds` reference.
fn monthly_time_spec(source: Option<&VariableSpec>, time_dim: &str, year: i32) -> VariableSpec {
    let units = format!("days since {year}-01-01 00:00:00");
    match source {
        Some(spec) if spec.dimensions().len() == 1 => spec
            .clone()
            .without_attribute("bounds")
            .with_attribute("units", units),
        _ => VariableSpec::new(
            time_dim,
            vec![time_dim.to_string()],
            NcVariableType::Float(FloatType::F64),
        )
        .with_attribute("standard_name", "time")
        .with_attribute("units", units)
        .with_attribute("calendar", "standard"),
    }
}
