//! Daily accumulation (day-over-day change) of a state variable.

use std::path::{Path, PathBuf};

use hydat_grid::{accumulate_days, to_missing};
use hydat_io::{DatasetTemplate, GridVariable, IoError, copy_template, open_dataset};
use ndarray::Axis;
use tracing::{debug, info, warn};

use crate::dataset::{check_day_count, copy_error, sentinel_for, with_fill_value, write_masked};
use crate::error::HydatError;
use crate::locator::DatasetLocator;
use crate::options::ProcessConfig;
use crate::run::{RunSummary, check_distinct_outputs, for_each_year};

/// Writes, for every year in `year_start..=year_end`, a copy of the daily
/// input in which the configured variable holds the change since the
/// previous day.
///
/// Day 0 of each year is `0` for valid cells; a missing cell on either side
/// of a day pair gives a missing delta. Years are processed independently,
/// so the first day of a year never looks at the previous year.
///
/// # Errors
///
/// Configuration errors (including a non-state variable) are returned
/// before any file is touched. Per-year failures follow the configured
/// [`crate::ErrorMode`].
pub fn accumulate_daily(
    config: &ProcessConfig,
    year_start: i32,
    year_end: i32,
    input: &impl DatasetLocator,
    output: &impl DatasetLocator,
) -> Result<RunSummary, HydatError> {
    config.validate()?;
    let variable = config.variable();
    if !variable.is_state() {
        return Err(HydatError::configuration(format!(
            "accumulation requires a state variable, '{variable}' is a flux"
        )));
    }
    check_distinct_outputs(output, year_start, year_end)?;

    info!(%variable, year_start, year_end, "accumulating daily changes");
    for_each_year(
        variable.as_str(),
        year_start,
        year_end,
        config.error_mode(),
        |year| accumulate_year(config, year, &input.locate(year), &output.locate(year)),
    )
}

fn accumulate_year(
    config: &ProcessConfig,
    year: i32,
    source: &Path,
    destination: &Path,
) -> Result<PathBuf, HydatError> {
    let name = config.variable().as_str();
    let src = open_dataset(source)?;
    let grid = GridVariable::open(&src, name, source)?;
    check_day_count(grid.n_days(), config.convention(), year)?;
    let sentinel = sentinel_for(&grid, config.nodata());

    let template = DatasetTemplate::inspect(&src)?;
    let spec = template
        .variable(name)
        .cloned()
        .ok_or_else(|| IoError::MissingVariable {
            name: name.to_string(),
            path: source.to_path_buf(),
        })?;
    let spec = with_fill_value(spec, sentinel);

    let mut pending = copy_template(source, destination, &[name]).map_err(copy_error)?;
    spec.define(pending.file_mut())
        .map_err(HydatError::from_write)?;

    let mut collisions = 0;
    accumulate_days(
        grid.n_days(),
        |day| Ok::<_, HydatError>(to_missing(grid.read_day(day)?, sentinel)),
        |day, delta| {
            collisions += write_masked(
                pending.file_mut(),
                name,
                day,
                delta.insert_axis(Axis(0)),
                sentinel,
            )?;
            Ok(())
        },
    )?;
    debug!(n_days = grid.n_days(), "daily changes written");

    if collisions > 0 {
        warn!(
            variable = name,
            collisions, sentinel, "computed values equal the no-data sentinel"
        );
    }
    pending.commit().map_err(HydatError::from_write)
}
