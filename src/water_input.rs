//! Monthly water input from precipitation and SWE change.

use std::path::{Path, PathBuf};

use hydat_grid::{to_missing, water_input};
use hydat_io::{DatasetTemplate, GridVariable, IoError, copy_template, open_dataset};
use tracing::{info, warn};

use crate::dataset::{check_month_count, copy_error, sentinel_for, with_fill_value, write_masked};
use crate::error::HydatError;
use crate::locator::DatasetLocator;
use crate::options::WaterInputConfig;
use crate::run::{RunSummary, check_distinct_outputs, for_each_year};

/// Combines a monthly precipitation total and a monthly SWE net change into
/// monthly water input for every year in `year_start..=year_end`.
///
/// Per cell and month, `water = precip - max(0, swe_change)`: snow that
/// accumulated did not reach the ground as liquid, melt adds nothing. The
/// output is a copy of the precipitation product with the combined variable
/// in place of the precipitation variable.
///
/// # Errors
///
/// Configuration errors are returned before any file is touched. Per-year
/// failures (missing inputs, inputs that are not 12-step monthly products or
/// disagree in grid shape) follow the configured [`crate::ErrorMode`].
pub fn monthly_water_input(
    config: &WaterInputConfig,
    year_start: i32,
    year_end: i32,
    precip: &impl DatasetLocator,
    swe_change: &impl DatasetLocator,
    output: &impl DatasetLocator,
) -> Result<RunSummary, HydatError> {
    config.validate()?;
    check_distinct_outputs(output, year_start, year_end)?;
    let label = format!(
        "{} from {} and {}",
        config.output_name(),
        config.precip_name(),
        config.swe_change_name()
    );
    info!(
        output = config.output_name(),
        year_start, year_end, "combining monthly water input"
    );
    for_each_year(
        &label,
        year_start,
        year_end,
        config.error_mode(),
        |year| {
            combine_year(
                config,
                year,
                &precip.locate(year),
                &swe_change.locate(year),
                &output.locate(year),
            )
        },
    )
}

fn combine_year(
    config: &WaterInputConfig,
    year: i32,
    precip_path: &Path,
    swe_path: &Path,
    destination: &Path,
) -> Result<PathBuf, HydatError> {
    let precip_file = open_dataset(precip_path)?;
    let swe_file = open_dataset(swe_path)?;
    let precip_grid = GridVariable::open(&precip_file, config.precip_name(), precip_path)?;
    let swe_grid = GridVariable::open(&swe_file, config.swe_change_name(), swe_path)?;
    check_month_count(&precip_grid, year)?;
    check_month_count(&swe_grid, year)?;

    let sentinel = sentinel_for(&precip_grid, config.nodata());
    let precip = to_missing(precip_grid.read_all()?, sentinel);
    let swe_change = to_missing(
        swe_grid.read_all()?,
        sentinel_for(&swe_grid, config.nodata()),
    );
    let water = water_input(precip.view(), swe_change.view())?;

    let template = DatasetTemplate::inspect(&precip_file)?;
    let spec = template
        .variable(config.precip_name())
        .cloned()
        .ok_or_else(|| IoError::MissingVariable {
            name: config.precip_name().to_string(),
            path: precip_path.to_path_buf(),
        })?
        .renamed(config.output_name())
        .with_attribute("long_name", "monthly water input")
        .without_attribute("standard_name");
    let spec = with_fill_value(spec, sentinel);

    let mut pending = copy_template(precip_path, destination, &[config.precip_name()])
        .map_err(copy_error)?;
    spec.define(pending.file_mut())
        .map_err(HydatError::from_write)?;
    let collisions = write_masked(pending.file_mut(), config.output_name(), 0, water, sentinel)?;
    if collisions > 0 {
        warn!(
            variable = config.output_name(),
            collisions, sentinel, "computed values equal the no-data sentinel"
        );
    }
    pending.commit().map_err(HydatError::from_write)
}
