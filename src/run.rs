//! Year-range driver shared by the engines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, info_span, warn};

use crate::error::HydatError;
use crate::locator::DatasetLocator;
use crate::options::{ErrorMode, check_year_range};

/// One committed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOutput {
    /// Year the output covers.
    pub year: i32,
    /// Path of the written dataset.
    pub path: PathBuf,
}

/// One year skipped in lenient mode.
#[derive(Debug)]
pub struct YearFailure {
    /// Year that failed.
    pub year: i32,
    /// Why it failed.
    pub error: HydatError,
}

/// Report of one engine run over a year range.
#[derive(Debug, Default)]
pub struct RunSummary {
    outputs: Vec<YearOutput>,
    failures: Vec<YearFailure>,
}

impl RunSummary {
    /// Committed outputs in year order.
    pub fn outputs(&self) -> &[YearOutput] {
        &self.outputs
    }

    /// Years skipped in lenient mode, in year order.
    pub fn failures(&self) -> &[YearFailure] {
        &self.failures
    }

    /// Returns `true` if every year produced an output.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Output path for `year`, if one was written.
    pub fn output_for(&self, year: i32) -> Option<&Path> {
        self.outputs
            .iter()
            .find(|o| o.year == year)
            .map(|o| o.path.as_path())
    }
}

/// Checks that every year in `year_start..=year_end` resolves to its own
/// output path, so no year overwrites an earlier one.
pub(crate) fn check_distinct_outputs(
    output: &impl DatasetLocator,
    year_start: i32,
    year_end: i32,
) -> Result<(), HydatError> {
    let mut first_year: HashMap<PathBuf, i32> = HashMap::new();
    for year in year_start..=year_end {
        let path = output.locate(year);
        if let Some(&earlier) = first_year.get(&path) {
            return Err(HydatError::configuration(format!(
                "years {earlier} and {year} both write {}; the output pattern needs {{year}}",
                path.display()
            )));
        }
        first_year.insert(path, year);
    }
    Ok(())
}

/// Runs `process` for every year in `year_start..=year_end`.
///
/// Errors are wrapped in [`HydatError::Year`]. In strict mode the first one
/// is returned; in lenient mode it is logged and recorded and the next year
/// starts. `process` owns all per-year state, so nothing leaks between
/// years.
pub(crate) fn for_each_year<F>(
    label: &str,
    year_start: i32,
    year_end: i32,
    mode: ErrorMode,
    mut process: F,
) -> Result<RunSummary, HydatError>
where
    F: FnMut(i32) -> Result<PathBuf, HydatError>,
{
    check_year_range(year_start, year_end)?;
    let mut summary = RunSummary::default();

    for year in year_start..=year_end {
        let _year = info_span!("year", year).entered();
        match process(year) {
            Ok(path) => {
                info!(variable = label, path = %path.display(), "year written");
                summary.outputs.push(YearOutput { year, path });
            }
            Err(e) => {
                let e = e.in_year(label, year);
                match mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => {
                        warn!(variable = label, error = %e, "year skipped");
                        summary.failures.push(YearFailure { year, error: e });
                    }
                }
            }
        }
    }

    info!(
        variable = label,
        n_written = summary.outputs.len(),
        n_skipped = summary.failures.len(),
        "run finished"
    );
    Ok(summary)
}
