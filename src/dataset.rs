//! Per-year dataset helpers shared by the engines: calendar checks, fill
//! values and masked writes.

use hydat_calendar::CalendarConvention;
use hydat_grid::{count_sentinel_collisions, count_sentinel_collisions_f32, to_sentinel};
use hydat_io::{GridVariable, IoError, VariableSpec, write_grid_slab};
use ndarray::Array3;
use netcdf::AttributeValue;
use netcdf::types::{FloatType, NcVariableType};

use crate::error::HydatError;

/// Checks a daily stack's length against the calendar convention.
pub(crate) fn check_day_count(
    n_days: usize,
    convention: CalendarConvention,
    year: i32,
) -> Result<(), HydatError> {
    let expected = usize::from(convention.expected_days(year));
    if n_days != expected {
        let qualifier = match convention {
            CalendarConvention::Daymet => "after leap-day correction",
            CalendarConvention::Gregorian => "for the Gregorian calendar",
        };
        return Err(HydatError::shape(format!(
            "day count {n_days} for year {year} does not match expected {expected} {qualifier}"
        )));
    }
    Ok(())
}

/// Checks that a monthly product has exactly twelve steps.
pub(crate) fn check_month_count(grid: &GridVariable<'_>, year: i32) -> Result<(), HydatError> {
    if grid.n_days() != 12 {
        return Err(HydatError::shape(format!(
            "'{}' in {} has {} time steps for year {year}, expected 12 monthly steps",
            grid.name(),
            grid.path().display(),
            grid.n_days()
        )));
    }
    Ok(())
}

/// The sentinel to mask with: the variable's own fill value if declared,
/// otherwise the configured fallback.
pub(crate) fn sentinel_for(grid: &GridVariable<'_>, fallback: f64) -> f64 {
    grid.fill_value().unwrap_or(fallback)
}

/// Ensures an output variable declares `sentinel` as its `_FillValue`.
///
/// An existing `_FillValue` is left untouched; a `NaN` sentinel adds nothing.
pub(crate) fn with_fill_value(spec: VariableSpec, sentinel: f64) -> VariableSpec {
    if sentinel.is_nan() || spec.attribute("_FillValue").is_some() {
        return spec;
    }
    let value = match spec.vartype() {
        NcVariableType::Float(FloatType::F32) => AttributeValue::Float(sentinel as f32),
        _ => AttributeValue::Double(sentinel),
    };
    spec.with_attribute("_FillValue", value)
}

/// Masks `values` out to `sentinel` and writes them at time index `start`.
///
/// Returns the number of computed cells that collided with the sentinel at
/// the variable's storage precision and will therefore read back as missing.
pub(crate) fn write_masked(
    file: &mut netcdf::FileMut,
    name: &str,
    start: usize,
    values: Array3<f64>,
    sentinel: f64,
) -> Result<usize, HydatError> {
    let single = file
        .variable(name)
        .is_some_and(|v| matches!(v.vartype(), NcVariableType::Float(FloatType::F32)));
    let collisions = if single {
        count_sentinel_collisions_f32(&values, sentinel)
    } else {
        count_sentinel_collisions(&values, sentinel)
    };
    let persisted = to_sentinel(values, sentinel);
    write_grid_slab(file, name, start, persisted.view()).map_err(HydatError::from_write)?;
    Ok(collisions)
}

/// Classifies a template-copy failure: a missing source is an input
/// problem, anything else happened while writing the destination.
pub(crate) fn copy_error(err: IoError) -> HydatError {
    match err {
        IoError::FileNotFound { .. } | IoError::MissingVariable { .. } => err.into(),
        other => HydatError::from_write(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daymet_day_count() {
        assert!(check_day_count(365, CalendarConvention::Daymet, 2004).is_ok());
        let err = check_day_count(366, CalendarConvention::Daymet, 2001).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape mismatch: day count 366 for year 2001 does not match expected 365 after \
             leap-day correction"
        );
    }

    #[test]
    fn gregorian_day_count() {
        assert!(check_day_count(366, CalendarConvention::Gregorian, 2004).is_ok());
        assert!(check_day_count(365, CalendarConvention::Gregorian, 2004).is_err());
    }

    #[test]
    fn fill_value_added_with_matching_type() {
        let spec = VariableSpec::new(
            "swe",
            vec!["time".into(), "y".into(), "x".into()],
            NcVariableType::Float(FloatType::F32),
        );
        let spec = with_fill_value(spec, -9999.0);
        assert_eq!(
            spec.attribute("_FillValue"),
            Some(&AttributeValue::Float(-9999.0))
        );

        let kept = with_fill_value(spec.with_attribute("_FillValue", -1.0f32), -9999.0);
        assert_eq!(
            kept.attribute("_FillValue"),
            Some(&AttributeValue::Float(-1.0))
        );
    }

    #[test]
    fn nan_sentinel_adds_no_fill_value() {
        let spec = VariableSpec::new(
            "prcp",
            vec!["time".into()],
            NcVariableType::Float(FloatType::F64),
        );
        assert!(with_fill_value(spec, f64::NAN).attribute("_FillValue").is_none());
    }

    fn grid_file(path: &std::path::Path, vartype: NcVariableType) -> netcdf::FileMut {
        let mut file = netcdf::create(path).unwrap();
        file.add_unlimited_dimension("time").unwrap();
        file.add_dimension("y", 1).unwrap();
        file.add_dimension("x", 2).unwrap();
        file.add_variable_with_type("swe", &["time", "y", "x"], &vartype)
            .unwrap();
        file
    }

    #[test]
    fn collisions_counted_at_storage_precision() {
        let dir = tempfile::tempdir().unwrap();
        let values = ndarray::arr3(&[[[-9999.0003, 1.0]]]);

        let mut single = grid_file(
            &dir.path().join("f32.nc"),
            NcVariableType::Float(FloatType::F32),
        );
        let n = write_masked(&mut single, "swe", 0, values.clone(), -9999.0).unwrap();
        assert_eq!(n, 1);

        let mut double = grid_file(
            &dir.path().join("f64.nc"),
            NcVariableType::Float(FloatType::F64),
        );
        let n = write_masked(&mut double, "swe", 0, values, -9999.0).unwrap();
        assert_eq!(n, 0);
    }
}
