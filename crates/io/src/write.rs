//! Writing computed grids and time axes into a destination dataset.
//!
//! Computed values are `f64` in memory; they are narrowed to the storage
//! type of the destination variable (which usually mirrors the source) on
//! the way out.

use std::ops::Range;
use std::path::PathBuf;

use ndarray::ArrayView3;
use netcdf::types::{FloatType, NcVariableType};

use crate::error::IoError;

/// Writes a `(day, y, x)` slab into `name`, starting at time index `start`.
///
/// The time dimension may be unlimited; it grows to fit.
///
/// # Errors
///
/// Returns [`IoError::MissingVariable`] if `name` was not defined,
/// [`IoError::DimensionMismatch`] if the slab's grid differs from the
/// variable's, and [`IoError::UnsupportedType`] for non-float storage.
pub fn write_grid_slab(
    file: &mut netcdf::FileMut,
    name: &str,
    start: usize,
    values: ArrayView3<'_, f64>,
) -> Result<(), IoError> {
    let (n, ny, nx) = values.dim();
    let path = file.path().unwrap_or_default();
    let mut var = file
        .variable_mut(name)
        .ok_or_else(|| missing(path, name))?;

    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{name} dimensions"),
            expected: 3,
            got: dims.len(),
        });
    }
    for (label, want, got) in [("rows", dims[1].len(), ny), ("columns", dims[2].len(), nx)] {
        if want != got {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} {label}"),
                expected: want,
                got,
            });
        }
    }

    let extents = vec![start..start + n, 0..ny, 0..nx];
    put_floats(&mut var, name, values.iter().copied(), extents)
}

/// Writes a whole 1-D variable (typically a time axis) from index 0.
///
/// # Errors
///
/// Same as [`write_grid_slab`].
pub fn write_axis(file: &mut netcdf::FileMut, name: &str, values: &[f64]) -> Result<(), IoError> {
    let path = file.path().unwrap_or_default();
    let mut var = file
        .variable_mut(name)
        .ok_or_else(|| missing(path, name))?;
    let extents = vec![0..values.len()];
    put_floats(&mut var, name, values.iter().copied(), extents)
}

fn put_floats(
    var: &mut netcdf::VariableMut<'_>,
    name: &str,
    values: impl Iterator<Item = f64>,
    extents: Vec<Range<usize>>,
) -> Result<(), IoError> {
    match var.vartype() {
        NcVariableType::Float(FloatType::F32) => {
            let narrowed: Vec<f32> = values.map(|v| v as f32).collect();
            var.put_values(&narrowed, extents)?;
        }
        NcVariableType::Float(FloatType::F64) => {
            let wide: Vec<f64> = values.collect();
            var.put_values(&wide, extents)?;
        }
        other => {
            return Err(IoError::UnsupportedType {
                name: name.to_string(),
                vartype: format!("{other:?}"),
            });
        }
    }
    Ok(())
}

fn missing(path: PathBuf, name: &str) -> IoError {
    IoError::MissingVariable {
        name: name.to_string(),
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn slab_into_unlimited_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_unlimited_dimension("time").unwrap();
            file.add_dimension("y", 1).unwrap();
            file.add_dimension("x", 2).unwrap();
            file.add_variable::<f32>("swe", &["time", "y", "x"]).unwrap();
            file.add_variable::<f64>("time", &["time"]).unwrap();

            let day0 = Array3::from_elem((1, 1, 2), 1.5);
            let day1 = Array3::from_elem((1, 1, 2), 2.5);
            write_grid_slab(&mut file, "swe", 0, day0.view()).unwrap();
            write_grid_slab(&mut file, "swe", 1, day1.view()).unwrap();
            write_axis(&mut file, "time", &[0.5, 1.5]).unwrap();
        }
        let file = netcdf::open(&path).unwrap();
        let swe = file.variable("swe").unwrap();
        let values = swe.get_values::<f64, _>(..).unwrap();
        assert_eq!(values, vec![1.5, 1.5, 2.5, 2.5]);
        assert_eq!(file.dimension("time").unwrap().len(), 2);
    }

    #[test]
    fn slab_grid_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nc");
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("time", 1).unwrap();
        file.add_dimension("y", 1).unwrap();
        file.add_dimension("x", 2).unwrap();
        file.add_variable::<f64>("swe", &["time", "y", "x"]).unwrap();

        let slab = Array3::<f64>::zeros((1, 2, 2));
        let err = write_grid_slab(&mut file, "swe", 0, slab.view()).unwrap_err();
        assert!(matches!(err, IoError::DimensionMismatch { expected: 1, got: 2, .. }));

        let err = write_grid_slab(&mut file, "prcp", 0, slab.view()).unwrap_err();
        assert!(matches!(err, IoError::MissingVariable { .. }));
    }

    #[test]
    fn integer_storage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nc");
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("time", 2).unwrap();
        file.add_variable::<i32>("time", &["time"]).unwrap();
        let err = write_axis(&mut file, "time", &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedType { .. }));
    }
}
