//! Reading daily grids out of `(time, y, x)` variables.

use std::ops::Range;
use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};
use netcdf::AttributeValue;
use netcdf::types::NcVariableType;

use crate::error::IoError;

/// A 3-D `(time, y, x)` variable opened for day-by-day reading.
///
/// Values come back as `f64` regardless of the storage type; the NetCDF
/// library performs the widening. No masking is applied here, see
/// [`GridVariable::fill_value`].
pub struct GridVariable<'f> {
    var: netcdf::Variable<'f>,
    name: String,
    path: PathBuf,
    shape: [usize; 3],
}

impl<'f> GridVariable<'f> {
    /// Looks up `name` in `file` and checks it is three-dimensional.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingVariable`] if the variable is absent and
    /// [`IoError::DimensionMismatch`] if it is not 3-D.
    pub fn open(file: &'f netcdf::File, name: &str, path: &Path) -> Result<Self, IoError> {
        let var = file
            .variable(name)
            .ok_or_else(|| IoError::MissingVariable {
                name: name.to_string(),
                path: path.to_path_buf(),
            })?;

        let dims = var.dimensions();
        if dims.len() != 3 {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} dimensions"),
                expected: 3,
                got: dims.len(),
            });
        }
        let shape = [dims[0].len(), dims[1].len(), dims[2].len()];

        Ok(Self {
            var,
            name: name.to_string(),
            path: path.to_path_buf(),
            shape,
        })
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the variable was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `[n_days, n_rows, n_cols]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Length of the time axis.
    pub fn n_days(&self) -> usize {
        self.shape[0]
    }

    /// Number of grid rows.
    pub fn n_rows(&self) -> usize {
        self.shape[1]
    }

    /// Number of grid columns.
    pub fn n_cols(&self) -> usize {
        self.shape[2]
    }

    /// Storage type of the variable.
    pub fn vartype(&self) -> NcVariableType {
        self.var.vartype()
    }

    /// The variable's declared no-data value.
    ///
    /// `_FillValue` wins over `missing_value`; `None` if neither is set or
    /// the attribute is not numeric.
    pub fn fill_value(&self) -> Option<f64> {
        ["_FillValue", "missing_value"].iter().find_map(|key| {
            self.var
                .attribute_value(key)
                .and_then(Result::ok)
                .and_then(|v| attribute_as_f64(&v))
        })
    }

    /// Reads a single day as a `(y, x)` grid.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if `day` is past the end of the
    /// time axis, or [`IoError::Netcdf`] if the read fails.
    pub fn read_day(&self, day: usize) -> Result<Array2<f64>, IoError> {
        self.check_day_range(day..day + 1)?;
        let [_, ny, nx] = self.shape;
        let values = self
            .var
            .get_values::<f64, _>(vec![day..day + 1, 0..ny, 0..nx])?;
        Array2::from_shape_vec((ny, nx), values).map_err(|e| IoError::Netcdf {
            reason: format!("{}: {e}", self.name),
        })
    }

    fn read_days(&self, days: Range<usize>) -> Result<Array3<f64>, IoError> {
        self.check_day_range(days.clone())?;
        let [_, ny, nx] = self.shape;
        let n = days.len();
        let values = self.var.get_values::<f64, _>(vec![days, 0..ny, 0..nx])?;
        Array3::from_shape_vec((n, ny, nx), values).map_err(|e| IoError::Netcdf {
            reason: format!("{}: {e}", self.name),
        })
    }

    /// Reads the whole variable.
    pub fn read_all(&self) -> Result<Array3<f64>, IoError> {
        self.read_days(0..self.shape[0])
    }

    fn check_day_range(&self, days: Range<usize>) -> Result<(), IoError> {
        if days.end > self.shape[0] {
            return Err(IoError::DimensionMismatch {
                name: format!("{} time", self.name),
                expected: self.shape[0],
                got: days.end,
            });
        }
        Ok(())
    }
}

/// Numeric value of a scalar attribute, if it has one.
pub fn attribute_as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Float(v) => Some(f64::from(*v)),
        AttributeValue::Int(v) => Some(f64::from(*v)),
        AttributeValue::Short(v) => Some(f64::from(*v)),
        AttributeValue::Schar(v) => Some(f64::from(*v)),
        AttributeValue::Uchar(v) => Some(f64::from(*v)),
        AttributeValue::Ushort(v) => Some(f64::from(*v)),
        AttributeValue::Uint(v) => Some(f64::from(*v)),
        AttributeValue::Doubles(v) if v.len() == 1 => Some(v[0]),
        AttributeValue::Floats(v) if v.len() == 1 => Some(f64::from(v[0])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_attributes() {
        assert_eq!(attribute_as_f64(&AttributeValue::Float(-9999.0)), Some(-9999.0));
        assert_eq!(attribute_as_f64(&AttributeValue::Short(-1)), Some(-1.0));
        assert_eq!(
            attribute_as_f64(&AttributeValue::Doubles(vec![2.5])),
            Some(2.5)
        );
    }

    #[test]
    fn non_numeric_attributes() {
        assert_eq!(attribute_as_f64(&AttributeValue::Str("x".into())), None);
        assert_eq!(
            attribute_as_f64(&AttributeValue::Doubles(vec![1.0, 2.0])),
            None
        );
    }

    #[test]
    fn open_rejects_non_grid_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("time", 3).unwrap();
            let mut var = file.add_variable::<f64>("time", &["time"]).unwrap();
            var.put_values(&[0.0, 1.0, 2.0], ..).unwrap();
        }
        let file = netcdf::open(&path).unwrap();
        let err = GridVariable::open(&file, "time", &path).err().unwrap();
        assert!(matches!(err, IoError::DimensionMismatch { expected: 3, got: 1, .. }));
        let err = GridVariable::open(&file, "swe", &path).err().unwrap();
        assert!(matches!(err, IoError::MissingVariable { .. }));
    }

    #[test]
    fn read_day_and_fill_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("time", 2).unwrap();
            file.add_dimension("y", 1).unwrap();
            file.add_dimension("x", 2).unwrap();
            let mut var = file
                .add_variable::<f32>("swe", &["time", "y", "x"])
                .unwrap();
            var.put_attribute("_FillValue", -9999.0f32).unwrap();
            var.put_values(&[1.0f32, 2.0, 3.0, -9999.0], ..).unwrap();
        }
        let file = netcdf::open(&path).unwrap();
        let grid = GridVariable::open(&file, "swe", &path).unwrap();
        assert_eq!(grid.shape(), [2, 1, 2]);
        assert_eq!(grid.fill_value(), Some(-9999.0));

        let day1 = grid.read_day(1).unwrap();
        assert_eq!(day1[[0, 0]], 3.0);
        assert_eq!(day1[[0, 1]], -9999.0);

        assert!(matches!(
            grid.read_day(2),
            Err(IoError::DimensionMismatch { .. })
        ));
        assert_eq!(grid.read_all().unwrap().dim(), (2, 1, 2));
    }
}
