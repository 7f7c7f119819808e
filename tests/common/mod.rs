//! Programmatic NetCDF fixtures shaped like DayMet yearly files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const NODATA: f32 = -9999.0;

/// Builder for one DayMet-like file: unlimited `time`, `y`, `x`, `nv`
/// dimensions; `lat`/`lon` auxiliaries; `time`, `time_bnds` and `yearday`
/// along time; one `(time, y, x)` `f32` grid variable.
pub struct DailyFixture {
    pub variable: String,
    pub n_days: usize,
    pub ny: usize,
    pub nx: usize,
    pub year: i32,
    values: Vec<f32>,
    fill_value: Option<f32>,
}

impl DailyFixture {
    /// All cells of day `d` hold `f(d, y, x)`.
    pub fn new(
        variable: &str,
        year: i32,
        n_days: usize,
        ny: usize,
        nx: usize,
        f: impl Fn(usize, usize, usize) -> f32,
    ) -> Self {
        let mut values = Vec::with_capacity(n_days * ny * nx);
        for d in 0..n_days {
            for y in 0..ny {
                for x in 0..nx {
                    values.push(f(d, y, x));
                }
            }
        }
        Self {
            variable: variable.to_string(),
            n_days,
            ny,
            nx,
            year,
            values,
            fill_value: Some(NODATA),
        }
    }

    /// Sets cell `(y, x)` of day `d` to the no-data sentinel.
    pub fn with_missing(mut self, d: usize, y: usize, x: usize) -> Self {
        let i = (d * self.ny + y) * self.nx + x;
        self.values[i] = NODATA;
        self
    }

    /// Drops the `_FillValue` attribute (the engine falls back to its
    /// configured sentinel).
    pub fn without_fill_value(mut self) -> Self {
        self.fill_value = None;
        self
    }

    /// Writes the file to `path` and returns it.
    pub fn write(&self, path: &Path) -> PathBuf {
        let mut file = netcdf::create(path).expect("create fixture");
        file.add_attribute("Conventions", "CF-1.6").expect("conventions");
        file.add_attribute("start_year", self.year).expect("start_year");

        file.add_unlimited_dimension("time").expect("time dim");
        file.add_dimension("nv", 2).expect("nv dim");
        file.add_dimension("y", self.ny).expect("y dim");
        file.add_dimension("x", self.nx).expect("x dim");

        let n_cells = self.ny * self.nx;
        {
            let mut var = file
                .add_variable::<f32>("lat", &["y", "x"])
                .expect("lat var");
            var.put_attribute("units", "degrees_north").expect("lat units");
            let lat: Vec<f32> = (0..n_cells).map(|i| 45.0 + i as f32).collect();
            var.put_values(&lat, ..).expect("lat values");
        }
        {
            let mut var = file
                .add_variable::<f32>("lon", &["y", "x"])
                .expect("lon var");
            var.put_attribute("units", "degrees_east").expect("lon units");
            let lon: Vec<f32> = (0..n_cells).map(|i| -114.0 + i as f32).collect();
            var.put_values(&lon, ..).expect("lon values");
        }
        {
            let mut var = file
                .add_variable::<f64>("time", &["time"])
                .expect("time var");
            var.put_attribute("units", "days since 1980-01-01 00:00:00 UTC")
                .expect("time units");
            var.put_attribute("calendar", "standard").expect("calendar");
            var.put_attribute("bounds", "time_bnds").expect("bounds");
            let base = ((self.year - 1980) * 365) as f64;
            let time: Vec<f64> = (0..self.n_days).map(|d| base + d as f64 + 0.5).collect();
            var.put_values(&time, vec![0..self.n_days])
                .expect("time values");
        }
        {
            let mut var = file
                .add_variable::<f64>("time_bnds", &["time", "nv"])
                .expect("time_bnds var");
            let bnds: Vec<f64> = (0..self.n_days)
                .flat_map(|d| [d as f64, d as f64 + 1.0])
                .collect();
            var.put_values(&bnds, vec![0..self.n_days, 0..2])
                .expect("time_bnds values");
        }
        {
            let mut var = file
                .add_variable::<i16>("yearday", &["time"])
                .expect("yearday var");
            let yd: Vec<i16> = (1..=self.n_days as i16).collect();
            var.put_values(&yd, vec![0..self.n_days])
                .expect("yearday values");
        }
        {
            let mut var = file
                .add_variable::<f32>(&self.variable, &["time", "y", "x"])
                .expect("grid var");
            var.put_attribute("units", "kg/m2").expect("grid units");
            if let Some(fv) = self.fill_value {
                var.put_attribute("_FillValue", fv).expect("grid fill");
            }
            var.put_values(&self.values, vec![0..self.n_days, 0..self.ny, 0..self.nx])
                .expect("grid values");
        }
        path.to_path_buf()
    }
}

/// Writes a 12-step monthly product with `values[month][y][x]` flattened.
pub fn write_monthly(path: &Path, variable: &str, ny: usize, nx: usize, values: &[f32]) -> PathBuf {
    assert_eq!(values.len(), 12 * ny * nx);
    let mut file = netcdf::create(path).expect("create monthly fixture");
    file.add_unlimited_dimension("time").expect("time dim");
    file.add_dimension("y", ny).expect("y dim");
    file.add_dimension("x", nx).expect("x dim");
    {
        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .expect("time var");
        let t: Vec<f64> = (0..12).map(|m| (m * 30) as f64).collect();
        var.put_values(&t, vec![0..12]).expect("time values");
    }
    {
        let mut var = file
            .add_variable::<f32>(variable, &["time", "y", "x"])
            .expect("monthly var");
        var.put_attribute("units", "mm").expect("units");
        var.put_attribute("_FillValue", NODATA).expect("fill");
        var.put_values(values, vec![0..12, 0..ny, 0..nx])
            .expect("monthly values");
    }
    path.to_path_buf()
}

/// Reads a whole variable as `f64`.
pub fn read_var(path: &Path, name: &str) -> Vec<f64> {
    let file = netcdf::open(path).expect("open output");
    let var = file
        .variable(name)
        .unwrap_or_else(|| panic!("variable {name} missing"));
    var.get_values::<f64, _>(..).expect("read values")
}

/// Value at `(t, y, x)` of a flattened `(time, y, x)` array.
pub fn at(values: &[f64], ny: usize, nx: usize, t: usize, y: usize, x: usize) -> f64 {
    values[(t * ny + y) * nx + x]
}
