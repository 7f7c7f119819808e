//! End-to-end tests for the water-input combiner and the monthly matrix.

mod common;

use approx::assert_relative_eq;
use common::{DailyFixture, NODATA, at, read_var, write_monthly};
use hydat::{
    HydatError, MonthlySpec, PatternLocator, ProcessConfig, Reducer, Variable,
    WaterInputConfig, aggregate_monthly, monthly_matrix, monthly_water_input,
};
use tempfile::tempdir;

const NY: usize = 1;
const NX: usize = 2;

fn pattern(dir: &std::path::Path, stem: &str) -> PatternLocator {
    PatternLocator::new(dir.join(format!("{stem}_{{year}}.nc")).to_string_lossy())
}

#[test]
fn precip_minus_positive_swe_change() {
    let dir = tempdir().unwrap();
    let mut precip = vec![50.0f32; 12 * NY * NX];
    let mut swe = vec![0.0f32; 12 * NY * NX];
    // Month 0: accumulation of 20 is subtracted.
    swe[0] = 20.0;
    // Month 1: melt contributes nothing.
    swe[2] = -40.0;
    // Month 2: missing precipitation.
    precip[4] = NODATA;
    // Month 3: missing SWE change.
    swe[7] = NODATA;
    write_monthly(&dir.path().join("prcp_sum_2003.nc"), "prcp_sum", NY, NX, &precip);
    write_monthly(&dir.path().join("swe_net_change_2003.nc"), "swe_net_change", NY, NX, &swe);

    let summary = monthly_water_input(
        &WaterInputConfig::new(),
        2003,
        2003,
        &pattern(dir.path(), "prcp_sum"),
        &pattern(dir.path(), "swe_net_change"),
        &pattern(dir.path(), "water_input"),
    )
    .unwrap();
    let path = summary.output_for(2003).unwrap();
    let water = read_var(path, "water_input");

    assert_eq!(at(&water, NY, NX, 0, 0, 0), 30.0);
    assert_eq!(at(&water, NY, NX, 0, 0, 1), 50.0);
    assert_eq!(at(&water, NY, NX, 1, 0, 0), 50.0);
    assert_eq!(at(&water, NY, NX, 2, 0, 0), f64::from(NODATA));
    assert_eq!(at(&water, NY, NX, 3, 0, 1), f64::from(NODATA));

    let file = netcdf::open(path).unwrap();
    assert!(file.variable("prcp_sum").is_none());
    assert_eq!(read_var(path, "time").len(), 12);
}

#[test]
fn grid_shape_mismatch() {
    let dir = tempdir().unwrap();
    write_monthly(
        &dir.path().join("prcp_sum_2003.nc"),
        "prcp_sum",
        1,
        2,
        &[1.0; 24],
    );
    write_monthly(
        &dir.path().join("swe_net_change_2003.nc"),
        "swe_net_change",
        1,
        3,
        &[1.0; 36],
    );
    let err = monthly_water_input(
        &WaterInputConfig::new(),
        2003,
        2003,
        &pattern(dir.path(), "prcp_sum"),
        &pattern(dir.path(), "swe_net_change"),
        &pattern(dir.path(), "water_input"),
    )
    .unwrap_err();
    assert!(matches!(err.root_cause(), HydatError::ShapeMismatch { .. }));
    assert!(!dir.path().join("water_input_2003.nc").exists());
}

#[test]
fn daily_input_is_not_a_monthly_product() {
    let dir = tempdir().unwrap();
    DailyFixture::new("prcp_sum", 2003, 365, NY, NX, |_, _, _| 1.0)
        .write(&dir.path().join("prcp_sum_2003.nc"));
    write_monthly(
        &dir.path().join("swe_net_change_2003.nc"),
        "swe_net_change",
        NY,
        NX,
        &[0.0; 24],
    );
    let err = monthly_water_input(
        &WaterInputConfig::new(),
        2003,
        2003,
        &pattern(dir.path(), "prcp_sum"),
        &pattern(dir.path(), "swe_net_change"),
        &pattern(dir.path(), "water_input"),
    )
    .unwrap_err();
    assert!(matches!(err.root_cause(), HydatError::ShapeMismatch { .. }));
}

#[test]
fn from_daily_inputs_through_monthly_products() {
    let dir = tempdir().unwrap();
    // 2 mm/day of rain; SWE grows by 1 per day in January, then stays flat.
    DailyFixture::new("prcp", 2003, 365, NY, NX, |_, _, _| 2.0)
        .write(&dir.path().join("prcp_2003.nc"));
    DailyFixture::new("swe", 2003, 365, NY, NX, |d, _, _| d.min(30) as f32)
        .write(&dir.path().join("swe_2003.nc"));

    aggregate_monthly(
        &ProcessConfig::new(Variable::Prcp),
        &MonthlySpec::for_variable(Variable::Prcp, Reducer::Sum),
        2003,
        2003,
        &pattern(dir.path(), "prcp"),
        &pattern(dir.path(), "prcp_sum"),
    )
    .unwrap();
    aggregate_monthly(
        &ProcessConfig::new(Variable::Swe),
        &MonthlySpec::for_variable(Variable::Swe, Reducer::NetChange),
        2003,
        2003,
        &pattern(dir.path(), "swe"),
        &pattern(dir.path(), "swe_net_change"),
    )
    .unwrap();
    let summary = monthly_water_input(
        &WaterInputConfig::new(),
        2003,
        2003,
        &pattern(dir.path(), "prcp_sum"),
        &pattern(dir.path(), "swe_net_change"),
        &pattern(dir.path(), "water_input"),
    )
    .unwrap();

    let water = read_var(summary.output_for(2003).unwrap(), "water_input");
    // January: 62 mm of rain, 30 stored as snow.
    assert_relative_eq!(at(&water, NY, NX, 0, 0, 0), 32.0, epsilon = 1e-4);
    // February: 56 mm, no change in SWE.
    assert_relative_eq!(at(&water, NY, NX, 1, 0, 1), 56.0, epsilon = 1e-4);
}

#[test]
fn matrix_stacks_years_by_month() {
    let dir = tempdir().unwrap();
    for (i, year) in [2003, 2004].into_iter().enumerate() {
        let values: Vec<f32> = (0..12 * NY * NX)
            .map(|k| (i * 1000 + k) as f32)
            .collect();
        write_monthly(
            &dir.path().join(format!("prcp_sum_{year}.nc")),
            "prcp_sum",
            NY,
            NX,
            &values,
        );
    }
    let matrix = monthly_matrix(
        "prcp_sum",
        2003,
        2004,
        &pattern(dir.path(), "prcp_sum"),
        -9999.0,
    )
    .unwrap();
    assert_eq!(matrix.dim(), (NY * NX, 24));
    // Cell 1 (x = 1), March 2003: month 2, flat index 2 * 2 + 1.
    assert_eq!(matrix[[1, 2]], 5.0);
    // Cell 0, January 2004.
    assert_eq!(matrix[[0, 12]], 1000.0);
}

#[test]
fn matrix_masks_missing_and_rejects_shape_change() {
    let dir = tempdir().unwrap();
    let mut values = vec![1.0f32; 12 * NY * NX];
    values[0] = NODATA;
    write_monthly(&dir.path().join("prcp_sum_2003.nc"), "prcp_sum", NY, NX, &values);
    write_monthly(
        &dir.path().join("prcp_sum_2004.nc"),
        "prcp_sum",
        2,
        2,
        &[1.0; 48],
    );
    let loc = pattern(dir.path(), "prcp_sum");

    let matrix = monthly_matrix("prcp_sum", 2003, 2003, &loc, -9999.0).unwrap();
    assert!(matrix[[0, 0]].is_nan());
    assert_eq!(matrix[[1, 0]], 1.0);

    let err = monthly_matrix("prcp_sum", 2003, 2004, &loc, -9999.0).unwrap_err();
    assert!(matches!(err, HydatError::Year { year: 2004, .. }));
    assert!(matches!(err.root_cause(), HydatError::ShapeMismatch { .. }));
}

#[test]
fn year_error_names_both_inputs() {
    let dir = tempdir().unwrap();
    let err = monthly_water_input(
        &WaterInputConfig::new(),
        2003,
        2003,
        &pattern(dir.path(), "prcp_sum"),
        &pattern(dir.path(), "swe_net_change"),
        &pattern(dir.path(), "water_input"),
    )
    .unwrap_err();
    let HydatError::Year { variable, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(variable.contains("prcp_sum"));
    assert!(variable.contains("swe_net_change"));
}

