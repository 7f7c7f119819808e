use approx::assert_relative_eq;
use hydat_calendar::{CalendarConvention, month_boundaries};
use hydat_grid::{GridError, Reducer, monthly_reduce};
use ndarray::{Array3, Axis};

/// Daily stack whose single cell holds the 0-based day index.
fn day_index_stack(n_days: usize) -> Array3<f64> {
    Array3::from_shape_fn((n_days, 1, 1), |(d, _, _)| d as f64)
}

#[test]
fn average_over_calendar_months() {
    let table = month_boundaries(2001);
    let out = monthly_reduce(day_index_stack(365).view(), &table, Reducer::Average).unwrap();
    assert_eq!(out.shape(), &[12, 1, 1]);
    // January holds days 0..31, mean 15.
    assert_relative_eq!(out[[0, 0, 0]], 15.0);
    // February holds days 31..59, mean 44.5.
    assert_relative_eq!(out[[1, 0, 0]], 44.5);
}

#[test]
fn net_change_uses_first_and_last_day() {
    let table = month_boundaries(2001);
    let out = monthly_reduce(day_index_stack(365).view(), &table, Reducer::NetChange).unwrap();
    for (month, range) in table.ranges().iter().enumerate() {
        assert_relative_eq!(out[[month, 0, 0]], (range.len() - 1) as f64);
    }
}

#[test]
fn sum_windows_match_average_windows() {
    let table = CalendarConvention::Daymet.month_boundaries(2004);
    let stack = Array3::from_elem((365, 2, 2), 1.0);
    let sums = monthly_reduce(stack.view(), &table, Reducer::Sum).unwrap();
    for (month, range) in table.ranges().iter().enumerate() {
        assert_relative_eq!(sums[[month, 1, 1]], range.len() as f64);
    }
    // DayMet leap-year December is 30 days long.
    assert_relative_eq!(sums[[11, 0, 0]], 30.0);
}

#[test]
fn missing_cell_for_whole_month() {
    let table = month_boundaries(2001);
    let mut stack = Array3::from_elem((365, 1, 2), 2.0);
    for day in table.month_range(3).unwrap() {
        stack[[day, 0, 1]] = f64::NAN;
    }
    for reducer in [Reducer::Average, Reducer::Sum, Reducer::NetChange] {
        let out = monthly_reduce(stack.view(), &table, reducer).unwrap();
        assert!(out[[3, 0, 1]].is_nan(), "{reducer}");
        assert!(!out[[3, 0, 0]].is_nan(), "{reducer}");
        assert!(!out.index_axis(Axis(0), 4).iter().any(|v| v.is_nan()), "{reducer}");
    }
}

#[test]
fn day_count_must_match_table() {
    let table = month_boundaries(2000);
    let err = monthly_reduce(day_index_stack(365).view(), &table, Reducer::Average).unwrap_err();
    assert_eq!(
        err,
        GridError::ShapeMismatch {
            what: "daily stack",
            expected: vec![366, 1, 1],
            got: vec![365, 1, 1],
        }
    );
}
