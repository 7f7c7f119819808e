//! Month-boundary tables: cumulative day-of-year indices at which each month ends.

use std::ops::Range;

use crate::error::CalendarError;
use crate::leap::is_leap_year;

/// Cumulative month-end day counts for a common (365-day) year.
pub(crate) const COMMON_MONTH_ENDS: [u16; 12] =
    [31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// Cumulative month-end day counts for a leap (366-day) year.
pub(crate) const LEAP_MONTH_ENDS: [u16; 12] =
    [31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// Number of days DayMet reports for every year, leap years included.
pub const DAYMET_DAYS_PER_YEAR: u16 = 365;

/// Twelve cumulative day-of-year end indices for one year.
///
/// Entry `i` is the exclusive end of month `i` (0-based) measured in days
/// from January 1, so month `i` spans `ends[i - 1]..ends[i]` (with an
/// implicit start of 0 for January).
///
/// Tables are cheap to build and are recomputed for every year processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthBoundaries {
    ends: [u16; 12],
}

impl MonthBoundaries {
    /// Pure calendar table for `year`: 365-day table for common years,
    /// 366-day table for leap years.
    pub fn for_year(year: i32) -> Self {
        let ends = if is_leap_year(year) {
            LEAP_MONTH_ENDS
        } else {
            COMMON_MONTH_ENDS
        };
        Self { ends }
    }

    /// Applies the DayMet leap-day convention by forcing the final entry to 365.
    ///
    /// DayMet archives drop December 31 in leap years, so their daily stacks
    /// always hold 365 steps and December is one day short. This correction
    /// is only valid for DayMet-sourced stacks; callers working with any
    /// other archive must use the uncorrected table.
    #[must_use]
    pub fn with_daymet_correction(mut self) -> Self {
        self.ends[11] = DAYMET_DAYS_PER_YEAR;
        self
    }

    /// The 12 cumulative end indices.
    pub fn ends(&self) -> &[u16; 12] {
        &self.ends
    }

    /// Total number of days covered by the table (the final entry).
    pub fn total_days(&self) -> u16 {
        self.ends[11]
    }

    /// Half-open day range `[day_start, day_end)` for 0-based month `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonthIndex`] if `index >= 12`.
    pub fn month_range(&self, index: usize) -> Result<Range<usize>, CalendarError> {
        if index >= 12 {
            return Err(CalendarError::InvalidMonthIndex { index });
        }
        let start = if index == 0 {
            0
        } else {
            self.ends[index - 1] as usize
        };
        Ok(start..self.ends[index] as usize)
    }

    /// Number of days in 0-based month `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonthIndex`] if `index >= 12`.
    pub fn days_in_month(&self, index: usize) -> Result<u16, CalendarError> {
        let range = self.month_range(index)?;
        Ok((range.end - range.start) as u16)
    }

    /// All 12 month ranges in calendar order.
    pub fn ranges(&self) -> [Range<usize>; 12] {
        let mut start = 0usize;
        std::array::from_fn(|i| {
            let end = self.ends[i] as usize;
            let range = start..end;
            start = end;
            range
        })
    }
}

/// Returns the pure calendar month-boundary table for `year`.
///
/// No archive-specific correction is applied; see
/// [`MonthBoundaries::with_daymet_correction`].
pub fn month_boundaries(year: i32) -> MonthBoundaries {
    MonthBoundaries::for_year(year)
}
