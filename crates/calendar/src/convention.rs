//! Archive calendar conventions.

use std::fmt;
use std::str::FromStr;

use crate::boundaries::{DAYMET_DAYS_PER_YEAR, MonthBoundaries};
use crate::leap::days_in_year;

/// How a daily archive lays out its time axis within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CalendarConvention {
    /// DayMet: always 365 daily steps; December 31 is dropped in leap years.
    #[default]
    Daymet,
    /// Plain Gregorian: 366 daily steps in leap years.
    Gregorian,
}

impl CalendarConvention {
    /// Number of daily steps a dataset for `year` must contain.
    pub fn expected_days(self, year: i32) -> u16 {
        match self {
            Self::Daymet => DAYMET_DAYS_PER_YEAR,
            Self::Gregorian => days_in_year(year),
        }
    }

    /// Month boundaries for `year` under this convention.
    pub fn month_boundaries(self, year: i32) -> MonthBoundaries {
        let table = MonthBoundaries::for_year(year);
        match self {
            Self::Daymet => table.with_daymet_correction(),
            Self::Gregorian => table,
        }
    }

    /// Lowercase name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daymet => "daymet",
            Self::Gregorian => "gregorian",
        }
    }
}

impl fmt::Display for CalendarConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daymet" => Ok(Self::Daymet),
            "gregorian" | "standard" => Ok(Self::Gregorian),
            other => Err(format!(
                "unknown calendar convention '{other}' (expected 'daymet' or 'gregorian')"
            )),
        }
    }
}
