//! # hydat-calendar
//!
//! Pure calendar arithmetic for daily gridded climate stacks.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["year"] -->|"is_leap_year()"| B["bool"]
//!     A -->|"month_boundaries()"| C["MonthBoundaries"]
//!     C -->|".with_daymet_correction()"| C
//!     C -->|".month_range(i)"| D["day range"]
//!     E["CalendarConvention"] -->|".month_boundaries(year)"| C
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use hydat_calendar::{CalendarConvention, is_leap_year, month_boundaries};
//!
//! assert!(is_leap_year(2000));
//!
//! // Pure table: a leap year ends on day 366.
//! let table = month_boundaries(2000);
//! assert_eq!(table.total_days(), 366);
//!
//! // DayMet stacks drop December 31, so the caller applies the correction.
//! let daymet = CalendarConvention::Daymet.month_boundaries(2000);
//! assert_eq!(daymet.total_days(), 365);
//! assert_eq!(daymet.month_range(0).unwrap(), 0..31);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `leap` | Leap-year rule and year length |
//! | `boundaries` | Month-boundary tables and day ranges |
//! | `convention` | Archive conventions (DayMet vs. Gregorian) |
//! | `error` | Error types |

mod boundaries;
mod convention;
mod error;
mod leap;

pub use boundaries::{DAYMET_DAYS_PER_YEAR, MonthBoundaries, month_boundaries};
pub use convention::CalendarConvention;
pub use error::CalendarError;
pub use leap::{days_in_year, is_leap_year};
