//! # hydat
//!
//! Derived time-series products from daily gridded climate datasets
//! (DayMet-style NetCDF stacks, one file per year).
//!
//! ## Products
//!
//! | Engine | Input | Output |
//! |--------|-------|--------|
//! | [`accumulate_daily`] | daily state variable (SWE) | daily day-over-day change |
//! | [`aggregate_monthly`] | any daily variable | 12 monthly grids (average, sum, net change) |
//! | [`monthly_water_input`] | monthly precipitation + SWE net change | 12 monthly water-input grids |
//! | [`monthly_matrix`] | a monthly product over several years | `(cells, years * 12)` matrix |
//!
//! Every engine processes years independently, writes each year through a
//! destination that is deleted unless it completes, and follows the
//! configured [`ErrorMode`].
//!
//! ## Quick start
//!
//! ```no_run
//! use hydat::{DaymetLocator, PatternLocator, ProcessConfig, Region, Variable, accumulate_daily};
//!
//! let config = ProcessConfig::new(Variable::Swe);
//! let input = DaymetLocator::new("/archive/daymet", Variable::Swe, Region::NorthAmerica);
//! let output = PatternLocator::new("/products/swe_accumulation_{year}.nc");
//! let summary = accumulate_daily(&config, 2003, 2004, &input, &output)?;
//! assert!(summary.is_complete());
//! # Ok::<(), hydat::HydatError>(())
//! ```
//!
//! Runs can also be described in a TOML file, see [`HydatConfig`] and
//! [`run_configured`].

mod accumulate;
mod config;
mod convert;
mod dataset;
mod error;
mod locator;
pub mod logging;
mod monthly;
mod options;
mod pipeline;
mod run;
mod stack;
mod water_input;

pub use accumulate::accumulate_daily;
pub use config::{
    DaymetToml, HydatConfig, MonthlyToml, OutputToml, RunToml, WaterInputToml,
};
pub use convert::{
    Product, build_input_locator, build_monthly_spec, build_output_locator, build_process_config,
    build_water_input, parse_calendar, parse_product,
};
pub use error::HydatError;
pub use locator::{DatasetLocator, DaymetLocator, InputLocator, PatternLocator};
pub use monthly::aggregate_monthly;
pub use options::{
    ErrorMode, MonthlySpec, ProcessConfig, Region, Timestep, Variable, WaterInputConfig,
};
pub use pipeline::run_configured;
pub use run::{RunSummary, YearFailure, YearOutput};
pub use stack::monthly_matrix;
pub use water_input::monthly_water_input;

pub use hydat_calendar::CalendarConvention;
pub use hydat_grid::{DEFAULT_NODATA, Reducer};
