//! Programmatic run configuration.
//!
//! Every engine takes an explicit, validated configuration value; nothing is
//! read from global state. The TOML layer in [`crate::config`] is converted
//! into these types by [`crate::convert`].

use std::fmt;
use std::str::FromStr;

use hydat_calendar::CalendarConvention;
use hydat_grid::{DEFAULT_NODATA, Reducer};

use crate::error::HydatError;

// ---------------------------------------------------------------------------
// Variable / Timestep / Region
// ---------------------------------------------------------------------------

/// DayMet daily variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Daily minimum air temperature.
    Tmin,
    /// Daily maximum air temperature.
    Tmax,
    /// Daily total precipitation.
    Prcp,
    /// Day length.
    Dayl,
    /// Shortwave radiation.
    Srad,
    /// Snow-water equivalent.
    Swe,
    /// Water vapour pressure.
    Vp,
}

impl Variable {
    /// All variables, in archive order.
    pub const ALL: [Variable; 7] = [
        Self::Tmin,
        Self::Tmax,
        Self::Prcp,
        Self::Dayl,
        Self::Srad,
        Self::Swe,
        Self::Vp,
    ];

    /// Short name as used in file and variable names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tmin => "tmin",
            Self::Tmax => "tmax",
            Self::Prcp => "prcp",
            Self::Dayl => "dayl",
            Self::Srad => "srad",
            Self::Swe => "swe",
            Self::Vp => "vp",
        }
    }

    /// Whether the variable is a state (a stored quantity) rather than a flux.
    pub fn is_state(self) -> bool {
        matches!(self, Self::Swe)
    }

    /// Whether `reducer` gives a meaningful monthly product for this variable.
    ///
    /// Means apply to everything, totals only to precipitation, and net
    /// changes only to state variables.
    pub fn supports(self, reducer: Reducer) -> bool {
        match reducer {
            Reducer::Average => true,
            Reducer::Sum => matches!(self, Self::Prcp),
            Reducer::NetChange => self.is_state(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = HydatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                HydatError::configuration(format!(
                    "unknown variable '{s}' (expected one of tmin, tmax, prcp, dayl, srad, swe, vp)"
                ))
            })
    }
}

/// Temporal resolution of an archive product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timestep {
    /// Daily grids.
    #[default]
    Day,
    /// Monthly grids.
    Month,
    /// Annual grids.
    Year,
}

impl Timestep {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timestep {
    type Err = HydatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "annual" => Ok(Self::Year),
            _ => Err(HydatError::configuration(format!(
                "unknown timestep '{s}' (expected 'day', 'month' or 'year')"
            ))),
        }
    }
}

/// DayMet spatial tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    /// Continental North America.
    #[default]
    NorthAmerica,
    /// Hawaii.
    Hawaii,
    /// Puerto Rico.
    PuertoRico,
}

impl Region {
    /// Short code used in DayMet file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NorthAmerica => "na",
            Self::Hawaii => "hawaii",
            Self::PuertoRico => "puertorico",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = HydatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "na" => Ok(Self::NorthAmerica),
            "hawaii" | "hi" => Ok(Self::Hawaii),
            "puertorico" | "pr" => Ok(Self::PuertoRico),
            _ => Err(HydatError::configuration(format!(
                "unknown region '{s}' (expected 'na', 'hawaii' or 'puertorico')"
            ))),
        }
    }
}

/// What to do when one year of a range fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Stop at the first failing year and return its error.
    #[default]
    Strict,
    /// Log the failure, record it in the run summary and continue.
    Lenient,
}

impl FromStr for ErrorMode {
    type Err = HydatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(HydatError::configuration(format!(
                "unknown error mode '{s}' (expected 'strict' or 'lenient')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessConfig
// ---------------------------------------------------------------------------

/// Configuration shared by the daily-input engines.
///
/// # Example
///
/// ```
/// use hydat::{ErrorMode, ProcessConfig, Variable};
///
/// let config = ProcessConfig::new(Variable::Swe)
///     .with_error_mode(ErrorMode::Lenient);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    variable: Variable,
    timestep: Timestep,
    region: Region,
    convention: CalendarConvention,
    nodata: f64,
    error_mode: ErrorMode,
}

impl ProcessConfig {
    /// Creates a configuration for `variable`.
    ///
    /// Defaults: daily timestep, North America, DayMet calendar, no-data
    /// `-9999.0`, strict error mode.
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            timestep: Timestep::Day,
            region: Region::NorthAmerica,
            convention: CalendarConvention::Daymet,
            nodata: DEFAULT_NODATA,
            error_mode: ErrorMode::Strict,
        }
    }

    /// Sets the variable.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variable = variable;
        self
    }

    /// Sets the input timestep.
    pub fn with_timestep(mut self, timestep: Timestep) -> Self {
        self.timestep = timestep;
        self
    }

    /// Sets the DayMet region the inputs belong to.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Sets the calendar convention of the input stacks.
    pub fn with_convention(mut self, convention: CalendarConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the fallback no-data sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    /// Sets the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    // --- Accessors ---

    /// Returns the variable.
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Returns the input timestep.
    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    /// Returns the region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns the calendar convention.
    pub fn convention(&self) -> CalendarConvention {
        self.convention
    }

    /// Returns the fallback no-data sentinel.
    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Returns the error mode.
    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    /// Validates this configuration.
    ///
    /// The engines consume daily stacks only, and the sentinel must be
    /// finite (or `NaN`, meaning the input carries no sentinel).
    pub fn validate(&self) -> Result<(), HydatError> {
        if self.timestep != Timestep::Day {
            return Err(HydatError::configuration(format!(
                "timestep '{}' is not supported, only daily inputs can be processed",
                self.timestep
            )));
        }
        if self.nodata.is_infinite() {
            return Err(HydatError::configuration(format!(
                "nodata must be finite or NaN, got {}",
                self.nodata
            )));
        }
        Ok(())
    }
}

/// Checks that a year range is not reversed.
pub(crate) fn check_year_range(year_start: i32, year_end: i32) -> Result<(), HydatError> {
    if year_start > year_end {
        return Err(HydatError::configuration(format!(
            "year range {year_start}..={year_end} is reversed"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MonthlySpec
// ---------------------------------------------------------------------------

/// Which monthly product to build: reducer plus output variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySpec {
    reducer: Reducer,
    output_name: String,
}

impl MonthlySpec {
    /// Creates a spec.
    pub fn new(reducer: Reducer, output_name: impl Into<String>) -> Self {
        Self {
            reducer,
            output_name: output_name.into(),
        }
    }

    /// Spec named `<variable>_<reducer>`, e.g. `swe_net_change`.
    pub fn for_variable(variable: Variable, reducer: Reducer) -> Self {
        Self::new(reducer, format!("{variable}_{reducer}"))
    }

    /// Returns the reducer.
    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    /// Returns the output variable name.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Checks the output name and that the reducer applies to `variable`.
    pub fn validate(&self, variable: Variable) -> Result<(), HydatError> {
        if self.output_name.trim().is_empty() {
            return Err(HydatError::configuration("output variable name is empty"));
        }
        if !variable.supports(self.reducer) {
            return Err(HydatError::configuration(format!(
                "reducer '{}' is not applicable to '{variable}'",
                self.reducer
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WaterInputConfig
// ---------------------------------------------------------------------------

/// Configuration for the monthly water-input combiner.
///
/// Inputs are two monthly products: total precipitation and SWE net change.
#[derive(Debug, Clone)]
pub struct WaterInputConfig {
    precip_name: String,
    swe_change_name: String,
    output_name: String,
    nodata: f64,
    error_mode: ErrorMode,
}

impl WaterInputConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: inputs `prcp_sum` and `swe_net_change`, output
    /// `water_input`, no-data `-9999.0`, strict error mode.
    pub fn new() -> Self {
        Self {
            precip_name: "prcp_sum".to_string(),
            swe_change_name: "swe_net_change".to_string(),
            output_name: "water_input".to_string(),
            nodata: DEFAULT_NODATA,
            error_mode: ErrorMode::Strict,
        }
    }

    /// Sets the precipitation variable name in the precipitation product.
    pub fn with_precip_name(mut self, name: impl Into<String>) -> Self {
        self.precip_name = name.into();
        self
    }

    /// Sets the SWE net-change variable name in the SWE product.
    pub fn with_swe_change_name(mut self, name: impl Into<String>) -> Self {
        self.swe_change_name = name.into();
        self
    }

    /// Sets the output variable name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Sets the fallback no-data sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    /// Sets the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    // --- Accessors ---

    /// Returns the precipitation variable name.
    pub fn precip_name(&self) -> &str {
        &self.precip_name
    }

    /// Returns the SWE net-change variable name.
    pub fn swe_change_name(&self) -> &str {
        &self.swe_change_name
    }

    /// Returns the output variable name.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the fallback no-data sentinel.
    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Returns the error mode.
    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), HydatError> {
        for (what, name) in [
            ("precipitation", &self.precip_name),
            ("SWE net change", &self.swe_change_name),
            ("output", &self.output_name),
        ] {
            if name.trim().is_empty() {
                return Err(HydatError::configuration(format!(
                    "{what} variable name is empty"
                )));
            }
        }
        if self.nodata.is_infinite() {
            return Err(HydatError::configuration(format!(
                "nodata must be finite or NaN, got {}",
                self.nodata
            )));
        }
        Ok(())
    }
}

impl Default for WaterInputConfig {
    fn default() -> Self {
        Self::new()
    }
}
