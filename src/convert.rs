//! Pure conversion functions: TOML config structs -> engine config types.

use hydat_calendar::CalendarConvention;
use hydat_grid::Reducer;

use crate::config::*;
use crate::error::HydatError;
use crate::locator::{DaymetLocator, InputLocator, PatternLocator};
use crate::options::{ErrorMode, MonthlySpec, ProcessConfig, Variable, WaterInputConfig};

/// A product a configuration file can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    /// Daily accumulation of the run variable.
    Accumulation,
    /// Monthly aggregate of the run variable.
    Monthly,
    /// Monthly water input from two monthly products.
    WaterInput,
}

impl Product {
    /// Name used in configuration files and output file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accumulation => "accumulation",
            Self::Monthly => "monthly",
            Self::WaterInput => "water_input",
        }
    }
}

/// Parses a product name.
pub fn parse_product(s: &str) -> Result<Product, HydatError> {
    match s.to_lowercase().as_str() {
        "accumulation" => Ok(Product::Accumulation),
        "monthly" => Ok(Product::Monthly),
        "water_input" => Ok(Product::WaterInput),
        other => Err(HydatError::configuration(format!(
            "unknown product: {other:?}"
        ))),
    }
}

/// Parses a calendar convention name.
pub fn parse_calendar(s: &str) -> Result<CalendarConvention, HydatError> {
    s.parse().map_err(HydatError::configuration)
}

/// Builds and validates a [`ProcessConfig`] from the `[run]` and `[daymet]`
/// sections.
pub fn build_process_config(cfg: &HydatConfig) -> Result<ProcessConfig, HydatError> {
    let process = ProcessConfig::new(cfg.run.variable.parse()?)
        .with_timestep(cfg.daymet.timestep.parse()?)
        .with_region(cfg.daymet.region.parse()?)
        .with_convention(parse_calendar(&cfg.run.calendar)?)
        .with_nodata(cfg.run.nodata)
        .with_error_mode(cfg.run.error_mode.parse()?);
    process.validate()?;
    Ok(process)
}

/// Builds the daily input locator: the `[daymet]` pattern if given,
/// DayMet naming otherwise.
pub fn build_input_locator(cfg: &HydatConfig) -> Result<InputLocator, HydatError> {
    if let Some(pattern) = &cfg.daymet.pattern {
        return Ok(InputLocator::Pattern(PatternLocator::new(pattern.clone())));
    }
    Ok(InputLocator::Daymet(DaymetLocator::for_config(
        cfg.daymet.dir.clone(),
        &build_process_config(cfg)?,
    )))
}

/// Builds the output locator for `product` from the `[output]` section.
///
/// `product` is the product's file-name label, e.g. the monthly output
/// variable name.
pub fn build_output_locator(cfg: &HydatConfig, product: &str) -> PatternLocator {
    let file_name = cfg
        .output
        .file_pattern
        .replace("{variable}", &cfg.run.variable)
        .replace("{product}", product);
    PatternLocator::new(cfg.output.dir.join(file_name).to_string_lossy())
}

/// Builds and validates the [`MonthlySpec`] from the `[monthly]` section.
pub fn build_monthly_spec(cfg: &HydatConfig) -> Result<MonthlySpec, HydatError> {
    let monthly = cfg
        .monthly
        .as_ref()
        .ok_or_else(|| HydatError::configuration("product 'monthly' needs a [monthly] section"))?;
    let variable: Variable = cfg.run.variable.parse()?;
    let reducer: Reducer = monthly.reducer.parse()?;
    let spec = match &monthly.output_name {
        Some(name) => MonthlySpec::new(reducer, name.clone()),
        None => MonthlySpec::for_variable(variable, reducer),
    };
    spec.validate(variable)?;
    Ok(spec)
}

/// Builds the water-input configuration and its two input locators from
/// the `[water_input]` section.
pub fn build_water_input(
    cfg: &HydatConfig,
) -> Result<(WaterInputConfig, PatternLocator, PatternLocator), HydatError> {
    let wi = cfg.water_input.as_ref().ok_or_else(|| {
        HydatError::configuration("product 'water_input' needs a [water_input] section")
    })?;
    let mode: ErrorMode = cfg.run.error_mode.parse()?;
    let config = WaterInputConfig::new()
        .with_precip_name(wi.precip_name.clone())
        .with_swe_change_name(wi.swe_change_name.clone())
        .with_output_name(wi.output_name.clone())
        .with_nodata(cfg.run.nodata)
        .with_error_mode(mode);
    config.validate()?;
    Ok((
        config,
        PatternLocator::new(wi.precip.clone()),
        PatternLocator::new(wi.swe_change.clone()),
    ))
}
