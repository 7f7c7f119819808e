use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::HydatError;

/// Top-level hydat configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydatConfig {
    /// What to process and how to treat failures.
    pub run: RunToml,

    /// Where the daily inputs live.
    #[serde(default)]
    pub daymet: DaymetToml,

    /// Where products are written.
    #[serde(default)]
    pub output: OutputToml,

    /// Monthly aggregation settings.
    #[serde(default)]
    pub monthly: Option<MonthlyToml>,

    /// Water-input combination settings.
    #[serde(default)]
    pub water_input: Option<WaterInputToml>,
}

impl HydatConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, HydatError> {
        toml::from_str(text).map_err(|e| HydatError::Configuration {
            reason: format!("invalid configuration: {e}"),
        })
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, HydatError> {
        let text = std::fs::read_to_string(path).map_err(|e| HydatError::InputNotFound {
            reason: format!("cannot read configuration {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    pub variable: String,
    pub year_start: i32,
    pub year_end: i32,
    #[serde(default = "default_products")]
    pub products: Vec<String>,
    #[serde(default = "default_calendar")]
    pub calendar: String,
    #[serde(default = "default_nodata")]
    pub nodata: f64,
    #[serde(default = "default_error_mode")]
    pub error_mode: String,
}

fn default_products() -> Vec<String> {
    vec!["accumulation".to_string()]
}
fn default_calendar() -> String {
    "daymet".to_string()
}
fn default_nodata() -> f64 {
    hydat_grid::DEFAULT_NODATA
}
fn default_error_mode() -> String {
    "strict".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaymetToml {
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_timestep")]
    pub timestep: String,
    /// Overrides the DayMet naming with a `{year}` path template.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for DaymetToml {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            region: default_region(),
            timestep: default_timestep(),
            pattern: None,
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_region() -> String {
    "na".to_string()
}
fn default_timestep() -> String {
    "day".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// File name template; `{variable}`, `{product}` and `{year}` are
    /// substituted.
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_pattern: default_file_pattern(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_file_pattern() -> String {
    "{variable}_{product}_{year}.nc".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonthlyToml {
    pub reducer: String,
    /// Defaults to `<variable>_<reducer>`.
    #[serde(default)]
    pub output_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaterInputToml {
    /// `{year}` template of the monthly precipitation product.
    pub precip: String,
    /// `{year}` template of the monthly SWE net-change product.
    pub swe_change: String,
    #[serde(default = "default_precip_name")]
    pub precip_name: String,
    #[serde(default = "default_swe_change_name")]
    pub swe_change_name: String,
    #[serde(default = "default_water_input_name")]
    pub output_name: String,
}

fn default_precip_name() -> String {
    "prcp_sum".to_string()
}
fn default_swe_change_name() -> String {
    "swe_net_change".to_string()
}
fn default_water_input_name() -> String {
    "water_input".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = HydatConfig::from_toml_str(
            r#"
            [run]
            variable = "swe"
            year_start = 2003
            year_end = 2004
            "#,
        )
        .unwrap();
        assert_eq!(cfg.run.products, vec!["accumulation"]);
        assert_eq!(cfg.run.calendar, "daymet");
        assert_eq!(cfg.run.nodata, -9999.0);
        assert_eq!(cfg.run.error_mode, "strict");
        assert_eq!(cfg.daymet.region, "na");
        assert_eq!(cfg.daymet.timestep, "day");
        assert_eq!(cfg.output.file_pattern, "{variable}_{product}_{year}.nc");
        assert!(cfg.monthly.is_none());
        assert!(cfg.water_input.is_none());
    }

    #[test]
    fn full_config() {
        let cfg = HydatConfig::from_toml_str(
            r#"
            [run]
            variable = "prcp"
            year_start = 1980
            year_end = 1981
            products = ["monthly"]
            error_mode = "lenient"

            [daymet]
            dir = "/archive/daymet"
            region = "hawaii"

            [output]
            dir = "/products"

            [monthly]
            reducer = "sum"

            [water_input]
            precip = "/products/prcp_sum_{year}.nc"
            swe_change = "/products/swe_net_change_{year}.nc"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.daymet.dir, PathBuf::from("/archive/daymet"));
        assert_eq!(cfg.monthly.as_ref().unwrap().reducer, "sum");
        let wi = cfg.water_input.unwrap();
        assert_eq!(wi.output_name, "water_input");
        assert_eq!(wi.swe_change_name, "swe_net_change");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = HydatConfig::from_toml_str(
            r#"
            [run]
            variable = "swe"
            year_start = 2003
            year_end = 2004
            threads = 8
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, HydatError::Configuration { .. }));
    }

    #[test]
    fn missing_run_section_rejected() {
        assert!(HydatConfig::from_toml_str("[daymet]\nregion = \"na\"\n").is_err());
    }

    #[test]
    fn missing_file() {
        let err = HydatConfig::from_path(Path::new("/no/such/hydat.toml")).unwrap_err();
        assert!(matches!(err, HydatError::InputNotFound { .. }));
    }
}
