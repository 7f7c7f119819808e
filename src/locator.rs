//! Mapping a year to the dataset path that holds it.

use std::path::{Path, PathBuf};

use crate::options::{ProcessConfig, Region, Variable};

/// Resolves the dataset path for one year.
///
/// Implemented for closures `Fn(i32) -> PathBuf`, so ad-hoc layouts need no
/// new type.
pub trait DatasetLocator {
    /// Path of the dataset holding `year`.
    fn locate(&self, year: i32) -> PathBuf;
}

impl<F> DatasetLocator for F
where
    F: Fn(i32) -> PathBuf,
{
    fn locate(&self, year: i32) -> PathBuf {
        self(year)
    }
}

/// Substitutes the year into a path template containing `{year}`.
///
/// # Example
///
/// ```
/// use hydat::{DatasetLocator, PatternLocator};
///
/// let loc = PatternLocator::new("/out/swe_accum_{year}.nc");
/// assert_eq!(loc.locate(2003).to_str(), Some("/out/swe_accum_2003.nc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLocator {
    template: String,
}

impl PatternLocator {
    /// Placeholder replaced by the year.
    pub const PLACEHOLDER: &'static str = "{year}";

    /// Creates a locator from a template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template.
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl DatasetLocator for PatternLocator {
    fn locate(&self, year: i32) -> PathBuf {
        PathBuf::from(
            self.template
                .replace(Self::PLACEHOLDER, &year.to_string()),
        )
    }
}

/// Local DayMet v3 archive layout:
/// `<dir>/daymet_v3_<variable>_<year>_<region>.nc4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaymetLocator {
    dir: PathBuf,
    variable: Variable,
    region: Region,
}

impl DaymetLocator {
    /// Creates a locator for one variable and region under `dir`.
    pub fn new(dir: impl Into<PathBuf>, variable: Variable, region: Region) -> Self {
        Self {
            dir: dir.into(),
            variable,
            region,
        }
    }

    /// Locator for the variable and region of `config` under `dir`.
    pub fn for_config(dir: impl Into<PathBuf>, config: &ProcessConfig) -> Self {
        Self::new(dir, config.variable(), config.region())
    }

    /// Archive directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for `year` without the directory.
    pub fn file_name(&self, year: i32) -> String {
        format!("daymet_v3_{}_{year}_{}.nc4", self.variable, self.region)
    }
}

impl DatasetLocator for DaymetLocator {
    fn locate(&self, year: i32) -> PathBuf {
        self.dir.join(self.file_name(year))
    }
}

/// Either archive layout, chosen at configuration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLocator {
    /// DayMet naming under a directory.
    Daymet(DaymetLocator),
    /// Free-form `{year}` template.
    Pattern(PatternLocator),
}

impl DatasetLocator for InputLocator {
    fn locate(&self, year: i32) -> PathBuf {
        match self {
            Self::Daymet(l) => l.locate(year),
            Self::Pattern(l) => l.locate(year),
        }
    }
}
