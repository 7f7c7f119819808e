//! Error type for the hydat engines.

use hydat_calendar::CalendarError;
use hydat_grid::GridError;
use hydat_io::IoError;

/// Error type for all engine-level operations.
///
/// Lower-crate errors are folded into four kinds a caller can act on;
/// [`HydatError::Year`] attaches the variable and year that failed.
#[derive(Debug, thiserror::Error)]
pub enum HydatError {
    /// Invalid configuration: unknown variable, reducer not applicable,
    /// non-daily timestep, empty output name, reversed year range.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was wrong.
        reason: String,
    },

    /// A required input file, variable or dataset could not be read.
    #[error("input not found: {reason}")]
    InputNotFound {
        /// What was missing.
        reason: String,
    },

    /// A day count or grid shape disagrees with what was expected.
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// The violated expectation.
        reason: String,
    },

    /// A destination dataset could not be created or written.
    #[error("storage error: {reason}")]
    Storage {
        /// Description of the failure.
        reason: String,
    },

    /// Wraps a failure with the year it happened in.
    #[error("{variable} {year}: {source}")]
    Year {
        /// Variable being processed.
        variable: String,
        /// Year being processed.
        year: i32,
        /// Underlying failure.
        #[source]
        source: Box<HydatError>,
    },
}

impl HydatError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn in_year(self, variable: &str, year: i32) -> Self {
        Self::Year {
            variable: variable.to_string(),
            year,
            source: Box::new(self),
        }
    }

    /// Classifies an I/O failure that happened while writing a destination.
    ///
    /// Everything except a shape disagreement is a storage problem, even if
    /// the NetCDF library reported it as a generic error.
    pub(crate) fn from_write(err: IoError) -> Self {
        match err {
            IoError::DimensionMismatch { .. } => err.into(),
            other => Self::Storage {
                reason: other.to_string(),
            },
        }
    }

    /// The innermost error, skipping any [`HydatError::Year`] wrappers.
    pub fn root_cause(&self) -> &HydatError {
        match self {
            Self::Year { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<IoError> for HydatError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::FileNotFound { .. }
            | IoError::MissingVariable { .. }
            | IoError::Netcdf { .. } => Self::InputNotFound {
                reason: e.to_string(),
            },
            IoError::Storage { .. } => Self::Storage {
                reason: e.to_string(),
            },
            IoError::DimensionMismatch { .. } => Self::shape(e.to_string()),
            IoError::UnsupportedType { .. } => Self::configuration(e.to_string()),
        }
    }
}

impl From<GridError> for HydatError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::ShapeMismatch { .. } | GridError::EmptyWindow { .. } => {
                Self::shape(e.to_string())
            }
            GridError::UnknownReducer { .. } | GridError::Calendar(_) => {
                Self::configuration(e.to_string())
            }
        }
    }
}

impl From<CalendarError> for HydatError {
    fn from(e: CalendarError) -> Self {
        Self::configuration(e.to_string())
    }
}
