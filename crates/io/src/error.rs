//! Error types for hydat-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the hydat-io crate.
///
/// Covers missing inputs, failures reported by the NetCDF library, schema
/// and shape problems found while reading grids, and destinations that
/// cannot be created or written.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a destination dataset cannot be created or written.
    #[error("cannot write {}: {reason}", path.display())]
    Storage {
        /// Destination path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a variable's NetCDF type cannot be handled.
    #[error("variable '{name}' has unsupported type {vartype}")]
    UnsupportedType {
        /// Variable name.
        name: String,
        /// Debug rendering of the NetCDF type.
        vartype: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl IoError {
    /// Wraps any displayable failure as a [`IoError::Storage`] for `path`.
    pub(crate) fn storage(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        IoError::Storage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
