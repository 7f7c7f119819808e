//! Opening source datasets and creating destination datasets.
//!
//! A destination is only kept once it has been committed. Dropping a
//! [`PendingDataset`] without calling [`PendingDataset::commit`] closes the
//! file and deletes it, so an error part-way through a year never leaves a
//! half-written product on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::IoError;

/// Open a NetCDF file at `path` for reading, returning
/// [`IoError::FileNotFound`] if the path does not exist on disk.
pub fn open_dataset(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Create (or truncate) a NetCDF file at `path` for writing.
///
/// # Errors
///
/// Returns [`IoError::Storage`] if the parent directory does not exist or
/// the NetCDF library refuses to create the file.
pub fn create_dataset(path: &Path) -> Result<PendingDataset, IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        return Err(IoError::storage(
            path,
            format!("directory {} does not exist", parent.display()),
        ));
    }
    let file = netcdf::create(path).map_err(|e| IoError::storage(path, e))?;
    debug!(path = %path.display(), "created dataset");
    Ok(PendingDataset {
        file: Some(file),
        path: path.to_path_buf(),
    })
}

/// A destination dataset that is removed unless explicitly committed.
pub struct PendingDataset {
    file: Option<netcdf::FileMut>,
    path: PathBuf,
}

impl fmt::Debug for PendingDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDataset")
            .field("path", &self.path)
            .field("open", &self.file.is_some())
            .finish()
    }
}

impl PendingDataset {
    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read access to the open file.
    pub fn file(&self) -> &netcdf::FileMut {
        // `file` is only taken in `commit` and `drop`, both of which consume self.
        self.file.as_ref().expect("pending dataset is open")
    }

    /// Write access to the open file.
    pub fn file_mut(&mut self) -> &mut netcdf::FileMut {
        self.file.as_mut().expect("pending dataset is open")
    }

    /// Closes the file, keeping it on disk, and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Storage`] if the final flush or close fails. The
    /// incomplete file is removed in that case.
    pub fn commit(mut self) -> Result<PathBuf, IoError> {
        let path = std::mem::take(&mut self.path);
        let closed = self.file.take().map_or(Ok(()), netcdf::FileMut::close);
        settle(path, closed)
    }
}

impl Drop for PendingDataset {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
            remove_partial(&self.path);
        }
    }
}

/// Keeps a closed destination, or removes it if closing failed.
fn settle(path: PathBuf, closed: Result<(), netcdf::Error>) -> Result<PathBuf, IoError> {
    match closed {
        Ok(()) => {
            debug!(path = %path.display(), "committed dataset");
            Ok(path)
        }
        Err(e) => {
            remove_partial(&path);
            Err(IoError::storage(path, e))
        }
    }
}

fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed uncommitted dataset"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove uncommitted dataset"),
    }
}
