//! # hydat-io
//!
//! NetCDF plumbing for daily gridded climate stacks: open sources, copy a
//! dataset's schema and static content into a new destination, read daily
//! `(time, y, x)` grids as `f64`, and write computed grids back.
//!
//! Destinations are handed out as [`PendingDataset`]s, which delete the file
//! on drop unless committed.

mod error;
mod read;
mod store;
mod template;
mod write;

pub use error::IoError;
pub use read::{GridVariable, attribute_as_f64};
pub use store::{PendingDataset, create_dataset, open_dataset};
pub use template::{
    CopyOptions, DatasetTemplate, DimensionSpec, RESERVED_ATTRIBUTES, VariableSpec, copy_template,
    copy_template_with,
};
pub use write::{write_axis, write_grid_slab};
