//! Dataset schema inspection and template copying.
//!
//! A [`DatasetTemplate`] captures everything needed to recreate a dataset's
//! layout: dimensions (with the unlimited flag), global attributes and the
//! per-variable schema. [`copy_template`] uses it to produce a destination
//! that mirrors a source except for a set of excluded variables, which the
//! caller then recreates with whatever shape its product needs.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use netcdf::AttributeValue;
use netcdf::types::{FloatType, IntType, NcVariableType};
use tracing::debug;

use crate::error::IoError;
use crate::store::{PendingDataset, create_dataset, open_dataset};

/// Attributes maintained by the NetCDF library itself; never copied.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "_NCProperties",
    "_IsNetcdf4",
    "_SuperblockVersion",
    "_Netcdf4Dimid",
    "_Netcdf4Coordinates",
];

fn is_reserved(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&name)
}

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// One dimension of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSpec {
    name: String,
    len: usize,
    unlimited: bool,
}

impl DimensionSpec {
    /// Dimension name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current length (for unlimited dimensions, the number of records).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dimension currently holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the dimension is unlimited (extendable).
    pub fn is_unlimited(&self) -> bool {
        self.unlimited
    }
}

/// Schema of one variable: name, dimension order, NetCDF type and attributes.
#[derive(Debug, Clone)]
pub struct VariableSpec {
    name: String,
    dimensions: Vec<String>,
    vartype: NcVariableType,
    attributes: Vec<(String, AttributeValue)>,
}

impl VariableSpec {
    /// Builds a spec from scratch.
    pub fn new(name: impl Into<String>, dimensions: Vec<String>, vartype: NcVariableType) -> Self {
        Self {
            name: name.into(),
            dimensions,
            vartype,
            attributes: Vec::new(),
        }
    }

    /// Reads the schema of an existing variable.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Netcdf`] if an attribute value cannot be read.
    pub fn from_variable(var: &netcdf::Variable<'_>) -> Result<Self, IoError> {
        let mut attributes = Vec::new();
        for att in var.attributes() {
            if is_reserved(att.name()) {
                continue;
            }
            attributes.push((att.name().to_string(), att.value()?));
        }
        Ok(Self {
            name: var.name(),
            dimensions: var.dimensions().iter().map(|d| d.name()).collect(),
            vartype: var.vartype(),
            attributes,
        })
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension names in storage order.
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// NetCDF storage type.
    pub fn vartype(&self) -> &NcVariableType {
        &self.vartype
    }

    /// Attributes in definition order.
    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    /// Looks up one attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the variable is laid out along `dimension`.
    pub fn uses_dimension(&self, dimension: &str) -> bool {
        self.dimensions.iter().any(|d| d == dimension)
    }

    /// Returns a copy with a different name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets (or replaces) an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    /// Removes an attribute if present.
    #[must_use]
    pub fn without_attribute(mut self, name: &str) -> Self {
        self.attributes.retain(|(n, _)| n != name);
        self
    }

    /// Creates this variable (schema and attributes, no data) in `file`.
    ///
    /// Attributes are written before any data so that `_FillValue` is
    /// accepted by NetCDF-4 files.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Netcdf`] if the variable or an attribute cannot be
    /// created, e.g. because a dimension is missing.
    pub fn define(&self, file: &mut netcdf::FileMut) -> Result<(), IoError> {
        let dims: Vec<&str> = self.dimensions.iter().map(String::as_str).collect();
        let mut var = file.add_variable_with_type(&self.name, &dims, &self.vartype)?;
        for (name, value) in &self.attributes {
            var.put_attribute(name, value.clone())?;
        }
        Ok(())
    }
}

/// Full schema of a dataset.
///
/// Built once by inspecting a source and consumed by the copier; it is not
/// meant to outlive a single copy.
#[derive(Debug, Clone)]
pub struct DatasetTemplate {
    dimensions: Vec<DimensionSpec>,
    attributes: Vec<(String, AttributeValue)>,
    variables: Vec<VariableSpec>,
}

impl DatasetTemplate {
    /// Inspects `file`, skipping reserved provenance attributes.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Netcdf`] if an attribute cannot be read.
    pub fn inspect(file: &netcdf::File) -> Result<Self, IoError> {
        let dimensions = file
            .dimensions()
            .map(|d| DimensionSpec {
                name: d.name(),
                len: d.len(),
                unlimited: d.is_unlimited(),
            })
            .collect();

        let mut attributes = Vec::new();
        for att in file.attributes() {
            if is_reserved(att.name()) {
                continue;
            }
            attributes.push((att.name().to_string(), att.value()?));
        }

        let variables = file
            .variables()
            .map(|v| VariableSpec::from_variable(&v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dimensions,
            attributes,
            variables,
        })
    }

    /// Dimensions in definition order.
    pub fn dimensions(&self) -> &[DimensionSpec] {
        &self.dimensions
    }

    /// Global attributes (reserved keys already removed).
    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    /// Variable schemas in definition order.
    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    /// Looks up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&DimensionSpec> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Looks up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Names of all variables laid out along `dimension`.
    pub fn variables_using(&self, dimension: &str) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| v.uses_dimension(dimension))
            .map(|v| v.name.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// CopyOptions
// ---------------------------------------------------------------------------

/// What to leave out when copying a dataset.
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    exclude_vars: BTreeSet<String>,
    exclude_data: BTreeSet<String>,
    force_unlimited: BTreeSet<String>,
}

impl CopyOptions {
    /// Copies everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves the named variables out entirely (no schema, no data).
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_vars.extend(names.into_iter().map(Into::into));
        self
    }

    /// Copies the named variables' schema and attributes but not their data.
    pub fn without_data<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_data.extend(names.into_iter().map(Into::into));
        self
    }

    /// Creates the named dimension as unlimited even if the source fixed it.
    pub fn with_unlimited(mut self, dimension: impl Into<String>) -> Self {
        self.force_unlimited.insert(dimension.into());
        self
    }

    /// Whether `name` is excluded entirely.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_vars.contains(name)
    }

    fn copies_data(&self, name: &str) -> bool {
        !self.exclude_data.contains(name)
    }
}

// ---------------------------------------------------------------------------
// copy_template
// ---------------------------------------------------------------------------

/// Copies `source` to a new dataset at `destination`, leaving out `excluded`.
///
/// Global attributes (minus reserved keys), every dimension (unlimited
/// dimensions stay unlimited) and every non-excluded variable with its data
/// and attributes are copied verbatim. The destination is returned open and
/// uncommitted so the caller can add replacement variables; it is deleted
/// if dropped without [`PendingDataset::commit`].
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `source` does not exist,
/// [`IoError::Storage`] if `destination` cannot be created, and
/// [`IoError::Netcdf`] / [`IoError::UnsupportedType`] if copying fails. On
/// error no destination file is left behind.
pub fn copy_template(
    source: &Path,
    destination: &Path,
    excluded: &[&str],
) -> Result<PendingDataset, IoError> {
    copy_template_with(
        source,
        destination,
        &CopyOptions::new().excluding(excluded.iter().copied()),
    )
}

/// Like [`copy_template`] with full control over what is copied.
pub fn copy_template_with(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
) -> Result<PendingDataset, IoError> {
    let src = open_dataset(source)?;
    let template = DatasetTemplate::inspect(&src)?;

    let mut pending = create_dataset(destination)?;
    let dst = pending.file_mut();

    for (name, value) in template.attributes() {
        dst.add_attribute(name, value.clone())?;
    }

    for dim in template.dimensions() {
        if dim.unlimited || options.force_unlimited.contains(&dim.name) {
            dst.add_unlimited_dimension(&dim.name)?;
        } else {
            dst.add_dimension(&dim.name, dim.len)?;
        }
    }

    for spec in template.variables() {
        if options.is_excluded(spec.name()) {
            debug!(variable = spec.name(), "excluded from template copy");
            continue;
        }
        spec.define(dst)?;
        if !options.copies_data(spec.name()) {
            continue;
        }
        let src_var = src
            .variable(spec.name())
            .ok_or_else(|| IoError::MissingVariable {
                name: spec.name().to_string(),
                path: source.to_path_buf(),
            })?;
        let mut dst_var = dst
            .variable_mut(spec.name())
            .ok_or_else(|| IoError::storage(destination, format!("variable '{}' vanished", spec.name())))?;
        copy_data(&src_var, &mut dst_var, spec, &template)?;
    }

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        n_variables = template.variables().len(),
        "template copied"
    );
    Ok(pending)
}

/// Copies every value of `src` into `dst`, dispatching on the storage type.
fn copy_data(
    src: &netcdf::Variable<'_>,
    dst: &mut netcdf::VariableMut<'_>,
    spec: &VariableSpec,
    template: &DatasetTemplate,
) -> Result<(), IoError> {
    // Unlimited dimensions start empty in the destination, so their extent
    // has to be spelled out instead of taken from the destination's shape.
    let extents = spec
        .dimensions()
        .iter()
        .any(|d| template.dimension(d).is_some_and(DimensionSpec::is_unlimited))
        .then(|| src.dimensions().iter().map(|d| 0..d.len()).collect::<Vec<_>>());

    match spec.vartype() {
        NcVariableType::Float(FloatType::F32) => transfer::<f32>(src, dst, extents),
        NcVariableType::Float(FloatType::F64) => transfer::<f64>(src, dst, extents),
        NcVariableType::Int(IntType::I8) => transfer::<i8>(src, dst, extents),
        NcVariableType::Int(IntType::U8) => transfer::<u8>(src, dst, extents),
        NcVariableType::Int(IntType::I16) => transfer::<i16>(src, dst, extents),
        NcVariableType::Int(IntType::U16) => transfer::<u16>(src, dst, extents),
        NcVariableType::Int(IntType::I32) => transfer::<i32>(src, dst, extents),
        NcVariableType::Int(IntType::U32) => transfer::<u32>(src, dst, extents),
        NcVariableType::Int(IntType::I64) => transfer::<i64>(src, dst, extents),
        NcVariableType::Int(IntType::U64) => transfer::<u64>(src, dst, extents),
        other => Err(IoError::UnsupportedType {
            name: spec.name().to_string(),
            vartype: format!("{other:?}"),
        }),
    }
}

fn transfer<T>(
    src: &netcdf::Variable<'_>,
    dst: &mut netcdf::VariableMut<'_>,
    extents: Option<Vec<Range<usize>>>,
) -> Result<(), IoError>
where
    T: netcdf::NcTypeDescriptor + Copy,
{
    let values = src.get_values::<T, _>(..)?;
    if values.is_empty() {
        return Ok(());
    }
    match extents {
        Some(extents) => dst.put_values(&values, extents)?,
        None => dst.put_values(&values, ..)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> VariableSpec {
        VariableSpec::new(
            "swe",
            vec!["time".into(), "y".into(), "x".into()],
            NcVariableType::Float(FloatType::F32),
        )
        .with_attribute("units", "kg/m2")
        .with_attribute("_FillValue", -9999.0f32)
    }

    #[test]
    fn reserved_attribute_names() {
        assert!(is_reserved("_NCProperties"));
        assert!(!is_reserved("units"));
        assert!(!is_reserved("_FillValue"));
    }

    #[test]
    fn spec_attribute_replace_and_remove() {
        let s = spec().with_attribute("units", "mm");
        assert_eq!(s.attributes().len(), 2);
        assert_eq!(s.attribute("units"), Some(&AttributeValue::Str("mm".into())));

        let s = s.without_attribute("units");
        assert!(s.attribute("units").is_none());
        assert_eq!(s.attributes().len(), 1);
    }

    #[test]
    fn spec_dimension_queries() {
        let s = spec();
        assert!(s.uses_dimension("time"));
        assert!(!s.uses_dimension("nv"));
        assert_eq!(s.renamed("swe_accum").name(), "swe_accum");
    }

    #[test]
    fn options_exclusion() {
        let opts = CopyOptions::new().excluding(["swe"]).without_data(["lat"]);
        assert!(opts.is_excluded("swe"));
        assert!(!opts.is_excluded("lat"));
        assert!(!opts.copies_data("lat"));
        assert!(opts.copies_data("lon"));
    }
}
