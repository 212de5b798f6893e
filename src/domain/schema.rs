// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema derivation from configuration shapes.
//!
//! The schema is the ordered list of leaf paths the client asks the configuration
//! service to hydrate. It is derived once from a [`Shape`] by walking its fields in
//! declaration order, descending into composites and emitting one path per scalar
//! or map field.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::field_path::FieldPath;
use crate::domain::shape::{FieldKind, ScalarKind, Shape};

/// The ordered leaf paths of a configuration shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    paths: Vec<FieldPath>,
}

impl Schema {
    /// Returns the paths in declaration order.
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// Returns an iterator over the paths.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldPath> {
        self.paths.iter()
    }

    /// Returns the number of leaf paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if the shape had no leaves.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns true if a path renders to the given dotted string.
    pub fn contains(&self, dotted: &str) -> bool {
        self.paths.iter().any(|p| p.to_schema_string() == dotted)
    }

    /// Renders the schema as it is sent to the configuration service.
    pub fn to_wire(&self) -> Vec<String> {
        self.paths.iter().map(FieldPath::to_schema_string).collect()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldPath;
    type IntoIter = std::slice::Iter<'a, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Derives the schema of a shape.
///
/// Rename overrides replace declared names. Composite fields never appear
/// themselves, only their leaves do; a composite with no fields contributes
/// nothing. Duplicate paths are kept as they are.
///
/// # Errors
///
/// Returns [`ConfigError::CyclicShape`] if a shape contains itself.
///
/// # Examples
///
/// ```
/// use hydracfg::domain::{derive_schema, Field, Shape};
///
/// fn child() -> Shape {
///     Shape::new("Child").string("Value1").string("Value2")
/// }
///
/// let shape = Shape::new("Root")
///     .string("ApiVersion")
///     .field(Field::nested("Child", child));
///
/// let schema = derive_schema(&shape).unwrap();
/// assert_eq!(schema.to_wire(), vec!["ApiVersion", "Child.Value1", "Child.Value2"]);
/// ```
pub fn derive_schema(shape: &Shape) -> Result<Schema> {
    let mut paths = Vec::new();
    let mut ancestry = Ancestry::new(shape);
    collect_leaves(shape, &FieldPath::root(), &mut ancestry, &mut paths)?;
    Ok(Schema { paths })
}

fn collect_leaves(
    shape: &Shape,
    parent: &FieldPath,
    ancestry: &mut Ancestry,
    out: &mut Vec<FieldPath>,
) -> Result<()> {
    for field in shape.fields() {
        let path = parent.child(field.outward_name());
        match field.kind() {
            FieldKind::Scalar(_) | FieldKind::Map => out.push(path),
            FieldKind::Composite(nested) => {
                let nested = nested();
                ancestry.enter(&nested, &path)?;
                collect_leaves(&nested, &path, ancestry, out)?;
                ancestry.leave();
            }
        }
    }
    Ok(())
}

/// Identifies a shape by its name and field layout.
///
/// A cycle re-enters a descriptor produced by the same shape function, which always
/// has the same signature. Distinct shapes that merely share a name differ in their
/// fields and are not mistaken for one another.
#[derive(Debug, PartialEq, Eq)]
struct Signature {
    name: String,
    fields: Vec<(String, Slot)>,
}

#[derive(Debug, PartialEq, Eq)]
enum Slot {
    Scalar(ScalarKind),
    Map,
    Composite,
}

impl Signature {
    fn of(shape: &Shape) -> Self {
        let fields = shape
            .fields()
            .iter()
            .map(|field| {
                let slot = match field.kind() {
                    FieldKind::Scalar(kind) => Slot::Scalar(kind),
                    FieldKind::Map => Slot::Map,
                    FieldKind::Composite(_) => Slot::Composite,
                };
                (field.outward_name().to_string(), slot)
            })
            .collect();
        Self {
            name: shape.name().to_string(),
            fields,
        }
    }
}

/// The shapes on the current recursion path.
pub(crate) struct Ancestry {
    stack: Vec<Signature>,
}

impl Ancestry {
    pub(crate) fn new(root: &Shape) -> Self {
        Self {
            stack: vec![Signature::of(root)],
        }
    }

    /// Pushes a nested shape, failing if it is already on the path.
    pub(crate) fn enter(&mut self, shape: &Shape, at: &FieldPath) -> Result<()> {
        let signature = Signature::of(shape);
        if self.stack.contains(&signature) {
            return Err(ConfigError::CyclicShape {
                shape: shape.name().to_string(),
                path: at.to_schema_string(),
            });
        }
        self.stack.push(signature);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }
}
