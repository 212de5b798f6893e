// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration shape descriptors.
//!
//! A [`Shape`] is an explicit, statically declared description of a configuration
//! type: its fields in declaration order, each with an optional rename override and
//! a kind (scalar, map or composite). The schema walker and the flat projector read
//! only this descriptor, never the Rust type itself.
//!
//! Types bind themselves to a descriptor through [`ConfigShape`]:
//!
//! ```
//! use hydracfg::domain::{ConfigShape, Field, Shape};
//!
//! struct Child;
//!
//! impl ConfigShape for Child {
//!     fn shape() -> Shape {
//!         Shape::of::<Self>().string("Value1").string("Value2")
//!     }
//! }
//!
//! struct AppConfig;
//!
//! impl ConfigShape for AppConfig {
//!     fn shape() -> Shape {
//!         Shape::of::<Self>()
//!             .integer("TimeToLive")
//!             .field(Field::string("ApiVersion").renamed("api-version"))
//!             .composite::<Child>("Child")
//!     }
//! }
//!
//! assert_eq!(AppConfig::shape().fields().len(), 3);
//! ```

/// Binds a Rust type to the descriptor of its configuration shape.
///
/// The outward names in the descriptor (declared names, or their rename overrides)
/// must match the names the type uses when it is (de)serialized with serde, for
/// example through `#[serde(rename_all = "PascalCase")]` and `#[serde(rename = "..")]`.
pub trait ConfigShape {
    /// Returns the descriptor for this type.
    fn shape() -> Shape;
}

/// Scalar leaf types understood by the configuration service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Text
    String,
    /// Whole number
    Integer,
    /// Decimal or floating point number
    Decimal,
    /// `true` or `false`
    Boolean,
}

/// The kind of a field in a shape.
///
/// Composite fields reference their nested shape through a function so that shapes
/// can be declared independently and refer to one another.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// A scalar leaf
    Scalar(ScalarKind),
    /// A key/value table, always treated as one opaque leaf
    Map,
    /// A nested shape
    Composite(fn() -> Shape),
}

impl FieldKind {
    /// Returns true for scalar and map fields.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, FieldKind::Composite(_))
    }
}

/// One field of a configuration shape.
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    rename: Option<String>,
    kind: FieldKind,
}

impl Field {
    /// Creates a field with the given declared name and kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            rename: None,
            kind,
        }
    }

    /// Creates a scalar field.
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind))
    }

    /// Creates a string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarKind::String)
    }

    /// Creates an integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarKind::Integer)
    }

    /// Creates a decimal field.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarKind::Decimal)
    }

    /// Creates a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarKind::Boolean)
    }

    /// Creates a map-valued field.
    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Map)
    }

    /// Creates a composite field whose shape is given by `T`.
    pub fn composite<T: ConfigShape>(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Composite(T::shape))
    }

    /// Creates a composite field from a shape function.
    pub fn nested(name: impl Into<String>, shape: fn() -> Shape) -> Self {
        Self::new(name, FieldKind::Composite(shape))
    }

    /// Sets the name used in place of the declared name in every path.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rename override, if any.
    pub fn rename(&self) -> Option<&str> {
        self.rename.as_deref()
    }

    /// Returns the name this field has in paths: the override if set, else the
    /// declared name.
    pub fn outward_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    /// Returns the kind of this field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns true for scalar and map fields.
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

/// The descriptor of a configuration type.
#[derive(Clone, Debug)]
pub struct Shape {
    name: String,
    fields: Vec<Field>,
}

impl Shape {
    /// Creates an empty shape with the given name.
    ///
    /// Cycle detection identifies shapes by name and field layout, so two shapes
    /// may share a name as long as their fields differ.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Creates an empty shape named after the type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Appends a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a string field.
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(Field::string(name))
    }

    /// Appends an integer field.
    pub fn integer(self, name: impl Into<String>) -> Self {
        self.field(Field::integer(name))
    }

    /// Appends a decimal field.
    pub fn decimal(self, name: impl Into<String>) -> Self {
        self.field(Field::decimal(name))
    }

    /// Appends a boolean field.
    pub fn boolean(self, name: impl Into<String>) -> Self {
        self.field(Field::boolean(name))
    }

    /// Appends a map-valued field.
    pub fn map(self, name: impl Into<String>) -> Self {
        self.field(Field::map(name))
    }

    /// Appends a composite field whose shape is given by `T`.
    pub fn composite<T: ConfigShape>(self, name: impl Into<String>) -> Self {
        self.field(Field::composite::<T>(name))
    }

    /// Returns the shape name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns true if the shape declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
