// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field path type for addressing leaves of a configuration shape.
//!
//! A `FieldPath` is the ordered list of outward field names from the root of a
//! shape down to a leaf. The same path renders dot-joined in the outbound schema
//! and colon-joined in the flattened key/value projection.

use std::fmt;

/// Separator used when a path is sent to the configuration service.
pub const SCHEMA_SEPARATOR: char = '.';

/// Separator used for keys of the flattened key/value projection.
pub const KEY_SEPARATOR: char = ':';

/// A path from the root of a configuration shape to one of its fields.
///
/// # Examples
///
/// ```
/// use hydracfg::domain::FieldPath;
///
/// let path = FieldPath::root().child("Child").child("Value1");
///
/// assert_eq!(path.to_schema_string(), "Child.Value1");
/// assert_eq!(path.to_key_string(), "Child:Value1");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Returns the empty path that every walk starts from.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from its segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use hydracfg::domain::FieldPath;
    ///
    /// let path = FieldPath::from_segments(["Child", "Child2", "Value2"]);
    /// assert_eq!(path.len(), 3);
    /// ```
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a new path extended by one field name.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_string());
        Self { segments }
    }

    /// Returns the field names making up this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the last segment, if any.
    pub fn leaf_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Joins the segments with the given separator.
    pub fn join(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(segment);
        }
        out
    }

    /// Renders the path the way it appears in the outbound schema.
    pub fn to_schema_string(&self) -> String {
        self.join(SCHEMA_SEPARATOR)
    }

    /// Renders the path the way it appears as a projection key.
    pub fn to_key_string(&self) -> String {
        self.join(KEY_SEPARATOR)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_schema_string())
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_schema_string()
    }
}
