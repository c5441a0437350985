//! Canonical schema model
//!
//! The shared data structures every dialect normalizer produces and the
//! resolver consumes. Pure data, no behavior beyond constructors and a few
//! predicates.

use serde::{Deserialize, Serialize};

/// Primitive tag of a field; drives all resolution branching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Reference,
    Object,
    Array,
    /// Any tag we don't model structurally (datetime, slug, geopoint, ...)
    Other(String),
}

impl FieldKind {
    /// Parse a dialect type tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "string" | "text" => FieldKind::String,
            "number" | "integer" | "float" => FieldKind::Number,
            "boolean" | "bool" => FieldKind::Boolean,
            "reference" => FieldKind::Reference,
            "object" => FieldKind::Object,
            "array" => FieldKind::Array,
            other => FieldKind::Other(other.to_string()),
        }
    }

    /// The canonical lowercase tag for display purposes.
    pub fn tag(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Reference => "reference",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Other(tag) => tag,
        }
    }
}

/// A node-local attribute description.
///
/// Immutable once produced by a normalizer; the resolver never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Unique among siblings; absent for anonymous array-item descriptors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: FieldKind,
    /// Human label, used only as a fallback matching signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Nested fields when `kind = Object`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Field>,
    /// One descriptor per union member when `kind = Array`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_kinds: Vec<Field>,
    /// Explicit reference targets supplied by the dialect.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    /// Targets inferred eagerly during normalization. Kept separate from
    /// `targets` so the resolver still tags the resulting edges as inferred.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inferred_targets: Vec<String>,
}

impl Field {
    /// Create an anonymous field descriptor.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            name: None,
            kind,
            title: None,
            children: Vec::new(),
            item_kinds: Vec::new(),
            targets: Vec::new(),
            inferred_targets: Vec::new(),
        }
    }

    /// Create a named field.
    pub fn named(name: impl Into<String>, kind: FieldKind) -> Self {
        let mut field = Self::new(kind);
        field.name = Some(name.into());
        field
    }

    /// Internal fields (underscore-prefixed) never enter the canonical model;
    /// normalizers use this to drop them at construction.
    pub fn is_internal_name(name: &str) -> bool {
        name.starts_with('_')
    }
}

/// Category of a top-level schema entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    /// Independently addressable root entity (a "collection").
    Document,
    /// Embeddable, composable entity.
    Object,
    /// Non-graph kinds (primitive aliases etc.); never become nodes.
    Other(String),
}

impl TypeCategory {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "document" => TypeCategory::Document,
            "object" => TypeCategory::Object,
            other => TypeCategory::Other(other.to_string()),
        }
    }

    /// Only Document and Object types become graph nodes or edge targets.
    pub fn is_graph_category(&self) -> bool {
        matches!(self, TypeCategory::Document | TypeCategory::Object)
    }
}

/// A top-level schema entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Unique across the whole schema (primary key).
    pub name: String,
    pub category: TypeCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            fields: Vec::new(),
        }
    }

    pub fn with_fields(name: impl Into<String>, category: TypeCategory, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            category,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_roundtrip() {
        assert_eq!(FieldKind::from_tag("String"), FieldKind::String);
        assert_eq!(FieldKind::from_tag("REFERENCE"), FieldKind::Reference);
        assert_eq!(FieldKind::from_tag("geopoint"), FieldKind::Other("geopoint".to_string()));
        assert_eq!(FieldKind::Other("slug".to_string()).tag(), "slug");
    }

    #[test]
    fn test_category_graph_predicate() {
        assert!(TypeCategory::from_tag("document").is_graph_category());
        assert!(TypeCategory::from_tag("Object").is_graph_category());
        assert!(!TypeCategory::from_tag("alias").is_graph_category());
    }

    #[test]
    fn test_internal_name_marker() {
        assert!(Field::is_internal_name("_rev"));
        assert!(!Field::is_internal_name("rev"));
    }
}
