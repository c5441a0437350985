//! Type registry
//!
//! Indexes the canonical types produced by a dialect normalizer: ordered
//! iteration, O(1) membership, the set of document types, and duplicate-name
//! handling. Built once per conversion run, read-only afterward.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::model::{TypeCategory, TypeDef};

/// Predicate deciding which types count as documents. Dialect normalizers
/// may supply their own; the default matches `TypeCategory::Document`.
pub type DocumentPredicate = fn(&TypeDef) -> bool;

fn default_document_predicate(type_def: &TypeDef) -> bool {
    type_def.category == TypeCategory::Document
}

/// Non-fatal conditions recorded during registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "warning")]
pub enum SchemaWarning {
    /// A later type reused an existing name and was dropped.
    DuplicateTypeName { name: String },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::DuplicateTypeName { name } => {
                write!(f, "duplicate type name dropped: {name}")
            }
        }
    }
}

/// The canonical, indexed schema a normalizer hands to the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSchema {
    types: Vec<TypeDef>,
    by_name: HashMap<String, usize>,
    document_names: HashSet<String>,
    all_names: HashSet<String>,
    warnings: Vec<SchemaWarning>,
}

impl ParsedSchema {
    /// Build a registry with the default document predicate.
    pub fn from_types(types: Vec<TypeDef>) -> Self {
        Self::from_types_with_predicate(types, default_document_predicate)
    }

    /// Build a registry in a single pass. Later duplicates are dropped with
    /// a recorded warning, never silently merged.
    pub fn from_types_with_predicate(types: Vec<TypeDef>, is_document: DocumentPredicate) -> Self {
        let mut kept: Vec<TypeDef> = Vec::with_capacity(types.len());
        let mut by_name = HashMap::with_capacity(types.len());
        let mut document_names = HashSet::new();
        let mut all_names = HashSet::with_capacity(types.len());
        let mut warnings = Vec::new();

        for type_def in types {
            if all_names.contains(&type_def.name) {
                tracing::warn!(name = %type_def.name, "duplicate type name dropped");
                warnings.push(SchemaWarning::DuplicateTypeName {
                    name: type_def.name.clone(),
                });
                continue;
            }
            if is_document(&type_def) {
                document_names.insert(type_def.name.clone());
            }
            all_names.insert(type_def.name.clone());
            by_name.insert(type_def.name.clone(), kept.len());
            kept.push(type_def);
        }

        Self {
            types: kept,
            by_name,
            document_names,
            all_names,
            warnings,
        }
    }

    /// All retained types, in insertion order.
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.by_name.get(name).map(|&idx| &self.types[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all_names.contains(name)
    }

    pub fn is_document(&self, name: &str) -> bool {
        self.document_names.contains(name)
    }

    /// A name is linkable when it exists and its type has a graph category
    /// (document or object). Edges are only ever drawn between linkable types.
    pub fn is_linkable(&self, name: &str) -> bool {
        self.get(name)
            .map(|t| t.category.is_graph_category())
            .unwrap_or(false)
    }

    /// Ordered iteration over the types that become graph nodes.
    pub fn graph_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter().filter(|t| t.category.is_graph_category())
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn document_count(&self) -> usize {
        self.document_names.len()
    }

    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }
}
