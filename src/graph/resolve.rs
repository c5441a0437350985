//! Reference & composition resolution
//!
//! Walks every field of every graph type and decides which fields imply an
//! edge to another type. Resolution never fails: an unresolvable field
//! yields zero edges, and an incomplete schema degrades to a sparser graph.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Field, FieldKind, TypeCategory};
use crate::registry::ParsedSchema;

/// Relationship kind carried by every edge. Rendering layers map these tags
/// to visual styles; the core never interprets them further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    #[serde(rename = "direct-reference")]
    Reference,
    #[serde(rename = "inferred-reference")]
    InferredReference,
    #[serde(rename = "array-reference")]
    ArrayReference,
    #[serde(rename = "inferred-array-reference")]
    InferredArrayReference,
    #[serde(rename = "object-composition")]
    ObjectComposition,
    #[serde(rename = "array-composition")]
    ArrayComposition,
}

impl RelationKind {
    pub fn as_tag(&self) -> &'static str {
        match self {
            RelationKind::Reference => "direct-reference",
            RelationKind::InferredReference => "inferred-reference",
            RelationKind::ArrayReference => "array-reference",
            RelationKind::InferredArrayReference => "inferred-array-reference",
            RelationKind::ObjectComposition => "object-composition",
            RelationKind::ArrayComposition => "array-composition",
        }
    }
}

/// A resolved relationship before assembly-time deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEdge {
    pub source_type: String,
    pub target_type: String,
    /// The field that originated the edge; used as the anchor port.
    pub source_field: String,
    /// `field`, `field?`, `field[]` or `field[]?`. The suffix is part of the
    /// dedup key, so an inferred edge never masks a direct one.
    pub display_label: String,
    pub kind: RelationKind,
}

/// Tuning knobs for the target-inference heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferencePolicy {
    /// Also try the field name with a trailing `s` stripped. Dialect policy,
    /// not a universal rule; off by default.
    pub strip_plural: bool,
}

/// Name/title based target inference for reference fields without explicit
/// targets. Candidates are tried in a fixed order and each is independently
/// validated by the caller-supplied linkability check; unknown or
/// wrong-category candidates are dropped, not substituted.
pub struct TargetInference {
    suffix: Regex,
    policy: InferencePolicy,
}

impl TargetInference {
    pub fn new(policy: InferencePolicy) -> Self {
        // Longest alternatives first so `_ref` wins over `ref`.
        let suffix = Regex::new(r"(?i)(_ref|_id|ref|id)$").unwrap();
        Self { suffix, policy }
    }

    /// Ordered, deduplicated candidate type names:
    /// the field name itself, then the title lower-cased with whitespace
    /// removed, then the name with one trailing ref/id suffix stripped,
    /// then (policy-gated) the name with a trailing `s` stripped.
    pub fn candidates(
        &self,
        name: Option<&str>,
        title: Option<&str>,
        is_linkable: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let push = |candidate: String, found: &mut Vec<String>| {
            if !candidate.is_empty() && !found.contains(&candidate) && is_linkable(&candidate) {
                found.push(candidate);
            }
        };

        if let Some(name) = name {
            push(name.to_string(), &mut found);
        }
        if let Some(title) = title {
            let squashed: String = title
                .to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            push(squashed, &mut found);
        }
        if let Some(name) = name {
            let stripped = self.suffix.replace(name, "");
            if stripped != name {
                push(stripped.into_owned(), &mut found);
            }
            if self.policy.strip_plural {
                if let Some(singular) = name.strip_suffix('s') {
                    push(singular.to_string(), &mut found);
                }
            }
        }

        found
    }
}

/// Per-run resolver over a read-only registry.
pub struct Resolver<'a> {
    schema: &'a ParsedSchema,
    inference: TargetInference,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a ParsedSchema) -> Self {
        Self {
            schema,
            inference: TargetInference::new(InferencePolicy::default()),
        }
    }

    /// Resolve every field of every graph type, in type-then-field order.
    pub fn resolve_all(&self) -> Vec<CandidateEdge> {
        let mut edges = Vec::new();
        for type_def in self.schema.graph_types() {
            for field in &type_def.fields {
                edges.extend(self.resolve_field(&type_def.name, field));
            }
        }
        edges
    }

    /// Resolve a single field. A field matches at most one rule branch;
    /// array recursion over item descriptors can still yield multiple edges.
    pub fn resolve_field(&self, source_type: &str, field: &Field) -> Vec<CandidateEdge> {
        let Some(field_name) = field.name.as_deref() else {
            return Vec::new();
        };

        match &field.kind {
            FieldKind::Reference => self.reference_edges(source_type, field, field_name, false),
            FieldKind::Object => self
                .composition_edge(source_type, field_name, field_name, false)
                .into_iter()
                .collect(),
            FieldKind::Array => field
                .item_kinds
                .iter()
                .flat_map(|item| self.resolve_item(source_type, field_name, item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Array-item descriptors reuse the reference/composition rules, but the
    /// display label always derives from the array field's own name and the
    /// edge kinds switch to their array variants. Nested arrays inside item
    /// descriptors produce nothing.
    fn resolve_item(&self, source_type: &str, array_name: &str, item: &Field) -> Vec<CandidateEdge> {
        match &item.kind {
            FieldKind::Reference => self.reference_edges(source_type, item, array_name, true),
            FieldKind::Object => item
                .name
                .as_deref()
                .and_then(|target| self.composition_edge(source_type, array_name, target, true))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn reference_edges(
        &self,
        source_type: &str,
        field: &Field,
        label_base: &str,
        in_array: bool,
    ) -> Vec<CandidateEdge> {
        if !field.targets.is_empty() {
            let kind = if in_array {
                RelationKind::ArrayReference
            } else {
                RelationKind::Reference
            };
            let display_label = if in_array {
                format!("{label_base}[]")
            } else {
                label_base.to_string()
            };
            return field
                .targets
                .iter()
                .filter(|target| self.schema.is_linkable(target))
                .map(|target| CandidateEdge {
                    source_type: source_type.to_string(),
                    target_type: target.clone(),
                    source_field: label_base.to_string(),
                    display_label: display_label.clone(),
                    kind,
                })
                .collect();
        }

        // No explicit targets: eager normalization-time inference first,
        // then the resolve-time heuristic.
        let inferred: Vec<String> = if !field.inferred_targets.is_empty() {
            field
                .inferred_targets
                .iter()
                .filter(|t| self.schema.is_linkable(t))
                .cloned()
                .collect()
        } else {
            self.inference.candidates(
                field.name.as_deref(),
                field.title.as_deref(),
                |name| self.schema.is_linkable(name),
            )
        };

        let kind = if in_array {
            RelationKind::InferredArrayReference
        } else {
            RelationKind::InferredReference
        };
        let display_label = if in_array {
            format!("{label_base}[]?")
        } else {
            format!("{label_base}?")
        };
        inferred
            .into_iter()
            .map(|target| CandidateEdge {
                source_type: source_type.to_string(),
                target_type: target,
                source_field: label_base.to_string(),
                display_label: display_label.clone(),
                kind,
            })
            .collect()
    }

    /// Composition requires a name match against an object-category type.
    fn composition_edge(
        &self,
        source_type: &str,
        label_base: &str,
        target_name: &str,
        in_array: bool,
    ) -> Option<CandidateEdge> {
        let target = self.schema.get(target_name)?;
        if target.category != TypeCategory::Object {
            return None;
        }
        Some(CandidateEdge {
            source_type: source_type.to_string(),
            target_type: target_name.to_string(),
            source_field: label_base.to_string(),
            display_label: if in_array {
                format!("{label_base}[]")
            } else {
                label_base.to_string()
            },
            kind: if in_array {
                RelationKind::ArrayComposition
            } else {
                RelationKind::ObjectComposition
            },
        })
    }
}
