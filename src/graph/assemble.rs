//! Graph assembly
//!
//! Converts the resolver's candidate edge stream into the final node/edge
//! set: one node per graph type, duplicate edges suppressed by their
//! `(source, target, display label)` key, first occurrence wins.

use std::collections::{HashMap, HashSet};

use petgraph::graph::DiGraph;
use sha2::{Digest, Sha256};

use super::resolve::Resolver;
use super::{ErdGraph, GraphEdge, GraphNode, NodeField};
use crate::model::{Field, FieldKind};
use crate::registry::ParsedSchema;

/// Assemble the entity-relationship graph for a normalized schema.
///
/// A single deterministic pass: nodes in registry order, then candidate
/// edges in type-then-field order, folded through a local dedup set.
pub fn build_graph(schema: &ParsedSchema) -> ErdGraph {
    let capacity = schema.type_count();
    let mut graph = DiGraph::with_capacity(capacity, capacity * 2);
    let mut node_indices = HashMap::with_capacity(capacity);

    for type_def in schema.graph_types() {
        let fields = type_def
            .fields
            .iter()
            .filter_map(|field| {
                field.name.as_ref().map(|name| NodeField {
                    name: name.clone(),
                    type_label: type_label(field),
                })
            })
            .collect();

        let idx = graph.add_node(GraphNode {
            id: type_def.name.clone(),
            is_document: schema.is_document(&type_def.name),
            fields,
        });
        node_indices.insert(type_def.name.clone(), idx);
    }

    let resolver = Resolver::new(schema);
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    for candidate in resolver.resolve_all() {
        let key = (
            candidate.source_type.clone(),
            candidate.target_type.clone(),
            candidate.display_label.clone(),
        );
        if !seen.insert(key) {
            continue;
        }
        if let (Some(&source), Some(&target)) = (
            node_indices.get(&candidate.source_type),
            node_indices.get(&candidate.target_type),
        ) {
            graph.add_edge(
                source,
                target,
                GraphEdge {
                    source: candidate.source_type,
                    target: candidate.target_type,
                    display_label: candidate.display_label,
                    kind: candidate.kind,
                    source_anchor: candidate.source_field,
                },
            );
        }
    }

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(schema.types()).unwrap_or_default());
    let source_hash = format!("{:x}", hasher.finalize());

    ErdGraph {
        graph,
        node_indices,
        source_hash,
    }
}

/// Compute the rendered type label for a field row. Arrays render as
/// `Array<item | item>`, references as `Ref<target | target>`; everything
/// else shows its kind tag.
pub(crate) fn type_label(field: &Field) -> String {
    match &field.kind {
        FieldKind::Array => {
            if field.item_kinds.is_empty() {
                "Array".to_string()
            } else {
                let items: Vec<String> = field.item_kinds.iter().map(type_label).collect();
                format!("Array<{}>", items.join(" | "))
            }
        }
        FieldKind::Reference => {
            let targets = if field.targets.is_empty() {
                &field.inferred_targets
            } else {
                &field.targets
            };
            if targets.is_empty() {
                "Ref".to_string()
            } else {
                format!("Ref<{}>", targets.join(" | "))
            }
        }
        other => other.tag().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeCategory, TypeDef};

    fn reference_field(name: &str, target: &str) -> Field {
        let mut field = Field::named(name, FieldKind::Reference);
        field.targets = vec![target.to_string()];
        field
    }

    #[test]
    fn test_nodes_only_for_graph_categories() {
        let schema = ParsedSchema::from_types(vec![
            TypeDef::new("product", TypeCategory::Document),
            TypeDef::new("dimensions", TypeCategory::Object),
            TypeDef::new("price", TypeCategory::Other("alias".to_string())),
        ]);
        let graph = build_graph(&schema);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.node("price").is_none());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        // Two explicit targets pointing at the same type under the same
        // label collapse to one edge.
        let mut field = Field::named("category", FieldKind::Reference);
        field.targets = vec!["category".to_string(), "category".to_string()];
        let schema = ParsedSchema::from_types(vec![
            TypeDef::with_fields("product", TypeCategory::Document, vec![field]),
            TypeDef::new("category", TypeCategory::Document),
        ]);
        let graph = build_graph(&schema);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_direct_and_inferred_labels_stay_distinct() {
        let schema = ParsedSchema::from_types(vec![
            TypeDef::with_fields(
                "product",
                TypeCategory::Document,
                vec![
                    reference_field("category", "category"),
                    Field::named("categoryRef", FieldKind::Reference),
                ],
            ),
            TypeDef::new("category", TypeCategory::Document),
        ]);
        let graph = build_graph(&schema);

        let structured = graph.to_structured();
        assert_eq!(structured.edges.len(), 2);
        let labels: Vec<&str> = structured
            .edges
            .iter()
            .map(|e| e.display_label.as_str())
            .collect();
        assert_eq!(labels, vec!["category", "categoryRef?"]);
    }

    #[test]
    fn test_edge_anchor_names_source_field() {
        let schema = ParsedSchema::from_types(vec![
            TypeDef::with_fields(
                "product",
                TypeCategory::Document,
                vec![reference_field("category", "category")],
            ),
            TypeDef::new("category", TypeCategory::Document),
        ]);
        let structured = build_graph(&schema).to_structured();
        assert_eq!(structured.edges[0].source_anchor, "category");
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(type_label(&Field::named("sku", FieldKind::String)), "string");

        let mut reference = Field::new(FieldKind::Reference);
        reference.targets = vec!["tag".to_string(), "category".to_string()];
        assert_eq!(type_label(&reference), "Ref<tag | category>");

        let mut array = Field::named("items", FieldKind::Array);
        array.item_kinds = vec![Field::new(FieldKind::String), reference];
        assert_eq!(type_label(&array), "Array<string | Ref<tag | category>>");
    }

    #[test]
    fn test_source_hash_stable() {
        let types = vec![TypeDef::new("product", TypeCategory::Document)];
        let first = build_graph(&ParsedSchema::from_types(types.clone()));
        let second = build_graph(&ParsedSchema::from_types(types));
        assert_eq!(first.source_hash, second.source_hash);
        assert_eq!(first.source_hash.len(), 64);
    }
}
