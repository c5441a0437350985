//! Entity-Relationship Graph
//!
//! petgraph-backed graph assembled from resolved reference and composition
//! edges. Node and edge insertion order follows registry iteration order, so
//! repeated runs over the same input produce identical output.

pub mod assemble;
pub mod resolve;

pub use assemble::build_graph;
pub use resolve::{CandidateEdge, InferencePolicy, RelationKind, Resolver, TargetInference};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::style::StyleConfig;

/// A field row inside a node label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeField {
    pub name: String,
    pub type_label: String,
}

/// A graph node: one per document/object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub is_document: bool,
    pub fields: Vec<NodeField>,
}

/// A deduplicated, styled edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub display_label: String,
    pub kind: RelationKind,
    /// The originating field's row port on the source node (west side), so a
    /// renderer can draw the line from the field rather than the node center.
    pub source_anchor: String,
}

/// Serializable form of the assembled graph, consumed by external renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// The assembled entity-relationship graph.
#[derive(Debug)]
pub struct ErdGraph {
    pub(crate) graph: DiGraph<GraphNode, GraphEdge>,
    pub(crate) node_indices: HashMap<String, NodeIndex>,
    /// Fingerprint of the canonical input types, for caching/determinism.
    pub source_hash: String,
}

impl ErdGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.node_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Flatten into the serializable node/edge lists, preserving insertion
    /// order on both.
    pub fn to_structured(&self) -> StructuredGraph {
        StructuredGraph {
            nodes: self.graph.node_weights().cloned().collect(),
            edges: self
                .graph
                .edge_references()
                .map(|edge| edge.weight().clone())
                .collect(),
        }
    }

    /// Render as a GraphViz digraph with one port per field row.
    pub fn to_dot(&self, style: &StyleConfig) -> String {
        let mut output = String::new();

        output.push_str("digraph schema {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str(&format!(
            "  node [shape=plaintext, fontname=\"{}\", fontsize=11];\n",
            style.nodes.fontname
        ));
        output.push_str(&format!(
            "  edge [fontname=\"{}\", fontsize=9];\n",
            style.nodes.fontname
        ));
        output.push('\n');

        for node in self.graph.node_weights() {
            let fill = if node.is_document {
                &style.nodes.document_fill
            } else {
                &style.nodes.object_fill
            };

            let mut label = String::from(
                "<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">",
            );
            label.push_str(&format!(
                "<TR><TD PORT=\"__head\" BGCOLOR=\"{}\"><B>{}</B></TD></TR>",
                fill,
                escape_html(&node.id)
            ));
            for field in &node.fields {
                label.push_str(&format!(
                    "<TR><TD PORT=\"{}\" ALIGN=\"LEFT\">{}: {}</TD></TR>",
                    escape_html(&field.name),
                    escape_html(&field.name),
                    escape_html(&field.type_label)
                ));
            }
            label.push_str("</TABLE>");

            output.push_str(&format!(
                "  \"{}\" [label=<{}>];\n",
                escape_dot(&node.id),
                label
            ));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            let weight = edge.weight();
            let edge_style = style.edge_style(weight.kind);
            output.push_str(&format!(
                "  \"{}\":\"{}\":w -> \"{}\" [label=\"{}\", color=\"{}\", style=\"{}\", arrowhead=\"{}\"];\n",
                escape_dot(&weight.source),
                escape_dot(&weight.source_anchor),
                escape_dot(&weight.target),
                escape_dot(&weight.display_label),
                edge_style.color,
                edge_style.style,
                edge_style.arrowhead,
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
