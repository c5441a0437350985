//! Style configuration
//!
//! Declarative mapping from relationship kinds and node categories to DOT
//! attributes. Loaded from an optional TOML file; every field has a default
//! so a partial file only overrides what it names. The conversion core never
//! reads this; only the DOT serializer does.
//!
//! ## Example (style.toml)
//! ```toml
//! [nodes]
//! document_fill = "#00BCD4"
//!
//! [edges.inferred_reference]
//! color = "#9E9E9E"
//! style = "dotted"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ErdError, Result};
use crate::graph::RelationKind;

/// DOT attributes for one relationship kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeStyle {
    #[serde(default = "default_edge_color")]
    pub color: String,
    #[serde(default = "default_edge_line")]
    pub style: String,
    #[serde(default = "default_arrowhead")]
    pub arrowhead: String,
}

fn default_edge_color() -> String {
    "#546E7A".to_string()
}

fn default_edge_line() -> String {
    "solid".to_string()
}

fn default_arrowhead() -> String {
    "normal".to_string()
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            color: default_edge_color(),
            style: default_edge_line(),
            arrowhead: default_arrowhead(),
        }
    }
}

impl EdgeStyle {
    fn new(color: &str, style: &str, arrowhead: &str) -> Self {
        Self {
            color: color.to_string(),
            style: style.to_string(),
            arrowhead: arrowhead.to_string(),
        }
    }
}

/// Node colors and font.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStyles {
    #[serde(default = "default_document_fill")]
    pub document_fill: String,
    #[serde(default = "default_object_fill")]
    pub object_fill: String,
    #[serde(default = "default_fontname")]
    pub fontname: String,
}

fn default_document_fill() -> String {
    "#00BCD4".to_string()
}

fn default_object_fill() -> String {
    "#FF9800".to_string()
}

fn default_fontname() -> String {
    "Helvetica".to_string()
}

impl Default for NodeStyles {
    fn default() -> Self {
        Self {
            document_fill: default_document_fill(),
            object_fill: default_object_fill(),
            fontname: default_fontname(),
        }
    }
}

/// Per-kind edge styles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeStyles {
    #[serde(default = "default_direct_reference")]
    pub direct_reference: EdgeStyle,
    #[serde(default = "default_inferred_reference")]
    pub inferred_reference: EdgeStyle,
    #[serde(default = "default_array_reference")]
    pub array_reference: EdgeStyle,
    #[serde(default = "default_inferred_array_reference")]
    pub inferred_array_reference: EdgeStyle,
    #[serde(default = "default_object_composition")]
    pub object_composition: EdgeStyle,
    #[serde(default = "default_array_composition")]
    pub array_composition: EdgeStyle,
}

fn default_direct_reference() -> EdgeStyle {
    EdgeStyle::new("#2196F3", "solid", "normal")
}

fn default_inferred_reference() -> EdgeStyle {
    EdgeStyle::new("#9E9E9E", "dashed", "open")
}

fn default_array_reference() -> EdgeStyle {
    EdgeStyle::new("#2196F3", "solid", "crow")
}

fn default_inferred_array_reference() -> EdgeStyle {
    EdgeStyle::new("#9E9E9E", "dashed", "crow")
}

fn default_object_composition() -> EdgeStyle {
    EdgeStyle::new("#4CAF50", "solid", "diamond")
}

fn default_array_composition() -> EdgeStyle {
    EdgeStyle::new("#4CAF50", "solid", "odiamond")
}

impl Default for EdgeStyles {
    fn default() -> Self {
        Self {
            direct_reference: default_direct_reference(),
            inferred_reference: default_inferred_reference(),
            array_reference: default_array_reference(),
            inferred_array_reference: default_inferred_array_reference(),
            object_composition: default_object_composition(),
            array_composition: default_array_composition(),
        }
    }
}

/// Full style configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub nodes: NodeStyles,
    #[serde(default)]
    pub edges: EdgeStyles,
}

impl StyleConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| ErdError::Config(e.to_string()))
    }

    pub fn edge_style(&self, kind: RelationKind) -> &EdgeStyle {
        match kind {
            RelationKind::Reference => &self.edges.direct_reference,
            RelationKind::InferredReference => &self.edges.inferred_reference,
            RelationKind::ArrayReference => &self.edges.array_reference,
            RelationKind::InferredArrayReference => &self.edges.inferred_array_reference,
            RelationKind::ObjectComposition => &self.edges.object_composition,
            RelationKind::ArrayComposition => &self.edges.array_composition,
        }
    }
}
