//! Schema ERD
//!
//! Converts multi-dialect content-schema definitions into a canonical
//! entity-relationship graph: nodes for document and object types, edges for
//! the references and compositions between them.
//!
//! ## Pipeline
//!
//! ```text
//! raw text
//!   └─ input::parse_document        strict JSON, relaxed-literal fallback
//!        └─ Dialect::normalize      dialect-specific → canonical model
//!             └─ ParsedSchema       indexed type registry
//!                  └─ build_graph   resolve references, dedup, assemble
//!                       └─ ErdGraph → StructuredGraph JSON / GraphViz DOT
//! ```
//!
//! Normalizer-stage errors abort a run. Resolution-stage misses never do:
//! an incomplete schema degrades to a sparser graph instead of failing.

pub mod dialect;
pub mod error;
pub mod graph;
pub mod input;
pub mod literal;
pub mod model;
pub mod registry;
pub mod style;

pub use dialect::Dialect;
pub use error::{ErdError, Result};
pub use graph::{build_graph, ErdGraph, GraphEdge, GraphNode, RelationKind, StructuredGraph};
pub use model::{Field, FieldKind, TypeCategory, TypeDef};
pub use registry::{ParsedSchema, SchemaWarning};
pub use style::StyleConfig;

/// Convert raw schema text straight to an assembled graph.
pub fn convert(text: &str, dialect: Dialect) -> Result<ErdGraph> {
    let schema = dialect.normalize_text(text)?;
    Ok(build_graph(&schema))
}
