//! Native dialect
//!
//! The default input dialect. Fields arrive essentially canonical:
//! `{name, type, title?, fields?, of?, to?}` with explicit reference targets
//! under `to`. The one divergence from a pure pass-through: reference fields
//! without explicit targets get their targets inferred eagerly here, at
//! normalization time, with this dialect's plural-stripping rule enabled.

use std::collections::HashSet;

use serde_json::Value;

use super::entry_header;
use crate::graph::resolve::{InferencePolicy, TargetInference};
use crate::model::{Field, FieldKind, TypeDef};
use crate::registry::ParsedSchema;

pub fn normalize(entries: &[Value]) -> ParsedSchema {
    let mut types: Vec<TypeDef> = entries.iter().filter_map(parse_entry).collect();

    // Eager inference needs the full set of linkable names, so it runs as a
    // second pass over the parsed types.
    let linkable: HashSet<String> = types
        .iter()
        .filter(|t| t.category.is_graph_category())
        .map(|t| t.name.clone())
        .collect();
    let inference = TargetInference::new(InferencePolicy { strip_plural: true });
    for type_def in &mut types {
        infer_targets(&mut type_def.fields, &inference, &linkable);
    }

    ParsedSchema::from_types(types)
}

fn parse_entry(entry: &Value) -> Option<TypeDef> {
    let (name, category) = entry_header(entry)?;
    let fields = entry
        .get("fields")
        .and_then(Value::as_array)
        .map(|raw| raw.iter().filter_map(parse_field).collect())
        .unwrap_or_default();
    Some(TypeDef::with_fields(name, category, fields))
}

fn parse_field(raw: &Value) -> Option<Field> {
    let obj = raw.as_object()?;
    let name = obj.get("name").and_then(Value::as_str);
    if name.map(Field::is_internal_name).unwrap_or(false) {
        return None;
    }
    let tag = obj.get("type").and_then(Value::as_str)?;

    let mut field = Field::new(FieldKind::from_tag(tag));
    field.name = name.map(String::from);
    field.title = obj.get("title").and_then(Value::as_str).map(String::from);
    field.children = obj
        .get("fields")
        .and_then(Value::as_array)
        .map(|raw| raw.iter().filter_map(parse_field).collect())
        .unwrap_or_default();
    field.item_kinds = obj
        .get("of")
        .and_then(Value::as_array)
        .map(|raw| raw.iter().filter_map(parse_field).collect())
        .unwrap_or_default();
    field.targets = obj.get("to").map(parse_targets).unwrap_or_default();
    Some(field)
}

/// Explicit targets come as a list of names or `{type: name}` entries; a
/// single bare string is tolerated too.
fn parse_targets(raw: &Value) -> Vec<String> {
    match raw {
        Value::String(name) => vec![name.clone()],
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("type").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn infer_targets(fields: &mut [Field], inference: &TargetInference, linkable: &HashSet<String>) {
    for field in fields {
        if field.kind == FieldKind::Reference && field.targets.is_empty() {
            field.inferred_targets = inference.candidates(
                field.name.as_deref(),
                field.title.as_deref(),
                |name| linkable.contains(name),
            );
        }
        infer_targets(&mut field.children, inference, linkable);
        infer_targets(&mut field.item_kinds, inference, linkable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeCategory;
    use serde_json::json;

    #[test]
    fn test_basic_normalization() {
        let entries = vec![
            json!({
                "name": "product",
                "type": "document",
                "fields": [
                    {"name": "sku", "type": "string", "title": "SKU"},
                    {"name": "category", "type": "reference", "to": [{"type": "category"}]}
                ]
            }),
            json!({"name": "category", "type": "document"}),
        ];
        let schema = normalize(&entries);

        assert_eq!(schema.type_count(), 2);
        let product = schema.get("product").unwrap();
        assert_eq!(product.category, TypeCategory::Document);
        assert_eq!(product.fields.len(), 2);
        assert_eq!(product.fields[1].targets, vec!["category".to_string()]);
    }

    #[test]
    fn test_entries_missing_name_or_type_are_skipped() {
        let entries = vec![
            json!({"name": "product", "type": "document"}),
            json!({"name": "orphan"}),
            json!({"type": "document"}),
            json!("not an object"),
        ];
        assert_eq!(normalize(&entries).type_count(), 1);
    }

    #[test]
    fn test_internal_fields_are_excluded() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "fields": [
                {"name": "_rev", "type": "string"},
                {"name": "sku", "type": "string"}
            ]
        })];
        let schema = normalize(&entries);
        let product = schema.get("product").unwrap();
        assert_eq!(product.fields.len(), 1);
        assert_eq!(product.fields[0].name.as_deref(), Some("sku"));
    }

    #[test]
    fn test_target_list_formats() {
        assert_eq!(parse_targets(&json!("tag")), vec!["tag".to_string()]);
        assert_eq!(
            parse_targets(&json!(["tag", {"type": "category"}])),
            vec!["tag".to_string(), "category".to_string()]
        );
        assert!(parse_targets(&json!(42)).is_empty());
    }

    #[test]
    fn test_array_items() {
        let entries = vec![
            json!({
                "name": "product",
                "type": "document",
                "fields": [
                    {"name": "tags", "type": "array", "of": [
                        {"type": "reference", "to": ["tag"]},
                        {"type": "string"}
                    ]}
                ]
            }),
            json!({"name": "tag", "type": "object"}),
        ];
        let schema = normalize(&entries);
        let tags = &schema.get("product").unwrap().fields[0];
        assert_eq!(tags.kind, FieldKind::Array);
        assert_eq!(tags.item_kinds.len(), 2);
        assert_eq!(tags.item_kinds[0].targets, vec!["tag".to_string()]);
    }

    #[test]
    fn test_eager_inference_fills_inferred_targets() {
        let entries = vec![
            json!({
                "name": "product",
                "type": "document",
                "fields": [
                    {"name": "categoryRef", "type": "reference"}
                ]
            }),
            json!({"name": "category", "type": "document"}),
        ];
        let schema = normalize(&entries);
        let field = &schema.get("product").unwrap().fields[0];
        assert!(field.targets.is_empty());
        assert_eq!(field.inferred_targets, vec!["category".to_string()]);
    }

    #[test]
    fn test_eager_inference_strips_plurals() {
        let entries = vec![
            json!({
                "name": "post",
                "type": "document",
                "fields": [
                    {"name": "authors", "type": "reference"}
                ]
            }),
            json!({"name": "author", "type": "document"}),
        ];
        let schema = normalize(&entries);
        let field = &schema.get("post").unwrap().fields[0];
        assert_eq!(field.inferred_targets, vec!["author".to_string()]);
    }

    #[test]
    fn test_eager_inference_reaches_nested_fields() {
        let entries = vec![
            json!({
                "name": "post",
                "type": "document",
                "fields": [
                    {"name": "meta", "type": "object", "fields": [
                        {"name": "author", "type": "reference"}
                    ]}
                ]
            }),
            json!({"name": "author", "type": "document"}),
        ];
        let schema = normalize(&entries);
        let meta = &schema.get("post").unwrap().fields[0];
        assert_eq!(meta.children[0].inferred_targets, vec!["author".to_string()]);
    }

    #[test]
    fn test_inference_skips_non_graph_candidates() {
        let entries = vec![
            json!({
                "name": "product",
                "type": "document",
                "fields": [
                    {"name": "price", "type": "reference"}
                ]
            }),
            json!({"name": "price", "type": "alias"}),
        ];
        let schema = normalize(&entries);
        assert!(schema.get("product").unwrap().fields[0]
            .inferred_targets
            .is_empty());
    }
}
