//! Introspection dialect
//!
//! Normalizes exported introspection dumps. Field definitions nest inside a
//! `value`/`attributes` wrapper, the effective kind of an attribute may sit
//! one or more levels deeper under `type`/`value` wrappers, and references
//! carry `dereferencesTo` markers instead of an explicit target list. Arrays
//! list item descriptors under `of`; unions list members under `values`.
//!
//! Reference targets are collected transitively from the whole attribute
//! subtree, so a union of references yields every target, not just the
//! first.

use serde_json::Value;

use super::entry_header;
use crate::model::{Field, FieldKind, TypeDef};
use crate::registry::ParsedSchema;

pub fn normalize(entries: &[Value]) -> ParsedSchema {
    ParsedSchema::from_types(entries.iter().filter_map(parse_entry).collect())
}

fn parse_entry(entry: &Value) -> Option<TypeDef> {
    let (name, category) = entry_header(entry)?;
    let attributes = entry
        .get("value")
        .and_then(|v| v.get("attributes"))
        .or_else(|| entry.get("attributes"))
        .and_then(Value::as_object);
    let fields = attributes
        .map(|attrs| {
            attrs
                .iter()
                .filter_map(|(field_name, attr)| parse_attribute(Some(field_name.as_str()), attr))
                .collect()
        })
        .unwrap_or_default();
    Some(TypeDef::with_fields(name, category, fields))
}

/// Descend through `value`/`type` object wrappers to the node that actually
/// describes the attribute's kind.
fn unwrap_indirection(node: &Value) -> &Value {
    let mut current = node;
    loop {
        if let Some(inner) = current.get("value").filter(|v| v.is_object()) {
            current = inner;
            continue;
        }
        if let Some(inner) = current.get("type").filter(|v| v.is_object()) {
            current = inner;
            continue;
        }
        return current;
    }
}

/// Collect every `dereferencesTo` marker in the subtree, ordered, first
/// occurrence wins.
fn collect_deref_targets(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            if let Some(target) = map.get("dereferencesTo").and_then(Value::as_str) {
                if !out.iter().any(|existing| existing == target) {
                    out.push(target.to_string());
                }
            }
            for value in map.values() {
                collect_deref_targets(value, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_deref_targets(item, out);
            }
        }
        _ => {}
    }
}

/// Parse one attribute (or array item / union member) into a field.
fn parse_attribute(name: Option<&str>, attr: &Value) -> Option<Field> {
    if name.map(Field::is_internal_name).unwrap_or(false) {
        return None;
    }
    let obj = attr.as_object()?;
    let node = unwrap_indirection(attr);

    let mut field = Field::new(FieldKind::Other("unknown".to_string()));
    field.name = name.map(String::from);
    field.title = obj
        .get("title")
        .or_else(|| node.get("title"))
        .and_then(Value::as_str)
        .map(String::from);

    let tag = node.get("type").and_then(Value::as_str);
    let is_array = tag.map(|t| t.eq_ignore_ascii_case("array")).unwrap_or(false)
        || node.get("of").is_some();

    let mut deref_targets = Vec::new();
    collect_deref_targets(attr, &mut deref_targets);

    let is_object = tag.map(|t| t.eq_ignore_ascii_case("object")).unwrap_or(false)
        || node.get("attributes").is_some();

    if is_array {
        // An array of references carries markers in its subtree, but the
        // array itself is not a reference; the markers belong to its items.
        field.kind = FieldKind::Array;
        let mut items = Vec::new();
        if let Some(of) = node.get("of").and_then(Value::as_array) {
            for item in of {
                collect_members(item, &mut items);
            }
        }
        field.item_kinds = items;
    } else if is_object {
        // Markers inside an object's attributes belong to its children, so
        // the object check runs before the reference one.
        field.kind = FieldKind::Object;
        field.children = node
            .get("attributes")
            .and_then(Value::as_object)
            .map(|attrs| {
                attrs
                    .iter()
                    .filter_map(|(child_name, child)| {
                        parse_attribute(Some(child_name.as_str()), child)
                    })
                    .collect()
            })
            .unwrap_or_default();
    } else if !deref_targets.is_empty() {
        field.kind = FieldKind::Reference;
        field.targets = deref_targets;
    } else if let Some(members) = node.get("values").and_then(Value::as_array) {
        // A non-array union of non-references has no canonical shape of its
        // own; collapse to the first parseable member.
        if let Some(first) = members
            .iter()
            .filter_map(|member| parse_attribute(None, member))
            .next()
        {
            field.kind = first.kind;
            field.children = first.children;
            field.item_kinds = first.item_kinds;
            field.targets = first.targets;
        }
    } else if let Some(tag) = tag {
        field.kind = FieldKind::from_tag(tag);
    }

    Some(field)
}

/// Flatten an item descriptor into one field per union member.
fn collect_members(item: &Value, out: &mut Vec<Field>) {
    let node = unwrap_indirection(item);
    if let Some(members) = node.get("values").and_then(Value::as_array) {
        for member in members {
            collect_members(member, out);
        }
        return;
    }
    let member_name = item
        .get("name")
        .or_else(|| node.get("name"))
        .and_then(Value::as_str);
    if let Some(field) = parse_attribute(member_name, item) {
        out.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeCategory;
    use serde_json::json;

    #[test]
    fn test_attributes_wrapper() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "value": {
                "attributes": {
                    "sku": {"type": "String", "title": "SKU"},
                    "count": {"type": "Number"}
                }
            }
        })];
        let schema = normalize(&entries);

        let product = schema.get("product").unwrap();
        assert_eq!(product.category, TypeCategory::Document);
        assert_eq!(product.fields.len(), 2);
        assert_eq!(product.fields[0].kind, FieldKind::String);
        assert_eq!(product.fields[0].title.as_deref(), Some("SKU"));
    }

    #[test]
    fn test_bare_attributes_without_value_wrapper() {
        let entries = vec![json!({
            "name": "tag",
            "type": "object",
            "attributes": {"label": {"type": "String"}}
        })];
        let schema = normalize(&entries);
        assert_eq!(schema.get("tag").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_reference_through_type_wrapper() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "value": {
                "attributes": {
                    "category": {
                        "type": {"type": "Reference", "dereferencesTo": "category"}
                    }
                }
            }
        })];
        let schema = normalize(&entries);
        let field = &schema.get("product").unwrap().fields[0];
        assert_eq!(field.kind, FieldKind::Reference);
        assert_eq!(field.targets, vec!["category".to_string()]);
    }

    #[test]
    fn test_deeply_nested_indirection() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "value": {
                "attributes": {
                    "owner": {
                        "value": {"type": {"value": {"dereferencesTo": "person"}}}
                    }
                }
            }
        })];
        let schema = normalize(&entries);
        let field = &schema.get("product").unwrap().fields[0];
        assert_eq!(field.kind, FieldKind::Reference);
        assert_eq!(field.targets, vec!["person".to_string()]);
    }

    #[test]
    fn test_union_of_references_collects_all_targets() {
        let entries = vec![json!({
            "name": "post",
            "type": "document",
            "value": {
                "attributes": {
                    "subject": {
                        "type": {
                            "values": [
                                {"type": "Reference", "dereferencesTo": "person"},
                                {"type": "Reference", "dereferencesTo": "organization"}
                            ]
                        }
                    }
                }
            }
        })];
        let schema = normalize(&entries);
        let field = &schema.get("post").unwrap().fields[0];
        assert_eq!(field.kind, FieldKind::Reference);
        assert_eq!(
            field.targets,
            vec!["person".to_string(), "organization".to_string()]
        );
    }

    #[test]
    fn test_array_items_keep_targets_on_items() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "value": {
                "attributes": {
                    "tags": {
                        "type": "Array",
                        "of": [
                            {"type": {"dereferencesTo": "tag"}},
                            {"type": "String"}
                        ]
                    }
                }
            }
        })];
        let schema = normalize(&entries);
        let tags = &schema.get("product").unwrap().fields[0];
        assert_eq!(tags.kind, FieldKind::Array);
        assert!(tags.targets.is_empty());
        assert_eq!(tags.item_kinds.len(), 2);
        assert_eq!(tags.item_kinds[0].targets, vec!["tag".to_string()]);
        assert_eq!(tags.item_kinds[1].kind, FieldKind::String);
    }

    #[test]
    fn test_union_items_flatten_into_item_kinds() {
        let entries = vec![json!({
            "name": "post",
            "type": "document",
            "value": {
                "attributes": {
                    "related": {
                        "type": "Array",
                        "of": [
                            {"values": [
                                {"type": {"dereferencesTo": "post"}},
                                {"type": {"dereferencesTo": "person"}}
                            ]}
                        ]
                    }
                }
            }
        })];
        let schema = normalize(&entries);
        let related = &schema.get("post").unwrap().fields[0];
        assert_eq!(related.item_kinds.len(), 2);
        assert_eq!(related.item_kinds[0].targets, vec!["post".to_string()]);
        assert_eq!(related.item_kinds[1].targets, vec!["person".to_string()]);
    }

    #[test]
    fn test_nested_object_attributes() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "value": {
                "attributes": {
                    "meta": {
                        "type": "Object",
                        "attributes": {
                            "author": {"type": {"dereferencesTo": "person"}},
                            "_internal": {"type": "String"}
                        }
                    }
                }
            }
        })];
        let schema = normalize(&entries);
        let meta = &schema.get("product").unwrap().fields[0];
        assert_eq!(meta.kind, FieldKind::Object);
        assert_eq!(meta.children.len(), 1);
        assert_eq!(meta.children[0].targets, vec!["person".to_string()]);
    }

    #[test]
    fn test_internal_attributes_are_excluded() {
        let entries = vec![json!({
            "name": "product",
            "type": "document",
            "value": {
                "attributes": {
                    "_rev": {"type": "String"},
                    "sku": {"type": "String"}
                }
            }
        })];
        let schema = normalize(&entries);
        assert_eq!(schema.get("product").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_entries_missing_header_are_skipped() {
        let entries = vec![json!({"value": {"attributes": {}}})];
        assert_eq!(normalize(&entries).type_count(), 0);
    }
}
