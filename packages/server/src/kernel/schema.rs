//! Strict-mode JSON schema generation for structured outputs.
//!
//! `schemars` derives a schema from the response type, but strict structured
//! output imposes extra rules the derive does not produce:
//!
//! 1. every object schema needs `additionalProperties: false`
//! 2. every property must be listed in `required`, nullable or not
//! 3. `$ref` references must be fully inlined
//!
//! `strict_schema_for` applies those transformations.

use schemars::{schema_for, JsonSchema};
use serde_json::Value;

/// Generate a strict-mode schema for `T`.
pub fn strict_schema_for<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();

    let definitions = value.get("definitions").cloned();
    if let Some(defs) = definitions {
        inline_refs(&mut value, &defs);
    }
    enforce_strict_objects(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
    }
    value
}

/// Replace every `#/definitions/...` reference with its inlined definition.
fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        // The inlined definition may itself contain refs.
                        inline_refs(value, definitions);
                        return;
                    }
                }
            }
            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

/// Add `additionalProperties: false` and an all-properties `required` list
/// to every object schema in the tree.
fn enforce_strict_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<Value> =
                        props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(all_keys));
                }
            }
            for (_, v) in map.iter_mut() {
                enforce_strict_objects(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                enforce_strict_objects(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::differences::DiffReport;

    #[test]
    fn test_report_schema_is_strict() {
        let schema = strict_schema_for::<DiffReport>();
        let root = schema.as_object().unwrap();

        assert_eq!(root.get("type"), Some(&serde_json::json!("object")));
        assert_eq!(
            root.get("additionalProperties"),
            Some(&serde_json::json!(false))
        );

        let required: Vec<&str> = root["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"summary"));
        assert!(required.contains(&"overlaps"));
        assert!(required.contains(&"contradictions"));
    }

    #[test]
    fn test_report_schema_has_no_refs_or_definitions() {
        let schema = strict_schema_for::<DiffReport>();
        let rendered = serde_json::to_string(&schema).unwrap();

        assert!(!rendered.contains("$ref"));
        assert!(!schema.as_object().unwrap().contains_key("definitions"));
        assert!(!schema.as_object().unwrap().contains_key("$schema"));
    }

    #[test]
    fn test_difference_items_are_inlined_and_strict() {
        let schema = strict_schema_for::<DiffReport>();
        let item = &schema["properties"]["overlaps"]["items"];

        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], false);

        let required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for field in [
            "filename1",
            "excerpt1",
            "pageNumber1",
            "filename2",
            "excerpt2",
            "pageNumber2",
            "explanation",
            "type",
        ] {
            assert!(required.contains(&field), "{field} should be required");
        }

        let kinds = item["properties"]["type"]["enum"].as_array().unwrap();
        assert!(kinds.contains(&serde_json::json!("OVERLAP")));
        assert!(kinds.contains(&serde_json::json!("CONTRADICTION")));
    }
}
