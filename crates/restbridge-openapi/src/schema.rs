//! Schema-to-parameter translation.
//!
//! Converts raw JSON schemas into the closed [`ParameterKind`] tree. Type
//! resolution follows a fixed priority — array, object, string,
//! number/integer, boolean — so multi-typed schemas translate reproducibly.
//! Translation never fails; anything unresolvable degrades to a generic
//! object-like node.

use crate::types::{
    AdditionalProperties, NumberConstraints, ObjectShape, ParameterKind, ParameterNode,
    PropertyShape, StringConstraints,
};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Translate a schema value into a parameter node.
///
/// A missing or untyped schema yields a generic object node.
pub fn translate(schema: Option<&Value>, name: &str, required: bool) -> ParameterNode {
    let Some(object) = schema.and_then(Value::as_object) else {
        return ParameterNode {
            name: name.to_string(),
            description: "Request body".to_string(),
            required,
            kind: ParameterKind::Object(ObjectShape::default()),
        };
    };

    let description = str_field(object, "description").unwrap_or_default();
    let declared = declared_types(object);
    if declared.is_empty() {
        let description = if description.is_empty() {
            "Request body".to_string()
        } else {
            description
        };
        return ParameterNode {
            name: name.to_string(),
            description,
            required,
            kind: ParameterKind::Object(ObjectShape::default()),
        };
    }

    let kind = if declares(&declared, "array") {
        ParameterKind::Array {
            items: object
                .get("items")
                .map(|items| Box::new(translate(Some(items), "items", false))),
        }
    } else if declares(&declared, "object") {
        ParameterKind::Object(object_shape(object))
    } else if declares(&declared, "string") {
        ParameterKind::String(string_constraints(object))
    } else if declares(&declared, "number") || declares(&declared, "integer") {
        ParameterKind::Number(number_constraints(object))
    } else if declares(&declared, "boolean") {
        ParameterKind::Boolean
    } else {
        ParameterKind::Unknown { declared }
    };

    ParameterNode {
        name: name.to_string(),
        description,
        required,
        kind,
    }
}

/// Collapse a request body's content map into a single schema value.
///
/// A single content type is used as-is. Multiple content types union their
/// top-level properties in declaration order, with `application/json`
/// applied last so it wins name collisions.
pub(crate) fn merge_body_content(mut entries: Vec<(String, Value)>) -> Option<Value> {
    match entries.len() {
        0 => None,
        1 => Some(entries.remove(0).1),
        _ => {
            entries.sort_by_key(|(content_type, _)| content_type.as_str() == JSON_CONTENT_TYPE);
            let mut properties = Map::new();
            for (_, schema) in &entries {
                if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                    for (name, property) in props {
                        properties.insert(name.clone(), property.clone());
                    }
                }
            }
            Some(json!({ "type": "object", "properties": properties }))
        }
    }
}

fn declared_types(object: &Map<String, Value>) -> Vec<String> {
    match object.get("type") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn declares(declared: &[String], name: &str) -> bool {
    declared.iter().any(|t| t == name)
}

fn string_constraints(object: &Map<String, Value>) -> StringConstraints {
    StringConstraints {
        // Non-string enum entries are silently dropped
        enumeration: object
            .get("enum")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        min_length: u64_field(object, "minLength"),
        max_length: u64_field(object, "maxLength"),
        pattern: str_field(object, "pattern"),
    }
}

fn number_constraints(object: &Map<String, Value>) -> NumberConstraints {
    NumberConstraints {
        minimum: f64_field(object, "minimum"),
        maximum: f64_field(object, "maximum"),
        multiple_of: f64_field(object, "multipleOf"),
    }
}

fn object_shape(object: &Map<String, Value>) -> ObjectShape {
    let mut properties = BTreeMap::new();
    if let Some(declared) = object.get("properties").and_then(Value::as_object) {
        for (name, schema) in declared {
            properties.insert(name.clone(), property_shape(schema));
        }
    }

    ObjectShape {
        properties,
        required: object
            .get("required")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        min_properties: u64_field(object, "minProperties"),
        max_properties: u64_field(object, "maxProperties"),
        additional_properties: match object.get("additionalProperties") {
            Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
            Some(schema @ Value::Object(_)) => Some(AdditionalProperties::Schema(schema.clone())),
            _ => None,
        },
    }
}

/// Flatten one object property: type name, description, and leaf constraints
/// for strings and numbers only.
fn property_shape(schema: &Value) -> PropertyShape {
    let Some(object) = schema.as_object() else {
        return PropertyShape::default();
    };
    let declared = declared_types(object);

    PropertyShape {
        type_name: declared.first().cloned(),
        description: str_field(object, "description"),
        string: declares(&declared, "string").then(|| string_constraints(object)),
        number: (declares(&declared, "number") || declares(&declared, "integer"))
            .then(|| number_constraints(object)),
    }
}

fn str_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn u64_field(object: &Map<String, Value>, key: &str) -> Option<u64> {
    object.get(key).and_then(Value::as_u64)
}

fn f64_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).and_then(Value::as_f64)
}
