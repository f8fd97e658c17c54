//! Parameter-shape tree and the route/schema pair produced by extraction.

use restbridge_requester::RouteConfig;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Derived parameter-shape description of one operation input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub kind: ParameterKind,
}

/// Closed set of parameter kinds, resolved once at translation time.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    String(StringConstraints),
    Number(NumberConstraints),
    Boolean,
    Array { items: Option<Box<ParameterNode>> },
    Object(ObjectShape),
    /// Declared types outside the supported set; rendered as a generic object
    Unknown { declared: Vec<String> },
}

/// Constraints carried by string parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub enumeration: Vec<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

/// Constraints carried by numeric parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConstraints {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

/// Object-level shape: flattened properties plus object constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    pub properties: BTreeMap<String, PropertyShape>,
    /// Required property names, verbatim from the schema
    pub required: Vec<String>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub additional_properties: Option<AdditionalProperties>,
}

/// Flattened, non-recursive shape of one object property.
///
/// Only string and number leaves keep their constraints; nested objects and
/// arrays are reduced to their type name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyShape {
    pub type_name: Option<String>,
    pub description: Option<String>,
    pub string: Option<StringConstraints>,
    pub number: Option<NumberConstraints>,
}

/// Whether an object admits properties beyond the declared ones.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Value),
}

impl ParameterNode {
    /// Render as a JSON-Schema property value for tool definitions.
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        let mut description = self.description.clone();

        match &self.kind {
            ParameterKind::String(constraints) => {
                out.insert("type".to_string(), json!("string"));
                if !constraints.enumeration.is_empty() {
                    out.insert("enum".to_string(), json!(constraints.enumeration));
                }
                if let Some(min) = constraints.min_length {
                    out.insert("minLength".to_string(), json!(min));
                }
                if let Some(max) = constraints.max_length {
                    out.insert("maxLength".to_string(), json!(max));
                }
                if let Some(pattern) = &constraints.pattern {
                    out.insert("pattern".to_string(), json!(pattern));
                }
            }
            ParameterKind::Number(constraints) => {
                out.insert("type".to_string(), json!("number"));
                insert_number_constraints(&mut out, constraints);
            }
            ParameterKind::Boolean => {
                out.insert("type".to_string(), json!("boolean"));
            }
            ParameterKind::Array { items } => {
                out.insert("type".to_string(), json!("array"));
                if let Some(items) = items {
                    out.insert("items".to_string(), items.to_json_schema());
                }
            }
            ParameterKind::Object(shape) => {
                out.insert("type".to_string(), json!("object"));
                if !shape.properties.is_empty() {
                    let mut properties = Map::new();
                    for (name, property) in &shape.properties {
                        properties.insert(name.clone(), property.to_json_schema());
                    }
                    out.insert("properties".to_string(), Value::Object(properties));
                }
                if !shape.required.is_empty() {
                    out.insert("required".to_string(), json!(shape.required));
                }
                if let Some(min) = shape.min_properties {
                    out.insert("minProperties".to_string(), json!(min));
                }
                if let Some(max) = shape.max_properties {
                    out.insert("maxProperties".to_string(), json!(max));
                }
                match &shape.additional_properties {
                    Some(AdditionalProperties::Allowed(allowed)) => {
                        out.insert("additionalProperties".to_string(), json!(allowed));
                    }
                    Some(AdditionalProperties::Schema(schema)) => {
                        out.insert("additionalProperties".to_string(), schema.clone());
                    }
                    None => {}
                }
            }
            ParameterKind::Unknown { declared } => {
                out.insert("type".to_string(), json!("object"));
                if !declared.is_empty() {
                    let note = format!("(unknown type: {})", declared.join(", "));
                    description = if description.is_empty() {
                        note
                    } else {
                        format!("{description} {note}")
                    };
                }
            }
        }

        if !description.is_empty() {
            out.insert("description".to_string(), json!(description));
        }
        Value::Object(out)
    }
}

impl PropertyShape {
    fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        if let Some(type_name) = &self.type_name {
            out.insert("type".to_string(), json!(type_name));
        }
        if let Some(description) = &self.description {
            out.insert("description".to_string(), json!(description));
        }
        if let Some(constraints) = &self.string {
            if !constraints.enumeration.is_empty() {
                out.insert("enum".to_string(), json!(constraints.enumeration));
            }
            if let Some(min) = constraints.min_length {
                out.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = constraints.max_length {
                out.insert("maxLength".to_string(), json!(max));
            }
            if let Some(pattern) = &constraints.pattern {
                out.insert("pattern".to_string(), json!(pattern));
            }
        }
        if let Some(constraints) = &self.number {
            insert_number_constraints(&mut out, constraints);
        }
        Value::Object(out)
    }
}

fn insert_number_constraints(out: &mut Map<String, Value>, constraints: &NumberConstraints) {
    if let Some(min) = constraints.minimum {
        out.insert("minimum".to_string(), json!(min));
    }
    if let Some(max) = constraints.maximum {
        out.insert("maximum".to_string(), json!(max));
    }
    if let Some(multiple_of) = constraints.multiple_of {
        out.insert("multipleOf".to_string(), json!(multiple_of));
    }
}

/// One extracted operation: transport facts plus its derived body schema.
#[derive(Debug, Clone)]
pub struct RouteTool {
    route: RouteConfig,
    body: Option<ParameterNode>,
}

impl RouteTool {
    pub(crate) fn new(route: RouteConfig, body: Option<ParameterNode>) -> Self {
        Self { route, body }
    }

    pub fn route(&self) -> &RouteConfig {
        &self.route
    }

    pub fn body_schema(&self) -> Option<&ParameterNode> {
        self.body.as_ref()
    }

    /// Deterministic callable name: lowercased method joined with the path
    /// segments, with `/`, `{`, and `}` stripped.
    pub fn tool_name(&self) -> String {
        let path = self
            .route
            .path
            .trim_start_matches('/')
            .replace('/', "_")
            .replace(['{', '}'], "");
        format!("{}_{}", self.route.method.to_lowercase(), path)
    }

    /// Human-readable tool description: method, path, and the effective
    /// operation description.
    pub fn tool_description(&self) -> String {
        format!(
            "{} {} \n {}",
            self.route.method, self.route.path, self.route.description
        )
    }

    /// JSON-Schema object describing the tool's call arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in path_params(&self.route.path) {
            properties.insert(
                param.clone(),
                json!({
                    "type": "string",
                    "description": format!("Path parameter: {param}"),
                }),
            );
            required.push(param);
        }
        for param in &self.route.method_config.query_params {
            properties.insert(
                param.clone(),
                json!({
                    "type": "string",
                    "description": format!("Query parameter: {param}"),
                }),
            );
        }
        for field in &self.route.method_config.form_fields {
            properties.insert(
                field.clone(),
                json!({
                    "type": "string",
                    "description": format!("Form field: {field}"),
                }),
            );
        }
        if let Some(upload) = &self.route.method_config.file_upload {
            properties.insert(
                upload.field_name.clone(),
                json!({
                    "type": "string",
                    "description": "File to upload",
                }),
            );
            required.push(upload.field_name.clone());
        }
        if let Some(body) = &self.body {
            properties.insert(body.name.clone(), body.to_json_schema());
            if body.required {
                required.push(body.name.clone());
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

/// Path parameter names in template order.
pub fn path_params(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use restbridge_requester::{FileUploadConfig, MethodConfig};
    use std::collections::HashMap;

    fn route(method: &str, path: &str, method_config: MethodConfig) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            method: method.to_string(),
            description: "desc".to_string(),
            headers: HashMap::new(),
            method_config,
        }
    }

    #[test]
    fn test_path_params() {
        assert!(path_params("").is_empty());
        assert!(path_params("/api/users").is_empty());
        assert_eq!(path_params("/api/users/{id}"), vec!["id"]);
        assert_eq!(
            path_params("/api/users/{id}/posts/{postId}"),
            vec!["id", "postId"]
        );
    }

    #[test]
    fn test_tool_name_derivation() {
        let tool = RouteTool::new(
            route("GET", "/api/users/{id}", MethodConfig::default()),
            None,
        );
        assert_eq!(tool.tool_name(), "get_api_users_id");

        let tool = RouteTool::new(route("POST", "/users", MethodConfig::default()), None);
        assert_eq!(tool.tool_name(), "post_users");
    }

    #[test]
    fn test_tool_description_includes_method_path_and_text() {
        let tool = RouteTool::new(route("GET", "/users", MethodConfig::default()), None);
        let description = tool.tool_description();
        assert!(description.contains("GET"));
        assert!(description.contains("/users"));
        assert!(description.contains("desc"));
    }

    #[test]
    fn test_input_schema_marks_path_params_required() {
        let config = MethodConfig {
            query_params: vec!["include".to_string()],
            ..Default::default()
        };
        let tool = RouteTool::new(route("GET", "/api/users/{id}", config), None);
        let schema = tool.input_schema();

        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["id"].is_object());
        assert!(schema["properties"]["include"].is_object());
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("id")));
        assert!(!required.contains(&json!("include")));
    }

    #[test]
    fn test_input_schema_includes_file_upload() {
        let config = MethodConfig {
            form_fields: vec!["caption".to_string()],
            file_upload: Some(FileUploadConfig::new("file")),
            ..Default::default()
        };
        let tool = RouteTool::new(route("POST", "/files", config), None);
        let schema = tool.input_schema();

        assert_eq!(schema["properties"]["file"]["description"], "File to upload");
        assert!(schema["properties"]["caption"].is_object());
        assert!(schema["required"].as_array().unwrap().contains(&json!("file")));
    }

    #[test]
    fn test_input_schema_includes_required_body() {
        let body = ParameterNode {
            name: "body".to_string(),
            description: "User data".to_string(),
            required: true,
            kind: ParameterKind::Object(ObjectShape {
                properties: BTreeMap::from([(
                    "name".to_string(),
                    PropertyShape {
                        type_name: Some("string".to_string()),
                        ..Default::default()
                    },
                )]),
                required: vec!["name".to_string()],
                ..Default::default()
            }),
        };
        let tool = RouteTool::new(route("POST", "/users", MethodConfig::default()), Some(body));
        let schema = tool.input_schema();

        let body_schema = &schema["properties"]["body"];
        assert_eq!(body_schema["type"], "object");
        assert!(body_schema["properties"]["name"].is_object());
        assert_eq!(body_schema["required"][0], "name");
        assert!(schema["required"].as_array().unwrap().contains(&json!("body")));
    }

    #[test]
    fn test_unknown_kind_renders_as_object_with_note() {
        let node = ParameterNode {
            name: "body".to_string(),
            description: "Payload".to_string(),
            required: false,
            kind: ParameterKind::Unknown {
                declared: vec!["null".to_string()],
            },
        };
        let schema = node.to_json_schema();
        assert_eq!(schema["type"], "object");
        let description = schema["description"].as_str().unwrap();
        assert!(description.contains("Payload"));
        assert!(description.contains("unknown type"));
    }
}
