//! Swagger 2.0 to OpenAPI 3.0 document conversion.
//!
//! Works on the raw JSON tree so unsupported constructs can be dropped
//! without failing the whole document. Only the pieces the extraction
//! pipeline consumes are mapped: servers, operations, parameters, request
//! bodies, responses, schema definitions, and security schemes.

use serde_json::{Map, Value, json};

const METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

/// Parameter keywords that move under `schema` in OpenAPI 3.0.
const SCHEMA_KEYWORDS: [&str; 14] = [
    "type",
    "format",
    "items",
    "enum",
    "default",
    "pattern",
    "maxLength",
    "minLength",
    "maximum",
    "minimum",
    "multipleOf",
    "maxItems",
    "minItems",
    "uniqueItems",
];

/// Convert a Swagger 2.0 document into its OpenAPI 3.0 equivalent.
pub(crate) fn swagger_to_openapi(doc: &Value) -> Value {
    let empty = Map::new();
    let src = doc.as_object().unwrap_or(&empty);
    let mut out = Map::new();

    out.insert("openapi".to_string(), json!("3.0.3"));
    if let Some(info) = src.get("info") {
        out.insert("info".to_string(), info.clone());
    }
    if let Some(url) = server_url(src) {
        out.insert("servers".to_string(), json!([{ "url": url }]));
    }

    let doc_consumes = string_list(src.get("consumes"));
    let doc_produces = string_list(src.get("produces"));

    if let Some(paths) = src.get("paths").and_then(Value::as_object) {
        let mut out_paths = Map::new();
        for (path, item) in paths {
            out_paths.insert(
                path.clone(),
                convert_path_item(item, &doc_consumes, &doc_produces),
            );
        }
        out.insert("paths".to_string(), Value::Object(out_paths));
    }

    let mut components = Map::new();
    if let Some(definitions) = src.get("definitions") {
        components.insert("schemas".to_string(), definitions.clone());
    }
    if let Some(definitions) = src.get("securityDefinitions").and_then(Value::as_object) {
        components.insert(
            "securitySchemes".to_string(),
            convert_security_schemes(definitions),
        );
    }
    if !components.is_empty() {
        out.insert("components".to_string(), Value::Object(components));
    }
    if let Some(security) = src.get("security") {
        out.insert("security".to_string(), security.clone());
    }

    let mut converted = Value::Object(out);
    rewrite_refs(&mut converted);
    converted
}

fn server_url(src: &Map<String, Value>) -> Option<String> {
    let host = src.get("host").and_then(Value::as_str)?;
    let scheme = src
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("https");
    let base_path = src.get("basePath").and_then(Value::as_str).unwrap_or("");
    Some(format!("{scheme}://{host}{base_path}"))
}

fn convert_path_item(item: &Value, doc_consumes: &[String], doc_produces: &[String]) -> Value {
    let empty = Map::new();
    let src = item.as_object().unwrap_or(&empty);
    let mut out = Map::new();

    if let Some(params) = src.get("parameters").and_then(Value::as_array) {
        // Path-level body parameters are too rare to carry; keep the rest
        let converted: Vec<Value> = params
            .iter()
            .filter(|p| !matches!(param_location(p), Some("body") | Some("formData")))
            .map(convert_parameter)
            .collect();
        if !converted.is_empty() {
            out.insert("parameters".to_string(), Value::Array(converted));
        }
    }

    for method in METHODS {
        if let Some(operation) = src.get(method) {
            out.insert(
                method.to_string(),
                convert_operation(operation, doc_consumes, doc_produces),
            );
        }
    }
    Value::Object(out)
}

fn convert_operation(operation: &Value, doc_consumes: &[String], doc_produces: &[String]) -> Value {
    let empty = Map::new();
    let src = operation.as_object().unwrap_or(&empty);
    let mut out = Map::new();

    for key in ["summary", "description", "operationId", "tags", "deprecated", "security"] {
        if let Some(value) = src.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }

    let mut consumes = string_list(src.get("consumes"));
    if consumes.is_empty() {
        consumes = doc_consumes.to_vec();
    }
    let mut produces = string_list(src.get("produces"));
    if produces.is_empty() {
        produces = doc_produces.to_vec();
    }

    let mut parameters = Vec::new();
    let mut body_param: Option<&Value> = None;
    let mut form_params: Vec<&Value> = Vec::new();
    if let Some(params) = src.get("parameters").and_then(Value::as_array) {
        for param in params {
            match param_location(param) {
                Some("body") => body_param = Some(param),
                Some("formData") => form_params.push(param),
                _ => parameters.push(convert_parameter(param)),
            }
        }
    }
    if !parameters.is_empty() {
        out.insert("parameters".to_string(), Value::Array(parameters));
    }

    if let Some(body) = body_param {
        out.insert(
            "requestBody".to_string(),
            convert_body_parameter(body, &consumes),
        );
    } else if !form_params.is_empty() {
        out.insert(
            "requestBody".to_string(),
            convert_form_parameters(&form_params),
        );
    }

    if let Some(responses) = src.get("responses").and_then(Value::as_object) {
        let mut out_responses = Map::new();
        for (code, response) in responses {
            out_responses.insert(code.clone(), convert_response(response, &produces));
        }
        out.insert("responses".to_string(), Value::Object(out_responses));
    }

    Value::Object(out)
}

fn convert_parameter(param: &Value) -> Value {
    let empty = Map::new();
    let src = param.as_object().unwrap_or(&empty);
    let mut out = Map::new();

    for key in ["name", "in", "description", "required"] {
        if let Some(value) = src.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }

    let mut schema = Map::new();
    for key in SCHEMA_KEYWORDS {
        if let Some(value) = src.get(key) {
            schema.insert(key.to_string(), value.clone());
        }
    }
    if !schema.is_empty() {
        out.insert("schema".to_string(), Value::Object(schema));
    }
    Value::Object(out)
}

fn convert_body_parameter(param: &Value, consumes: &[String]) -> Value {
    let empty = Map::new();
    let src = param.as_object().unwrap_or(&empty);
    let content_type = consumes
        .first()
        .cloned()
        .unwrap_or_else(|| "application/json".to_string());

    let mut out = Map::new();
    if let Some(description) = src.get("description") {
        out.insert("description".to_string(), description.clone());
    }
    if let Some(required) = src.get("required") {
        out.insert("required".to_string(), required.clone());
    }
    let schema = src.get("schema").cloned().unwrap_or_else(|| json!({}));
    out.insert(
        "content".to_string(),
        json!({ content_type: { "schema": schema } }),
    );
    Value::Object(out)
}

fn convert_form_parameters(params: &[&Value]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut has_file = false;

    for param in params {
        let Some(src) = param.as_object() else { continue };
        let Some(name) = src.get("name").and_then(Value::as_str) else {
            continue;
        };

        let mut property = Map::new();
        if src.get("type").and_then(Value::as_str) == Some("file") {
            has_file = true;
            property.insert("type".to_string(), json!("string"));
            property.insert("format".to_string(), json!("binary"));
        } else {
            for key in SCHEMA_KEYWORDS {
                if let Some(value) = src.get(key) {
                    property.insert(key.to_string(), value.clone());
                }
            }
        }
        if let Some(description) = src.get("description") {
            property.insert("description".to_string(), description.clone());
        }
        if src.get("required").and_then(Value::as_bool) == Some(true) {
            required.push(name.to_string());
        }
        properties.insert(name.to_string(), Value::Object(property));
    }

    let content_type = if has_file {
        "multipart/form-data"
    } else {
        "application/x-www-form-urlencoded"
    };
    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required.clone());
    }

    let mut out = Map::new();
    if !required.is_empty() {
        out.insert("required".to_string(), json!(true));
    }
    out.insert(
        "content".to_string(),
        json!({ content_type: { "schema": schema } }),
    );
    Value::Object(out)
}

fn convert_response(response: &Value, produces: &[String]) -> Value {
    let empty = Map::new();
    let src = response.as_object().unwrap_or(&empty);
    let mut out = Map::new();

    // 3.0 requires a description; default to empty rather than dropping the response
    let description = src.get("description").cloned().unwrap_or_else(|| json!(""));
    out.insert("description".to_string(), description);

    if let Some(schema) = src.get("schema") {
        let content_type = produces
            .first()
            .cloned()
            .unwrap_or_else(|| "application/json".to_string());
        out.insert(
            "content".to_string(),
            json!({ content_type: { "schema": schema.clone() } }),
        );
    }
    Value::Object(out)
}

fn convert_security_schemes(definitions: &Map<String, Value>) -> Value {
    let mut out = Map::new();
    for (name, definition) in definitions {
        let converted = match definition.get("type").and_then(Value::as_str) {
            Some("basic") => json!({ "type": "http", "scheme": "basic" }),
            Some("oauth2") => convert_oauth2_scheme(definition),
            // apiKey keeps its 2.0 shape
            _ => definition.clone(),
        };
        out.insert(name.clone(), converted);
    }
    Value::Object(out)
}

fn convert_oauth2_scheme(definition: &Value) -> Value {
    let scopes = definition.get("scopes").cloned().unwrap_or_else(|| json!({}));
    let mut flow = Map::new();
    if let Some(url) = definition.get("authorizationUrl") {
        flow.insert("authorizationUrl".to_string(), url.clone());
    }
    if let Some(url) = definition.get("tokenUrl") {
        flow.insert("tokenUrl".to_string(), url.clone());
    }
    flow.insert("scopes".to_string(), scopes);

    let flow_name = match definition.get("flow").and_then(Value::as_str) {
        Some("password") => "password",
        Some("application") => "clientCredentials",
        Some("accessCode") => "authorizationCode",
        _ => "implicit",
    };
    json!({ "type": "oauth2", "flows": { flow_name: flow } })
}

fn param_location(param: &Value) -> Option<&str> {
    param.get("in").and_then(Value::as_str)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Rewrite `#/definitions/...` references to their components path.
fn rewrite_refs(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if key == "$ref" {
                    if let Value::String(target) = entry {
                        if let Some(rest) = target.strip_prefix("#/definitions/") {
                            *target = format!("#/components/schemas/{rest}");
                        }
                    }
                } else {
                    rewrite_refs(entry);
                }
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                rewrite_refs(entry);
            }
        }
        _ => {}
    }
}
