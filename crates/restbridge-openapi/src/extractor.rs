//! Route extraction from a normalized specification.
//!
//! Walks every path and the five supported HTTP methods, producing one
//! [`RouteTool`] per operation the adjuster exposes. Route order is
//! unspecified; callers must not depend on it.

use crate::adjuster::Adjuster;
use crate::schema;
use crate::types::{ParameterNode, RouteTool};
use openapiv3::{OpenAPI, Operation, Parameter, ReferenceOr};
use restbridge_requester::{FileUploadConfig, MethodConfig, RouteConfig};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
const BODY_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

/// Derives route tools from a normalized document.
pub struct RouteExtractor<'a> {
    doc: &'a OpenAPI,
    adjuster: &'a Adjuster,
}

impl<'a> RouteExtractor<'a> {
    pub fn new(doc: &'a OpenAPI, adjuster: &'a Adjuster) -> Self {
        Self { doc, adjuster }
    }

    /// Build one [`RouteTool`] per exposed path/method operation.
    pub fn extract(&self) -> Vec<RouteTool> {
        let mut tools = Vec::new();

        for (path, item) in &self.doc.paths.paths {
            let item = match item {
                ReferenceOr::Item(item) => item,
                ReferenceOr::Reference { .. } => {
                    warn!("path references are not supported: {path}");
                    continue;
                }
            };

            let methods = [
                ("GET", &item.get),
                ("POST", &item.post),
                ("PUT", &item.put),
                ("DELETE", &item.delete),
                ("PATCH", &item.patch),
            ];

            for (method, operation) in methods {
                let Some(operation) = operation else { continue };
                if !self.adjuster.exists_in_selection(path, method) {
                    debug!("route excluded by selection: {method} {path}");
                    continue;
                }
                let route = self.route_config(path, method, operation);
                let body = body_node(operation, &route);
                tools.push(RouteTool::new(route, body));
            }
        }

        debug!("extracted {} route tools", tools.len());
        tools
    }

    fn route_config(&self, path: &str, method: &str, operation: &Operation) -> RouteConfig {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        if let Some(accept) = first_response_content_type(operation) {
            headers.insert("Accept".to_string(), accept);
        }

        let original = operation
            .description
            .clone()
            .or_else(|| operation.summary.clone())
            .unwrap_or_default();
        let description = self.adjuster.effective_description(path, method, &original);

        let mut method_config = MethodConfig::default();
        for parameter in &operation.parameters {
            if let ReferenceOr::Item(Parameter::Query { parameter_data, .. }) = parameter {
                method_config.query_params.push(parameter_data.name.clone());
            }
        }
        if BODY_METHODS.contains(&method) {
            if let Some((form_fields, file_upload)) = multipart_config(operation) {
                method_config.form_fields = form_fields;
                method_config.file_upload = file_upload;
            }
        }

        RouteConfig {
            path: path.to_string(),
            method: method.to_string(),
            description,
            headers,
            method_config,
        }
    }
}

/// The first content type of the operation's first declared response.
fn first_response_content_type(operation: &Operation) -> Option<String> {
    let response = operation
        .responses
        .responses
        .iter()
        .next()
        .map(|(_, response)| response)
        .or(operation.responses.default.as_ref())?;
    let ReferenceOr::Item(response) = response else {
        return None;
    };
    response.content.keys().next().cloned()
}

/// Form fields and file upload slot for multipart/form-data request bodies.
///
/// The first `format: binary` property becomes the upload field; the rest
/// become text form fields.
fn multipart_config(operation: &Operation) -> Option<(Vec<String>, Option<FileUploadConfig>)> {
    let ReferenceOr::Item(body) = operation.request_body.as_ref()? else {
        return None;
    };
    let media = body.content.get(MULTIPART_CONTENT_TYPE)?;
    let ReferenceOr::Item(schema) = media.schema.as_ref()? else {
        warn!("request body schema references are not supported");
        return None;
    };

    let value = serde_json::to_value(schema).ok()?;
    let properties = value.get("properties")?.as_object()?;

    let mut form_fields = Vec::new();
    let mut file_upload = None;
    for (name, property) in properties {
        let is_binary = property.get("format").and_then(Value::as_str) == Some("binary");
        if is_binary && file_upload.is_none() {
            file_upload = Some(FileUploadConfig::new(name.clone()));
        } else {
            form_fields.push(name.clone());
        }
    }
    Some((form_fields, file_upload))
}

/// The translated request body node for POST/PUT/PATCH operations.
///
/// Multipart uploads are represented through the route's form fields
/// instead, and reference bodies are skipped.
fn body_node(operation: &Operation, route: &RouteConfig) -> Option<ParameterNode> {
    if !BODY_METHODS.contains(&route.method.as_str()) {
        return None;
    }
    if route.method_config.file_upload.is_some() {
        return None;
    }
    let body = match operation.request_body.as_ref()? {
        ReferenceOr::Item(body) => body,
        ReferenceOr::Reference { .. } => {
            warn!("request body references are not supported");
            return None;
        }
    };

    let mut entries = Vec::new();
    for (content_type, media) in &body.content {
        match &media.schema {
            Some(ReferenceOr::Item(schema)) => {
                let value = serde_json::to_value(schema)
                    .unwrap_or_else(|_| Value::Object(Default::default()));
                entries.push((content_type.clone(), value));
            }
            Some(ReferenceOr::Reference { .. }) => {
                warn!("request body schema references are not supported");
            }
            None => {}
        }
    }

    let merged = schema::merge_body_content(entries)?;
    Some(schema::translate(Some(&merged), "body", body.required))
}
