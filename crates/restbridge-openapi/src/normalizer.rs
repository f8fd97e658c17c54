//! Specification normalization: version detection and parsing.
//!
//! Every document entering the pipeline goes through [`normalize`], which
//! yields one OpenAPI 3.x model regardless of whether the input was written
//! against Swagger 2.0 or OpenAPI 3.x, in JSON or YAML.

use crate::convert;
use crate::error::{Result, SpecError};
use openapiv3::OpenAPI;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Parse raw spec bytes into a normalized OpenAPI 3.x document.
///
/// Swagger 2.0 documents are converted; any other version is rejected.
/// The input is never mutated.
pub fn normalize(data: &[u8]) -> Result<OpenAPI> {
    let raw = parse_value(data)?;
    let doc = raw
        .as_object()
        .ok_or_else(|| SpecError::Parse("document root is not an object".to_string()))?;

    let swagger = doc.get("swagger");
    let openapi = doc.get("openapi");
    if swagger.is_none() && openapi.is_none() {
        return Err(SpecError::MissingVersion);
    }

    if let Some(version) = swagger {
        if version.as_str() != Some("2.0") {
            return Err(SpecError::UnsupportedSwaggerVersion(display_version(version)));
        }
        info!("detected Swagger 2.0 spec, converting to OpenAPI 3.0");
        return load_document(convert::swagger_to_openapi(&raw));
    }

    if let Some(version) = openapi {
        match version.as_str() {
            Some(v) if v.starts_with("3.") => {}
            _ => return Err(SpecError::UnsupportedOpenApiVersion(display_version(version))),
        }
    }
    debug!("parsing OpenAPI 3.x spec");
    load_document(raw)
}

/// Parse a spec from a string. JSON is tried first, then YAML.
pub fn normalize_str(content: &str) -> Result<OpenAPI> {
    normalize(content.as_bytes())
}

/// Read and parse a spec file.
pub fn normalize_file(path: impl AsRef<Path>) -> Result<OpenAPI> {
    let path = path.as_ref();
    info!("loading spec from file: {}", path.display());
    let data = std::fs::read(path)?;
    normalize(&data)
}

/// Fetch and parse a spec from a URL.
pub async fn normalize_url(url: &str) -> Result<OpenAPI> {
    info!("loading spec from URL: {url}");
    let response = reqwest::get(url).await?;
    let data = response.bytes().await?;
    normalize(&data)
}

fn parse_value(data: &[u8]) -> Result<Value> {
    if let Ok(value) = serde_json::from_slice(data) {
        return Ok(value);
    }
    serde_yaml::from_slice(data).map_err(|e| SpecError::Parse(e.to_string()))
}

fn load_document(raw: Value) -> Result<OpenAPI> {
    serde_json::from_value(raw).map_err(|e| SpecError::InvalidSpec(e.to_string()))
}

fn display_version(version: &Value) -> String {
    match version.as_str() {
        Some(s) => s.to_string(),
        None => version.to_string(),
    }
}
