//! HTTP request construction from a route configuration and call arguments.
//!
//! Argument placement follows the route descriptor: `{key}` placeholders in
//! the path template consume matching arguments, GET requests turn the rest
//! into query parameters, and POST/PUT/PATCH requests carry either a
//! multipart form or the JSON value supplied under `body`.

use crate::auth::AuthManager;
use crate::error::{RequestError, Result};
use crate::types::{EndpointConfig, FileUploadConfig, RouteConfig};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json";

/// A fully formed request, ready to hand to the HTTP client.
///
/// Built fresh per call and never shared.
#[derive(Debug)]
pub struct BuiltRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// Request payload variants produced by the builder.
pub enum RequestBody {
    Empty,
    Json(Vec<u8>),
    /// Content type (with boundary) is set by the transport at send time
    Multipart(Form),
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => write!(f, "Empty"),
            RequestBody::Json(bytes) => write!(f, "Json({} bytes)", bytes.len()),
            RequestBody::Multipart(_) => write!(f, "Multipart"),
        }
    }
}

impl BuiltRequest {
    /// The effective content type, when one is set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Convert into a transport request on the given client.
    pub(crate) fn into_reqwest(self, client: &reqwest::Client) -> Result<reqwest::Request> {
        let builder = client.request(self.method, self.url).headers(self.headers);
        let builder = match self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        builder.build().map_err(RequestError::Transport)
    }
}

/// Builds [`BuiltRequest`]s for one route of one endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: Arc<EndpointConfig>,
    auth: Arc<AuthManager>,
    route: Option<Arc<RouteConfig>>,
}

impl RequestBuilder {
    pub fn new(
        endpoint: Arc<EndpointConfig>,
        auth: Arc<AuthManager>,
        route: Option<Arc<RouteConfig>>,
    ) -> Self {
        Self {
            endpoint,
            auth,
            route,
        }
    }

    /// Assemble a request from call arguments.
    ///
    /// Fails without side effects; in particular an authentication failure
    /// aborts construction so a partially authenticated request is never
    /// returned.
    pub fn build(&self, args: &Map<String, Value>) -> Result<BuiltRequest> {
        let route = self.route.as_deref().ok_or(RequestError::MissingRoute)?;
        let method = Method::from_bytes(route.method.as_bytes())
            .map_err(|_| RequestError::InvalidMethod(route.method.clone()))?;

        let (raw_url, consumed) = substitute_path(&self.endpoint.base_url, &route.path, args);
        let mut url = Url::parse(&raw_url)?;
        if method == Method::GET {
            append_query_args(&mut url, args, &consumed);
        }

        let (body, content_type) = build_body(route, &method, args)?;
        let headers = merge_headers(&self.endpoint.headers, &route.headers, content_type, &body)?;

        let mut request = BuiltRequest {
            method,
            url,
            headers,
            body,
        };
        self.auth.apply(&mut request)?;

        debug!("built request: {} {}", request.method, request.url);
        Ok(request)
    }
}

/// Replace every `{key}` placeholder whose key is present in `args`.
///
/// Unmatched placeholders are left verbatim; the consumed keys are reported
/// so they are not re-encoded as query parameters.
fn substitute_path(
    base_url: &str,
    path: &str,
    args: &Map<String, Value>,
) -> (String, HashSet<String>) {
    let mut url = format!("{base_url}{path}");
    let mut consumed = HashSet::new();
    for (key, value) in args {
        let placeholder = format!("{{{key}}}");
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, &value_to_string(value));
            consumed.insert(key.clone());
        }
    }
    (url, consumed)
}

fn append_query_args(url: &mut Url, args: &Map<String, Value>, consumed: &HashSet<String>) {
    let mut pairs = url.query_pairs_mut();
    for (key, value) in args {
        if key == "body" || key == "file" || consumed.contains(key) {
            continue;
        }
        pairs.append_pair(key, &value_to_string(value));
    }
    drop(pairs);
    if url.query() == Some("") {
        url.set_query(None);
    }
}

fn build_body(
    route: &RouteConfig,
    method: &Method,
    args: &Map<String, Value>,
) -> Result<(RequestBody, Option<&'static str>)> {
    if *method == Method::GET {
        return Ok((RequestBody::Empty, None));
    }

    if *method == Method::POST || *method == Method::PUT || *method == Method::PATCH {
        return if let Some(upload) = &route.method_config.file_upload {
            let form = build_multipart(route, upload, args);
            Ok((RequestBody::Multipart(form), None))
        } else if let Some(body) = args.get("body") {
            Ok((
                RequestBody::Json(serde_json::to_vec(body)?),
                Some(JSON_CONTENT_TYPE),
            ))
        } else {
            Ok((RequestBody::Empty, None))
        };
    }

    // Other methods send the whole argument map as a JSON body
    if args.is_empty() {
        Ok((RequestBody::Empty, None))
    } else {
        Ok((
            RequestBody::Json(serde_json::to_vec(args)?),
            Some(JSON_CONTENT_TYPE),
        ))
    }
}

fn build_multipart(route: &RouteConfig, upload: &FileUploadConfig, args: &Map<String, Value>) -> Form {
    let mut form = Form::new();
    if let Some(value) = args.get(&upload.field_name) {
        let bytes = match value {
            Value::String(s) => s.clone().into_bytes(),
            other => other.to_string().into_bytes(),
        };
        form = form.part(
            upload.field_name.clone(),
            Part::bytes(bytes).file_name("file"),
        );
    }
    for field in &route.method_config.form_fields {
        if let Some(value) = args.get(field) {
            form = form.text(field.clone(), value_to_string(value));
        }
    }
    form
}

/// Merge endpoint-level headers, then route-level headers (route wins), then
/// the body content type on top of both.
fn merge_headers(
    endpoint_headers: &std::collections::HashMap<String, String>,
    route_headers: &std::collections::HashMap<String, String>,
    content_type: Option<&'static str>,
    body: &RequestBody,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for source in [endpoint_headers, route_headers] {
        for (name, value) in source {
            headers.insert(parse_header_name(name)?, parse_header_value(name, value)?);
        }
    }
    match body {
        // Boundary-bearing content type is owned by the transport
        RequestBody::Multipart(_) => {
            headers.remove(CONTENT_TYPE);
        }
        _ => {
            if let Some(content_type) = content_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }
    }
    Ok(headers)
}

fn parse_header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| RequestError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// String form of an argument: strings verbatim, everything else as JSON.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
