//! Data structures shared by the request pipeline.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a single upstream route.
///
/// Identity is the (path, method) pair; everything else is derived metadata.
/// Built once during extraction and shared read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Path template with `{param}` placeholders (e.g. "/users/{id}")
    pub path: String,
    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    pub method: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Static headers sent with every call to this route
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Method-specific configuration
    #[serde(default)]
    pub method_config: MethodConfig,
}

/// Method-specific route configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodConfig {
    /// Query parameter names declared by the operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<String>,

    /// Text field names for multipart/form-data bodies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_fields: Vec<String>,

    /// File upload slot, when the operation accepts one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<FileUploadConfig>,
}

/// Configuration for a multipart file upload field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUploadConfig {
    /// Multipart field name the file is sent under
    pub field_name: String,
    /// Accepted media types, empty when unrestricted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_types: Vec<String>,
    /// Maximum file size in bytes, when the API declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

impl FileUploadConfig {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            allowed_types: Vec::new(),
            max_size: None,
        }
    }
}

/// Where and how to reach the upstream service.
///
/// Set once at startup and shared read-only across all calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL the route paths are appended to (e.g. "https://api.example.com")
    pub base_url: String,
    /// Static headers sent with every call to this endpoint
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Authentication settings for outbound calls
    #[serde(default)]
    pub auth: AuthSpec,
}

/// Authentication settings for outbound calls.
///
/// The tag selects one of the supported strategies: `none`, `basic`,
/// `bearer`, `api_key`, `oauth2`. Anything else is rejected when credentials
/// are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSpec {
    /// Strategy tag
    #[serde(rename = "type", default = "default_auth_type")]
    pub auth_type: String,
    /// Strategy-specific key/value settings (tokens, usernames, header names)
    #[serde(default)]
    pub config: HashMap<String, String>,
}

fn default_auth_type() -> String {
    "none".to_string()
}

impl Default for AuthSpec {
    fn default() -> Self {
        Self {
            auth_type: default_auth_type(),
            config: HashMap::new(),
        }
    }
}

impl AuthSpec {
    /// No authentication.
    pub fn none() -> Self {
        Self::default()
    }

    /// HTTP Basic authentication.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            auth_type: "basic".to_string(),
            config: HashMap::from([
                ("username".to_string(), username.into()),
                ("password".to_string(), password.into()),
            ]),
        }
    }

    /// Bearer token authentication.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            auth_type: "bearer".to_string(),
            config: HashMap::from([("token".to_string(), token.into())]),
        }
    }

    /// API key sent in the default `X-API-Key` header.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            auth_type: "api_key".to_string(),
            config: HashMap::from([("key".to_string(), key.into())]),
        }
    }

    /// API key sent in a custom header.
    pub fn api_key_header(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            auth_type: "api_key".to_string(),
            config: HashMap::from([
                ("header".to_string(), header.into()),
                ("key".to_string(), key.into()),
            ]),
        }
    }

    /// OAuth2 with a pre-obtained access token.
    pub fn oauth2(token: impl Into<String>) -> Self {
        Self {
            auth_type: "oauth2".to_string(),
            config: HashMap::from([("token".to_string(), token.into())]),
        }
    }
}

/// An executed upstream response.
///
/// A status >= 400 is data, not an error; classification belongs to the
/// caller.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: StatusCode,
    /// Full response body
    pub body: Vec<u8>,
    /// Response headers
    pub headers: HeaderMap,
}

impl Response {
    /// Body as UTF-8 text, lossily converted.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}
