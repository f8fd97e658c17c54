//! Authentication attachment for outbound requests.
//!
//! Supported strategies:
//! - `none`
//! - `basic` (Authorization: Basic <base64>)
//! - `bearer` (Authorization: Bearer <token>)
//! - `api_key` (configurable header, default `X-API-Key`)
//! - `oauth2` (pre-obtained token, sent like a bearer token)
//!
//! Token acquisition is out of scope; credentials are taken from the
//! [`AuthSpec`] as-is.

use crate::builder::BuiltRequest;
use crate::error::{RequestError, Result};
use crate::types::AuthSpec;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// The closed set of supported strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthKind {
    None,
    Basic,
    Bearer,
    ApiKey,
    OAuth2,
}

impl AuthKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "" | "none" => Some(Self::None),
            "basic" => Some(Self::Basic),
            "bearer" => Some(Self::Bearer),
            "api_key" => Some(Self::ApiKey),
            "oauth2" => Some(Self::OAuth2),
            _ => None,
        }
    }
}

/// Applies credentials from an [`AuthSpec`] to outbound requests.
///
/// Shared read-only across all routes of one endpoint.
#[derive(Debug, Clone)]
pub struct AuthManager {
    spec: AuthSpec,
}

impl AuthManager {
    pub fn new(spec: AuthSpec) -> Self {
        Self { spec }
    }

    /// Attach credentials to the request.
    ///
    /// An unsupported tag or an unencodable credential fails without
    /// touching the request.
    pub fn apply(&self, request: &mut BuiltRequest) -> Result<()> {
        let kind = AuthKind::from_tag(&self.spec.auth_type)
            .ok_or_else(|| RequestError::UnsupportedAuthType(self.spec.auth_type.clone()))?;

        match kind {
            AuthKind::None => {}
            AuthKind::Basic => {
                let username = self.config_value("username");
                let password = self.config_value("password");
                let encoded = BASE64.encode(format!("{username}:{password}"));
                let value = credential_value(&format!("Basic {encoded}"))?;
                request.headers.insert(AUTHORIZATION, value);
            }
            AuthKind::Bearer | AuthKind::OAuth2 => {
                let token = self.config_value("token");
                let value = credential_value(&format!("Bearer {token}"))?;
                request.headers.insert(AUTHORIZATION, value);
            }
            AuthKind::ApiKey => {
                let key = self.config_value("key");
                let header = match self.config_value("header") {
                    h if h.is_empty() => DEFAULT_API_KEY_HEADER.to_string(),
                    h => h,
                };
                let name = HeaderName::from_bytes(header.as_bytes()).map_err(|e| {
                    RequestError::Auth(format!("invalid api key header '{header}': {e}"))
                })?;
                request.headers.insert(name, credential_value(&key)?);
            }
        }
        Ok(())
    }

    fn config_value(&self, key: &str) -> String {
        self.spec.config.get(key).cloned().unwrap_or_default()
    }
}

fn credential_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| RequestError::Auth(format!("credential is not a valid header value: {e}")))
}
