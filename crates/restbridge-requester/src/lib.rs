//! # restbridge-requester
//!
//! Request construction and execution for restbridge route tools.
//!
//! ## Features
//!
//! - Route descriptors carrying path templates, static headers, and
//!   query/form/file metadata
//! - Argument placement: path substitution, query encoding, JSON and
//!   multipart bodies
//! - Authentication strategies (API Key, Bearer, Basic, OAuth2 tokens)
//! - Timeout-bound execution with cooperative cancellation
//!
//! ## Example
//!
//! ```no_run
//! use restbridge_requester::{AuthSpec, EndpointConfig, HttpRequester, RouteConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let endpoint = EndpointConfig {
//!     base_url: "https://api.example.com".to_string(),
//!     auth: AuthSpec::bearer(std::env::var("API_TOKEN")?),
//!     ..Default::default()
//! };
//!
//! let requester = HttpRequester::new(endpoint)?;
//! let route = RouteConfig {
//!     path: "/users/{id}".to_string(),
//!     method: "GET".to_string(),
//!     ..Default::default()
//! };
//! let executor = requester.route_executor(Some(Arc::new(route)));
//!
//! let args = serde_json::json!({"id": "42"});
//! let response = executor.execute(args.as_object().unwrap()).await?;
//! println!("status: {}", response.status);
//! # Ok(())
//! # }
//! ```

mod auth;
mod builder;
mod error;
mod executor;
mod types;

pub use auth::AuthManager;
pub use builder::{BuiltRequest, RequestBody, RequestBuilder};
pub use error::{RequestError, Result};
pub use executor::{DEFAULT_TIMEOUT, HttpRequester, RouteExecutor};
pub use types::{
    AuthSpec, EndpointConfig, FileUploadConfig, MethodConfig, Response, RouteConfig,
};
