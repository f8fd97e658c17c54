//! Route execution against an upstream endpoint.

use crate::auth::AuthManager;
use crate::builder::RequestBuilder;
use crate::error::{RequestError, Result};
use crate::types::{EndpointConfig, Response, RouteConfig};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Default timeout for upstream calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP execution engine for all routes of one endpoint.
///
/// Holds the client and the immutable endpoint/auth configuration; safe to
/// clone and share across tasks.
#[derive(Debug, Clone)]
pub struct HttpRequester {
    client: reqwest::Client,
    endpoint: Arc<EndpointConfig>,
    auth: Arc<AuthManager>,
}

impl HttpRequester {
    /// Create a requester with the default timeout.
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a requester whose client enforces `timeout` per call,
    /// covering both the request and the response body read.
    pub fn with_timeout(endpoint: EndpointConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth = Arc::new(AuthManager::new(endpoint.auth.clone()));
        Ok(Self {
            client,
            endpoint: Arc::new(endpoint),
            auth,
        })
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Bind an executor to one route.
    ///
    /// Passing `None` yields an executor whose every call fails with
    /// [`RequestError::MissingRoute`].
    pub fn route_executor(&self, route: Option<Arc<RouteConfig>>) -> RouteExecutor {
        RouteExecutor {
            builder: RequestBuilder::new(self.endpoint.clone(), self.auth.clone(), route),
            client: self.client.clone(),
        }
    }
}

/// Executes calls for a single route.
///
/// Cheap to clone and safe to invoke concurrently; every call owns its
/// request and response, and nothing is retried.
#[derive(Debug, Clone)]
pub struct RouteExecutor {
    builder: RequestBuilder,
    client: reqwest::Client,
}

impl RouteExecutor {
    /// Build and execute one call, reading the full response body.
    ///
    /// An upstream status >= 400 is returned as a normal [`Response`];
    /// only build, auth, and transport failures are errors.
    pub async fn execute(&self, args: &Map<String, Value>) -> Result<Response> {
        let request = self.builder.build(args)?;
        debug!("executing {} {}", request.method, request.url);

        let request = request.into_reqwest(&self.client)?;
        let response = self.client.execute(request).await.map_err(|e| {
            error!("request failed: {e}");
            RequestError::Transport(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!("upstream responded with status {status}");

        Ok(Response {
            status,
            body,
            headers,
        })
    }

    /// Execute while honoring an external cancellation signal.
    ///
    /// On cancellation the pending call is dropped and
    /// [`RequestError::Cancelled`] returned promptly.
    pub async fn execute_with_cancellation(
        &self,
        args: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        tokio::select! {
            _ = cancel.cancelled() => Err(RequestError::Cancelled),
            result = self.execute(args) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuthSpec, MethodConfig};
    use serde_json::json;
    use std::collections::HashMap;

    fn route(method: &str, path: &str) -> Option<Arc<RouteConfig>> {
        Some(Arc::new(RouteConfig {
            path: path.to_string(),
            method: method.to_string(),
            description: String::new(),
            headers: HashMap::new(),
            method_config: MethodConfig::default(),
        }))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn endpoint(base_url: String) -> EndpointConfig {
        EndpointConfig {
            base_url,
            headers: HashMap::new(),
            auth: AuthSpec::none(),
        }
    }

    #[tokio::test]
    async fn test_get_with_query_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/test")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("param1".into(), "value1".into()),
                mockito::Matcher::UrlEncoded("param2".into(), "value2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success"}"#)
            .create_async()
            .await;

        let requester = HttpRequester::new(endpoint(server.url())).unwrap();
        let executor = requester.route_executor(route("GET", "/test"));
        let response = executor
            .execute(&args(json!({"param1": "value1", "param2": "value2"})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status.as_u16(), 200);
        let body: Value = response.json().unwrap();
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_post_with_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/test")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(json!({"key1": "value1"})))
            .with_status(201)
            .with_body(r#"{"status":"created"}"#)
            .create_async()
            .await;

        let requester = HttpRequester::new(endpoint(server.url())).unwrap();
        let executor = requester.route_executor(route("POST", "/test"));
        let response = executor
            .execute(&args(json!({"body": {"key1": "value1"}})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status.as_u16(), 201);
    }

    #[tokio::test]
    async fn test_endpoint_headers_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/headers")
            .match_header("x-test-header", "test-value")
            .with_status(200)
            .create_async()
            .await;

        let mut config = endpoint(server.url());
        config
            .headers
            .insert("X-Test-Header".to_string(), "test-value".to_string());

        let requester = HttpRequester::new(config).unwrap();
        let executor = requester.route_executor(route("GET", "/headers"));
        let response = executor.execute(&Map::new()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status.as_u16(), 200);
    }

    #[tokio::test]
    async fn test_error_status_is_a_response_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let requester = HttpRequester::new(endpoint(server.url())).unwrap();
        let executor = requester.route_executor(route("GET", "/missing"));
        let response = executor.execute(&Map::new()).await.unwrap();

        assert_eq!(response.status.as_u16(), 404);
        assert_eq!(response.text(), "not found");
    }

    #[tokio::test]
    async fn test_timeout_returns_error() {
        // A listener that accepts but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let requester = HttpRequester::with_timeout(
            endpoint(format!("http://{addr}")),
            Duration::from_millis(100),
        )
        .unwrap();
        let executor = requester.route_executor(route("GET", "/slow"));
        let err = executor.execute(&Map::new()).await.unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_pending_call() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let requester = HttpRequester::new(endpoint(format!("http://{addr}"))).unwrap();
        let executor = requester.route_executor(route("GET", "/slow"));

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let err = executor
            .execute_with_cancellation(&Map::new(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Cancelled));
    }

    #[tokio::test]
    async fn test_missing_route_fails_per_call() {
        let requester = HttpRequester::new(endpoint("http://localhost".to_string())).unwrap();
        let executor = requester.route_executor(None);
        let err = executor.execute(&Map::new()).await.unwrap_err();
        assert!(matches!(err, RequestError::MissingRoute));
    }
}
