//! End-to-end test of the ingestion and execution pipeline.
//!
//! Covers the full flow: spec bytes -> route toolset -> executor -> HTTP
//! call against a mock upstream, plus concurrent execution across routes.

use restbridge_openapi::{Adjuster, RouteToolset};
use restbridge_requester::{AuthSpec, EndpointConfig, HttpRequester};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

const SPEC: &str = r#"{
    "openapi": "3.0.0",
    "info": {"title": "Test API", "version": "1.0.0"},
    "paths": {
        "/users": {
            "get": {
                "summary": "List users",
                "parameters": [
                    {"name": "page", "in": "query", "schema": {"type": "integer"}}
                ],
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": {"application/json": {"schema": {"type": "array"}}}
                    }
                }
            },
            "post": {
                "summary": "Create user",
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "properties": {"name": {"type": "string"}},
                                "required": ["name"]
                            }
                        }
                    }
                },
                "responses": {"201": {"description": "Created"}}
            }
        },
        "/users/{id}": {
            "get": {
                "summary": "Get user",
                "parameters": [
                    {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                ],
                "responses": {"200": {"description": "OK"}}
            }
        }
    }
}"#;

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn endpoint(base_url: String, auth: AuthSpec) -> EndpointConfig {
    EndpointConfig {
        base_url,
        headers: HashMap::new(),
        auth,
    }
}

#[tokio::test]
async fn test_spec_to_executed_call() {
    let mut server = mockito::Server::new_async().await;
    let get_mock = server
        .mock("GET", "/users/42")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_body(r#"{"id": "42", "name": "Ada"}"#)
        .create_async()
        .await;

    let toolset = RouteToolset::from_str(SPEC, &Adjuster::new()).unwrap();
    assert_eq!(toolset.len(), 3);

    let tool = toolset.get("get_users_id").expect("tool should exist");
    let schema = tool.input_schema();
    assert!(schema["required"].as_array().unwrap().contains(&json!("id")));

    let requester =
        HttpRequester::new(endpoint(server.url(), AuthSpec::bearer("secret-token"))).unwrap();
    let executor = requester.route_executor(Some(Arc::new(tool.route().clone())));
    let response = executor.execute(&args(json!({"id": "42"}))).await.unwrap();

    get_mock.assert_async().await;
    assert_eq!(response.status.as_u16(), 200);
    let body: Value = response.json().unwrap();
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn test_post_tool_sends_json_body() {
    let mut server = mockito::Server::new_async().await;
    let post_mock = server
        .mock("POST", "/users")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({"name": "Ada"})))
        .with_status(201)
        .with_body(r#"{"id": "1"}"#)
        .create_async()
        .await;

    let toolset = RouteToolset::from_str(SPEC, &Adjuster::new()).unwrap();
    let tool = toolset.get("post_users").expect("tool should exist");
    assert!(tool.body_schema().unwrap().required);

    let requester = HttpRequester::new(endpoint(server.url(), AuthSpec::none())).unwrap();
    let executor = requester.route_executor(Some(Arc::new(tool.route().clone())));
    let response = executor
        .execute(&args(json!({"body": {"name": "Ada"}})))
        .await
        .unwrap();

    post_mock.assert_async().await;
    assert_eq!(response.status.as_u16(), 201);
}

#[tokio::test]
async fn test_concurrent_execution_across_routes() {
    const CALLS_PER_ROUTE: usize = 50;

    let mut server = mockito::Server::new_async().await;
    let list_mock = server
        .mock("GET", "/users")
        .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"route": "list"}"#)
        .expect(CALLS_PER_ROUTE)
        .create_async()
        .await;
    let get_mock = server
        .mock("GET", "/users/42")
        .with_status(200)
        .with_body(r#"{"route": "get"}"#)
        .expect(CALLS_PER_ROUTE)
        .create_async()
        .await;

    let toolset = RouteToolset::from_str(SPEC, &Adjuster::new()).unwrap();
    let requester = HttpRequester::new(endpoint(server.url(), AuthSpec::none())).unwrap();

    let list_tool = toolset.get("get_users").unwrap();
    let get_tool = toolset.get("get_users_id").unwrap();
    let list_executor = requester.route_executor(Some(Arc::new(list_tool.route().clone())));
    let get_executor = requester.route_executor(Some(Arc::new(get_tool.route().clone())));

    let mut handles = Vec::new();
    for _ in 0..CALLS_PER_ROUTE {
        let executor = list_executor.clone();
        handles.push(tokio::spawn(async move {
            let response = executor.execute(&args(json!({"page": "1"}))).await.unwrap();
            ("list", response)
        }));

        let executor = get_executor.clone();
        handles.push(tokio::spawn(async move {
            let response = executor.execute(&args(json!({"id": "42"}))).await.unwrap();
            ("get", response)
        }));
    }

    for handle in handles {
        let (route, response) = handle.await.unwrap();
        assert_eq!(response.status.as_u16(), 200);
        let body: Value = response.json().unwrap();
        // Every call sees its own route's response
        assert_eq!(body["route"], route);
    }

    list_mock.assert_async().await;
    get_mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_error_status_reaches_the_caller_as_data() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users/42")
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let toolset = RouteToolset::from_str(SPEC, &Adjuster::new()).unwrap();
    let tool = toolset.get("get_users_id").unwrap();

    let requester = HttpRequester::new(endpoint(server.url(), AuthSpec::none())).unwrap();
    let executor = requester.route_executor(Some(Arc::new(tool.route().clone())));
    let response = executor.execute(&args(json!({"id": "42"}))).await.unwrap();

    assert_eq!(response.status.as_u16(), 503);
    assert_eq!(response.text(), "upstream down");
}
