//! Integration tests for the reqwest adapter against a local mock server.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use relay_application::ports::{HttpClient, HttpClientError};
use relay_application::{ResolvedRequest, VariableResolver};
use relay_domain::{ApiKeyLocation, Auth, Environment, RequestBody, RequestSpec};
use relay_infrastructure::{ClientConfig, ReqwestHttpClient};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolved(spec: &RequestSpec) -> ResolvedRequest {
    VariableResolver::new(Environment::new("global").into_shared())
        .resolve_request(spec)
        .expect("request should resolve")
}

fn client(auto_manage_cookies: bool) -> ReqwestHttpClient {
    ReqwestHttpClient::new(ClientConfig {
        connect_timeout: Duration::from_secs(5),
        read_timeout: Duration::from_secs(5),
        auto_manage_cookies,
    })
    .expect("client should build")
}

#[tokio::test]
async fn test_get_returns_normalized_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "abc")
                .set_body_string(r#"{"id":7}"#),
        )
        .mount(&server)
        .await;

    let spec = RequestSpec::get(format!("{}/users/7", server.uri()));
    let response = client(false).execute(&resolved(&spec)).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "200 OK");
    assert_eq!(response.header("x-request-id"), Some("abc"));
    assert_eq!(response.body_text(), r#"{"id":7}"#);
    assert_eq!(response.size, 8);
}

#[tokio::test]
async fn test_non_success_status_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let spec = RequestSpec::new("delete", format!("{}/missing", server.uri()));
    let response = client(false).execute(&resolved(&spec)).await.unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.status_text, "404 Not Found");
    assert!(response.is_client_error());
}

#[tokio::test]
async fn test_bearer_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::get(server.uri()).with_auth(Auth::bearer("t0ken"));
    let response = client(false).execute(&resolved(&spec)).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::get(server.uri()).with_auth(Auth::basic("user", "pass"));
    let response = client(false).execute(&resolved(&spec)).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_api_key_in_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-api-key", "k123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::get(server.uri()).with_auth(Auth::api_key(
        "X-Api-Key",
        "k123",
        ApiKeyLocation::Header,
    ));
    let response = client(false).execute(&resolved(&spec)).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_api_key_in_query_keeps_existing_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .and(query_param("api_key", "k123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::get(format!("{}/search?q=rust", server.uri())).with_auth(
        Auth::api_key("api_key", "k123", ApiKeyLocation::Query),
    );
    let response = client(false).execute(&resolved(&spec)).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"Ada"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::post(format!("{}/users", server.uri()))
        .with_body(RequestBody::json(r#"{"name":"Ada"}"#));
    let response = client(false).execute(&resolved(&spec)).await.unwrap();
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_cookies_replayed_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(true);
    client
        .execute(&resolved(&RequestSpec::get(format!("{}/login", server.uri()))))
        .await
        .unwrap();
    assert_eq!(client.cookie_header("127.0.0.1").as_deref(), Some("session=abc"));

    let response = client
        .execute(&resolved(&RequestSpec::get(format!("{}/me", server.uri()))))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_cookies_not_replayed_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(false);
    client
        .execute(&resolved(&RequestSpec::get(format!("{}/login", server.uri()))))
        .await
        .unwrap();
    assert_eq!(client.cookie_header("127.0.0.1"), None);

    let response = client
        .execute(&resolved(&RequestSpec::get(format!("{}/me", server.uri()))))
        .await
        .unwrap();
    assert_eq!(response.status, 401);
}

#[tokio::test]
async fn test_unreachable_host_is_an_error() {
    let spec = RequestSpec::get("http://127.0.0.1:1/");
    let error = client(false).execute(&resolved(&spec)).await.unwrap_err();

    assert!(matches!(
        error,
        HttpClientError::ConnectionRefused { .. } | HttpClientError::ConnectionFailed(_)
    ));
    assert!(!error.to_string().is_empty());
}

#[tokio::test]
async fn test_invalid_method_rejected() {
    let spec = RequestSpec::new("NOT A METHOD", "http://127.0.0.1:1/");
    let error = client(false).execute(&resolved(&spec)).await.unwrap_err();
    assert!(matches!(error, HttpClientError::InvalidRequest(_)));
}
