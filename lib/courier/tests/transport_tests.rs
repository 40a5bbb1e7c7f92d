//! End-to-end tests for `HyperTransport` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use assert2::{check, let_assert};
use courier::{
    CachePolicy, Client, Courier, Error, HyperTransport, Method, Specification, TransportError,
};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    user_id: u64,
    display_name: String,
}

#[derive(Debug, Serialize)]
struct NewUser {
    name: String,
}

fn client_for(server: &MockServer) -> Courier {
    Client::new(HyperTransport::new(), server.uri()).expect("valid base URL")
}

#[tokio::test]
async fn test_fetch_decodes_snake_case_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_id": 7,
            "display_name": "Ada"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(HyperTransport::new(), format!("{}/api/", server.uri()))
        .expect("valid base URL");
    let spec = Specification::new(Method::Get, "users/7");

    let profile: Profile = client.fetch(&spec).await.expect("profile");

    check!(
        profile
            == Profile {
                user_id: 7,
                display_name: "Ada".to_string(),
            }
    );
}

#[tokio::test]
async fn test_not_found_is_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = Specification::new(Method::Get, "/missing");

    let result = client.fetch_bytes(&spec).await;

    let_assert!(Err(Error::RequestFailed(404)) = result);
}

#[tokio::test]
async fn test_raw_bytes_are_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xde, 0xad, 0xbe, 0xef]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = Specification::new(Method::Get, "/blob");

    let body = client.fetch_bytes(&spec).await.expect("body");

    check!(body == b"\xde\xad\xbe\xef".as_slice());
}

#[tokio::test]
async fn test_headers_and_body_sent_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/notes/1"))
        .and(header("X-Trace", "abc-123"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("raw payload"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = Specification::builder(Method::Put, "/notes/1")
        .header("X-Trace", "abc-123")
        .header("Content-Type", "text/plain")
        .body("raw payload")
        .build();

    let body = client.fetch_bytes(&spec).await.expect("empty body");

    check!(body.is_empty());
}

#[tokio::test]
async fn test_json_body() {
    let server = MockServer::start().await;

    let new_user = NewUser {
        name: "Grace".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({ "name": "Grace" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "user_id": 42,
            "display_name": "Grace"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = Specification::builder(Method::Post, "/users")
        .json(&new_user)
        .expect("json body")
        .build();

    let profile: Profile = client.fetch(&spec).await.expect("profile");

    check!(profile.user_id == 42);
}

#[tokio::test]
async fn test_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = Specification::builder(Method::Get, "/search")
        .query("q", "rust lang")
        .query("page", "2")
        .build();

    let results: Vec<String> = client.fetch(&spec).await.expect("results");

    check!(results.is_empty());
}

#[tokio::test]
async fn test_reload_policy_sends_no_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fresh"))
        .and(header("Cache-Control", "no-cache"))
        .and(header("Pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder(HyperTransport::new(), server.uri())
        .cache_policy(CachePolicy::ReloadIgnoringCacheData)
        .build()
        .expect("client");
    let spec = Specification::new(Method::Get, "/fresh");

    client.fetch_bytes(&spec).await.expect("response");
}

#[tokio::test]
async fn test_default_policy_sends_no_cache_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = Specification::new(Method::Get, "/cached");

    client.fetch_bytes(&spec).await.expect("response");

    let requests = server.received_requests().await.expect("recording enabled");
    let_assert!([request] = requests.as_slice());
    check!(request.headers.get("cache-control").is_none());
    check!(request.headers.get("pragma").is_none());
}

#[tokio::test]
async fn test_timeout_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = Client::builder(HyperTransport::new(), server.uri())
        .timeout(Duration::from_millis(200))
        .build()
        .expect("client");
    let spec = Specification::new(Method::Get, "/slow");

    let result = client.fetch_bytes(&spec).await;

    let_assert!(Err(Error::Unknown(err)) = result);
    let_assert!(Some(transport_err) = err.downcast_ref::<TransportError>());
    check!(transport_err.is_timeout());
}

#[tokio::test]
async fn test_connection_refused_is_unknown() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };

    let client =
        Client::new(HyperTransport::new(), format!("http://127.0.0.1:{port}")).expect("client");
    let spec = Specification::new(Method::Get, "/");

    let result = client.fetch_bytes(&spec).await;

    let_assert!(Err(Error::Unknown(err)) = result);
    let_assert!(Some(transport_err) = err.downcast_ref::<TransportError>());
    check!(transport_err.is_connection());
}

#[tokio::test]
async fn test_invalid_header_name_is_unknown() {
    let server = MockServer::start().await;

    let client = client_for(&server);
    let spec = Specification::builder(Method::Get, "/")
        .header("bad header", "value")
        .build();

    let result = client.fetch_bytes(&spec).await;

    let_assert!(Err(Error::Unknown(err)) = result);
    let_assert!(Some(TransportError::InvalidRequest(_)) = err.downcast_ref::<TransportError>());
    let received = server.received_requests().await.expect("recording enabled");
    check!(received.is_empty());
}

#[tokio::test]
async fn test_invalid_endpoint_sends_nothing() {
    let server = MockServer::start().await;

    let client = client_for(&server);
    let spec = Specification::new(Method::Get, "http://[::1");

    let result = client.fetch_bytes(&spec).await;

    let_assert!(Err(Error::InvalidUrl(_)) = result);
    let received = server.received_requests().await.expect("recording enabled");
    check!(received.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_share_transport() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(8)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));
    let spec = Arc::new(Specification::new(Method::Get, "/ping"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            let spec = Arc::clone(&spec);
            tokio::spawn(async move { client.fetch_bytes(&spec).await })
        })
        .collect();

    for handle in handles {
        let body = handle.await.expect("task").expect("response");
        check!(body == "pong");
    }
}

#[tokio::test]
async fn test_default_client_entry_point() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = courier::client(server.uri()).expect("client");
    let spec = Specification::new(Method::Get, "/health");

    let body = client.fetch_bytes(&spec).await.expect("body");

    check!(body == "ok");
}
