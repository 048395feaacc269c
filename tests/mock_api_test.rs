//! Mock API tests
//!
//! These tests verify the HTTP layer end to end against a wiremock server:
//! envelope decoding, application errors, decode diagnostics, query-string
//! construction and request hooks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use apiwrap::{
    ApiClient, CancelHandle, ClientError, HttpInterceptor, HttpRequestContext, Params,
    PayloadError,
};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Widget {
    id: u64,
    name: String,
}

impl PayloadError for Widget {}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn well_formed_envelope_populates_the_destination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/widgets/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"id": 1, "name": "spanner"}
        })))
        .mount(&server)
        .await;

    let widget: Widget = client(&server)
        .get(&CancelHandle::new(), "/v1/widgets/1", &Params::new())
        .await
        .unwrap();

    assert_eq!(
        widget,
        Widget {
            id: 1,
            name: "spanner".to_string()
        }
    );
}

#[tokio::test]
async fn nonzero_code_is_an_api_error_regardless_of_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/widgets/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1042,
            "message": "quota exceeded",
            "data": {"id": 1, "name": "ignored"}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get::<Widget>(&CancelHandle::new(), "/v1/widgets/1", &Params::new())
        .await
        .unwrap_err();

    let ClientError::Api { code, message } = &err else {
        panic!("expected Api error, got {err:?}");
    };
    assert_eq!(*code, 1042);
    assert_eq!(message, "quota exceeded");
    let text = err.to_string();
    assert!(text.contains("quota exceeded"));
    assert!(text.contains("1042"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error_carrying_url_and_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>definitely not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get::<Widget>(&CancelHandle::new(), "/v1/broken", &Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
    let text = err.to_string();
    assert!(text.contains(&format!("{}/v1/broken", server.uri())), "{text}");
    assert!(text.contains("<html>definitely not json</html>"), "{text}");
}

#[tokio::test]
async fn get_sends_params_as_query_string_and_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "term"))
        .and(body_json(json!({"q": "term"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"id": 2, "name": "found"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let widget: Widget = client(&server)
        .get(
            &CancelHandle::new(),
            "/v1/search",
            &Params::new().with("q", "term"),
        )
        .await
        .unwrap();

    assert_eq!(widget.name, "found");
}

#[tokio::test]
async fn post_sends_the_payload_as_json_body_without_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/widgets"))
        .and(body_json(json!({"name": "crowbar"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"id": 3, "name": "crowbar"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let widget: Widget = client(&server)
        .post(&CancelHandle::new(), "/v1/widgets", &json!({"name": "crowbar"}))
        .await
        .unwrap();

    assert_eq!(widget.id, 3);
}

#[tokio::test]
async fn put_and_delete_round_trip_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/widgets/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"id": 4, "name": "renamed"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/widgets/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"deleted": true}
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let ctx = CancelHandle::new();

    let widget: Widget = client
        .put(&ctx, "/v1/widgets/4", &json!({"name": "renamed"}))
        .await
        .unwrap();
    assert_eq!(widget.name, "renamed");

    let gone: serde_json::Value = client.delete(&ctx, "/v1/widgets/4", &json!({})).await.unwrap();
    assert_eq!(gone, json!({"deleted": true}));
}

#[tokio::test]
async fn request_hook_injects_headers_into_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secure"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"id": 5, "name": "authorized"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(server.uri())
        .request_hook(|rb| rb.header("x-api-key", "secret"))
        .build()
        .unwrap();

    let widget: Widget = client
        .get(&CancelHandle::new(), "/v1/secure", &Params::new())
        .await
        .unwrap();
    assert_eq!(widget.name, "authorized");
}

#[tokio::test]
async fn missing_data_in_a_successful_envelope_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/empty"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": "ok"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .get::<Widget>(&CancelHandle::new(), "/v1/empty", &Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn connection_refusal_surfaces_as_a_transport_error() {
    // Nothing listens on the reserved port.
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = client
        .get::<Widget>(&CancelHandle::new(), "/v1/widgets/1", &Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[derive(Default)]
struct CountingInterceptor {
    before_send: AtomicUsize,
    responses: AtomicUsize,
    errors: AtomicUsize,
}

impl HttpInterceptor for CountingInterceptor {
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _body: &serde_json::Value,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        self.before_send.fetch_add(1, Ordering::SeqCst);
        Ok(builder)
    }

    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &reqwest::Response,
    ) -> Result<(), ClientError> {
        self.responses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_error(&self, _ctx: &HttpRequestContext, _error: &ClientError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn interceptors_observe_requests_responses_and_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {"id": 6, "name": "observed"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/error"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 9, "message": "nope", "data": null})),
        )
        .mount(&server)
        .await;

    let counter = Arc::new(CountingInterceptor::default());
    let client = ApiClient::builder()
        .base_url(server.uri())
        .interceptor(counter.clone())
        .build()
        .unwrap();
    let ctx = CancelHandle::new();

    let _: Widget = client.get(&ctx, "/v1/ok", &Params::new()).await.unwrap();
    let _ = client
        .get::<Widget>(&ctx, "/v1/error", &Params::new())
        .await
        .unwrap_err();

    assert_eq!(counter.before_send.load(Ordering::SeqCst), 2);
    assert_eq!(counter.responses.load(Ordering::SeqCst), 2);
    assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
}
