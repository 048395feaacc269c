//! Cancellation tests
//!
//! Cancelling the handle before or during a call must surface
//! `ClientError::Cancelled` promptly instead of hanging or retrying.

use std::time::{Duration, Instant};

use apiwrap::{ApiClient, CancelHandle, ClientError, Params};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn a_pre_cancelled_handle_never_touches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "",
            "data": {}
        })))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();

    let handle = CancelHandle::new();
    handle.cancel();

    let err = client
        .get::<serde_json::Value>(&handle, "/v1/widgets", &Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
}

#[tokio::test]
async fn cancelling_mid_flight_aborts_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 0, "message": "", "data": {}}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();

    let handle = CancelHandle::new();
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.cancel();
        });
    }

    let started = Instant::now();
    let err = client
        .get::<serde_json::Value>(&handle, "/v1/slow", &Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Cancelled));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "cancellation should not wait for the response"
    );
}
