use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use llamastack_async::{Client, StackConfig, StackError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let server = MockServer::start().await;
    let count = Arc::new(AtomicUsize::new(0));

    let count_clone = count.clone();
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(move |_req: &wiremock::Request| {
            let i = count_clone.fetch_add(1, Ordering::SeqCst);
            if i == 0 {
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "1")
                    .set_body_json(serde_json::json!({
                        "error": {
                            "message": "Rate limit exceeded",
                            "type": "rate_limit_error"
                        }
                    }))
            } else {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "data": [{"identifier": "meta-llama/Llama-3.2-3B-Instruct"}]
                }))
            }
        })
        .mount(&server)
        .await;

    let cfg = StackConfig::new().with_base_url(server.uri());
    let client = Client::with_config(cfg);

    let models = client.models().list().await.unwrap();
    assert_eq!(models.data.len(), 1);
    assert!(count.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_retry_on_503_then_success() {
    let server = MockServer::start().await;
    let count = Arc::new(AtomicUsize::new(0));

    let count_clone = count.clone();
    Mock::given(method("GET"))
        .and(path("/v1/shields"))
        .respond_with(move |_req: &wiremock::Request| {
            let i = count_clone.fetch_add(1, Ordering::SeqCst);
            if i == 0 {
                ResponseTemplate::new(503).set_body_string("upstream warming up")
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": []}))
            }
        })
        .mount(&server)
        .await;

    let cfg = StackConfig::new().with_base_url(server.uri());
    let client = Client::with_config(cfg);

    let shields = client.shields().list().await.unwrap();
    assert!(shields.data.is_empty());
    assert!(count.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_non_retryable_400() {
    let server = MockServer::start().await;
    let count = Arc::new(AtomicUsize::new(0));

    let count_clone = count.clone();
    Mock::given(method("GET"))
        .and(path("/v1/models/bogus"))
        .respond_with(move |_req: &wiremock::Request| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "message": "Invalid model id",
                    "type": "invalid_request_error"
                }
            }))
        })
        .mount(&server)
        .await;

    let cfg = StackConfig::new().with_base_url(server.uri());
    let client = Client::with_config(cfg);

    let err = client.models().get("bogus").await.unwrap_err();
    match err {
        StackError::Api(obj) => {
            assert_eq!(obj.status, 400);
            assert_eq!(obj.message, "Invalid model id");
            assert_eq!(obj.kind.as_deref(), Some("invalid_request_error"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
    assert_eq!(count.load(Ordering::SeqCst), 1, "400 must not be retried");
}
