//! HTTP completion client tests

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::services::completion::HttpCompletionClient;
use crate::traits::CompletionClient;
use shared::CompletionFailure;

fn client_for(server: &MockServer) -> HttpCompletionClient {
    HttpCompletionClient::with_endpoint(
        format!("{}/v1/chat/completions", server.uri()),
        "test-model",
        "test-key",
    )
}

#[tokio::test]
async fn test_successful_completion_extracts_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "test-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  Bold counterpoint here  " } }
            ],
            "usage": { "total_tokens": 42 }
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete("system", "user", 120, 0.95)
        .await
        .unwrap();
    assert_eq!(reply, "Bold counterpoint here");
}

#[tokio::test]
async fn test_rate_limit_maps_to_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = client_for(&server).complete("s", "u", 120, 0.95).await;
    assert_eq!(result.unwrap_err(), CompletionFailure::RateLimitExceeded);
}

#[tokio::test]
async fn test_server_error_maps_to_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client_for(&server).complete("s", "u", 120, 0.95).await;
    assert!(matches!(result, Err(CompletionFailure::ServerError(_))));
}

#[tokio::test]
async fn test_missing_content_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).complete("s", "u", 120, 0.95).await;
    assert!(matches!(result, Err(CompletionFailure::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Nothing listens here
    let client =
        HttpCompletionClient::with_endpoint("http://127.0.0.1:1/v1/chat/completions", "m", "k");
    let result = client.complete("s", "u", 120, 0.95).await;
    assert!(matches!(result, Err(CompletionFailure::NetworkError(_))));
}
