/*!
 * Tests for provider request/response handling
 */

use serde_json::json;
use vttclean::providers::Provider;
use vttclean::providers::azure_openai::{AzureOpenAi, ChatRequest, ChatResponse};
use crate::common::mock_providers::{MockProvider, MockRequest};

/// Test the chat request serializes messages and skips unset options
#[test]
fn test_chat_request_withDefaults_shouldSkipUnsetFields() {
    let request = ChatRequest::new()
        .add_message("system", "be brief")
        .add_message("user", "hello");

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["messages"][0]["role"], "system");
    assert_eq!(value["messages"][1]["content"], "hello");
    assert!(value.get("temperature").is_none());
    assert!(value.get("max_tokens").is_none());
}

/// Test the chat request carries options when set
#[test]
fn test_chat_request_withOptions_shouldSerializeThem() {
    let request = ChatRequest::new()
        .add_message("user", "hello")
        .temperature(0.3)
        .max_tokens(256);

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["temperature"], json!(0.3));
    assert_eq!(value["max_tokens"], json!(256));
}

/// Test response deserialization and text extraction
#[test]
fn test_chat_response_withChoicesAndUsage_shouldDeserialize() {
    let body = r#"{
        "choices": [
            { "message": { "role": "assistant", "content": "[STATEMENT 0]\ncleaned" } }
        ],
        "usage": { "prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19 }
    }"#;

    let response: ChatResponse = serde_json::from_str(body).unwrap();

    assert_eq!(AzureOpenAi::extract_text_from_response(&response), "[STATEMENT 0]\ncleaned");
    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.completion_tokens, 7);
    assert_eq!(usage.total_tokens, 19);
}

/// Test response deserialization tolerates a missing usage block
#[test]
fn test_chat_response_withoutUsage_shouldDeserialize() {
    let body = r#"{ "choices": [ { "message": { "role": "assistant", "content": "ok" } } ] }"#;

    let response: ChatResponse = serde_json::from_str(body).unwrap();

    assert!(response.usage.is_none());
    assert_eq!(AzureOpenAi::extract_text_from_response(&response), "ok");
}

/// Test the working mock echoes statements under the same markers
#[tokio::test]
async fn test_mock_provider_working_shouldEchoStatements() {
    let provider = MockProvider::working();
    let request = MockRequest {
        prompt: "instructions\n\n[STATEMENT 0]\nSpeaker: Alice\num hello\n\n[STATEMENT 1]\nSpeaker: Bob\nok then".to_string(),
    };

    let response = provider.complete(request).await.unwrap();
    let text = MockProvider::extract_text(&response);

    assert!(text.contains("[STATEMENT 0]"));
    assert!(text.contains("[STATEMENT 1]"));
    assert!(text.contains("[CLEANED] um hello"));
    assert!(text.contains("[CLEANED] ok then"));
    assert_eq!(provider.request_count(), 1);
}

/// Test the short mock drops trailing statements
#[tokio::test]
async fn test_mock_provider_short_shouldDropTrailingStatements() {
    let provider = MockProvider::short(1);
    let request = MockRequest {
        prompt: "[STATEMENT 0]\nSpeaker: A\nfirst\n\n[STATEMENT 1]\nSpeaker: B\nsecond".to_string(),
    };

    let response = provider.complete(request).await.unwrap();
    let text = MockProvider::extract_text(&response);

    assert!(text.contains("[STATEMENT 0]"));
    assert!(!text.contains("[STATEMENT 1]"));
}

/// Test the extra mock appends invented trailing statements
#[tokio::test]
async fn test_mock_provider_extra_shouldAppendInventedStatements() {
    let provider = MockProvider::extra(2);
    let request = MockRequest {
        prompt: "[STATEMENT 0]\nSpeaker: A\nonly one".to_string(),
    };

    let response = provider.complete(request).await.unwrap();
    let text = MockProvider::extract_text(&response);

    assert!(text.contains("[STATEMENT 0]"));
    assert!(text.contains("[STATEMENT 1]"));
    assert!(text.contains("[STATEMENT 2]"));
    assert!(text.contains("made-up statement"));
}

/// Test the empty mock returns an empty response body
#[tokio::test]
async fn test_mock_provider_empty_shouldReturnEmptyText() {
    let provider = MockProvider::empty();
    let request = MockRequest { prompt: "[STATEMENT 0]\nSpeaker: A\nhello".to_string() };

    let response = provider.complete(request).await.unwrap();
    assert!(MockProvider::extract_text(&response).is_empty());
}

/// Test the failing mock errors on completion and connection test
#[tokio::test]
async fn test_mock_provider_failing_shouldError() {
    let provider = MockProvider::failing();
    let request = MockRequest { prompt: "[STATEMENT 0]\nx".to_string() };

    assert!(provider.complete(request).await.is_err());
    assert!(provider.test_connection().await.is_err());
    assert_eq!(provider.request_count(), 0);
}

/// Test a custom response generator overrides the canned behaviors
#[tokio::test]
async fn test_mock_provider_withCustomResponse_shouldUseGenerator() {
    let provider = MockProvider::working()
        .with_custom_response(|_| "[STATEMENT 0]\ncustom".to_string());
    let request = MockRequest { prompt: "[STATEMENT 0]\nSpeaker: A\nanything".to_string() };

    let response = provider.complete(request).await.unwrap();
    assert_eq!(MockProvider::extract_text(&response), "[STATEMENT 0]\ncustom");
}
