//! OpenAiChatModel 在 wiremock 上的行为测试

use reqwest::Client;
use serde_json::json;
use skywise::error::{LlmError, SkywiseError};
use skywise::llm::types::Message;
use skywise::llm::{ChatModel, OpenAiChatModel};
use skywise::tools::WeatherTool;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model_for(server: &MockServer) -> OpenAiChatModel {
    OpenAiChatModel::new(
        Arc::new(Client::new()),
        "gpt-4o",
        format!("{}/v1/chat/completions", server.uri()),
        "sk-test",
    )
}

#[tokio::test]
async fn test_complete_returns_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o", "tool_choice": "auto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_current_weather",
                            "arguments": "{\"location\":\"Colombo\"}"
                        }
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = model_for(&server)
        .complete(
            vec![Message::user("Weather in Colombo?")],
            Some(WeatherTool::definitions()),
            Some("auto".to_string()),
        )
        .await
        .unwrap();

    let calls = message.requested_tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_1");
    assert_eq!(calls[0].function.name, "get_current_weather");
    assert!(message.content.is_none());
}

#[tokio::test]
async fn test_chat_simple_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Colombo, Kandy"}}]
        })))
        .mount(&server)
        .await;

    let text = model_for(&server)
        .chat_simple(vec![Message::user("I was in Colombo and Kandy")])
        .await
        .unwrap();
    assert_eq!(text, "Colombo, Kandy");
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = model_for(&server)
        .complete(vec![Message::user("hi")], None, None)
        .await
        .unwrap_err();
    match err {
        SkywiseError::Llm(LlmError::ApiError { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("意外的错误: {}", other),
    }
}

#[tokio::test]
async fn test_no_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = model_for(&server)
        .complete(vec![Message::user("hi")], None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SkywiseError::Llm(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = model_for(&server)
        .complete(vec![Message::user("hi")], None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SkywiseError::Llm(LlmError::InvalidResponse(_))));
}
