//! Tests for debug logging
//!
//! Logging goes through the `log` facade; these tests install `env_logger` at debug level and
//! check that the logged code paths behave the same with the debug flag on and off.

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};
use workers_ai::{ChatResponse, Client, ClientConfig, Message, ResponseFormat};

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

async fn chat_against_mock(debug: bool) -> ChatResponse {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"response": "logged"}
        })))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .account_id("acct")
        .api_token("secret-token")
        .base_url(server.uri())
        .debug(debug)
        .build()
        .unwrap();

    Client::new(config)
        .unwrap()
        .chat("test-model", &[Message::user("Hello")], None)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_chat_with_debug_bodies_enabled() {
    init_logger();

    let response = chat_against_mock(true).await;
    assert_eq!(response.content(), "logged");
}

#[tokio::test]
async fn test_chat_with_debug_bodies_disabled() {
    init_logger();

    let response = chat_against_mock(false).await;
    assert_eq!(response.content(), "logged");
}

#[test]
fn test_decode_logs_detected_format() {
    init_logger();

    // Each decode emits one debug record naming the format
    for (body, expected) in [
        (r#"{"result":{"choices":[]}}"#, ResponseFormat::Standard),
        (
            r#"{"result":{"tool_calls":[{"id":"c","function":{"name":"f","arguments":"{}"}}]}}"#,
            ResponseFormat::Hybrid,
        ),
        (r#"{"result":{"response":"x"}}"#, ResponseFormat::Legacy),
    ] {
        let response = ChatResponse::decode(body.as_bytes()).unwrap();
        assert_eq!(response.format(), expected);
    }
}

#[test]
fn test_config_debug_output_masks_token() {
    let config = ClientConfig::builder()
        .account_id("acct")
        .api_token("secret-token")
        .debug(true)
        .build()
        .unwrap();

    let printed = format!("{config:?}");
    assert!(!printed.contains("secret-token"));
    assert!(printed.contains("debug: true"));
}
