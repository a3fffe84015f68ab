//! Request encoding and decoding
//!
//! A conversation history must survive encode → decode unchanged, since callers persist and
//! replay histories that contain tool requests and tool results.

use serde_json::{Value, json};
use workers_ai::{
    ChatCompletionRequest, Error, Message, ModelParameters, Parameter, ToolCall, decode_request,
    encode, models, tool,
};

fn weather_tool() -> workers_ai::ToolDefinition {
    tool("get_weather", "Get the current weather in a given location")
        .param_with(
            "location",
            Parameter::new("string").with_description("The city and country, e.g. Eindhoven, NL"),
        )
        .optional_param_with(
            "unit",
            Parameter::new("string").with_enum(["celsius", "fahrenheit"]),
        )
        .build()
}

fn agent_history() -> Vec<Message> {
    vec![
        Message::system("You are a helpful assistant."),
        Message::user("What is the weather in Eindhoven?"),
        Message::tool_calls(vec![ToolCall::new(
            "call_abc123",
            "get_weather",
            r#"{"location":"Eindhoven, NL"}"#,
        )]),
        Message::tool_result("call_abc123", r#"{"temperature":18,"unit":"celsius"}"#),
        Message::assistant("It is 18 degrees in Eindhoven."),
        Message::user("And tomorrow?"),
    ]
}

#[test]
fn test_agent_history_round_trips() {
    let messages = agent_history();
    let tools = vec![weather_tool()];
    let params = ModelParameters::new()
        .with_temperature(0.7)
        .with_top_p(0.9)
        .with_top_k(40)
        .with_max_tokens(512);

    let body = encode(models::LLAMA_4_SCOUT_17B, &messages, &tools, Some(&params)).unwrap();
    let decoded = decode_request(&body).unwrap();

    assert_eq!(decoded.model, models::LLAMA_4_SCOUT_17B);
    assert_eq!(decoded.messages, messages);
    assert_eq!(decoded.tools, tools);
    assert_eq!(decoded.parameters, params);
}

#[test]
fn test_wire_shape_of_each_message_kind() {
    let body = encode("@cf/test-model", &agent_history(), &[], None).unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    let messages = json["messages"].as_array().unwrap();

    assert_eq!(
        messages[0],
        json!({"role": "system", "content": "You are a helpful assistant."})
    );
    assert_eq!(
        messages[2],
        json!({
            "role": "assistant",
            "tool_calls": [{
                "id": "call_abc123",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"location\":\"Eindhoven, NL\"}"}
            }]
        })
    );
    assert_eq!(
        messages[3],
        json!({
            "role": "tool",
            "tool_call_id": "call_abc123",
            "content": "{\"temperature\":18,\"unit\":\"celsius\"}"
        })
    );
    assert!(json.get("tools").is_none());
    assert!(json.get("temperature").is_none());
}

#[test]
fn test_decode_then_encode_is_stable() {
    let body = br#"{
        "model": "test-model",
        "messages": [
            {"role": "user", "content": "What is the weather in Eindhoven?"},
            {"role": "assistant", "content": "", "tool_calls": [
                {"id": "tool-abc", "type": "function", "function": {"name": "get_weather", "arguments": "{}"}}
            ]},
            {"role": "tool", "tool_call_id": "tool-abc", "content": "sunny"},
            {"role": "assistant", "content": "It is sunny.", "tool_calls": []}
        ],
        "max_tokens": 10
    }"#;

    let first = decode_request(body).unwrap();
    assert!(matches!(first.messages[1], Message::ToolCalls(_)));
    assert!(matches!(first.messages[3], Message::Chat(_)));

    let reencoded = serde_json::to_vec(&first).unwrap();
    let second = decode_request(&reencoded).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_roles_are_rejected() {
    for role in ["developer", "function", "SYSTEM"] {
        let body = format!(
            r#"{{"model":"m","messages":[{{"role":"{role}","content":"hi"}}]}}"#
        );
        let err = decode_request(body.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), format!("unknown message role found: {role}"));
    }
}

#[test]
fn test_malformed_message_element() {
    let err = decode_request(
        br#"{"model":"m","messages":[{"role":"tool","tool_call_id":7,"content":"x"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Decode { shape: "message", .. }));
}

#[test]
fn test_message_deserializes_through_serde() {
    let message: Message =
        serde_json::from_value(json!({"role": "tool", "tool_call_id": "c1", "content": "42"}))
            .unwrap();
    assert_eq!(message, Message::tool_result("c1", "42"));

    let err = serde_json::from_value::<Message>(json!({"role": "robot"})).unwrap_err();
    assert!(err.to_string().contains("unknown message role found: robot"));
}

#[test]
fn test_invalid_messages_are_not_encoded() {
    let empty_calls = encode("m", &[Message::tool_calls(Vec::<ToolCall>::new())], &[], None);
    assert!(matches!(empty_calls, Err(Error::InvalidInput(_))));

    let request = ChatCompletionRequest::new("  ", vec![Message::user("hi")]);
    assert!(matches!(request.to_bytes(), Err(Error::InvalidInput(_))));
}
