//! Chat response decoding.
//!
//! The chat endpoint has returned three incompatible `result` shapes over time, and none of
//! them carries a version or format field:
//!
//! ```text
//! Standard  {"choices": [{"message": {"content": .., "tool_calls": [..]}}], "usage": {..}}
//! Hybrid    {"tool_calls": [{"id": "call_..", "function": {..}}], "usage": {..}}
//! Legacy    {"response": "..", "tool_calls": [{"name": .., "arguments": {..}}], "usage": {..}}
//! ```
//!
//! [`ChatResponse::decode`] runs a single linear pipeline over the raw bytes:
//!
//! ```text
//! bytes ──shell parse──▶ {success, errors, messages, result}
//!                              │
//!            result absent / null / {} ──▶ Legacy (default payload)
//!                              │
//!                         classify(result)
//!              ┌───────────────┼────────────────┐
//!          Standard          Hybrid           Legacy
//! ```
//!
//! Classification is structural and ordered, first match wins:
//!
//! 1. `choices` is present and not null (even when empty) → [`ResponseFormat::Standard`]
//! 2. `tool_calls` is non-empty and its first entry has a non-empty string `id`
//!    → [`ResponseFormat::Hybrid`]
//! 3. anything else → [`ResponseFormat::Legacy`]
//!
//! Hybrid and legacy tool calls look alike (both lack `choices`); only legacy calls come
//! without IDs, which is why the ID check decides between them. Once a branch is chosen, a field
//! of the wrong type is reported as [`Error::Decode`] for that shape and never retried as
//! another shape. Unknown fields are ignored at every level.
//!
//! Callers read the result through format-independent accessors: [`ChatResponse::content`],
//! [`ChatResponse::reasoning_content`], [`ChatResponse::tool_calls`] and
//! [`ChatResponse::usage`].

use crate::types::{ToolCall, Usage};
use crate::utils::{error_list, null_as_default, text_or_json};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Which wire shape a response was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `result` carried a `choices` array
    Standard,
    /// `result` carried ID-bearing `tool_calls` but no `choices`
    Hybrid,
    /// The oldest shape with a flat `response` field; also the fallback
    Legacy,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Standard => "standard",
            ResponseFormat::Hybrid => "hybrid",
            ResponseFormat::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The standard, OpenAI-style completion object
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChatCompletion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: Usage,
}

/// One completion candidate
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Choice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: ResponseMessage,
    /// e.g. `"stop"` or `"tool_calls"`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a [`Choice`]
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResponseMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    /// `None` when the model answered only with tool calls or only with reasoning
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ToolCall>,
}

/// The legacy `result` shape
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LegacyResult {
    /// Generated text. A non-string wire value is kept as its compact JSON text, so an explicit
    /// `null` reads as the literal `"null"`; callers have come to rely on that.
    #[serde(default, deserialize_with = "text_or_json")]
    pub response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<LegacyToolCall>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: Usage,
}

/// A legacy tool call: no ID, and arguments as raw JSON rather than a string
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LegacyToolCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Uninterpreted JSON: usually an object, sometimes a string or other scalar
    #[serde(default)]
    pub arguments: Value,
}

impl LegacyToolCall {
    /// Adapts this call to the canonical shape.
    ///
    /// The ID is synthesized from the call's position. The result is always valid JSON text:
    /// a string holding encoded JSON is passed through, any other value (including a plain
    /// string) is serialized compactly, and missing or null arguments become `"{}"`.
    pub fn to_tool_call(&self, index: usize) -> ToolCall {
        let arguments = match &self.arguments {
            Value::Null => "{}".to_string(),
            Value::String(text) if serde_json::from_str::<Value>(text).is_ok() => text.clone(),
            other => other.to_string(),
        };
        ToolCall::new(format!("legacy-tool-call-{index}"), &self.name, arguments)
    }
}

/// The decoded `result` payload; exactly one shape is ever populated
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    Standard(ChatCompletion),
    /// Synthesized into the standard shape with a single assistant choice
    Hybrid(ChatCompletion),
    Legacy(LegacyResult),
}

impl Default for ResultPayload {
    fn default() -> Self {
        ResultPayload::Legacy(LegacyResult::default())
    }
}

/// A chat response normalized from whichever wire format the service used
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub success: bool,
    pub errors: Vec<String>,
    /// Informational messages from the service envelope, kept as-is
    pub messages: Vec<Value>,
    pub result: ResultPayload,
}

/// The response envelope with `result` left undecoded
#[derive(Deserialize)]
struct ResponseShell {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(default, deserialize_with = "error_list")]
    errors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    messages: Vec<Value>,
    #[serde(default)]
    result: Option<Value>,
}

/// The fields of a hybrid `result` that are carried over
#[derive(Deserialize)]
struct HybridResult {
    tool_calls: Vec<ToolCall>,
    #[serde(default, deserialize_with = "null_as_default")]
    usage: Usage,
}

/// Decides which shape a `result` object has. Total: every value maps to exactly one format.
pub fn classify(result: &Value) -> ResponseFormat {
    if result.get("choices").is_some_and(|choices| !choices.is_null()) {
        return ResponseFormat::Standard;
    }

    let first_id = result
        .get("tool_calls")
        .and_then(Value::as_array)
        .and_then(|calls| calls.first())
        .and_then(|call| call.get("id"))
        .and_then(Value::as_str);
    if first_id.is_some_and(|id| !id.is_empty()) {
        return ResponseFormat::Hybrid;
    }

    ResponseFormat::Legacy
}

fn is_empty_result(result: &Value) -> bool {
    match result {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

fn decode_payload(result: Value) -> Result<ResultPayload> {
    let format = classify(&result);
    let shape_err = |e: serde_json::Error| Error::decode(format.as_str(), e);

    match format {
        ResponseFormat::Standard => serde_json::from_value(result)
            .map(ResultPayload::Standard)
            .map_err(shape_err),
        ResponseFormat::Hybrid => {
            let hybrid: HybridResult = serde_json::from_value(result).map_err(shape_err)?;
            Ok(ResultPayload::Hybrid(ChatCompletion {
                choices: vec![Choice {
                    index: 0,
                    message: ResponseMessage {
                        role: "assistant".to_string(),
                        tool_calls: hybrid.tool_calls,
                        ..ResponseMessage::default()
                    },
                    finish_reason: None,
                }],
                usage: hybrid.usage,
                ..ChatCompletion::default()
            }))
        }
        ResponseFormat::Legacy => serde_json::from_value(result)
            .map(ResultPayload::Legacy)
            .map_err(shape_err),
    }
}

impl ChatResponse {
    /// Decodes a raw response body.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedTopLevel`] if the body is not a JSON response envelope
    /// - [`Error::Decode`] if the detected shape holds a field of the wrong type
    ///
    /// # Examples
    ///
    /// ```rust
    /// use workers_ai::{ChatResponse, ResponseFormat};
    ///
    /// let response = ChatResponse::decode(br#"{
    ///     "success": true,
    ///     "result": {"tool_calls": [{"name": "gablorken", "arguments": {"Value": 2}}]}
    /// }"#)?;
    ///
    /// assert_eq!(response.format(), ResponseFormat::Legacy);
    /// let calls = response.tool_calls();
    /// assert_eq!(calls[0].id, "legacy-tool-call-0");
    /// assert_eq!(calls[0].arguments(), r#"{"Value":2}"#);
    /// # Ok::<(), workers_ai::Error>(())
    /// ```
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let shell: ResponseShell =
            serde_json::from_slice(bytes).map_err(Error::MalformedTopLevel)?;

        let result = match shell.result {
            Some(result) if !is_empty_result(&result) => decode_payload(result)?,
            _ => ResultPayload::default(),
        };

        let response = ChatResponse {
            success: shell.success,
            errors: shell.errors,
            messages: shell.messages,
            result,
        };
        log::debug!("Decoded {} format chat response", response.format());
        Ok(response)
    }

    /// The detected wire format
    pub fn format(&self) -> ResponseFormat {
        match self.result {
            ResultPayload::Standard(_) => ResponseFormat::Standard,
            ResultPayload::Hybrid(_) => ResponseFormat::Hybrid,
            ResultPayload::Legacy(_) => ResponseFormat::Legacy,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.format() == ResponseFormat::Legacy
    }

    /// The standard-shaped completion for standard and hybrid responses
    pub fn completion(&self) -> Option<&ChatCompletion> {
        match &self.result {
            ResultPayload::Standard(completion) | ResultPayload::Hybrid(completion) => {
                Some(completion)
            }
            ResultPayload::Legacy(_) => None,
        }
    }

    /// The legacy payload, if that is what the service sent
    pub fn legacy(&self) -> Option<&LegacyResult> {
        match &self.result {
            ResultPayload::Legacy(legacy) => Some(legacy),
            _ => None,
        }
    }

    fn first_message(&self) -> Option<&ResponseMessage> {
        self.completion()
            .and_then(|completion| completion.choices.first())
            .map(|choice| &choice.message)
    }

    /// The generated text.
    ///
    /// Standard and hybrid responses yield the first choice's content, falling back to its
    /// reasoning content when the content is null. Legacy responses yield the `response` field,
    /// which reads `"null"` when the service sent an explicit JSON null.
    pub fn content(&self) -> &str {
        if let Some(legacy) = self.legacy() {
            return &legacy.response;
        }
        self.first_message()
            .and_then(|msg| msg.content.as_deref().or(msg.reasoning_content.as_deref()))
            .unwrap_or_default()
    }

    /// Reasoning text of the first choice; always empty for legacy responses.
    pub fn reasoning_content(&self) -> &str {
        self.first_message()
            .and_then(|msg| msg.reasoning_content.as_deref())
            .unwrap_or_default()
    }

    /// Tool calls requested by the model, with string-encoded arguments.
    ///
    /// Borrowed for standard and hybrid responses; legacy calls are adapted on each call
    /// (see [`LegacyToolCall::to_tool_call`]).
    pub fn tool_calls(&self) -> Cow<'_, [ToolCall]> {
        match &self.result {
            ResultPayload::Legacy(legacy) => Cow::Owned(
                legacy
                    .tool_calls
                    .iter()
                    .enumerate()
                    .map(|(index, call)| call.to_tool_call(index))
                    .collect(),
            ),
            _ => match self.first_message() {
                Some(msg) => Cow::Borrowed(msg.tool_calls.as_slice()),
                None => Cow::Borrowed(&[]),
            },
        }
    }

    /// `finish_reason` of the first choice; `None` for legacy and hybrid responses
    pub fn finish_reason(&self) -> Option<&str> {
        self.completion()
            .and_then(|completion| completion.choices.first())
            .and_then(|choice| choice.finish_reason.as_deref())
    }

    /// Token usage reported by the service
    pub fn usage(&self) -> &Usage {
        match &self.result {
            ResultPayload::Standard(completion) | ResultPayload::Hybrid(completion) => {
                &completion.usage
            }
            ResultPayload::Legacy(legacy) => &legacy.usage,
        }
    }
}
