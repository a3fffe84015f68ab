//! Core types for the Workers AI client
//!
//! Conversation history is a list of [`Message`] values. On the wire each message is a flat
//! object tagged only by its `role` string; there is no discriminator field telling a plain
//! assistant reply apart from an assistant tool request. [`Message`] is therefore a sum type
//! whose variant is recovered from `role` plus, for `assistant`, whether a non-empty
//! `tool_calls` array is present:
//!
//! | `role`      | `tool_calls`   | Variant                    |
//! |-------------|----------------|----------------------------|
//! | `system`    | any            | [`Message::Chat`]          |
//! | `user`      | any            | [`Message::Chat`]          |
//! | `assistant` | non-empty      | [`Message::ToolCalls`]     |
//! | `assistant` | absent / empty | [`Message::Chat`]          |
//! | `tool`      | any            | [`Message::ToolResult`]    |
//! | other       | any            | [`Error::UnknownRole`]     |

use crate::utils::null_as_default;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Role of a plain chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A plain system, user, or assistant turn.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    /// Only set on an assistant turn that replays an earlier tool request for context.
    /// Such a turn is sent without `content` and decodes back as [`Message::ToolCalls`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ToolCall>,
}

/// An assistant turn that requested tool calls. Never carries content.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolCallMessage {
    pub tool_calls: Vec<ToolCall>,
}

/// The result of a tool call, sent back to the model with role `tool`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolResultMessage {
    /// ID of the [`ToolCall`] this result answers, as issued by the service
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_call_id: String,

    /// The tool's return value, serialized
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Chat(ChatMessage),
    ToolCalls(ToolCallMessage),
    ToolResult(ToolResultMessage),
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self::chat(ChatRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::chat(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::chat(ChatRole::Assistant, text)
    }

    pub fn chat(role: ChatRole, text: impl Into<String>) -> Self {
        Message::Chat(ChatMessage {
            role,
            content: text.into(),
            tool_calls: Vec::new(),
        })
    }

    /// Replays an assistant tool request, e.g. the calls returned by
    /// [`ChatResponse::tool_calls`](crate::ChatResponse::tool_calls).
    pub fn tool_calls(calls: impl Into<Vec<ToolCall>>) -> Self {
        Message::ToolCalls(ToolCallMessage {
            tool_calls: calls.into(),
        })
    }

    /// Answers the tool call with the given ID.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::ToolResult(ToolResultMessage {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        })
    }

    /// The wire `role` of this message
    pub fn role(&self) -> &'static str {
        match self {
            Message::Chat(msg) => msg.role.as_str(),
            Message::ToolCalls(_) => "assistant",
            Message::ToolResult(_) => "tool",
        }
    }

    /// Checks the invariants the service schema enforces before a message is sent.
    pub fn validate(&self) -> Result<()> {
        match self {
            Message::Chat(msg) if !msg.tool_calls.is_empty() => {
                if msg.role != ChatRole::Assistant {
                    return Err(Error::invalid_input(format!(
                        "only assistant turns may carry tool_calls, found role {}",
                        msg.role.as_str()
                    )));
                }
                if !msg.content.is_empty() {
                    return Err(Error::invalid_input(
                        "assistant turn cannot carry both content and tool_calls",
                    ));
                }
                Ok(())
            }
            Message::Chat(_) => Ok(()),
            Message::ToolCalls(msg) if msg.tool_calls.is_empty() => Err(Error::invalid_input(
                "assistant tool-call turn needs at least one tool call",
            )),
            Message::ToolCalls(_) => Ok(()),
            Message::ToolResult(msg) if msg.tool_call_id.is_empty() => Err(
                Error::invalid_input("tool result must reference a tool_call_id"),
            ),
            Message::ToolResult(_) => Ok(()),
        }
    }

    /// Rebuilds a message from its wire object by probing `role` and `tool_calls`.
    pub fn from_value(value: Value) -> Result<Self> {
        let role = match value.get("role") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(role)) => role.clone(),
            Some(other) => other.to_string(),
        };

        match role.as_str() {
            "system" | "user" => decode_message(value).map(Message::Chat),
            "assistant" => {
                let has_tool_calls = value
                    .get("tool_calls")
                    .and_then(Value::as_array)
                    .is_some_and(|calls| !calls.is_empty());
                if has_tool_calls {
                    decode_message(value).map(Message::ToolCalls)
                } else {
                    decode_message(value).map(Message::Chat)
                }
            }
            "tool" => decode_message(value).map(Message::ToolResult),
            _ => Err(Error::UnknownRole(role)),
        }
    }
}

fn decode_message<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::decode("message", e))
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("role", self.role())?;
        match self {
            Message::Chat(msg) => {
                // The service rejects assistant turns that carry both
                if msg.tool_calls.is_empty() || !msg.content.is_empty() {
                    map.serialize_entry("content", &msg.content)?;
                }
                if !msg.tool_calls.is_empty() {
                    map.serialize_entry("tool_calls", &msg.tool_calls)?;
                }
            }
            Message::ToolCalls(msg) => {
                map.serialize_entry("tool_calls", &msg.tool_calls)?;
            }
            Message::ToolResult(msg) => {
                map.serialize_entry("content", &msg.content)?;
                map.serialize_entry("tool_call_id", &msg.tool_call_id)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Message::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// A tool invocation requested by the model.
///
/// `arguments` is always a string holding serialized JSON, whichever response format the
/// call came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    /// Service-assigned ID; `legacy-tool-call-<index>` for calls adapted from the legacy format
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,

    /// Empty when the service sent a partial call
    #[serde(default, deserialize_with = "null_as_default")]
    pub function: FunctionCall,
}

/// Name and string-encoded arguments of a [`ToolCall`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_type: function_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn arguments(&self) -> &str {
        &self.function.arguments
    }

    /// Deserializes the string-encoded arguments into `T`.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.function.arguments)?)
    }
}

/// Token usage for one request
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: u64,
}
