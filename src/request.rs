//! Chat request body: encoding and decoding.
//!
//! [`encode`] produces the body sent to `/ai/run/{model}`; [`decode_request`] turns a stored or
//! captured body back into a [`ChatCompletionRequest`], recovering each message's variant from
//! its `role` (see [`Message::from_value`]).

use crate::tools::ToolDefinition;
use crate::types::Message;
use crate::utils::{is_unset_f64, is_unset_u32, null_as_default};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling parameters flattened into the request body.
///
/// Unset and zero values are both left out of the body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelParameters {
    #[serde(default, skip_serializing_if = "is_unset_f64")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "is_unset_f64")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "is_unset_u32")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "is_unset_u32")]
    pub max_tokens: Option<u32>,
}

impl ModelParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The complete payload sent to the chat endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(flatten)]
    pub parameters: ModelParameters,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            parameters: ModelParameters::default(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_parameters(mut self, parameters: ModelParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Checks the model name and every message's invariants.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::invalid_input("model is required"));
        }
        for (index, message) in self.messages.iter().enumerate() {
            message.validate().map_err(|e| match e {
                Error::InvalidInput(msg) => Error::invalid_input(format!("message {index}: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }

    /// Validates and serializes the request body.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        Ok(serde_json::to_vec(self)?)
    }
}

/// Serializes a chat request body.
///
/// # Examples
///
/// ```rust
/// use workers_ai::{encode, Message, ModelParameters};
///
/// let body = encode(
///     "@cf/meta/llama-3-8b-instruct",
///     &[Message::system("Be brief."), Message::user("Hello")],
///     &[],
///     Some(&ModelParameters::new().with_max_tokens(64)),
/// )?;
///
/// let json: serde_json::Value = serde_json::from_slice(&body)?;
/// assert_eq!(json["max_tokens"], 64);
/// assert!(json.get("tools").is_none());
/// # Ok::<(), workers_ai::Error>(())
/// ```
pub fn encode(
    model: &str,
    messages: &[Message],
    tools: &[ToolDefinition],
    params: Option<&ModelParameters>,
) -> Result<Vec<u8>> {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: messages.to_vec(),
        tools: tools.to_vec(),
        parameters: params.copied().unwrap_or_default(),
    }
    .to_bytes()
}

/// Wire shape of a request with messages left unparsed
#[derive(Deserialize)]
struct RequestShell {
    #[serde(default, deserialize_with = "null_as_default")]
    model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    messages: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    tools: Vec<ToolDefinition>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    top_p: Option<f64>,
    #[serde(default)]
    top_k: Option<u32>,
    #[serde(default)]
    max_tokens: Option<u32>,
}

/// Decodes a chat request body, rebuilding each message variant from its `role`.
///
/// Fails with [`Error::UnknownRole`] on the first message whose role is not one of
/// `system`, `user`, `assistant`, or `tool`.
pub fn decode_request(bytes: &[u8]) -> Result<ChatCompletionRequest> {
    let shell: RequestShell =
        serde_json::from_slice(bytes).map_err(|e| Error::decode("request", e))?;

    let messages = shell
        .messages
        .into_iter()
        .map(Message::from_value)
        .collect::<Result<Vec<_>>>()?;

    Ok(ChatCompletionRequest {
        model: shell.model,
        messages,
        tools: shell.tools,
        parameters: ModelParameters {
            temperature: shell.temperature,
            top_p: shell.top_p,
            top_k: shell.top_k,
            max_tokens: shell.max_tokens,
        },
    })
}
