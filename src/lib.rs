//! # Workers AI - Rust Client
//!
//! A typed client for the Cloudflare Workers AI chat API, built around a wire codec that copes
//! with every response shape the service has used.
//!
//! ## Overview
//!
//! The chat endpoint has answered with three different `result` layouts over time:
//!
//! - **Standard**: an OpenAI-style `choices` array
//! - **Hybrid**: top-level `tool_calls` carrying service-assigned IDs
//! - **Legacy**: a flat `response` string and ID-less tool calls with object arguments
//!
//! [`ChatResponse::decode`] detects the layout structurally and exposes one normalized view, so
//! callers never branch on the format themselves.
//!
//! ## Key Features
//!
//! - **Typed conversations**: [`Message`] separates plain turns, tool-call turns, and tool
//!   results, and invalid combinations are rejected before anything is sent
//! - **Lossless requests**: [`encode`] and [`decode_request`] round-trip a conversation history
//! - **Tool catalog builder**: [`tool()`] with type-alias normalization
//! - **Async HTTP client**: [`Client`] on Tokio and reqwest, with one request per call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use workers_ai::{models, tool, Client, Message, ModelParameters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env()?;
//!
//!     let weather = tool("get_weather", "Get the current weather in a given location")
//!         .param("location", "string")
//!         .build();
//!
//!     let messages = vec![
//!         Message::system("You are a helpful assistant."),
//!         Message::user("What is the weather in Eindhoven?"),
//!     ];
//!
//!     let response = client
//!         .chat_with_tools(
//!             models::LLAMA_4_SCOUT_17B,
//!             &messages,
//!             &[weather],
//!             Some(&ModelParameters::new().with_max_tokens(256)),
//!         )
//!         .await?;
//!
//!     for call in response.tool_calls().iter() {
//!         println!("{} wants {}({})", call.id, call.name(), call.arguments());
//!     }
//!     println!("{}", response.content());
//!     Ok(())
//! }
//! ```
//!
//! ## Without the HTTP client
//!
//! The codec works on bytes and needs no runtime:
//!
//! ```rust
//! use workers_ai::{ChatResponse, ResponseFormat};
//!
//! let response = ChatResponse::decode(
//!     br#"{"result":{"choices":[{"message":{"role":"assistant","content":"Hello there!"}}]}}"#,
//! )?;
//!
//! assert_eq!(response.format(), ResponseFormat::Standard);
//! assert_eq!(response.content(), "Hello there!");
//! # Ok::<(), workers_ai::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade at debug level: request URLs, response status, and
//! the detected response format. Request and response bodies are logged only when
//! [`ClientConfig::debug`] is set. Install any `log` backend (e.g. `env_logger`) to see them.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

/// HTTP client for the run, model info, and model catalog endpoints.
mod client;

/// Client configuration builder and environment variable helpers.
mod config;

/// Error enum and `Result<T>` alias used across all public APIs.
mod error;

/// Request body encoding and decoding.
mod request;

/// Response format detection and decoding into a normalized view.
mod response;

/// Tool catalog types and the fluent tool builder.
mod tools;

/// Conversation messages, tool calls, and token usage.
mod types;

/// Serde helpers for the service's loosely typed JSON.
mod utils;

// ============================================================================
// PUBLIC EXPORTS
// ============================================================================

/// Model name constants and catalog metadata.
pub mod models;

// --- Client ---

pub use client::Client;

// --- Configuration ---

pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODELS_URL, get_base_url,
};

// --- Error Handling ---

pub use error::{Error, Result};

// --- Request Codec ---

pub use request::{ChatCompletionRequest, ModelParameters, decode_request, encode};

// --- Response Codec ---

pub use response::{
    ChatCompletion, ChatResponse, Choice, LegacyResult, LegacyToolCall, ResponseFormat,
    ResponseMessage, ResultPayload, classify,
};

// --- Tool Catalog ---

pub use tools::{FunctionDefinition, FunctionParameters, Parameter, ToolBuilder, ToolDefinition, tool};

// --- Core Types ---

pub use types::{
    ChatMessage, ChatRole, FunctionCall, Message, ToolCall, ToolCallMessage, ToolResultMessage,
    Usage,
};

pub use models::ModelInfo;

// ============================================================================
// CONVENIENCE PRELUDE
// ============================================================================

/// Convenience module containing the most commonly used types and functions.
/// Import with `use workers_ai::prelude::*;`.
pub mod prelude {
    pub use crate::{
        ChatResponse, Client, ClientConfig, Error, Message, ModelParameters, ResponseFormat,
        Result, ToolCall, ToolDefinition, Usage, models, tool,
    };
}
