//! HTTP client for the Workers AI REST API
//!
//! The client is a thin layer over [`encode`](crate::encode) and
//! [`ChatResponse::decode`]: it builds the run URL, sends one request, checks the status, and
//! hands the body to the decoder. There is no retry, streaming, or caching.
//!
//! ## Request Flow
//!
//! ```text
//! chat_with_tools(model, messages, tools, params)
//!     │
//!     ├─> encode() validates and serializes the body
//!     │
//!     ├─> POST {base_url}/accounts/{account_id}/ai/run/@cf/{model}
//!     │
//!     ├─> non-2xx status ──> Error::Api("API returned status <code>: <body>")
//!     │
//!     └─> ChatResponse::decode(body)
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use workers_ai::{models, Client, ClientConfig, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(
//!         ClientConfig::builder()
//!             .account_id("your-account-id")
//!             .api_token("your-api-token")
//!             .build()?,
//!     )?;
//!
//!     let response = client
//!         .chat(models::LLAMA_3_8B, &[Message::user("What is Rust?")], None)
//!         .await?;
//!
//!     println!("{}", response.content());
//!     Ok(())
//! }
//! ```

use crate::config::ClientConfig;
use crate::models::{ModelInfo, ModelsResponse, catalog_entries, run_path};
use crate::request::{ModelParameters, encode};
use crate::response::ChatResponse;
use crate::tools::ToolDefinition;
use crate::types::Message;
use crate::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Workers AI client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,

    /// Built once with the configured timeout and reused for every request
    http_client: reqwest::Client,
}

impl Client {
    /// Creates a client from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Creates a client from `CLOUDFLARE_ACCOUNT_ID`, `CLOUDFLARE_AUTH_TOKEN` and friends.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the run endpoint for a model
    pub fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.config.base_url,
            self.config.account_id,
            run_path(model)
        )
    }

    /// Sends a chat conversation without tools.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        params: Option<&ModelParameters>,
    ) -> Result<ChatResponse> {
        self.chat_with_tools(model, messages, &[], params).await
    }

    /// Sends a chat conversation with a tool catalog.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if the model name or a message is invalid
    /// - [`Error::Http`] on connection failures and timeouts
    /// - [`Error::Api`] if the service answers with a non-2xx status
    /// - [`Error::MalformedTopLevel`] or [`Error::Decode`] if the body cannot be decoded
    pub async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        params: Option<&ModelParameters>,
    ) -> Result<ChatResponse> {
        let body = encode(model, messages, tools, params)?;
        let url = self.run_url(model);

        log::debug!(
            "POST {} ({} messages, {} tools)",
            url,
            messages.len(),
            tools.len()
        );
        if self.config.debug {
            log::debug!("Request body: {}", String::from_utf8_lossy(&body));
        }

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(Error::Http)?;

        let bytes = self.read_success_body(response).await?;
        ChatResponse::decode(&bytes)
    }

    /// Fetches metadata for one model from the account's model endpoint.
    ///
    /// Accepts either a bare model object or one wrapped in the usual `{"result": ..}` envelope.
    pub async fn get_model_info(&self, model: &str) -> Result<ModelInfo> {
        let url = format!(
            "{}/accounts/{}/ai/models/{}",
            self.config.base_url, self.config.account_id, model
        );
        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(Error::Http)?;

        let bytes = self.read_success_body(response).await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let info = match body {
            Value::Object(mut fields) if fields.get("result").is_some_and(Value::is_object) => {
                fields.remove("result").unwrap_or_default()
            }
            other => other,
        };
        Ok(serde_json::from_value(info)?)
    }

    /// Lists the public model catalog, sorted by model name.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        log::debug!("GET {}", self.config.models_url);

        let response = self
            .http_client
            .get(&self.config.models_url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(Error::Http)?;

        let bytes = self.read_success_body(response).await?;
        let models: ModelsResponse = serde_json::from_slice(&bytes)?;
        Ok(catalog_entries(models))
    }

    /// Reads the body, turning a non-2xx status into [`Error::Api`].
    async fn read_success_body(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::Http)?;

        log::debug!("Response status: {}", status);
        if self.config.debug {
            log::debug!("Response body: {}", String::from_utf8_lossy(&bytes));
        }

        if !status.is_success() {
            return Err(Error::api(format!(
                "API returned status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&bytes)
            )));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> Client {
        Client::new(
            ClientConfig::builder()
                .account_id("acct-123")
                .api_token("token")
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_run_url_adds_prefix() {
        let client = test_client();
        assert_eq!(
            client.run_url("meta/llama-3-8b-instruct"),
            "https://api.cloudflare.com/client/v4/accounts/acct-123/ai/run/@cf/meta/llama-3-8b-instruct"
        );
    }

    #[test]
    fn test_run_url_keeps_existing_prefix() {
        let client = test_client();
        assert_eq!(
            client.run_url(crate::models::QWEN3_30B_A3B),
            "https://api.cloudflare.com/client/v4/accounts/acct-123/ai/run/@cf/qwen/qwen3-30b-a3b-fp8"
        );
    }

    #[test]
    fn test_client_debug_hides_token() {
        let printed = format!("{:?}", test_client());
        assert!(!printed.contains("\"token\""));
    }
}
