//! Client configuration and environment helpers

use crate::{Error, Result};
use std::env;

/// Default Cloudflare API root
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Public model catalog used by [`Client::list_models`](crate::Client::list_models)
pub const DEFAULT_MODELS_URL: &str = "https://ai.cloudflare.com/api/models";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 60;

const ACCOUNT_ID_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";
const API_TOKEN_VAR: &str = "CLOUDFLARE_AUTH_TOKEN";
const BASE_URL_VAR: &str = "WORKERS_AI_BASE_URL";
const DEBUG_VAR: &str = "WORKERS_AI_DEBUG";

/// Connection settings for a [`Client`](crate::Client)
#[derive(Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash
    pub base_url: String,

    /// Model catalog URL
    pub models_url: String,

    /// Cloudflare account that owns the Workers AI binding
    pub account_id: String,

    /// API token sent as a bearer token
    pub api_token: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Log request and response bodies at debug level
    pub debug: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("models_url", &self.models_url)
            .field("account_id", &self.account_id)
            .field("api_token", &"***")
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for ClientConfig
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a config from the process environment.
    ///
    /// | Variable | Field | Required |
    /// |----------|-------|----------|
    /// | `CLOUDFLARE_ACCOUNT_ID` | `account_id` | yes |
    /// | `CLOUDFLARE_AUTH_TOKEN` | `api_token` | yes |
    /// | `WORKERS_AI_BASE_URL` | `base_url` | no |
    /// | `WORKERS_AI_DEBUG` | `debug` (`true` or `1`) | no |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(account_id) = lookup(ACCOUNT_ID_VAR) {
            builder = builder.account_id(account_id);
        }
        if let Some(token) = lookup(API_TOKEN_VAR) {
            builder = builder.api_token(token);
        }
        if let Some(url) = lookup(BASE_URL_VAR) {
            builder = builder.base_url(url);
        }
        if let Some(flag) = lookup(DEBUG_VAR) {
            builder = builder.debug(matches!(flag.trim(), "1" | "true" | "TRUE" | "True"));
        }
        builder.build()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    models_url: Option<String>,
    account_id: Option<String>,
    api_token: Option<String>,
    timeout: Option<u64>,
    debug: Option<bool>,
}

impl std::fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn models_url(mut self, url: impl Into<String>) -> Self {
        self.models_url = Some(url.into());
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let account_id = self
            .account_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::config("account_id is required"))?;

        let api_token = self
            .api_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| Error::config("api_token is required"))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout == 0 {
            return Err(Error::config("timeout must be at least one second"));
        }

        Ok(ClientConfig {
            base_url: trim_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
            models_url: trim_url(self.models_url.as_deref().unwrap_or(DEFAULT_MODELS_URL)),
            account_id,
            api_token,
            timeout,
            debug: self.debug.unwrap_or(false),
        })
    }
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Get the API base URL from the environment or a fallback
///
/// Priority:
/// 1. WORKERS_AI_BASE_URL environment variable
/// 2. fallback parameter
/// 3. [`DEFAULT_BASE_URL`]
///
/// # Examples
///
/// ```rust,no_run
/// use workers_ai::get_base_url;
///
/// // Read from environment
/// let url = get_base_url(None);
///
/// // With fallback, e.g. an AI Gateway endpoint
/// let url = get_base_url(Some("https://gateway.ai.cloudflare.com/v1"));
/// ```
pub fn get_base_url(fallback: Option<&str>) -> String {
    resolve_base_url(env::var(BASE_URL_VAR).ok(), fallback)
}

fn resolve_base_url(from_env: Option<String>, fallback: Option<&str>) -> String {
    from_env
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| fallback.unwrap_or(DEFAULT_BASE_URL).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder()
            .account_id("acct")
            .api_token("token")
            .build()
            .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.models_url, DEFAULT_MODELS_URL);
        assert_eq!(config.timeout, 60);
        assert!(!config.debug);
    }

    #[test]
    fn test_builder_requires_credentials() {
        let err = ClientConfig::builder().api_token("token").build().unwrap_err();
        assert!(err.to_string().contains("account_id is required"));

        let err = ClientConfig::builder()
            .account_id("acct")
            .api_token("  ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("api_token is required"));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ClientConfig::builder()
            .account_id("acct")
            .api_token("token")
            .timeout(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = ClientConfig::builder()
            .account_id("acct")
            .api_token("token")
            .base_url("http://localhost:8787/client/v4/")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:8787/client/v4");
    }

    #[test]
    fn test_debug_masks_token() {
        let config = ClientConfig::builder()
            .account_id("acct")
            .api_token("super-secret")
            .build()
            .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("***"));
        assert!(printed.contains("acct"));
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup_in(&[
            ("CLOUDFLARE_ACCOUNT_ID", "acct"),
            ("CLOUDFLARE_AUTH_TOKEN", "token"),
            ("WORKERS_AI_BASE_URL", "http://localhost:9000"),
            ("WORKERS_AI_DEBUG", "true"),
        ]))
        .unwrap();

        assert_eq!(config.account_id, "acct");
        assert_eq!(config.api_token, "token");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert!(config.debug);
    }

    #[test]
    fn test_from_lookup_missing_token() {
        let result = ClientConfig::from_lookup(lookup_in(&[("CLOUDFLARE_ACCOUNT_ID", "acct")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_base_url_priority() {
        assert_eq!(
            resolve_base_url(Some("http://env".into()), Some("http://fallback")),
            "http://env"
        );
        assert_eq!(
            resolve_base_url(None, Some("http://fallback")),
            "http://fallback"
        );
        assert_eq!(resolve_base_url(Some(String::new()), None), DEFAULT_BASE_URL);
    }
}
