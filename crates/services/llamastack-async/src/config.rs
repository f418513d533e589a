use std::collections::BTreeMap;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Default llama-stack server base URL
pub const LLAMA_STACK_DEFAULT_BASE: &str = "http://localhost:8321";
/// Header carrying per-request provider credentials as a JSON object
pub const HDR_PROVIDER_DATA: &str = "x-llamastack-provider-data";

/// Configuration for the llama-stack client
///
/// Replaces the ambient, process-wide client object of typical SDK scripts
/// with an explicit value passed to [`Client::with_config`](crate::Client::with_config).
#[derive(Debug, Clone)]
pub struct StackConfig {
    base_url: String,
    api_key: Option<String>,
    provider_data: BTreeMap<String, String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("LLAMA_STACK_BASE_URL")
                .unwrap_or_else(|_| LLAMA_STACK_DEFAULT_BASE.into()),
            api_key: std::env::var("LLAMA_STACK_API_KEY").ok(),
            provider_data: BTreeMap::new(),
        }
    }
}

impl StackConfig {
    /// Creates a new configuration with default settings
    ///
    /// Attempts to read from environment variables:
    /// - `LLAMA_STACK_BASE_URL` for the server base URL (defaults to `http://localhost:8321`)
    /// - `LLAMA_STACK_API_KEY` for bearer token authentication (optional; local
    ///   servers usually run unauthenticated)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server base URL
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }

    /// Sets bearer token authentication
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Adds one provider credential, e.g. `("together_api_key", "...")`
    ///
    /// Provider data is forwarded to the server in the
    /// `x-llamastack-provider-data` header as a JSON object.
    #[must_use]
    pub fn with_provider_key(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.provider_data.insert(key.into(), value.into());
        self
    }

    /// Replaces the full provider credential map
    #[must_use]
    pub fn with_provider_data<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.provider_data = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Returns the configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Configuration trait for the client
///
/// Implement this trait to provide custom authentication and routing.
pub trait Config: Send + Sync {
    /// Returns HTTP headers to include in requests
    ///
    /// # Errors
    ///
    /// Returns an error if header values contain invalid characters.
    fn headers(&self) -> Result<HeaderMap, crate::error::StackError>;

    /// Constructs the full URL for an API endpoint
    fn url(&self, path: &str) -> String;

    /// Returns query parameters to include in requests
    fn query(&self) -> Vec<(&str, &str)>;
}

impl Config for StackConfig {
    fn headers(&self) -> Result<HeaderMap, crate::error::StackError> {
        use crate::error::StackError;

        let mut h = HeaderMap::new();

        if let Some(key) = &self.api_key {
            let v = format!("Bearer {key}");
            h.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&v)
                    .map_err(|_| StackError::Config("Invalid Authorization header".into()))?,
            );
        }

        if !self.provider_data.is_empty() {
            let json = serde_json::to_string(&self.provider_data)
                .map_err(|e| StackError::Serde(e.to_string()))?;
            h.insert(
                HDR_PROVIDER_DATA,
                HeaderValue::from_str(&json).map_err(|_| {
                    StackError::Config("Invalid x-llamastack-provider-data header".into())
                })?,
            );
        }

        Ok(h)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn query(&self) -> Vec<(&str, &str)> {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_auth_headers_by_default() {
        let cfg = StackConfig {
            base_url: LLAMA_STACK_DEFAULT_BASE.into(),
            api_key: None,
            provider_data: BTreeMap::new(),
        };
        let h = cfg.headers().unwrap();
        assert!(!h.contains_key(AUTHORIZATION));
        assert!(!h.contains_key(HDR_PROVIDER_DATA));
    }

    #[test]
    fn bearer_header() {
        let cfg = StackConfig::new().with_api_key("k123");
        let h = cfg.headers().unwrap();
        assert_eq!(h.get(AUTHORIZATION).unwrap(), "Bearer k123");
    }

    #[test]
    fn provider_data_header_is_json() {
        let cfg = StackConfig::new()
            .with_provider_key("together_api_key", "t-1")
            .with_provider_key("wolfram_alpha_api_key", "w-2");
        let h = cfg.headers().unwrap();
        let v = h.get(HDR_PROVIDER_DATA).unwrap().to_str().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(v).unwrap();
        assert_eq!(parsed["together_api_key"], "t-1");
        assert_eq!(parsed["wolfram_alpha_api_key"], "w-2");
    }

    #[test]
    fn invalid_header_values_error() {
        let cfg = StackConfig::new().with_api_key("bad\nkey");
        match cfg.headers() {
            Err(crate::error::StackError::Config(msg)) => assert!(msg.contains("Authorization")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn url_join() {
        let cfg = StackConfig::new().with_base_url("http://example.test:8321");
        assert_eq!(
            cfg.url("/v1/models"),
            "http://example.test:8321/v1/models"
        );
    }
}
