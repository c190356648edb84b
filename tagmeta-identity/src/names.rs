//! Name resolution API client.
//!
//! Maps an opaque registry identifier to a human-readable handle via
//! `GET <base>/getTwitterNames?ids=<id>`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use tagmeta_core::constants::{
    DEFAULT_NAMES_API_URL, DEFAULT_TIMEOUT_SECONDS, NAMES_LOOKUP_PARAM, NAMES_LOOKUP_PATH,
};
use tagmeta_core::error::{Result, TagmetaError};
use tagmeta_core::traits::NameLookup;

/// Name API client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamesConfig {
    /// Base URL of the name API (without the lookup path)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NAMES_API_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl NamesConfig {
    /// Creates a configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamesResponse {
    #[serde(rename = "twitterNames", default)]
    twitter_names: HashMap<String, Value>,
}

/// Client for the name resolution API.
pub struct NamesClient {
    config: NamesConfig,
    http_client: reqwest::Client,
}

impl NamesClient {
    /// Creates a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(NamesConfig::new(base_url))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: NamesConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TagmetaError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Looks up the handle registered for `id`.
    ///
    /// Any status other than 200 is an error carrying the response body.
    #[instrument(skip(self))]
    pub async fn get_name(&self, id: &str) -> Result<Option<String>> {
        let url = self.lookup_url(id)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| TagmetaError::HttpError(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(TagmetaError::api_status(
                "names api",
                status.as_u16(),
                format!("{}\r\n{}", status.canonical_reason().unwrap_or_default(), body),
            ));
        }

        let body: NamesResponse = response
            .json()
            .await
            .map_err(|e| TagmetaError::HttpError(e.to_string()))?;

        let name = body
            .twitter_names
            .get(id)
            .and_then(Value::as_str)
            .map(str::to_string);
        debug!(id, found = name.is_some(), "Name lookup complete");
        Ok(name)
    }

    /// Builds the lookup URL with `id` encoded into the query string.
    fn lookup_url(&self, id: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, NAMES_LOOKUP_PATH))
            .map_err(|e| TagmetaError::ConfigError(format!("names base URL: {}", e)))?;
        url.query_pairs_mut().append_pair(NAMES_LOOKUP_PARAM, id);
        Ok(url)
    }
}

#[async_trait]
impl NameLookup for NamesClient {
    async fn lookup_name(&self, id: &str) -> Result<Option<String>> {
        self.get_name(id).await
    }
}
