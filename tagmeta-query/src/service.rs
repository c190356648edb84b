//! Metadata service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use tagmeta_core::constants::{METADATA_PATH, METADATA_RESOURCE};
use tagmeta_core::error::{Result, TagmetaError};
use tagmeta_core::traits::MetadataService;
use tagmeta_core::types::{MetadataRequest, MetadataResponse};

use crate::config::MetadataServiceConfig;

/// Fetches `address_metadata_info` over HTTP.
pub struct HttpMetadataService {
    config: MetadataServiceConfig,
    http_client: reqwest::Client,
}

impl HttpMetadataService {
    /// Creates a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(MetadataServiceConfig::new(base_url))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: MetadataServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TagmetaError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn resource_url(&self, request: &MetadataRequest) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, METADATA_PATH))
            .map_err(|e| TagmetaError::ConfigError(format!("metadata base URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl MetadataService for HttpMetadataService {
    #[instrument(skip(self, request), fields(resource = METADATA_RESOURCE, count = request.addresses.len()))]
    async fn fetch_metadata(&self, request: &MetadataRequest) -> Result<MetadataResponse> {
        let url = self.resource_url(request)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| TagmetaError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TagmetaError::api_status("metadata service", status.as_u16(), body));
        }

        let metadata: MetadataResponse = response
            .json()
            .await
            .map_err(|e| TagmetaError::HttpError(e.to_string()))?;

        debug!(returned = metadata.addresses.len(), "Fetched address metadata");
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resource_url() {
        let service = HttpMetadataService::new("https://meta.test/").unwrap();
        let request = MetadataRequest::new(vec!["0xA".into(), "0xB".into()], "137");
        let url = service.resource_url(&request).unwrap();

        assert_eq!(url.path(), "/api/v1/metadata");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("addresses".into(), "0xA,0xB".into())));
        assert!(pairs.contains(&("chainId".into(), "137".into())));
        assert!(pairs.contains(&("tagsLimit".into(), "20".into())));
    }

    #[tokio::test]
    async fn test_fetch_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/metadata"))
            .and(query_param("addresses", "0xABC"))
            .and(query_param("tagsLimit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "addresses": {
                    "0xABC": {
                        "tags": [{ "slug": "a", "name": "A", "tagType": "name", "ordinal": 0, "meta": "{}" }],
                        "reputation": 1
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpMetadataService::new(server.uri()).unwrap();
        let response = service
            .fetch_metadata(&MetadataRequest::new(vec!["0xABC".into()], "1"))
            .await
            .unwrap();

        assert_eq!(response.addresses["0xABC"].tags[0].slug, "a");
    }

    #[tokio::test]
    async fn test_fetch_metadata_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let service = HttpMetadataService::new(server.uri()).unwrap();
        let err = service
            .fetch_metadata(&MetadataRequest::new(vec!["0xABC".into()], "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, TagmetaError::ApiStatus { status: 503, .. }));
    }
}
