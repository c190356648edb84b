//! Registry contract client.
//!
//! Performs a read-only `eth_call` of `getMultipleReverse(address[])` on the
//! registry resolver contract over JSON-RPC and decodes the returned
//! `(address, string)[]` tuples.

use std::time::Duration;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use tagmeta_core::constants::{
    DEFAULT_REGISTRY_RPC_URL, DEFAULT_TIMEOUT_SECONDS, REGISTRY_RESOLVER_ADDRESS,
};
use tagmeta_core::error::{Result, TagmetaError};
use tagmeta_core::traits::ReverseRegistry;
use tagmeta_core::types::ReverseRecord;

mod abi {
    alloy::sol! {
        struct ReverseResult {
            address _address;
            string result;
        }

        function getMultipleReverse(address[] addresses) external view returns (ReverseResult[]);
    }
}

/// Registry client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON-RPC URL of the chain hosting the registry
    pub rpc_url: String,
    /// Registry resolver contract address
    pub registry_address: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_REGISTRY_RPC_URL.into(),
            registry_address: REGISTRY_RESOLVER_ADDRESS.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl RegistryConfig {
    /// Creates a configuration with the given RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Client for the registry resolver contract.
pub struct RegistryClient {
    config: RegistryConfig,
    registry: Address,
    http_client: reqwest::Client,
}

impl RegistryClient {
    /// Creates a client for the given RPC URL and the default registry.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        Self::with_config(RegistryConfig::new(rpc_url))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        let registry = parse_address(&config.registry_address)?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TagmetaError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            registry,
            http_client,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Executes the reverse lookup for `addresses`.
    #[instrument(skip(self), fields(count = addresses.len()))]
    pub async fn get_multiple_reverse(&self, addresses: &[String]) -> Result<Vec<ReverseRecord>> {
        let calldata = encode_call(addresses)?;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": self.registry.to_checksum(None),
                    "data": format!("0x{}", hex::encode(calldata)),
                },
                "latest"
            ],
            "id": 1
        });

        let response = self
            .http_client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TagmetaError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TagmetaError::api_status("registry rpc", status.as_u16(), body));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| TagmetaError::HttpError(e.to_string()))?;

        if let Some(error) = envelope.error {
            warn!(code = error.code, message = %error.message, "Registry call failed");
            return Err(TagmetaError::RpcError(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }

        let result = envelope
            .result
            .ok_or_else(|| TagmetaError::RpcError("response has neither result nor error".into()))?;

        let records = decode_response(&result)?;
        debug!(records = records.len(), "Decoded reverse lookup");
        Ok(records)
    }
}

#[async_trait]
impl ReverseRegistry for RegistryClient {
    async fn reverse_lookup(&self, addresses: &[String]) -> Result<Vec<ReverseRecord>> {
        self.get_multiple_reverse(addresses).await
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| TagmetaError::InvalidAddress(format!("{}: {}", raw, e)))
}

/// ABI-encodes the `getMultipleReverse` call.
fn encode_call(addresses: &[String]) -> Result<Vec<u8>> {
    let addresses = addresses
        .iter()
        .map(|a| parse_address(a))
        .collect::<Result<Vec<_>>>()?;

    Ok(abi::getMultipleReverseCall { addresses }.abi_encode())
}

/// Decodes the hex return data into reverse records.
///
/// Addresses are rendered in EIP-55 checksum form.
fn decode_response(hex_data: &str) -> Result<Vec<ReverseRecord>> {
    let data = hex_data.strip_prefix("0x").unwrap_or(hex_data);
    if data.is_empty() {
        return Err(TagmetaError::AbiDecodeError("empty return data".into()));
    }

    let bytes = hex::decode(data)?;
    let decoded = abi::getMultipleReverseCall::abi_decode_returns(&bytes, true)
        .map_err(|e| TagmetaError::AbiDecodeError(e.to_string()))?;

    Ok(decoded
        ._0
        .into_iter()
        .map(|entry| ReverseRecord::new(entry._address.to_checksum(None), entry.result))
        .collect())
}
