//! Error types for tagmeta.
//!
//! A single error hierarchy built with `thiserror`. Identity resolution never
//! lets these escape its public boundary; the metadata query surfaces them on
//! its snapshot.

use thiserror::Error;

/// Result type alias using `TagmetaError`.
pub type Result<T> = std::result::Result<T, TagmetaError>;

/// Main error type for all tagmeta operations.
#[derive(Debug, Error)]
pub enum TagmetaError {
    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRY / RPC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON-RPC call failed or the contract reverted.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    /// Contract return data could not be ABI-decoded.
    #[error("ABI decode failed: {0}")]
    AbiDecodeError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // HTTP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// A service answered with a non-success status.
    #[error("{service} responded with {status}: {body}")]
    ApiStatus {
        /// Which service answered
        service: String,
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Address could not be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TagmetaError {
    /// Returns true if this error is transient (a retry could succeed).
    ///
    /// Nothing in tagmeta retries; this only drives log levels.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TagmetaError::HttpError(_) | TagmetaError::RpcError(_) => true,
            TagmetaError::ApiStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Creates an `ApiStatus` error.
    pub fn api_status(service: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        TagmetaError::ApiStatus {
            service: service.into(),
            status,
            body: body.into(),
        }
    }
}
