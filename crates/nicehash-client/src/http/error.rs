/*
[INPUT]:  Error sources (transport, JSON decoding, URL/header building, config)
[OUTPUT]: Structured error type shared by the whole crate
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the NiceHash client
#[derive(Error, Debug)]
pub enum NicehashError {
    /// Connection-level failure (DNS, TLS, reset, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("Failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// Serialization of a request payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A header value could not be built from request metadata
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// API key or secret not configured for an authenticated call
    #[error("API key and secret are required for authenticated requests")]
    MissingCredentials,

    /// Response decoded but did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NicehashError {
    /// Check if the error came from the connection itself
    pub fn is_transport(&self) -> bool {
        matches!(self, NicehashError::Http(_))
    }

    /// Check if the server answered with something that is not JSON
    pub fn is_decode(&self) -> bool {
        matches!(self, NicehashError::Decode { .. })
    }

    /// Raw response body, when the failure happened while decoding it
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            NicehashError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type alias for NiceHash operations
pub type Result<T> = std::result::Result<T, NicehashError>;
