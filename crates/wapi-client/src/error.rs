//! WAPI client errors

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the WAPI
#[derive(Debug, Error)]
pub enum WapiError {
    /// Transport-level failure (connection refused, timeout, TLS handshake)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The appliance answered with a status that is not a success for the operation
    #[error("WAPI request error: {status}('{reason}')\nContents:\n{body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
        /// Response body as returned by the appliance
        body: String,
    },

    /// A domain object could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body is not valid JSON for the expected shape
    #[error("error decoding response body: {source} - Response (first 500 chars): {snippet}")]
    Decode {
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
        /// Leading part of the offending body
        snippet: String,
    },

    /// Invalid request (malformed URL, unknown operation, bad argument)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration (CA bundle, environment)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The connector failed its construction-time liveness check
    #[error("Failed to connect to the grid: {0}")]
    Validation(#[source] Box<WapiError>),

    /// The call-level deadline expired before all attempts finished
    #[error("WAPI call timed out after {0:?}")]
    Timeout(Duration),
}

impl WapiError {
    /// Build a decode error, keeping the first 500 characters of the body
    pub(crate) fn decode(source: serde_json::Error, body: &[u8]) -> Self {
        WapiError::Decode {
            source,
            snippet: String::from_utf8_lossy(body).chars().take(500).collect(),
        }
    }

    /// HTTP status carried by this error, if the appliance answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            WapiError::Api { status, .. } => Some(*status),
            WapiError::Http(err) => err.status().map(|s| s.as_u16()),
            WapiError::Validation(inner) => inner.status(),
            _ => None,
        }
    }
}
