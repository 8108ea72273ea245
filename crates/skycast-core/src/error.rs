//! Error types for skycast-core.

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to the geocoding or weather API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A configured base URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the body could not be read.
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with something other than 200 OK.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status code, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
