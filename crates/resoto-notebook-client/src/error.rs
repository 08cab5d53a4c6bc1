//! Error types for the resoto-notebook-client crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success HTTP status. Displays as the response body, verbatim.
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error(
        "Content type {content_type} is not supported by the sandboxed client. \
         Use a native notebook instead"
    )]
    UnsupportedContentType { content_type: String },

    #[error("Unexpected content type {content_type} in response")]
    UnexpectedContentType { content_type: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
