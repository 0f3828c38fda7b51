// Request error types

use thiserror::Error;

/// Why an outbound request did not produce a successful reply
#[derive(Debug, Error)]
pub enum RequestError {
    /// Only GET, POST and PUT are supported
    #[error("unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Building, connecting, TLS or following redirects failed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The server answered with a 4xx or 5xx status
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },
}

impl RequestError {
    /// True if the request never reached the transport
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::UnsupportedMethod(_) | Self::InvalidUrl { .. } | Self::Encode(_) => true,
            Self::Transport(e) => e.is_builder(),
            Self::Body(_) | Self::Status { .. } => false,
        }
    }

    /// True if no connection to the server could be made
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}
