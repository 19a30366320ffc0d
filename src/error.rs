use thiserror::Error;

/// Fixed message shown when the server body carries no usable error text.
pub const FETCH_FALLBACK: &str = "Failed to fetch data";

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("could not connect to {url}")]
    Connection { url: String },

    #[error("invalid response from {url}")]
    InvalidResponse { url: String },

    #[error("request to {url} failed: {reason}")]
    Other { url: String, reason: String },
}

impl NetworkError {
    pub fn from_reqwest(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else if err.is_connect() {
            NetworkError::Connection {
                url: url.to_string(),
            }
        } else if err.is_decode() {
            NetworkError::InvalidResponse {
                url: url.to_string(),
            }
        } else {
            NetworkError::Other {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NetworkError::Timeout { timeout_secs, .. } => format!(
                "The server did not respond within {}s. Is the explorer backend running?",
                timeout_secs
            ),
            NetworkError::Connection { url } => format!(
                "Could not reach {}. Check the endpoint setting and your connection.",
                url
            ),
            NetworkError::InvalidResponse { .. } | NetworkError::Other { .. } => {
                FETCH_FALLBACK.to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ExploreError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Non-2xx response from the explorer backend. `message` is the server's
    /// `error` field when present, otherwise [`FETCH_FALLBACK`].
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Configuration(String),
}

impl ExploreError {
    /// Text suitable for the inline error banner.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ExploreError::Network(net) => net.user_friendly_message(),
            ExploreError::Api { message, .. } => message.clone(),
            ExploreError::Configuration(msg) => msg.clone(),
        }
    }
}
