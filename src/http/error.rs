use thiserror::Error;

/// Failures talking to the registry
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} not found")]
    NotFound { url: String },

    #[error("registry answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("invalid registry url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
