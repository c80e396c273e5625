use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to encode session value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("stored value for '{key}' is corrupt")]
    Corrupt { key: &'static str },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
