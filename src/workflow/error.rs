use thiserror::Error;

use crate::{domain::error::ValidationError, http::error::ApiError, session::error::SessionError};

/// Why a workflow step did not advance. The step's prior state is kept in every case.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("network error: {0}")]
    Network(#[from] ApiError),

    #[error("code {code} does not exist")]
    CodeNotFound { code: String },

    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl WorkflowError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            WorkflowError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
