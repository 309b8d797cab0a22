//! Request-level error taxonomy
//!
//! Provider lookup failures never surface here: they degrade to an
//! unresolved name inside the pipeline. Only routing, delivery and
//! unexpected faults reach the caller.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing routing key")]
    MissingKey,

    #[error("no route configured for key '{0}'")]
    UnknownRoute(String),

    #[error("relay to destination failed: status={status} body={body}")]
    Relay { status: u16, body: String },

    #[error("destination unreachable: {0}")]
    Unreachable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    /// HTTP status this error maps to at the handler boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingKey => StatusCode::BAD_REQUEST,
            RelayError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            RelayError::Relay { .. } | RelayError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
