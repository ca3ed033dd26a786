use shared::error::ErrorBody;
use thiserror::Error;

use crate::state::OperationKind;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed with status code {status}")]
    Status {
        status: u16,
        body: Option<ErrorBody>,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn status(status: u16, body: Option<ErrorBody>) -> Self {
        TransportError::Status { status, body }
    }

    /// Message carried by the server's error body, if any.
    pub fn response_message(&self) -> Option<String> {
        match self {
            TransportError::Status {
                body: Some(body), ..
            } => body.message(),
            _ => None,
        }
    }

    /// Human-readable message for a rejection: the server's message first, then
    /// the error's own display text, then its debug rendering.
    pub fn rejection_message(&self) -> String {
        if let Some(message) = self.response_message() {
            return message;
        }
        let own = self.to_string();
        if !own.is_empty() {
            return own;
        }
        format!("{self:?}")
    }
}

/// A settled failure as returned to the caller of a dispatcher operation. The same
/// message has already been written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failed: {message}")]
pub struct Rejection {
    pub kind: OperationKind,
    pub message: String,
}

impl Rejection {
    pub fn new(kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
