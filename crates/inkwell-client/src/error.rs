//! Client error type.

use inkwell_shared::ErrorResponse;
use thiserror::Error;

use crate::editor::EditorError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a problem-details body.
    #[error("{status}: {}", .problem.message())]
    Api { status: u16, problem: ErrorResponse },

    /// Non-success status without a readable problem body.
    #[error("Unexpected response {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl ClientError {
    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Unexpected { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text suitable for a toast: the server's detail when there is one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { problem, .. } => problem.message().to_string(),
            other => other.to_string(),
        }
    }
}
