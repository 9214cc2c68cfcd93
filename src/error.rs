use std::time::Duration;

use thiserror::Error;

use crate::analysis::response::ResponseError;

// ---------------------------------------------------------------------------
// Upload error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can end an upload-analyze cycle without rendering results.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Trigger pressed with no file chosen.
    #[error("Please select a CSV file first")]
    NoFileSelected,
    /// Trigger pressed while a previous analysis is still in flight.
    #[error("An analysis is already in progress")]
    Busy,
    /// The service answered with `success: false`.
    #[error("{0}")]
    Service(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures of the round trip itself, including responses we cannot trust.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(#[from] ResponseError),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("request was cancelled")]
    Cancelled,
    #[error("analysis worker stopped before answering")]
    WorkerLost,
}

impl UploadError {
    /// Text shown in the blocking notice window.
    pub fn alert_text(&self) -> String {
        match self {
            UploadError::NoFileSelected | UploadError::Busy => self.to_string(),
            UploadError::Service(message) => format!("Error: {message}"),
            UploadError::Transport(err) => format!("An error occurred: {err}"),
        }
    }

    /// Validation errors never reach the network and leave the UI untouched.
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::NoFileSelected | UploadError::Busy)
    }
}
