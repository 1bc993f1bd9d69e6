use crate::http::Response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid UTF-8 in event stream: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// Non-success response. The response is returned untouched so callers
    /// can inspect status, headers and body.
    #[error("Unexpected response status: {}", .0.status())]
    Status(Box<Response>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cancelled")]
    Cancelled,
}

impl Error {
    /// The response carried by a [`Error::Status`] failure.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Take ownership of the response carried by a [`Error::Status`] failure.
    pub fn into_response(self) -> Result<Response> {
        match self {
            Self::Status(response) => Ok(*response),
            other => Err(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
