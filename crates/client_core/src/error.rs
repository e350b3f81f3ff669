use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} answered with http status {status}")]
    Status { url: String, status: u16 },
    #[error("malformed response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl TransportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidBaseUrl { .. } | Self::Client(_) => ErrorCode::Internal,
            Self::Request { .. } | Self::Timeout { .. } => ErrorCode::Transport,
            Self::Status { .. } => ErrorCode::HttpStatus,
            Self::Body { .. } => ErrorCode::MalformedBody,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(value: TransportError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("directory payload has no 'shows' mapping")]
    MissingShows,
    #[error("directory payload is not a json object")]
    NotAnObject,
}

impl From<DirectoryError> for ApiError {
    fn from(value: DirectoryError) -> Self {
        ApiError::new(ErrorCode::MalformedBody, value.to_string())
    }
}
