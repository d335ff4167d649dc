use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid backup format: {0}")]
    InvalidBackupFormat(String),
    #[error("invalid record format: {0:?}")]
    InvalidRecordFormat(String),
}

/// Failures of the durable record slot. Never fatal to the session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read record slot: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write record slot: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("stored records are corrupt: {0}")]
    Corrupt(#[source] KeyListError),
}

/// Why a JSON document is not an array of `YYYY-MM-DD` strings.
#[derive(Debug, Error)]
pub enum KeyListError {
    #[error("not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("expected a JSON array of dates")]
    NotAnArray,
    #[error("entry {index} is not a YYYY-MM-DD date: {value}")]
    BadEntry { index: usize, value: String },
}

#[derive(Debug, Error)]
#[error("coach advice unavailable: {0}")]
pub struct AdviceUnavailable(pub String);

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
