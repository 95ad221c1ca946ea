//! Admin API errors and their HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fake_sns::{QueueError, SnsError};
use serde::Serialize;
use thiserror::Error;

/// Error returned by an admin handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Sns(#[from] SnsError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Sns(SnsError::DuplicateTopic(_)) => (StatusCode::CONFLICT, "DuplicateTopic"),
            Self::Sns(SnsError::TopicNotFound(_)) => (StatusCode::NOT_FOUND, "NotFound"),
            Self::Sns(
                SnsError::InvalidTopicName(_)
                | SnsError::InvalidTarget { .. }
                | SnsError::UnsupportedProtocol(_),
            ) => (StatusCode::BAD_REQUEST, "InvalidParameter"),
            Self::Sns(SnsError::Queue(e)) | Self::Queue(e) => queue_status(e),
        }
    }
}

fn queue_status(error: &QueueError) -> (StatusCode, &'static str) {
    match error {
        QueueError::QueueNotFound(_) => (StatusCode::NOT_FOUND, "NonExistentQueue"),
        QueueError::DuplicateQueue(_) => (StatusCode::CONFLICT, "QueueAlreadyExists"),
        QueueError::InvalidQueueName(_) => (StatusCode::BAD_REQUEST, "InvalidParameter"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
